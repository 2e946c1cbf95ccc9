// PAYLANE: Client-side interaction layer for escrow smart contracts
//
// SPDX-License-Identifier: Apache-2.0
//
// Designed in 2019-2025 by Dr Maxim Orlovsky <orlovsky@ubideco.org>
// Written in 2024-2025 by Dr Maxim Orlovsky <orlovsky@ubideco.org>
//
// Copyright (C) 2019-2024 LNP/BP Standards Association, Switzerland.
// Copyright (C) 2024-2025 Laboratories for Ubiquitous Deterministic Computing (UBIDECO),
//                         Institute for Distributed and Cognitive Systems (InDCS), Switzerland.
// Copyright (C) 2019-2025 Dr Maxim Orlovsky.
// All rights under the above copyrights are reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License. You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License
// is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express
// or implied. See the License for the specific language governing permissions and limitations under
// the License.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use paylane_codec::{DecodeError, LedgerValue, VariantTag};

use crate::Address;

/// 1-based identifier of an escrow; the ID space is dense and append-only.
#[derive(Wrapper, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, From, Display)]
#[wrapper(Deref)]
#[display(inner)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct EscrowId(u32);

impl EscrowId {
    pub fn get(&self) -> u32 { self.0 }
}

/// 128-bit token amount in minimal units, kept in exact integer arithmetic.
///
/// `Display` is the base-10 integer string; [`Amount::from_decimal`] accepts human-entered
/// decimal strings with up to [`Amount::DECIMALS`] places.
#[derive(Wrapper, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, From, Display)]
#[wrapper(Deref)]
#[display(inner)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i128);

/// Error parsing a decimal amount string.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum AmountParseError {
    /// amount `{0}` is not a valid decimal number
    Invalid(String),

    /// amount `{0}` has more than 7 decimal places
    TooPrecise(String),

    /// amount `{0}` exceeds the 128-bit range
    Overflow(String),
}

impl Amount {
    /// Decimal places of the minimal unit.
    pub const DECIMALS: u32 = 7;

    pub const ZERO: Amount = Amount(0);

    pub fn value(&self) -> i128 { self.0 }

    /// Parses a human-entered decimal amount ("1000.00") into minimal units.
    ///
    /// All arithmetic is integral; no floating-point representation exists at any point, so
    /// amounts survive the round trip without drift.
    pub fn from_decimal(s: &str) -> Result<Amount, AmountParseError> {
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1i128, rest),
            None => (1i128, s),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (digits, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountParseError::Invalid(s.to_owned()));
        }
        if frac_part.len() > Self::DECIMALS as usize {
            return Err(AmountParseError::TooPrecise(s.to_owned()));
        }
        let mut value = 0i128;
        for chr in int_part.chars().chain(frac_part.chars()) {
            let digit = chr
                .to_digit(10)
                .ok_or_else(|| AmountParseError::Invalid(s.to_owned()))?;
            value = value
                .checked_mul(10)
                .and_then(|val| val.checked_add(digit as i128))
                .ok_or_else(|| AmountParseError::Overflow(s.to_owned()))?;
        }
        let scale = 10i128.pow(Self::DECIMALS - frac_part.len() as u32);
        value
            .checked_mul(scale)
            .and_then(|val| val.checked_mul(sign))
            .map(Amount)
            .ok_or_else(|| AmountParseError::Overflow(s.to_owned()))
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    fn from_wire_value(value: &LedgerValue) -> Result<Amount, DecodeError> {
        value.as_i128().map(Amount)
    }
}

/// Escrow lifecycle status, integer-coded on the wire.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
pub enum EscrowStatus {
    /// created, work not started; open jobs stay here until a freelancer is accepted
    #[display("pending")]
    Pending,

    /// work in progress
    #[display("active")]
    Active,

    /// all milestones paid out
    #[display("completed")]
    Completed,

    /// a milestone is under dispute
    #[display("disputed")]
    Disputed,

    /// deposited funds returned to the depositor
    #[display("refunded")]
    Refunded,

    /// deadline passed without completion
    #[display("expired")]
    Expired,
}

impl EscrowStatus {
    pub const fn wire_code(self) -> u32 {
        match self {
            Self::Pending => 0,
            Self::Active => 1,
            Self::Completed => 2,
            Self::Disputed => 3,
            Self::Refunded => 4,
            Self::Expired => 5,
        }
    }

    /// Decodes from any of the variant encodings the serializer paths produce. The symbolic
    /// aliases of older serializers are accepted on decode and never produced on encode.
    pub fn from_wire_value(value: &LedgerValue) -> Result<Self, DecodeError> {
        match value.variant_tag()? {
            VariantTag::Code(0) => Ok(Self::Pending),
            VariantTag::Code(1) => Ok(Self::Active),
            VariantTag::Code(2) => Ok(Self::Completed),
            VariantTag::Code(3) => Ok(Self::Disputed),
            VariantTag::Code(4) => Ok(Self::Refunded),
            VariantTag::Code(5) => Ok(Self::Expired),
            VariantTag::Name("Pending") => Ok(Self::Pending),
            VariantTag::Name("Active" | "InProgress") => Ok(Self::Active),
            VariantTag::Name("Completed" | "Released") => Ok(Self::Completed),
            VariantTag::Name("Disputed") => Ok(Self::Disputed),
            VariantTag::Name("Refunded") => Ok(Self::Refunded),
            VariantTag::Name("Expired") => Ok(Self::Expired),
            VariantTag::Code(other) => Err(DecodeError::UnknownVariant(other.to_string())),
            VariantTag::Name(other) => Err(DecodeError::UnknownVariant(other.to_owned())),
        }
    }
}

/// Milestone status, integer-coded on the wire.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
pub enum MilestoneStatus {
    /// not yet submitted for review
    #[display("pending")]
    Pending,

    /// submitted, awaiting the depositor's verdict
    #[display("submitted")]
    Submitted,

    /// approved and paid out
    #[display("approved")]
    Approved,

    /// rejected, may be resubmitted
    #[display("rejected")]
    Rejected,

    /// under dispute
    #[display("disputed")]
    Disputed,

    /// dispute resolved by an arbiter
    #[display("resolved")]
    Resolved,
}

impl MilestoneStatus {
    pub const fn wire_code(self) -> u32 {
        match self {
            Self::Pending => 0,
            Self::Submitted => 1,
            Self::Approved => 2,
            Self::Rejected => 3,
            Self::Disputed => 4,
            Self::Resolved => 5,
        }
    }

    pub fn from_wire_value(value: &LedgerValue) -> Result<Self, DecodeError> {
        match value.variant_tag()? {
            VariantTag::Code(0) => Ok(Self::Pending),
            VariantTag::Code(1) => Ok(Self::Submitted),
            VariantTag::Code(2) => Ok(Self::Approved),
            VariantTag::Code(3) => Ok(Self::Rejected),
            VariantTag::Code(4) => Ok(Self::Disputed),
            VariantTag::Code(5) => Ok(Self::Resolved),
            VariantTag::Name("Pending" | "NotStarted") => Ok(Self::Pending),
            VariantTag::Name("Submitted") => Ok(Self::Submitted),
            VariantTag::Name("Approved") => Ok(Self::Approved),
            VariantTag::Name("Rejected") => Ok(Self::Rejected),
            VariantTag::Name("Disputed") => Ok(Self::Disputed),
            VariantTag::Name("Resolved") => Ok(Self::Resolved),
            VariantTag::Code(other) => Err(DecodeError::UnknownVariant(other.to_string())),
            VariantTag::Name(other) => Err(DecodeError::UnknownVariant(other.to_owned())),
        }
    }
}

/// Freelancer badge tier derived from the number of completed projects.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
pub enum Badge {
    /// 0-4 completed projects
    #[display("beginner")]
    Beginner,

    /// 5-14 completed projects
    #[display("intermediate")]
    Intermediate,

    /// 15-49 completed projects
    #[display("advanced")]
    Advanced,

    /// 50+ completed projects
    #[display("expert")]
    Expert,
}

impl Badge {
    pub fn from_completed_count(completed: u32) -> Self {
        match completed {
            0..=4 => Self::Beginner,
            5..=14 => Self::Intermediate,
            15..=49 => Self::Advanced,
            _ => Self::Expert,
        }
    }

    pub fn from_wire_value(value: &LedgerValue) -> Result<Self, DecodeError> {
        match value.variant_tag()? {
            VariantTag::Code(0) | VariantTag::Name("Beginner") => Ok(Self::Beginner),
            VariantTag::Code(1) | VariantTag::Name("Intermediate") => Ok(Self::Intermediate),
            VariantTag::Code(2) | VariantTag::Name("Advanced") => Ok(Self::Advanced),
            VariantTag::Code(3) | VariantTag::Name("Expert") => Ok(Self::Expert),
            VariantTag::Code(other) => Err(DecodeError::UnknownVariant(other.to_string())),
            VariantTag::Name(other) => Err(DecodeError::UnknownVariant(other.to_owned())),
        }
    }
}

/// Running rating aggregate of a freelancer.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[derive(Serialize, Deserialize)]
pub struct RatingSummary {
    pub total: u32,
    pub count: u32,
}

impl RatingSummary {
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.total as f64 / self.count as f64)
    }

    /// The aggregate travels as a two-element vector `(total, count)`.
    pub fn from_wire_value(value: &LedgerValue) -> Result<Self, DecodeError> {
        let items = value.as_vec()?;
        match items {
            [total, count] => Ok(Self { total: total.as_u32()?, count: count.as_u32()? }),
            _ => Err(DecodeError::UnrecognizedShape(s!("rating aggregate must be a pair"))),
        }
    }
}

/// Rating submitted by the depositor for a completed escrow.
#[derive(Clone, Eq, PartialEq, Debug)]
#[derive(Serialize, Deserialize)]
pub struct Rating {
    pub escrow_id: EscrowId,
    pub freelancer: Address,
    pub client: Address,
    /// 1-5 stars.
    pub rating: u32,
    pub review: String,
    pub rated_at: u64,
}

impl Rating {
    pub fn from_wire_value(value: &LedgerValue) -> Result<Self, DecodeError> {
        Ok(Rating {
            escrow_id: EscrowId::from(req(value, "escrow_id")?.as_u32()?),
            freelancer: req_address(value, "freelancer")?,
            client: req_address(value, "client")?,
            rating: req(value, "rating")?.as_u32()?,
            review: req(value, "review")?.as_text()?.to_owned(),
            rated_at: req(value, "rated_at")?.as_u64()?,
        })
    }
}

/// Milestone of an escrow.
///
/// Owned by exactly one escrow; the index is positional within the escrow's milestone sequence
/// and stable — milestones are never reordered.
#[derive(Clone, Eq, PartialEq, Debug)]
#[derive(Serialize, Deserialize)]
pub struct Milestone {
    pub description: String,
    pub amount: Amount,
    pub status: MilestoneStatus,
    pub submitted_at: Option<u64>,
    pub approved_at: Option<u64>,
    pub disputed_at: Option<u64>,
    pub disputed_by: Option<Address>,
    pub dispute_reason: Option<String>,
    pub rejection_reason: Option<String>,
    pub resolved_by: Option<Address>,
    pub resolution_amount: Option<Amount>,
}

impl Milestone {
    pub fn from_wire_value(value: &LedgerValue) -> Result<Self, DecodeError> {
        Ok(Milestone {
            description: req(value, "description")?.as_text()?.to_owned(),
            amount: Amount::from_wire_value(req(value, "amount")?)?,
            status: MilestoneStatus::from_wire_value(req(value, "status")?)?,
            submitted_at: opt_timestamp(value.get("submitted_at"))?,
            approved_at: opt_timestamp(value.get("approved_at"))?,
            disputed_at: opt_timestamp(value.get("disputed_at"))?,
            disputed_by: opt_address(value.get("disputed_by"))?,
            dispute_reason: opt_text(value.get("dispute_reason"))?,
            rejection_reason: opt_text(value.get("rejection_reason"))?,
            resolved_by: opt_address(value.get("resolved_by"))?,
            resolution_amount: opt_amount(value.get("resolution_amount"))?,
        })
    }
}

/// Application of a freelancer to an open job.
#[derive(Clone, PartialEq, Debug)]
#[derive(Serialize, Deserialize)]
pub struct Application {
    pub freelancer: Address,
    pub cover_letter: String,
    /// Proposed timeline in days; 0 means unspecified.
    pub proposed_timeline: u32,
    pub applied_at: u64,
    /// Badge annotation fetched from the auxiliary read call, when enrichment was requested.
    #[serde(default)]
    pub badge: Option<Badge>,
    /// Rating annotation fetched from the auxiliary read call, when enrichment was requested.
    #[serde(default)]
    pub rating: Option<RatingSummary>,
}

impl Application {
    pub fn from_wire_value(value: &LedgerValue) -> Result<Self, DecodeError> {
        let proposed_timeline = match value.get("proposed_timeline") {
            None => 0,
            Some(timeline) if timeline.is_void() => 0,
            Some(timeline) => timeline.as_u32()?,
        };
        Ok(Application {
            freelancer: req_address(value, "freelancer")?,
            cover_letter: req(value, "cover_letter")?.as_text()?.to_owned(),
            proposed_timeline,
            applied_at: req(value, "applied_at")?.as_u64()?,
            badge: None,
            rating: None,
        })
    }
}

/// Ledger-resident escrow record.
///
/// Never mutated locally: every write goes through a transaction lifecycle and the record is
/// re-read afterwards.
#[derive(Clone, PartialEq, Debug)]
#[derive(Serialize, Deserialize)]
pub struct Escrow {
    pub id: EscrowId,
    pub depositor: Address,
    /// Absent beneficiary signals an open, unassigned job.
    pub beneficiary: Option<Address>,
    pub arbiters: Vec<Address>,
    pub required_confirmations: u32,
    pub status: EscrowStatus,
    /// Absent token means the ledger's native asset.
    pub token: Option<Address>,
    pub total_amount: Amount,
    pub paid_amount: Amount,
    pub platform_fee: Amount,
    pub created_at: u64,
    pub deadline: u64,
    pub title: String,
    pub description: String,
    pub is_open_job: bool,
    pub work_started: bool,
    pub milestone_count: u32,
    /// Wire keys this version does not know about, preserved in wire order.
    #[serde(default)]
    pub extras: IndexMap<String, LedgerValue>,
}

/// Wire keys consumed into the typed escrow fields; everything else lands in `extras`.
const ESCROW_KEYS: [&str; 16] = [
    "depositor",
    "beneficiary",
    "arbiters",
    "required_confirmations",
    "status",
    "token",
    "total_amount",
    "paid_amount",
    "platform_fee",
    "created_at",
    "deadline",
    "project_title",
    "project_description",
    "is_open_job",
    "work_started",
    "milestone_count",
];

impl Escrow {
    /// Decodes an escrow record from its wire map.
    ///
    /// `Ok(None)` when the map is empty or misses the depositor key — the record does not exist.
    /// All other required fields must be present and well-shaped: a partially populated escrow
    /// is never produced, and unknown keys are preserved rather than dropped.
    pub fn from_wire_value(
        id: EscrowId,
        value: &LedgerValue,
    ) -> Result<Option<Escrow>, DecodeError> {
        let entries = value.as_entries()?;
        if entries.is_empty() {
            return Ok(None);
        }
        let Some(depositor) = value.get("depositor") else {
            return Ok(None);
        };
        let depositor = Address::from(depositor.as_address()?.to_owned());

        let extras = entries
            .iter()
            .filter(|(key, _)| !ESCROW_KEYS.contains(&key.as_str()))
            .map(|(key, val)| (key.clone(), val.clone()))
            .collect();

        Ok(Some(Escrow {
            id,
            depositor,
            beneficiary: opt_address(value.get("beneficiary"))?,
            arbiters: opt_address_list(value.get("arbiters"))?,
            required_confirmations: match value.get("required_confirmations") {
                None => 0,
                Some(val) => val.as_u32()?,
            },
            status: EscrowStatus::from_wire_value(req(value, "status")?)?,
            token: opt_address(value.get("token"))?,
            total_amount: Amount::from_wire_value(req(value, "total_amount")?)?,
            paid_amount: Amount::from_wire_value(req(value, "paid_amount")?)?,
            platform_fee: opt_amount(value.get("platform_fee"))?.unwrap_or(Amount::ZERO),
            created_at: req(value, "created_at")?.as_u64()?,
            deadline: req(value, "deadline")?.as_u64()?,
            title: req(value, "project_title")?.as_text()?.to_owned(),
            description: req(value, "project_description")?.as_text()?.to_owned(),
            is_open_job: req(value, "is_open_job")?.as_bool()?,
            work_started: req(value, "work_started")?.as_bool()?,
            milestone_count: req(value, "milestone_count")?.as_u32()?,
            extras,
        }))
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at as i64, 0)
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.deadline as i64, 0)
    }

    pub fn remaining_amount(&self) -> Amount {
        Amount(self.total_amount.value() - self.paid_amount.value())
    }
}

fn req<'v>(value: &'v LedgerValue, key: &str) -> Result<&'v LedgerValue, DecodeError> {
    value
        .get(key)
        .ok_or_else(|| DecodeError::MissingField(key.to_owned()))
}

fn req_address(value: &LedgerValue, key: &str) -> Result<Address, DecodeError> {
    req(value, key).and_then(|val| Ok(Address::from(val.as_address()?.to_owned())))
}

fn opt_address(value: Option<&LedgerValue>) -> Result<Option<Address>, DecodeError> {
    match value {
        None => Ok(None),
        Some(val) if val.is_void() => Ok(None),
        Some(val) => Ok(Some(Address::from(val.as_address()?.to_owned()))),
    }
}

fn opt_address_list(value: Option<&LedgerValue>) -> Result<Vec<Address>, DecodeError> {
    match value {
        None => Ok(vec![]),
        Some(val) if val.is_void() => Ok(vec![]),
        Some(val) => val
            .as_vec()?
            .iter()
            .map(|item| Ok(Address::from(item.as_address()?.to_owned())))
            .collect(),
    }
}

fn opt_text(value: Option<&LedgerValue>) -> Result<Option<String>, DecodeError> {
    match value {
        None => Ok(None),
        Some(val) if val.is_void() => Ok(None),
        Some(val) => Ok(Some(val.as_text()?.to_owned())),
    }
}

fn opt_amount(value: Option<&LedgerValue>) -> Result<Option<Amount>, DecodeError> {
    match value {
        None => Ok(None),
        Some(val) if val.is_void() => Ok(None),
        Some(val) => Amount::from_wire_value(val).map(Some),
    }
}

/// Zero timestamps mean "never happened" in the contract storage.
fn opt_timestamp(value: Option<&LedgerValue>) -> Result<Option<u64>, DecodeError> {
    match value {
        None => Ok(None),
        Some(val) if val.is_void() => Ok(None),
        Some(val) => match val.as_u64()? {
            0 => Ok(None),
            at => Ok(Some(at)),
        },
    }
}

#[cfg(test)]
mod test {
    use paylane_codec::LedgerValue as LV;

    use super::*;

    fn escrow_map() -> LedgerValue {
        LV::map([
            ("depositor", LV::address("GDEPOSITOR")),
            ("beneficiary", LV::address("GWORKER")),
            ("status", LV::u32(1)),
            ("token", LV::Void),
            ("total_amount", LV::i128(10_000_000_000)),
            ("paid_amount", LV::i128(6_000_000_000)),
            ("platform_fee", LV::i128(100_000_000)),
            ("created_at", LV::u32(1_700_000_000)),
            ("deadline", LV::u32(1_700_600_000)),
            ("project_title", LV::string("Landing page")),
            ("project_description", LV::string("Design and build")),
            ("is_open_job", LV::Bool(false)),
            ("work_started", LV::Bool(true)),
            ("milestone_count", LV::u32(2)),
        ])
    }

    #[test]
    fn decodes_full_record() {
        let escrow = Escrow::from_wire_value(EscrowId::from(7), &escrow_map())
            .unwrap()
            .unwrap();
        assert_eq!(escrow.id.get(), 7);
        assert_eq!(escrow.status, EscrowStatus::Active);
        assert_eq!(escrow.token, None);
        assert_eq!(escrow.total_amount.to_string(), "10000000000");
        assert_eq!(escrow.remaining_amount().to_string(), "4000000000");
        assert!(escrow.extras.is_empty());
        assert!(escrow.created().is_some());
    }

    #[test]
    fn missing_depositor_means_absent() {
        let mut value = escrow_map();
        if let LV::Map(entries) = &mut value {
            entries.retain(|(key, _)| key != "depositor");
        }
        assert_eq!(Escrow::from_wire_value(EscrowId::from(7), &value).unwrap(), None);
        assert_eq!(
            Escrow::from_wire_value(EscrowId::from(7), &LV::Map(vec![])).unwrap(),
            None
        );
    }

    #[test]
    fn missing_required_field_is_a_decode_error_not_a_default() {
        let mut value = escrow_map();
        if let LV::Map(entries) = &mut value {
            entries.retain(|(key, _)| key != "total_amount");
        }
        let err = Escrow::from_wire_value(EscrowId::from(7), &value).unwrap_err();
        assert_eq!(err, DecodeError::MissingField(s!("total_amount")));
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let mut value = escrow_map();
        if let LV::Map(entries) = &mut value {
            entries.push((s!("added_in_v2"), LV::Bool(true)));
        }
        let escrow = Escrow::from_wire_value(EscrowId::from(7), &value)
            .unwrap()
            .unwrap();
        assert_eq!(escrow.extras.get("added_in_v2"), Some(&LV::Bool(true)));
    }

    #[test]
    fn status_decodes_from_all_serializer_paths() {
        for wire in [
            LV::u32(1),
            LV::symbol("Active"),
            LV::string("InProgress"),
            LV::vec([LV::symbol("Active")]),
        ] {
            assert_eq!(EscrowStatus::from_wire_value(&wire).unwrap(), EscrowStatus::Active);
        }
        assert!(EscrowStatus::from_wire_value(&LV::u32(99)).is_err());
        assert!(EscrowStatus::from_wire_value(&LV::symbol("Nonsense")).is_err());

        for status in [
            EscrowStatus::Pending,
            EscrowStatus::Active,
            EscrowStatus::Completed,
            EscrowStatus::Disputed,
            EscrowStatus::Refunded,
            EscrowStatus::Expired,
        ] {
            let code = LV::u32(status.wire_code());
            assert_eq!(EscrowStatus::from_wire_value(&code).unwrap(), status);
        }
        for status in [
            MilestoneStatus::Pending,
            MilestoneStatus::Submitted,
            MilestoneStatus::Approved,
            MilestoneStatus::Rejected,
            MilestoneStatus::Disputed,
            MilestoneStatus::Resolved,
        ] {
            let code = LV::u32(status.wire_code());
            assert_eq!(MilestoneStatus::from_wire_value(&code).unwrap(), status);
        }
    }

    #[test]
    fn amount_decimal_parsing_is_exact() {
        assert_eq!(Amount::from_decimal("1000.00").unwrap().to_string(), "10000000000");
        assert_eq!(Amount::from_decimal("600.00").unwrap().to_string(), "6000000000");
        assert_eq!(Amount::from_decimal("400.00").unwrap().to_string(), "4000000000");
        assert_eq!(Amount::from_decimal("0.0000001").unwrap().value(), 1);
        assert_eq!(Amount::from_decimal("-2.5").unwrap().value(), -25_000_000);
        assert!(Amount::from_decimal("0.00000001").is_err());
        assert!(Amount::from_decimal("12x").is_err());
        assert!(Amount::from_decimal("").is_err());

        let sum = Amount::from_decimal("600.00")
            .unwrap()
            .checked_add(Amount::from_decimal("400.00").unwrap())
            .unwrap();
        assert_eq!(sum, Amount::from_decimal("1000.00").unwrap());
    }

    #[test]
    fn badge_tiers() {
        assert_eq!(Badge::from_completed_count(0), Badge::Beginner);
        assert_eq!(Badge::from_completed_count(5), Badge::Intermediate);
        assert_eq!(Badge::from_completed_count(15), Badge::Advanced);
        assert_eq!(Badge::from_completed_count(50), Badge::Expert);
        assert_eq!(Badge::from_wire_value(&LV::symbol("Expert")).unwrap(), Badge::Expert);
    }

    #[test]
    fn milestone_zero_timestamps_mean_unset() {
        let value = LV::map([
            ("description", LV::string("wireframes")),
            ("amount", LV::i128(6_000_000_000)),
            ("status", LV::u32(0)),
            ("submitted_at", LV::u32(0)),
            ("approved_at", LV::u32(0)),
            ("disputed_at", LV::u32(0)),
            ("disputed_by", LV::Void),
            ("dispute_reason", LV::Void),
            ("rejection_reason", LV::Void),
        ]);
        let milestone = Milestone::from_wire_value(&value).unwrap();
        assert_eq!(milestone.status, MilestoneStatus::Pending);
        assert_eq!(milestone.submitted_at, None);
        assert_eq!(milestone.disputed_by, None);
        assert_eq!(milestone.resolution_amount, None);
    }
}
