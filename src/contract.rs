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

use paylane_codec::{encode, DecodeError, LedgerValue, NativeValue, ValueKind};
use tracing::debug;

use crate::escrow::{
    Amount, Application, Badge, Escrow, EscrowId, Milestone, Rating, RatingSummary,
};
use crate::{
    find_highest_escrow_id, Address, CallError, CallParams, LedgerRpc, Lifecycle, PollPolicy,
    ReadClient, ReadError, Signer, TransactionOutcome,
};

/// Parameters of a new escrow.
#[derive(Clone, PartialEq, Debug)]
#[derive(Serialize, Deserialize)]
pub struct CreateEscrowRequest {
    /// Absent beneficiary creates an open job accepting applications.
    pub beneficiary: Option<Address>,
    pub arbiters: Vec<Address>,
    pub required_confirmations: u32,
    pub milestones: Vec<MilestoneDraft>,
    /// Absent token means the ledger's native asset.
    pub token: Option<Address>,
    pub total_amount: Amount,
    pub duration_secs: u32,
    pub title: String,
    pub description: String,
}

/// Amount and description of a milestone at escrow creation.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(Serialize, Deserialize)]
pub struct MilestoneDraft {
    pub amount: Amount,
    pub description: String,
}

/// Facade over the escrow contract: every domain-level operation of the application maps to one
/// entry point here.
///
/// Each write is one [`Lifecycle`] run against one named entry point; the signing identity is an
/// explicit parameter of every call — the facade holds no ambient identity and no mutable state,
/// so concurrent callers are ordered by the ledger's own sequencing rules.
pub struct EscrowContract<R: LedgerRpc, S: Signer> {
    rpc: R,
    signer: S,
    contract: Address,
    viewer: Address,
    poll: PollPolicy,
}

impl<R: LedgerRpc, S: Signer> EscrowContract<R, S> {
    /// Creates the facade over an RPC backend and a signer capability.
    ///
    /// The viewer address is the source account of read-only simulations; it needs no keys.
    pub fn new(rpc: R, signer: S, contract: Address, viewer: Address) -> Self {
        Self { rpc, signer, contract, viewer, poll: default!() }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn reader(&self) -> ReadClient<'_, R> {
        ReadClient::new(&self.rpc, self.contract.clone(), self.viewer.clone())
    }

    async fn call(
        &self,
        method: &'static str,
        args: Vec<LedgerValue>,
        identity: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        debug!(method, %identity, "contract call");
        Lifecycle::new(&self.rpc, &self.signer, self.contract.clone())
            .with_poll_policy(self.poll)
            .execute(CallParams::new(method, args), identity)
            .await
    }

    // ----- write path ---------------------------------------------------------------------

    /// One-time contract initialization.
    pub async fn initialize(
        &self,
        owner: &Address,
        fee_collector: &Address,
        platform_fee_bp: u32,
        identity: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            address_arg(owner)?,
            address_arg(fee_collector)?,
            counter_arg(platform_fee_bp)?,
        ];
        self.call("initialize", args, identity).await
    }

    /// Creates an escrow and returns the allocated ID.
    ///
    /// The ID comes back as the call's return value; when simulation yields none, the lifecycle
    /// recovers it from the committed transaction result.
    pub async fn create_escrow(
        &self,
        request: CreateEscrowRequest,
        depositor: &Address,
    ) -> Result<EscrowId, CallError> {
        let milestones = request
            .milestones
            .iter()
            .map(|draft| {
                Ok(LedgerValue::vec([
                    amount_arg(draft.amount)?,
                    text_arg(&draft.description)?,
                ]))
            })
            .collect::<Result<Vec<_>, CallError>>()?;
        let arbiters = request
            .arbiters
            .iter()
            .map(address_arg)
            .collect::<Result<Vec<_>, _>>()?;
        let args = vec![
            address_arg(depositor)?,
            opt_address_arg(request.beneficiary.as_ref())?,
            LedgerValue::vec(arbiters),
            counter_arg(request.required_confirmations)?,
            LedgerValue::vec(milestones),
            opt_address_arg(request.token.as_ref())?,
            amount_arg(request.total_amount)?,
            counter_arg(request.duration_secs)?,
            text_arg(&request.title)?,
            text_arg(&request.description)?,
        ];
        let outcome = self.call("create_escrow", args, depositor).await?;
        let id = outcome
            .return_value
            .ok_or_else(|| DecodeError::MissingField(s!("escrow id")))?
            .as_u32()?;
        Ok(EscrowId::from(id))
    }

    /// Beneficiary starts work on an assigned escrow.
    pub async fn start_work(
        &self,
        id: EscrowId,
        beneficiary: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![counter_arg(id.get())?, address_arg(beneficiary)?];
        self.call("start_work", args, beneficiary).await
    }

    /// Beneficiary submits a milestone for review.
    pub async fn submit_milestone(
        &self,
        id: EscrowId,
        milestone_index: u32,
        description: &str,
        beneficiary: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            counter_arg(milestone_index)?,
            text_arg(description)?,
            address_arg(beneficiary)?,
        ];
        self.call("submit_milestone", args, beneficiary).await
    }

    /// Beneficiary resubmits a previously rejected milestone.
    pub async fn resubmit_milestone(
        &self,
        id: EscrowId,
        milestone_index: u32,
        description: &str,
        beneficiary: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            counter_arg(milestone_index)?,
            text_arg(description)?,
            address_arg(beneficiary)?,
        ];
        self.call("resubmit_milestone", args, beneficiary).await
    }

    /// Depositor approves a submitted milestone, releasing its payment.
    pub async fn approve_milestone(
        &self,
        id: EscrowId,
        milestone_index: u32,
        depositor: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            counter_arg(milestone_index)?,
            address_arg(depositor)?,
        ];
        self.call("approve_milestone", args, depositor).await
    }

    /// Depositor rejects a submitted milestone with a reason.
    pub async fn reject_milestone(
        &self,
        id: EscrowId,
        milestone_index: u32,
        reason: &str,
        depositor: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            counter_arg(milestone_index)?,
            text_arg(reason)?,
            address_arg(depositor)?,
        ];
        self.call("reject_milestone", args, depositor).await
    }

    /// Either party disputes a submitted or approved milestone.
    pub async fn dispute_milestone(
        &self,
        id: EscrowId,
        milestone_index: u32,
        reason: &str,
        disputer: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            counter_arg(milestone_index)?,
            text_arg(reason)?,
            address_arg(disputer)?,
        ];
        self.call("dispute_milestone", args, disputer).await
    }

    /// Arbiter resolves a disputed milestone, deciding the paid-out amount.
    pub async fn resolve_dispute(
        &self,
        id: EscrowId,
        milestone_index: u32,
        resolution_amount: Amount,
        arbiter: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            counter_arg(milestone_index)?,
            amount_arg(resolution_amount)?,
            address_arg(arbiter)?,
        ];
        self.call("resolve_dispute", args, arbiter).await
    }

    /// Depositor refunds the unreleased remainder of an escrow.
    pub async fn refund_escrow(
        &self,
        id: EscrowId,
        depositor: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![counter_arg(id.get())?, address_arg(depositor)?];
        self.call("refund_escrow", args, depositor).await
    }

    /// Depositor reclaims funds once the deadline plus the emergency delay has passed.
    pub async fn emergency_refund_after_deadline(
        &self,
        id: EscrowId,
        depositor: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![counter_arg(id.get())?, address_arg(depositor)?];
        self.call("emergency_refund_after_deadline", args, depositor)
            .await
    }

    /// Depositor extends the escrow deadline.
    pub async fn extend_deadline(
        &self,
        id: EscrowId,
        extra_secs: u32,
        depositor: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            counter_arg(extra_secs)?,
            address_arg(depositor)?,
        ];
        self.call("extend_deadline", args, depositor).await
    }

    /// Freelancer applies to an open job.
    pub async fn apply_to_job(
        &self,
        id: EscrowId,
        cover_letter: &str,
        proposed_timeline_days: u32,
        freelancer: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            text_arg(cover_letter)?,
            counter_arg(proposed_timeline_days)?,
            address_arg(freelancer)?,
        ];
        self.call("apply_to_job", args, freelancer).await
    }

    /// Depositor accepts an applicant, assigning the job.
    pub async fn accept_freelancer(
        &self,
        id: EscrowId,
        freelancer: &Address,
        depositor: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            address_arg(freelancer)?,
            address_arg(depositor)?,
        ];
        self.call("accept_freelancer", args, depositor).await
    }

    /// Depositor rates the freelancer of a completed escrow (1-5 stars).
    pub async fn submit_rating(
        &self,
        id: EscrowId,
        rating: u32,
        review: &str,
        client: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        let args = vec![
            counter_arg(id.get())?,
            counter_arg(rating)?,
            text_arg(review)?,
            address_arg(client)?,
        ];
        self.call("submit_rating", args, client).await
    }

    // ----- administration -----------------------------------------------------------------

    pub async fn pause_job_creation(
        &self,
        owner: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        self.call("pause_job_creation", vec![], owner).await
    }

    pub async fn unpause_job_creation(
        &self,
        owner: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        self.call("unpause_job_creation", vec![], owner).await
    }

    /// Sets the platform fee in basis points.
    pub async fn set_platform_fee(
        &self,
        fee_bp: u32,
        owner: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        self.call("set_platform_fee_bp", vec![counter_arg(fee_bp)?], owner)
            .await
    }

    pub async fn set_fee_collector(
        &self,
        fee_collector: &Address,
        owner: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        self.call("set_fee_collector", vec![address_arg(fee_collector)?], owner)
            .await
    }

    pub async fn set_owner(
        &self,
        new_owner: &Address,
        owner: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        self.call("set_owner", vec![address_arg(new_owner)?], owner)
            .await
    }

    /// Whitelists a token for use in escrows.
    pub async fn whitelist_token(
        &self,
        token: &Address,
        owner: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        self.call("whitelist_token", vec![address_arg(token)?], owner)
            .await
    }

    /// Authorizes an arbiter for dispute resolution.
    pub async fn authorize_arbiter(
        &self,
        arbiter: &Address,
        owner: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        self.call("authorize_arbiter", vec![address_arg(arbiter)?], owner)
            .await
    }

    // ----- read path ----------------------------------------------------------------------

    pub async fn read_escrow(&self, id: EscrowId) -> Result<Option<Escrow>, ReadError> {
        self.reader().read_escrow(id).await
    }

    pub async fn read_milestones(&self, id: EscrowId) -> Result<Vec<Milestone>, ReadError> {
        self.reader().read_milestones(id).await
    }

    pub async fn read_applications(
        &self,
        id: EscrowId,
        enrich: bool,
    ) -> Result<Vec<Application>, ReadError> {
        self.reader().read_applications(id, enrich).await
    }

    pub async fn has_applied(
        &self,
        id: EscrowId,
        freelancer: &Address,
    ) -> Result<bool, ReadError> {
        self.reader().has_applied(id, freelancer).await
    }

    /// Highest allocated escrow ID within `[1, upper_bound]`; 0 when none exist.
    pub async fn discover_highest_id(&self, upper_bound: u32) -> Result<u32, ReadError> {
        find_highest_escrow_id(&self.reader(), upper_bound).await
    }

    pub async fn read_badge(&self, freelancer: &Address) -> Result<Badge, ReadError> {
        self.reader().read_badge(freelancer).await
    }

    pub async fn read_average_rating(
        &self,
        freelancer: &Address,
    ) -> Result<RatingSummary, ReadError> {
        self.reader().read_average_rating(freelancer).await
    }

    pub async fn read_rating(&self, id: EscrowId) -> Result<Option<Rating>, ReadError> {
        self.reader().read_rating(id).await
    }

    pub async fn read_owner(&self) -> Result<Option<Address>, ReadError> {
        self.reader().read_owner().await
    }

    pub async fn read_paused_state(&self) -> Result<bool, ReadError> {
        self.reader().read_paused_state().await
    }
}

// Call arguments pass through the codec under the kind declared by the entry-point signature;
// the kind is never inferred from the native value.

fn counter_arg(val: u32) -> Result<LedgerValue, CallError> {
    encode(&NativeValue::from(val), &ValueKind::U32).map_err(CallError::from)
}

fn amount_arg(val: Amount) -> Result<LedgerValue, CallError> {
    encode(&NativeValue::from(val.value()), &ValueKind::I128).map_err(CallError::from)
}

fn text_arg(val: &str) -> Result<LedgerValue, CallError> {
    encode(&NativeValue::from(val), &ValueKind::String).map_err(CallError::from)
}

fn address_arg(val: &Address) -> Result<LedgerValue, CallError> {
    encode(&NativeValue::from(val.as_str()), &ValueKind::Address).map_err(CallError::from)
}

fn opt_address_arg(val: Option<&Address>) -> Result<LedgerValue, CallError> {
    match val {
        Some(address) => address_arg(address),
        None => encode(&NativeValue::Absent, &ValueKind::Address).map_err(CallError::from),
    }
}
