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

use paylane_codec::{DecodeError, LedgerValue};
use tracing::debug;

use crate::escrow::{Application, Badge, Escrow, EscrowId, Milestone, Rating, RatingSummary};
use crate::{Address, Envelope, LedgerRpc, MethodName, RpcError};

/// Failure of a read-only call.
///
/// Absence of an entity is not an error: it is the `None` side of the read results. `Protocol`
/// failures are recoverable (the ledger rejected this simulation, not the entity's existence)
/// and may be retried by discovery under its bounded policy.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error, From)]
#[display(inner)]
pub enum ReadError {
    #[from]
    Rpc(RpcError),

    #[from]
    Decode(DecodeError),

    #[display("ledger rejected the read-only call: {0}")]
    Protocol(String),
}

/// Client for simulated read-only invocations.
///
/// Simulations carry a source account but no signature and are never submitted. The viewer
/// address is supplied explicitly at construction — the layer holds no ambient identity.
pub struct ReadClient<'client, R: LedgerRpc> {
    rpc: &'client R,
    contract: Address,
    viewer: Address,
}

impl<'client, R: LedgerRpc> ReadClient<'client, R> {
    pub fn new(rpc: &'client R, contract: Address, viewer: Address) -> Self {
        Self { rpc, contract, viewer }
    }

    /// Simulates a read-only entry point and classifies the outcome.
    ///
    /// `Ok(None)` is the wire-level "no value" marker; a simulation error becomes
    /// [`ReadError::Protocol`], so callers can tell "does not exist" apart from "the RPC failed".
    pub async fn simulate_read(
        &self,
        method: impl Into<MethodName>,
        args: Vec<LedgerValue>,
    ) -> Result<Option<LedgerValue>, ReadError> {
        let method = method.into();
        let envelope =
            Envelope::read_only(self.contract.clone(), method.clone(), args, self.viewer.clone());
        let simulation = self.rpc.simulate(&envelope).await?;
        if let Some(error) = simulation.error {
            return Err(ReadError::Protocol(error));
        }
        let Some(raw) = simulation.return_value else {
            debug!(%method, "read returned no value");
            return Ok(None);
        };
        let value = LedgerValue::from_wire(&raw)?;
        if value.is_void() {
            return Ok(None);
        }
        Ok(Some(value))
    }

    /// Fetches and decodes a single escrow record.
    ///
    /// A decoded map which is empty or misses the depositor key means the entity does not exist;
    /// this is the sole authoritative existence test. A partially populated escrow is never
    /// produced.
    pub async fn read_escrow(&self, id: EscrowId) -> Result<Option<Escrow>, ReadError> {
        let Some(value) = self
            .simulate_read("get_escrow", vec![LedgerValue::u32(id.get())])
            .await?
        else {
            return Ok(None);
        };
        Escrow::from_wire_value(id, &value).map_err(ReadError::from)
    }

    /// Fetches all milestones of an escrow, in their stable positional order.
    pub async fn read_milestones(&self, id: EscrowId) -> Result<Vec<Milestone>, ReadError> {
        let Some(value) = self
            .simulate_read("get_milestones", vec![LedgerValue::u32(id.get())])
            .await?
        else {
            return Ok(vec![]);
        };
        value
            .as_vec()?
            .iter()
            .map(Milestone::from_wire_value)
            .collect::<Result<_, _>>()
            .map_err(ReadError::from)
    }

    /// Fetches all applications to an open job.
    ///
    /// With `enrich` set, each application is annotated with the freelancer's badge and average
    /// rating through the auxiliary read calls.
    pub async fn read_applications(
        &self,
        id: EscrowId,
        enrich: bool,
    ) -> Result<Vec<Application>, ReadError> {
        let Some(value) = self
            .simulate_read("get_applications", vec![LedgerValue::u32(id.get())])
            .await?
        else {
            return Ok(vec![]);
        };
        let mut applications = value
            .as_vec()?
            .iter()
            .map(Application::from_wire_value)
            .collect::<Result<Vec<_>, _>>()?;
        if enrich {
            for application in &mut applications {
                application.badge = Some(self.read_badge(&application.freelancer).await?);
                application.rating =
                    Some(self.read_average_rating(&application.freelancer).await?);
            }
        }
        Ok(applications)
    }

    /// Whether a freelancer has already applied to a job.
    pub async fn has_applied(
        &self,
        id: EscrowId,
        freelancer: &Address,
    ) -> Result<bool, ReadError> {
        let value = self
            .simulate_read("has_applied", vec![
                LedgerValue::u32(id.get()),
                LedgerValue::address(freelancer.as_str()),
            ])
            .await?;
        match value {
            Some(value) => value.as_bool().map_err(ReadError::from),
            None => Ok(false),
        }
    }

    /// Freelancer badge tier derived from completed projects.
    pub async fn read_badge(&self, freelancer: &Address) -> Result<Badge, ReadError> {
        let value = self
            .simulate_read("get_badge", vec![LedgerValue::address(freelancer.as_str())])
            .await?;
        match value {
            Some(value) => Badge::from_wire_value(&value).map_err(ReadError::from),
            None => Ok(Badge::Beginner),
        }
    }

    /// Freelancer running rating total and count.
    pub async fn read_average_rating(
        &self,
        freelancer: &Address,
    ) -> Result<RatingSummary, ReadError> {
        let value = self
            .simulate_read("get_average_rating", vec![LedgerValue::address(
                freelancer.as_str(),
            )])
            .await?;
        match value {
            Some(value) => RatingSummary::from_wire_value(&value).map_err(ReadError::from),
            None => Ok(RatingSummary::default()),
        }
    }

    /// Rating submitted for a completed escrow, if any.
    pub async fn read_rating(&self, id: EscrowId) -> Result<Option<Rating>, ReadError> {
        let Some(value) = self
            .simulate_read("get_rating", vec![LedgerValue::u32(id.get())])
            .await?
        else {
            return Ok(None);
        };
        Rating::from_wire_value(&value)
            .map(Some)
            .map_err(ReadError::from)
    }

    /// Reputation points accumulated by a user.
    pub async fn read_reputation(&self, user: &Address) -> Result<u32, ReadError> {
        self.read_counter("get_reputation", user).await
    }

    /// Number of escrows a user has completed.
    pub async fn read_completed_escrows(&self, user: &Address) -> Result<u32, ReadError> {
        self.read_counter("get_completed_escrows", user).await
    }

    /// Contract owner; `None` when the contract is not initialized.
    pub async fn read_owner(&self) -> Result<Option<Address>, ReadError> {
        let Some(value) = self.simulate_read("get_owner", vec![]).await? else {
            return Ok(None);
        };
        Ok(Some(Address::from(value.as_address()?.to_owned())))
    }

    /// Whether job creation is currently paused.
    pub async fn read_paused_state(&self) -> Result<bool, ReadError> {
        let value = self.simulate_read("is_job_creation_paused", vec![]).await?;
        match value {
            Some(value) => value.as_bool().map_err(ReadError::from),
            None => Ok(false),
        }
    }

    /// Platform fee in basis points.
    pub async fn read_platform_fee(&self) -> Result<u32, ReadError> {
        let value = self.simulate_read("get_platform_fee_bp", vec![]).await?;
        match value {
            Some(value) => value.as_u32().map_err(ReadError::from),
            None => Ok(0),
        }
    }

    /// Reads a raw ledger storage entry, bypassing contract entry points.
    pub async fn read_raw(&self, key: &LedgerValue) -> Result<Option<LedgerValue>, ReadError> {
        let entry = self.rpc.read_entry(key).await?;
        Ok(entry.map(|entry| entry.value))
    }

    async fn read_counter(
        &self,
        method: &'static str,
        user: &Address,
    ) -> Result<u32, ReadError> {
        let value = self
            .simulate_read(method, vec![LedgerValue::address(user.as_str())])
            .await?;
        match value {
            Some(value) => value.as_u32().map_err(ReadError::from),
            None => Ok(0),
        }
    }
}
