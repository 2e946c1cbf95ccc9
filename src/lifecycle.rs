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

use std::time::Duration;

use paylane_codec::{DecodeError, EncodeError, LedgerValue};
use tracing::debug;

use crate::{
    Address, Envelope, LedgerRpc, MethodName, RpcError, SignError, Signer, SubmitStatus, TxHash,
    TxStatus,
};

/// Parameters of a single write call: one named entry point plus its encoded arguments.
///
/// Every write operation of the contract facade is expressed through this one structure, so the
/// whole write path lives in a single parameterized lifecycle instead of per-operation retry
/// loops.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallParams {
    pub method: MethodName,
    pub args: Vec<LedgerValue>,
}

impl CallParams {
    pub fn new(method: impl Into<MethodName>, args: Vec<LedgerValue>) -> Self {
        Self { method: method.into(), args }
    }
}

/// Confirmation polling policy.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self { Self { interval: Duration::from_secs(1), max_attempts: 30 } }
}

/// Terminal result of a successful write call.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransactionOutcome {
    pub hash: TxHash,
    pub return_value: Option<LedgerValue>,
}

/// Typed failure of a write call.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error, From)]
#[display(inner)]
pub enum CallError {
    #[from]
    Rpc(RpcError),

    #[from]
    Signing(SignError),

    #[from]
    Encode(EncodeError),

    #[from]
    Decode(DecodeError),

    /// The ledger rejected the call before any state change; the message is passed through
    /// verbatim for diagnostics. Never retried automatically.
    #[display("ledger rejected the call during simulation: {0}")]
    Simulation(String),

    #[display("transaction submission failed: {0}")]
    Submission(String),

    /// The ledger did not accept the transaction due to congestion. The transaction was not
    /// submitted; retrying is the caller's decision.
    #[display("ledger is busy, transaction not submitted")]
    LedgerBusy,

    /// The ledger accepted the transaction and later explicitly rejected it.
    #[display("transaction {hash} was rejected by the ledger after acceptance")]
    ConfirmationFailed { hash: TxHash },

    /// Polling exhausted without the transaction reaching a terminal status. The transaction may
    /// still confirm later; distinct from an explicit rejection.
    #[display("transaction {hash} did not reach a terminal status within {attempts} polls")]
    ConfirmationTimedOut { hash: TxHash, attempts: u32 },

    #[display("ledger did not report a transaction hash on submission")]
    MissingHash,
}

/// Write-path state machine:
///
/// ```text
/// Built → Simulated → {authorize? → ObligationsSigned → Resimulated} → Prepared → Signed
///       → Submitted → {Pending ↻ poll} → Success | Failed | TimedOut
/// ```
///
/// Steps are strictly sequential; each depends on the result of the prior one. The poll sleep is
/// the only suspension point and the whole lifecycle is cancelled by dropping the returned
/// future — no timer leaks past cancellation.
pub struct Lifecycle<'client, R: LedgerRpc, S: Signer> {
    rpc: &'client R,
    signer: &'client S,
    contract: Address,
    poll: PollPolicy,
}

impl<'client, R: LedgerRpc, S: Signer> Lifecycle<'client, R, S> {
    pub fn new(rpc: &'client R, signer: &'client S, contract: Address) -> Self {
        Self { rpc, signer, contract, poll: default!() }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Drives one write call from envelope assembly to terminal confirmation.
    ///
    /// The paying identity is read once here and must not change while the call is in flight;
    /// callers serialize identity changes against in-flight lifecycles. Write calls are never
    /// retried by this layer — only the read-only status polling repeats, under the bounded
    /// policy.
    pub async fn execute(
        &self,
        params: CallParams,
        identity: &Address,
    ) -> Result<TransactionOutcome, CallError> {
        // Build
        let sequence = self.rpc.account_sequence(identity).await?;
        let mut envelope = Envelope::build(
            self.contract.clone(),
            params.method.clone(),
            params.args,
            identity.clone(),
            sequence,
        );
        debug!(method = %params.method, %sequence, "built envelope");

        // Simulate
        let mut simulation = self.rpc.simulate(&envelope).await?;
        if let Some(error) = simulation.error {
            return Err(CallError::Simulation(error));
        }
        let mut provisional = simulation.return_value.take();

        // Authorize, then re-simulate against freshly fetched sequencing state: the identity's
        // sequence may have advanced between the first simulation and the signed resubmission.
        if !simulation.obligations.is_empty() {
            debug!(count = simulation.obligations.len(), "signing authorization obligations");
            let signed = self
                .signer
                .sign_obligations(simulation.obligations, identity)
                .await?;
            envelope.obligations = signed;
            envelope.sequence = self.rpc.account_sequence(identity).await?;

            simulation = self.rpc.simulate(&envelope).await?;
            if let Some(error) = simulation.error {
                return Err(CallError::Simulation(error));
            }
            if simulation.return_value.is_some() {
                provisional = simulation.return_value.take();
            }
        }

        // Prepare
        envelope.resources = simulation.resources;
        let envelope = self.rpc.prepare(envelope).await?;

        // Sign
        let envelope = self.signer.sign_envelope(envelope, identity).await?;

        // Submit
        let ack = self.rpc.submit(&envelope).await?;
        let hash = match ack.status {
            SubmitStatus::Pending => ack.hash.ok_or(CallError::MissingHash)?,
            // The hash already identifies the previously submitted attempt; resubmitting would
            // risk a double spend, so the flow proceeds straight to confirmation.
            SubmitStatus::Duplicate => ack.hash.ok_or(CallError::MissingHash)?,
            SubmitStatus::TryAgainLater => return Err(CallError::LedgerBusy),
            SubmitStatus::Error => {
                return Err(CallError::Submission(
                    ack.error.unwrap_or_else(|| s!("no detail reported")),
                ));
            }
        };
        debug!(%hash, status = %ack.status, "transaction submitted");

        self.poll_confirmation(hash, provisional).await
    }

    /// Poll sub-loop: fixed-interval status checks until a terminal status or attempt
    /// exhaustion.
    async fn poll_confirmation(
        &self,
        hash: TxHash,
        provisional: Option<serde_json::Value>,
    ) -> Result<TransactionOutcome, CallError> {
        for attempt in 1..=self.poll.max_attempts {
            tokio::time::sleep(self.poll.interval).await;
            let report = self.rpc.transaction_status(&hash).await?;
            debug!(%hash, attempt, status = %report.status, "poll");
            match report.status {
                TxStatus::Success => {
                    // Return-value recovery: when simulation produced no value, the committed
                    // result payload decodes through the same codec path.
                    let raw = provisional.or(report.result);
                    let return_value = match raw {
                        Some(wire) => decode_return(&wire)?,
                        None => None,
                    };
                    return Ok(TransactionOutcome { hash, return_value });
                }
                TxStatus::Failed => return Err(CallError::ConfirmationFailed { hash }),
                TxStatus::NotFound | TxStatus::Pending => continue,
            }
        }
        Err(CallError::ConfirmationTimedOut { hash, attempts: self.poll.max_attempts })
    }
}

fn decode_return(wire: &serde_json::Value) -> Result<Option<LedgerValue>, CallError> {
    let value = LedgerValue::from_wire(wire)?;
    if value.is_void() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}
