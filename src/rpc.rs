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

use async_trait::async_trait;
use paylane_codec::LedgerValue;

use crate::{Address, AuthObligation, Envelope, ResourceFootprint, TxHash};

/// Failure of the consumed RPC surface.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum RpcError {
    /// can't reach the ledger RPC endpoint: {0}
    Transport(String),

    /// ledger RPC rejected the request: {0}
    Endpoint(String),

    /// ledger RPC returned a malformed response: {0}
    Malformed(String),
}

/// Outcome of simulating an envelope against the current ledger state.
///
/// No state change has happened whatever this carries; a reported error makes the attempt fatal
/// for the caller, while obligations and resources feed the subsequent lifecycle steps.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    #[serde(default)]
    pub return_value: Option<serde_json::Value>,
    #[serde(default)]
    pub obligations: Vec<AuthObligation>,
    #[serde(default)]
    pub resources: Option<ResourceFootprint>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Immediate status reported by the ledger on submission.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitStatus {
    /// transaction accepted and pending inclusion
    #[display("pending")]
    Pending,

    /// transaction rejected on submission
    #[display("error")]
    Error,

    /// the same transaction was already submitted; the reported hash identifies that attempt
    #[display("duplicate")]
    Duplicate,

    /// the ledger is congested and did not accept the transaction
    #[display("try again later")]
    TryAgainLater,
}

/// Submission acknowledgement.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAck {
    pub status: SubmitStatus,
    #[serde(default)]
    pub hash: Option<TxHash>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Status of a submitted transaction as reported by the ledger.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    /// transaction is included and succeeded
    #[display("success")]
    Success,

    /// transaction is included and failed
    #[display("failed")]
    Failed,

    /// transaction is not known to the ledger (yet)
    #[display("not found")]
    NotFound,

    /// transaction is known but not yet terminal
    #[display("pending")]
    Pending,
}

impl TxStatus {
    pub fn is_terminal(self) -> bool { matches!(self, Self::Success | Self::Failed) }
}

/// Transaction status report, optionally carrying the committed result payload.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: TxStatus,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

/// Raw ledger storage entry returned by [`LedgerRpc::read_entry`].
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    pub key: LedgerValue,
    pub value: LedgerValue,
}

/// Consumed RPC surface of the remote ledger.
///
/// The layer is stateless per call; everything it knows about the ledger passes through this
/// trait.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Current sequence number of an account, used as the envelope sequencing state.
    async fn account_sequence(&self, address: &Address) -> Result<u64, RpcError>;

    /// Simulates an envelope without submitting it.
    async fn simulate(&self, envelope: &Envelope) -> Result<Simulation, RpcError>;

    /// Attaches resource and fee metadata to an envelope.
    async fn prepare(&self, envelope: Envelope) -> Result<Envelope, RpcError>;

    /// Submits a signed envelope.
    async fn submit(&self, envelope: &Envelope) -> Result<SubmitAck, RpcError>;

    /// Reports the status of a submitted transaction.
    async fn transaction_status(&self, hash: &TxHash) -> Result<StatusReport, RpcError>;

    /// Reads a raw ledger storage entry; `None` on genuine absence.
    async fn read_entry(&self, key: &LedgerValue) -> Result<Option<RawEntry>, RpcError>;
}
