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

//! JSON-RPC-over-HTTP implementation of the core [`LedgerRpc`] surface.

#![deny(
    unsafe_code,
    dead_code,
    unused_variables,
    unused_mut,
    unused_imports,
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case
)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
extern crate amplify;

use async_trait::async_trait;
use paylane::{
    Address, Envelope, LedgerRpc, RawEntry, RpcError, Simulation, StatusReport, SubmitAck, TxHash,
};
use paylane_codec::LedgerValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Ledger node reached over JSON-RPC 2.0 POST requests.
#[derive(Clone, Debug)]
pub struct HttpLedger {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct RpcReply<T> {
    result: Option<T>,
    error: Option<RpcFault>,
}

#[derive(Deserialize)]
struct RpcFault {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct AccountReply {
    sequence: u64,
}

#[derive(Deserialize)]
struct EntriesReply {
    #[serde(default)]
    entries: Vec<RawEntry>,
}

impl HttpLedger {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), client: reqwest::Client::new() }
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }

    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<T, RpcError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!(method, endpoint = %self.endpoint, "rpc request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| RpcError::Transport(err.to_string()))?;
        let reply: RpcReply<T> = response
            .json()
            .await
            .map_err(|err| RpcError::Malformed(err.to_string()))?;
        if let Some(fault) = reply.error {
            return Err(RpcError::Endpoint(format!("{} (code {})", fault.message, fault.code)));
        }
        reply
            .result
            .ok_or_else(|| RpcError::Malformed(s!("reply carries neither result nor error")))
    }
}

#[async_trait]
impl LedgerRpc for HttpLedger {
    async fn account_sequence(&self, address: &Address) -> Result<u64, RpcError> {
        let account: AccountReply = self
            .call("getAccount", json!({ "address": address }))
            .await?;
        Ok(account.sequence)
    }

    async fn simulate(&self, envelope: &Envelope) -> Result<Simulation, RpcError> {
        self.call("simulateTransaction", json!({ "transaction": envelope }))
            .await
    }

    /// The node exposes no separate preparation endpoint: the resource footprint comes from a
    /// simulation round and is attached client-side, the way the node's own SDK assembles
    /// envelopes.
    async fn prepare(&self, mut envelope: Envelope) -> Result<Envelope, RpcError> {
        if envelope.resources.is_none() {
            let simulation = self.simulate(&envelope).await?;
            if let Some(error) = simulation.error {
                return Err(RpcError::Endpoint(error));
            }
            envelope.resources = simulation.resources;
        }
        Ok(envelope)
    }

    async fn submit(&self, envelope: &Envelope) -> Result<SubmitAck, RpcError> {
        self.call("sendTransaction", json!({ "transaction": envelope }))
            .await
    }

    async fn transaction_status(&self, hash: &TxHash) -> Result<StatusReport, RpcError> {
        self.call("getTransaction", json!({ "hash": hash })).await
    }

    async fn read_entry(&self, key: &LedgerValue) -> Result<Option<RawEntry>, RpcError> {
        let reply: EntriesReply = self
            .call("getLedgerEntries", json!({ "keys": [key] }))
            .await?;
        Ok(reply.entries.into_iter().next())
    }
}
