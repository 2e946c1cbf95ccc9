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

use paylane_codec::LedgerValue;

/// Ledger account or contract address.
#[derive(Wrapper, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, From, Display)]
#[wrapper(Deref)]
#[display(inner)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl From<&str> for Address {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl Address {
    pub fn as_str(&self) -> &str { &self.0 }
}

/// Hash identifying a submitted transaction.
#[derive(Wrapper, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, From, Display)]
#[wrapper(Deref)]
#[display(inner)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl From<&str> for TxHash {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Name of a contract entry point.
#[derive(Wrapper, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, From, Display)]
#[wrapper(Deref)]
#[display(inner)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodName(String);

impl From<&str> for MethodName {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Opaque signature blob produced by an external signer.
#[derive(Wrapper, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, From, Display)]
#[wrapper(Deref)]
#[display(inner)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl From<&str> for Signature {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Single invocation of a named contract entry point with encoded arguments.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub contract: Address,
    pub method: MethodName,
    pub args: Vec<LedgerValue>,
}

/// Per-operation authorization obligation returned by simulation.
///
/// Scoped to exactly one signing identity and one sub-invocation; signed separately from the
/// outer transaction signature.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthObligation {
    pub signer: Address,
    pub invocation: Invocation,
    pub nonce: u64,
    #[serde(default)]
    pub signature: Option<Signature>,
}

impl AuthObligation {
    pub fn is_signed(&self) -> bool { self.signature.is_some() }
}

/// Resource and fee metadata attached to an envelope during preparation.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFootprint {
    pub fee: u64,
    pub instructions: u64,
    pub read_bytes: u32,
    pub write_bytes: u32,
}

/// Transaction envelope travelling through the write-path lifecycle.
///
/// The source address is the paying and sequencing identity of the transaction; it is read once
/// when the envelope is built and must not change while the lifecycle is in flight.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub source: Address,
    pub sequence: u64,
    pub invocation: Invocation,
    #[serde(default)]
    pub obligations: Vec<AuthObligation>,
    #[serde(default)]
    pub resources: Option<ResourceFootprint>,
    #[serde(default)]
    pub signatures: Vec<Signature>,
}

impl Envelope {
    /// Assembles an unsigned envelope for a write call.
    pub fn build(
        contract: Address,
        method: impl Into<MethodName>,
        args: Vec<LedgerValue>,
        source: Address,
        sequence: u64,
    ) -> Self {
        Self {
            source,
            sequence,
            invocation: Invocation { contract, method: method.into(), args },
            obligations: none!(),
            resources: None,
            signatures: none!(),
        }
    }

    /// Assembles an envelope for a simulated read-only call: no sequence, no signature, never
    /// submitted.
    pub fn read_only(
        contract: Address,
        method: impl Into<MethodName>,
        args: Vec<LedgerValue>,
        viewer: Address,
    ) -> Self {
        Self::build(contract, method, args, viewer, 0)
    }

    pub fn is_signed(&self) -> bool { !self.signatures.is_empty() }
}
