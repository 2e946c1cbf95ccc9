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

//! Contract-interaction layer for escrow-based work agreements on a remote ledger.
//!
//! The crate drives the full write-path lifecycle of a ledger transaction (build → simulate →
//! authorize → prepare → sign → submit → poll-to-confirmation), reads and decodes ledger-resident
//! records through simulated invocations, and discovers existing entities in the dense integer ID
//! space with a verified binary search. Wire values travel in the tagged format implemented by
//! [`paylane_codec`].
//!
//! The layer is stateless per call: the signing identity is threaded explicitly through every
//! operation, key management stays behind the external [`Signer`] capability, and nothing is
//! persisted besides the remote ledger itself.

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
#[macro_use]
extern crate serde;

pub use paylane_codec as codec;

mod envelope;
mod rpc;
mod signer;
mod lifecycle;
mod reader;
mod discovery;
mod escrow;
mod contract;

pub use contract::{CreateEscrowRequest, EscrowContract, MilestoneDraft};
pub use discovery::{find_highest_escrow_id, CONFIRMATION_WINDOW, PROBE_RETRIES};
pub use envelope::{
    Address, AuthObligation, Envelope, Invocation, MethodName, ResourceFootprint, Signature,
    TxHash,
};
pub use escrow::{
    Amount, AmountParseError, Application, Badge, Escrow, EscrowId, EscrowStatus, Milestone,
    MilestoneStatus, Rating, RatingSummary,
};
pub use lifecycle::{CallError, CallParams, Lifecycle, PollPolicy, TransactionOutcome};
pub use reader::{ReadClient, ReadError};
pub use rpc::{
    LedgerRpc, RawEntry, RpcError, Simulation, StatusReport, SubmitAck, SubmitStatus, TxStatus,
};
pub use signer::{SignError, Signer};
