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

use crate::{Address, AuthObligation, Envelope};

/// Failure of the external signer capability.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum SignError {
    /// signing request was rejected
    ///
    /// An explicit user rejection; user-actionable and distinct from signer malfunction.
    Rejected,

    /// signer failed: {0}
    Failure(String),
}

/// External signer capability.
///
/// Key management lives entirely outside this layer: the core only defines and consumes this
/// contract. Implementations are wallets, hardware devices or test fixtures.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Signs a full transaction envelope for the paying identity.
    async fn sign_envelope(
        &self,
        envelope: Envelope,
        identity: &Address,
    ) -> Result<Envelope, SignError>;

    /// Signs authorization obligations for the given identity, preserving their order.
    async fn sign_obligations(
        &self,
        obligations: Vec<AuthObligation>,
        identity: &Address,
    ) -> Result<Vec<AuthObligation>, SignError>;
}
