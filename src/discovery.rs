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

use tracing::{debug, warn};

use crate::escrow::EscrowId;
use crate::{LedgerRpc, ReadClient, ReadError};

/// Width of the linear confirmation scan above the binary-search candidate.
///
/// Escrow IDs are allocated densely, but a probe conflates "future ID" and "never-created ID";
/// the scan absorbs allocation gaps of up to this many IDs above the candidate.
pub const CONFIRMATION_WINDOW: u32 = 5;

/// How many times a single probe retries a transient protocol failure before the ID is treated
/// as absent for search-termination purposes.
pub const PROBE_RETRIES: u32 = 3;

const PROBE_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Finds the highest existing escrow ID within `[1, upper_bound]`; 0 means none exist.
///
/// Binary search over the ID space with [`ReadClient::read_escrow`] as the existence oracle —
/// O(log N) round trips where each probe is a network round trip. Probes run sequentially to
/// bound concurrent RPC load and keep failure attribution simple. After convergence a linear
/// confirmation scan walks the window above the candidate from the top downward, correcting the
/// result when the ID space has a gap (a non-existent ID below an existing one).
pub async fn find_highest_escrow_id<R: LedgerRpc>(
    reader: &ReadClient<'_, R>,
    upper_bound: u32,
) -> Result<u32, ReadError> {
    if upper_bound == 0 {
        return Ok(0);
    }

    let mut lo = 1u32;
    let mut hi = upper_bound;
    let mut candidate = 0u32;
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        if probe(reader, mid).await? {
            candidate = mid;
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }
    debug!(candidate, "binary search converged");

    // Linear confirmation: the highest hit inside the window wins over the candidate.
    let top = candidate.saturating_add(CONFIRMATION_WINDOW).min(upper_bound);
    let mut id = top;
    while id > candidate {
        if probe(reader, id).await? {
            debug!(corrected = id, candidate, "confirmation scan found a gap");
            return Ok(id);
        }
        id -= 1;
    }

    Ok(candidate)
}

/// Existence probe with bounded retry of transient failures.
///
/// Protocol and transport errors are retried [`PROBE_RETRIES`] times; once exhausted the ID is
/// treated as absent so that the search can terminate. Decode failures are real errors and
/// propagate.
async fn probe<R: LedgerRpc>(
    reader: &ReadClient<'_, R>,
    id: u32,
) -> Result<bool, ReadError> {
    let mut attempt = 0u32;
    loop {
        match reader.read_escrow(EscrowId::from(id)).await {
            Ok(found) => return Ok(found.is_some()),
            Err(err @ (ReadError::Protocol(_) | ReadError::Rpc(_))) => {
                if attempt >= PROBE_RETRIES {
                    warn!(id, %err, "probe kept failing, treating the ID as absent");
                    return Ok(false);
                }
                attempt += 1;
                warn!(id, attempt, %err, "transient probe failure, retrying");
                tokio::time::sleep(PROBE_RETRY_DELAY).await;
            }
            Err(err) => return Err(err),
        }
    }
}
