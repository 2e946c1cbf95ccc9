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

use clap::{Parser, Subcommand};
use paylane::{find_highest_escrow_id, Address, EscrowId, ReadClient};
use paylane_codec::LedgerValue;
use paylane_rpc::HttpLedger;

/// Read-side inspector for PAYLANE escrow contracts.
///
/// Signing keys never touch this tool: it only runs simulated read-only calls and raw storage
/// reads against the configured ledger node.
#[derive(Parser)]
pub struct Args {
    /// Ledger RPC endpoint
    #[clap(short, long)]
    pub rpc: String,

    /// Escrow contract address
    #[clap(short, long)]
    pub contract: String,

    /// Account used as the source of read-only simulations; needs no keys
    #[clap(short, long)]
    pub viewer: String,

    #[clap(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Print an escrow record
    Escrow { id: u32 },

    /// Print all milestones of an escrow
    Milestones { id: u32 },

    /// Print applications to an open job
    Applications {
        id: u32,

        /// Annotate each application with the freelancer badge and average rating
        #[clap(long)]
        enrich: bool,
    },

    /// Find the highest allocated escrow id
    Discover {
        /// Upper bound of the searched id space
        #[clap(default_value_t = 1024)]
        upper_bound: u32,
    },

    /// Check whether a freelancer has applied to a job
    Applied { id: u32, freelancer: String },

    /// Print a freelancer profile: badge and average rating
    Profile { freelancer: String },

    /// Print the contract owner and fee configuration
    Admin,

    /// Read a raw ledger storage entry; the key is given in JSON wire form
    Storage { key: String },
}

impl Args {
    pub async fn exec(self) -> anyhow::Result<()> {
        let ledger = HttpLedger::new(self.rpc);
        let reader = ReadClient::new(
            &ledger,
            Address::from(self.contract),
            Address::from(self.viewer),
        );
        self.command.exec(&reader).await
    }
}

impl Cmd {
    pub async fn exec(self, reader: &ReadClient<'_, HttpLedger>) -> anyhow::Result<()> {
        match self {
            Cmd::Escrow { id } => match reader.read_escrow(EscrowId::from(id)).await? {
                Some(escrow) => println!("{}", serde_yaml::to_string(&escrow)?),
                None => println!("escrow {id} does not exist"),
            },
            Cmd::Milestones { id } => {
                let milestones = reader.read_milestones(EscrowId::from(id)).await?;
                println!("{}", serde_yaml::to_string(&milestones)?);
            }
            Cmd::Applications { id, enrich } => {
                let applications = reader
                    .read_applications(EscrowId::from(id), enrich)
                    .await?;
                println!("{}", serde_yaml::to_string(&applications)?);
            }
            Cmd::Discover { upper_bound } => {
                let highest = find_highest_escrow_id(reader, upper_bound).await?;
                match highest {
                    0 => println!("no escrows exist"),
                    id => println!("highest escrow id: {id}"),
                }
            }
            Cmd::Applied { id, freelancer } => {
                let applied = reader
                    .has_applied(EscrowId::from(id), &Address::from(freelancer))
                    .await?;
                println!("{applied}");
            }
            Cmd::Profile { freelancer } => {
                let freelancer = Address::from(freelancer);
                let badge = reader.read_badge(&freelancer).await?;
                let rating = reader.read_average_rating(&freelancer).await?;
                println!("badge: {badge}");
                match rating.average() {
                    Some(average) => {
                        println!("rating: {average:.2} over {} reviews", rating.count)
                    }
                    None => println!("rating: no reviews yet"),
                }
            }
            Cmd::Admin => {
                match reader.read_owner().await? {
                    Some(owner) => println!("owner: {owner}"),
                    None => println!("owner: contract not initialized"),
                }
                println!("platform fee: {} bp", reader.read_platform_fee().await?);
                println!("job creation paused: {}", reader.read_paused_state().await?);
            }
            Cmd::Storage { key } => {
                let key = LedgerValue::from_wire(&serde_json::from_str(&key)?)?;
                match reader.read_raw(&key).await? {
                    Some(value) => println!("{}", serde_yaml::to_string(&value)?),
                    None => println!("no entry under the given key"),
                }
            }
        }
        Ok(())
    }
}
