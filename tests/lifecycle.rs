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

#[macro_use]
extern crate amplify;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use paylane::codec::LedgerValue;
use paylane::{
    Address, Amount, AuthObligation, CallError, CallParams, CreateEscrowRequest, Envelope,
    EscrowContract, Invocation, LedgerRpc, Lifecycle, MilestoneDraft, RawEntry, RpcError,
    SignError, Signature, Signer, Simulation, StatusReport, SubmitAck, SubmitStatus, TxHash,
    TxStatus,
};
use serde_json::json;

#[derive(Clone, Default)]
struct MockLedger {
    sequences: Arc<Mutex<VecDeque<u64>>>,
    simulations: Arc<Mutex<VecDeque<Simulation>>>,
    acks: Arc<Mutex<VecDeque<SubmitAck>>>,
    statuses: Arc<Mutex<VecDeque<StatusReport>>>,
    simulated: Arc<Mutex<Vec<Envelope>>>,
    submitted: Arc<Mutex<Vec<Envelope>>>,
    status_polls: Arc<Mutex<u32>>,
}

impl MockLedger {
    fn push_sequence(&self, sequence: u64) {
        self.sequences.lock().unwrap().push_back(sequence);
    }

    fn push_simulation(&self, simulation: Simulation) {
        self.simulations.lock().unwrap().push_back(simulation);
    }

    fn push_ack(&self, ack: SubmitAck) { self.acks.lock().unwrap().push_back(ack); }

    fn push_status(&self, report: StatusReport) {
        self.statuses.lock().unwrap().push_back(report);
    }

    fn submissions(&self) -> Vec<Envelope> { self.submitted.lock().unwrap().clone() }

    fn polls(&self) -> u32 { *self.status_polls.lock().unwrap() }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn account_sequence(&self, _address: &Address) -> Result<u64, RpcError> {
        Ok(self
            .sequences
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected account_sequence call"))
    }

    async fn simulate(&self, envelope: &Envelope) -> Result<Simulation, RpcError> {
        self.simulated.lock().unwrap().push(envelope.clone());
        Ok(self
            .simulations
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected simulate call"))
    }

    async fn prepare(&self, mut envelope: Envelope) -> Result<Envelope, RpcError> {
        if envelope.resources.is_none() {
            envelope.resources = Some(default!());
        }
        Ok(envelope)
    }

    async fn submit(&self, envelope: &Envelope) -> Result<SubmitAck, RpcError> {
        self.submitted.lock().unwrap().push(envelope.clone());
        Ok(self
            .acks
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected submit call"))
    }

    async fn transaction_status(&self, _hash: &TxHash) -> Result<StatusReport, RpcError> {
        *self.status_polls.lock().unwrap() += 1;
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            Ok(statuses.pop_front().expect("statuses can't be empty here"))
        } else {
            // the last scripted status repeats for the rest of the poll loop
            Ok(statuses
                .front()
                .cloned()
                .expect("unexpected transaction_status call"))
        }
    }

    async fn read_entry(&self, _key: &LedgerValue) -> Result<Option<RawEntry>, RpcError> {
        Ok(None)
    }
}

#[derive(Clone, Default)]
struct MockSigner {
    reject: bool,
    envelope_identities: Arc<Mutex<Vec<Address>>>,
    obligation_batches: Arc<Mutex<Vec<Vec<Address>>>>,
}

#[async_trait]
impl Signer for MockSigner {
    async fn sign_envelope(
        &self,
        mut envelope: Envelope,
        identity: &Address,
    ) -> Result<Envelope, SignError> {
        if self.reject {
            return Err(SignError::Rejected);
        }
        self.envelope_identities.lock().unwrap().push(identity.clone());
        envelope.signatures.push(Signature::from(format!("sig:{identity}")));
        Ok(envelope)
    }

    async fn sign_obligations(
        &self,
        mut obligations: Vec<AuthObligation>,
        _identity: &Address,
    ) -> Result<Vec<AuthObligation>, SignError> {
        if self.reject {
            return Err(SignError::Rejected);
        }
        self.obligation_batches
            .lock()
            .unwrap()
            .push(obligations.iter().map(|o| o.signer.clone()).collect());
        for (no, obligation) in obligations.iter_mut().enumerate() {
            obligation.signature = Some(Signature::from(format!("obl:{no}")));
        }
        Ok(obligations)
    }
}

fn contract() -> Address { Address::from("CESCROW") }

fn alice() -> Address { Address::from("GALICE") }

fn obligation(signer: &Address) -> AuthObligation {
    AuthObligation {
        signer: signer.clone(),
        invocation: Invocation {
            contract: contract(),
            method: "transfer".into(),
            args: vec![],
        },
        nonce: 1,
        signature: None,
    }
}

fn pending_ack(hash: &str) -> SubmitAck {
    SubmitAck { status: SubmitStatus::Pending, hash: Some(TxHash::from(hash)), error: None }
}

fn success_report() -> StatusReport {
    StatusReport { status: TxStatus::Success, result: None }
}

#[tokio::test(start_paused = true)]
async fn happy_path_uses_simulated_return_value() {
    let ledger = MockLedger::default();
    ledger.push_sequence(7);
    ledger.push_simulation(Simulation {
        return_value: Some(json!({ "u32": 42 })),
        ..default!()
    });
    ledger.push_ack(pending_ack("abc"));
    ledger.push_status(success_report());

    let signer = MockSigner::default();
    let outcome = Lifecycle::new(&ledger, &signer, contract())
        .execute(CallParams::new("approve_milestone", vec![LedgerValue::u32(1)]), &alice())
        .await
        .unwrap();

    assert_eq!(outcome.hash, TxHash::from("abc"));
    assert_eq!(outcome.return_value, Some(LedgerValue::U32(42)));

    let submitted = ledger.submissions();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].sequence, 7);
    assert_eq!(submitted[0].source, alice());
    assert!(submitted[0].is_signed());
    assert!(submitted[0].resources.is_some());
    assert_eq!(signer.envelope_identities.lock().unwrap().clone(), vec![alice()]);
}

#[tokio::test(start_paused = true)]
async fn simulation_error_is_fatal_and_verbatim() {
    let ledger = MockLedger::default();
    ledger.push_sequence(7);
    ledger.push_simulation(Simulation {
        error: Some("contract error 1100".to_owned()),
        ..default!()
    });

    let signer = MockSigner::default();
    let err = Lifecycle::new(&ledger, &signer, contract())
        .execute(CallParams::new("start_work", vec![]), &alice())
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::Simulation(msg) if msg == "contract error 1100"));
    assert!(ledger.submissions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn obligations_are_signed_in_order_and_sequence_refetched() {
    let bob = Address::from("GBOB");
    let ledger = MockLedger::default();
    // first fetch builds the envelope, second happens after obligations are signed
    ledger.push_sequence(7);
    ledger.push_sequence(9);
    ledger.push_simulation(Simulation {
        obligations: vec![obligation(&alice()), obligation(&bob)],
        ..default!()
    });
    ledger.push_simulation(Simulation::default());
    ledger.push_ack(pending_ack("abc"));
    ledger.push_status(success_report());

    let signer = MockSigner::default();
    Lifecycle::new(&ledger, &signer, contract())
        .execute(CallParams::new("approve_milestone", vec![]), &alice())
        .await
        .unwrap();

    // obligations delegated once, in obligation order
    let batches = signer.obligation_batches.lock().unwrap().clone();
    assert_eq!(batches, vec![vec![alice(), bob]]);

    // the signed resubmission runs against the refetched sequence, not the stale one
    let submitted = ledger.submissions();
    assert_eq!(submitted[0].sequence, 9);
    assert!(submitted[0].obligations.iter().all(AuthObligation::is_signed));
}

#[tokio::test(start_paused = true)]
async fn duplicate_submission_keeps_original_hash() {
    let ledger = MockLedger::default();
    ledger.push_sequence(7);
    ledger.push_simulation(Simulation::default());
    ledger.push_ack(SubmitAck {
        status: SubmitStatus::Duplicate,
        hash: Some(TxHash::from("original")),
        error: None,
    });
    ledger.push_status(success_report());

    let signer = MockSigner::default();
    let outcome = Lifecycle::new(&ledger, &signer, contract())
        .execute(CallParams::new("refund_escrow", vec![]), &alice())
        .await
        .unwrap();

    // non-fatal: the hash identifies the earlier attempt and nothing is resubmitted
    assert_eq!(outcome.hash, TxHash::from("original"));
    assert_eq!(ledger.submissions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn congested_ledger_is_a_typed_error_without_resubmission() {
    let ledger = MockLedger::default();
    ledger.push_sequence(7);
    ledger.push_simulation(Simulation::default());
    ledger.push_ack(SubmitAck { status: SubmitStatus::TryAgainLater, hash: None, error: None });

    let signer = MockSigner::default();
    let err = Lifecycle::new(&ledger, &signer, contract())
        .execute(CallParams::new("refund_escrow", vec![]), &alice())
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::LedgerBusy));
    assert_eq!(ledger.submissions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn explicit_rejection_differs_from_timeout() {
    let ledger = MockLedger::default();
    ledger.push_sequence(7);
    ledger.push_simulation(Simulation::default());
    ledger.push_ack(pending_ack("abc"));
    ledger.push_status(StatusReport { status: TxStatus::Pending, result: None });
    ledger.push_status(StatusReport { status: TxStatus::Failed, result: None });

    let signer = MockSigner::default();
    let err = Lifecycle::new(&ledger, &signer, contract())
        .execute(CallParams::new("refund_escrow", vec![]), &alice())
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::ConfirmationFailed { hash } if hash == TxHash::from("abc")));
}

#[tokio::test(start_paused = true)]
async fn poll_exhaustion_is_a_timeout() {
    let ledger = MockLedger::default();
    ledger.push_sequence(7);
    ledger.push_simulation(Simulation::default());
    ledger.push_ack(pending_ack("abc"));
    // NotFound is retried just as Pending; the single scripted status repeats forever
    ledger.push_status(StatusReport { status: TxStatus::NotFound, result: None });

    let signer = MockSigner::default();
    let err = Lifecycle::new(&ledger, &signer, contract())
        .execute(CallParams::new("refund_escrow", vec![]), &alice())
        .await
        .unwrap_err();

    assert!(
        matches!(err, CallError::ConfirmationTimedOut { attempts: 30, .. }),
        "expected a timeout, got {err}"
    );
    assert_eq!(ledger.polls(), 30);
}

#[tokio::test(start_paused = true)]
async fn return_value_recovered_from_committed_result() {
    let ledger = MockLedger::default();
    ledger.push_sequence(7);
    // simulation yields no value; the committed transaction result carries it
    ledger.push_simulation(Simulation::default());
    ledger.push_ack(pending_ack("abc"));
    ledger.push_status(StatusReport {
        status: TxStatus::Success,
        result: Some(json!({ "u32": 5 })),
    });

    let signer = MockSigner::default();
    let outcome = Lifecycle::new(&ledger, &signer, contract())
        .execute(CallParams::new("create_escrow", vec![]), &alice())
        .await
        .unwrap();

    assert_eq!(outcome.return_value, Some(LedgerValue::U32(5)));
}

#[tokio::test(start_paused = true)]
async fn signer_rejection_is_user_actionable() {
    let ledger = MockLedger::default();
    ledger.push_sequence(7);
    ledger.push_simulation(Simulation::default());

    let signer = MockSigner { reject: true, ..default!() };
    let err = Lifecycle::new(&ledger, &signer, contract())
        .execute(CallParams::new("refund_escrow", vec![]), &alice())
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::Signing(SignError::Rejected)));
    assert!(ledger.submissions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn create_escrow_amounts_survive_without_drift() {
    let ledger = MockLedger::default();
    ledger.push_sequence(7);
    ledger.push_simulation(Simulation {
        return_value: Some(json!({ "u32": 1 })),
        ..default!()
    });
    ledger.push_ack(pending_ack("abc"));
    ledger.push_status(success_report());

    let facade = EscrowContract::new(ledger.clone(), MockSigner::default(), contract(), alice());
    let request = CreateEscrowRequest {
        beneficiary: None,
        arbiters: vec![],
        required_confirmations: 0,
        milestones: vec![
            MilestoneDraft {
                amount: Amount::from_decimal("600.00").unwrap(),
                description: "wireframes".to_owned(),
            },
            MilestoneDraft {
                amount: Amount::from_decimal("400.00").unwrap(),
                description: "delivery".to_owned(),
            },
        ],
        token: None,
        total_amount: Amount::from_decimal("1000.00").unwrap(),
        duration_secs: 604_800,
        title: "Landing page".to_owned(),
        description: "Design and build".to_owned(),
    };
    let id = facade.create_escrow(request, &alice()).await.unwrap();
    assert_eq!(id.get(), 1);

    // the submitted envelope carries both milestone amounts as I128 values whose decoded
    // string forms sum exactly to the decoded total
    let submitted = ledger.submissions();
    let args = &submitted[0].invocation.args;
    let milestones = args[4].as_vec().unwrap();
    let sum: i128 = milestones
        .iter()
        .map(|pair| pair.as_vec().unwrap()[0].as_i128().unwrap())
        .sum();
    let total = args[6].as_i128().unwrap();
    assert_eq!(sum, total);
    assert_eq!(sum.to_string(), "10000000000");
    // the absent beneficiary marks an open job on the wire
    assert!(args[1].is_void());
}
