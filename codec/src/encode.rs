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

use serde_json::{json, Value};

use crate::{LedgerValue, NativeValue, ValueKind};

/// Error encoding a native value for the wire.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum EncodeError {
    /// a {0} native value can't be encoded as a {1} wire value
    UnsupportedKind(&'static str, ValueKind),

    /// number {0} exceeds the 32-bit counter range
    CounterOverflow(u64),
}

/// Encodes a native value under the kind declared by the call signature.
///
/// Total for the supported native/kind pairings and fails loudly otherwise. The kind is never
/// inferred from the native value: the wire format is kind-sensitive, and a 32-bit counter which
/// happens to hold the same digits as a 128-bit amount must still travel differently.
pub fn encode(value: &NativeValue, kind: &ValueKind) -> Result<LedgerValue, EncodeError> {
    match (value, kind) {
        // An absent optional encodes as the "no value" marker whatever the declared kind.
        (NativeValue::Absent, _) => Ok(LedgerValue::Void),
        (NativeValue::Bool(val), ValueKind::Bool) => Ok(LedgerValue::Bool(*val)),
        (NativeValue::Num(val), ValueKind::U32) => u32::try_from(*val)
            .map(LedgerValue::U32)
            .map_err(|_| EncodeError::CounterOverflow(*val)),
        (NativeValue::Num(val), ValueKind::I128) => Ok(LedgerValue::i128(*val as i128)),
        (NativeValue::Amount(val), ValueKind::I128) => Ok(LedgerValue::i128(*val)),
        (NativeValue::Text(val), ValueKind::Symbol) => Ok(LedgerValue::symbol(val)),
        (NativeValue::Text(val), ValueKind::String) => Ok(LedgerValue::string(val)),
        (NativeValue::Text(val), ValueKind::Address) => Ok(LedgerValue::address(val)),
        (NativeValue::Seq(items), ValueKind::Vec(elem)) => items
            .iter()
            .map(|item| encode(item, elem))
            .collect::<Result<_, _>>()
            .map(LedgerValue::Vec),
        (NativeValue::Record(entries), ValueKind::Map(val_kind)) => entries
            .iter()
            .map(|(key, val)| Ok((key.clone(), encode(val, val_kind)?)))
            .collect::<Result<_, _>>()
            .map(LedgerValue::Map),
        (other, kind) => Err(EncodeError::UnsupportedKind(other.kind_name(), kind.clone())),
    }
}

impl LedgerValue {
    /// Produces the canonical tagged-object wire form.
    ///
    /// Decoding tolerates several shapes; encoding always emits this one. The `hi`/`lo` halves
    /// travel as decimal strings so that 64-bit-unsafe JSON layers can't corrupt them.
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Void => json!({ "void": null }),
            Self::Bool(val) => json!({ "bool": val }),
            Self::U32(val) => json!({ "u32": val }),
            Self::I128 { hi, lo } => {
                json!({ "i128": { "hi": hi.to_string(), "lo": lo.to_string() } })
            }
            Self::Symbol(val) => json!({ "symbol": val }),
            Self::String(val) => json!({ "string": val }),
            Self::Address(val) => json!({ "address": val }),
            Self::Vec(items) => {
                json!({ "vec": items.iter().map(Self::to_wire).collect::<Vec<_>>() })
            }
            Self::Map(entries) => json!({ "map": entries
                .iter()
                .map(|(key, val)| json!({ "key": { "symbol": key }, "val": val.to_wire() }))
                .collect::<Vec<_>>() }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip(native: NativeValue, kind: ValueKind) {
        let encoded = encode(&native, &kind).unwrap();
        let rewired = LedgerValue::from_wire(&encoded.to_wire()).unwrap();
        assert_eq!(rewired, encoded);
        assert_eq!(rewired.to_native(), native);
    }

    #[test]
    fn roundtrip_supported_kinds() {
        roundtrip(NativeValue::Bool(true), ValueKind::Bool);
        roundtrip(NativeValue::Num(7), ValueKind::U32);
        roundtrip(NativeValue::Amount(10_000_000_000), ValueKind::I128);
        roundtrip(NativeValue::Amount(-42), ValueKind::I128);
        roundtrip(NativeValue::Amount(i128::MAX), ValueKind::I128);
        roundtrip(NativeValue::Text("escrow".to_owned()), ValueKind::String);
        roundtrip(
            NativeValue::Seq(vec![NativeValue::Amount(600), NativeValue::Amount(400)]),
            ValueKind::Vec(Box::new(ValueKind::I128)),
        );
    }

    #[test]
    fn symbols_and_addresses_roundtrip_as_text() {
        let encoded = encode(&NativeValue::Text("GALICE".to_owned()), &ValueKind::Address).unwrap();
        assert_eq!(encoded, LedgerValue::address("GALICE"));
        let encoded = encode(&NativeValue::Text("approve".to_owned()), &ValueKind::Symbol).unwrap();
        assert_eq!(encoded, LedgerValue::symbol("approve"));
    }

    #[test]
    fn kind_is_never_guessed() {
        // the same digits refuse to encode under a kind the native value doesn't support
        let err = encode(&NativeValue::Amount(7), &ValueKind::U32).unwrap_err();
        assert_eq!(err, EncodeError::UnsupportedKind("amount", ValueKind::U32));
        let err = encode(&NativeValue::Text("7".to_owned()), &ValueKind::U32).unwrap_err();
        assert_eq!(err, EncodeError::UnsupportedKind("text", ValueKind::U32));
    }

    #[test]
    fn counter_overflow() {
        let err = encode(&NativeValue::Num(u64::MAX), &ValueKind::U32).unwrap_err();
        assert_eq!(err, EncodeError::CounterOverflow(u64::MAX));
    }

    #[test]
    fn absent_encodes_as_void() {
        for kind in [ValueKind::Address, ValueKind::I128, ValueKind::Void] {
            assert_eq!(encode(&NativeValue::Absent, &kind).unwrap(), LedgerValue::Void);
        }
    }

    #[test]
    fn record_encoding_keeps_order() {
        let mut record = indexmap::IndexMap::new();
        record.insert("b".to_owned(), NativeValue::Num(2));
        record.insert("a".to_owned(), NativeValue::Num(1));
        let encoded = encode(
            &NativeValue::Record(record),
            &ValueKind::Map(Box::new(ValueKind::U32)),
        )
        .unwrap();
        let entries = encoded.as_entries().unwrap();
        assert_eq!(entries[0].0, "b");
        assert_eq!(entries[1].0, "a");
    }
}
