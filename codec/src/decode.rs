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

use serde_json::{Map, Number, Value};

use crate::LedgerValue;

/// Error reconciling a wire value with the tolerated decode shapes.
///
/// Decoding never substitutes a default for an undecodable required field; whatever can't be
/// reconciled surfaces through one of these variants.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum DecodeError {
    /// wire value has an unrecognized shape: {0}
    UnrecognizedShape(String),

    /// numeric wire value {0} does not fit the expected range
    NumericRange(String),

    /// non-integral number {0} can't carry a ledger integer
    FractionalNumber(String),

    /// 128-bit integer wire form is malformed: {0}
    MalformedI128(String),

    /// map entry key {0} must decode as a symbol
    NonSymbolKey(String),

    /// map entry is malformed: {0}
    MalformedMapEntry(String),

    /// expected a {0} value, but found {1}
    TypeMismatch(&'static str, &'static str),

    /// required field `{0}` is missing from the decoded record
    MissingField(String),

    /// value of shape {0} can't carry an enum variant
    UnknownVariant(String),
}

/// Tags of the canonical tagged-object wire form, with the abbreviations some serializer paths
/// produce.
const TAGS: [&str; 11] =
    ["void", "bool", "u32", "i128", "symbol", "sym", "string", "str", "address", "vec", "map"];

impl LedgerValue {
    /// Decodes a wire value from any of the tolerated JSON shapes.
    ///
    /// Three families of shapes are reconciled:
    /// 1. the canonical tagged-object form (`{"u32": 7}`, `{"i128": {"hi": …, "lo": …}}`, …);
    /// 2. the bare-value form (plain JSON scalars, arrays and objects);
    /// 3. the nested form wrapping a payload into `_value` (or `_attributes` for the `hi`/`lo`
    ///    pair), recursively.
    ///
    /// All shapes of the same logical value decode to the same [`LedgerValue`].
    pub fn from_wire(wire: &Value) -> Result<LedgerValue, DecodeError> {
        match wire {
            Value::Null => Ok(LedgerValue::Void),
            Value::Bool(val) => Ok(LedgerValue::Bool(*val)),
            Value::Number(num) => decode_number(num),
            Value::String(val) => Ok(LedgerValue::String(val.clone())),
            Value::Array(items) => items
                .iter()
                .map(LedgerValue::from_wire)
                .collect::<Result<_, _>>()
                .map(LedgerValue::Vec),
            Value::Object(obj) => decode_object(obj),
        }
    }
}

fn decode_object(obj: &Map<String, Value>) -> Result<LedgerValue, DecodeError> {
    // Nested forms take precedence: the wrapper may carry sibling bookkeeping keys.
    if let Some(inner) = obj.get("_value") {
        return LedgerValue::from_wire(inner);
    }
    if let Some(inner) = obj.get("_attributes") {
        return LedgerValue::from_wire(inner);
    }

    // The hi/lo attribute pair of a 128-bit integer which lost its tag.
    if obj.contains_key("hi") && obj.contains_key("lo") {
        return decode_i128_halves(obj);
    }

    if obj.len() == 1 {
        let (tag, body) = obj.iter().next().expect("len checked above");
        if TAGS.contains(&tag.as_str()) {
            return decode_tagged(tag, body);
        }
    }

    // Bare-record form: a plain JSON object whose keys are the symbols.
    obj.iter()
        .map(|(key, val)| Ok((key.clone(), LedgerValue::from_wire(val)?)))
        .collect::<Result<_, _>>()
        .map(LedgerValue::Map)
}

fn decode_tagged(tag: &str, body: &Value) -> Result<LedgerValue, DecodeError> {
    match tag {
        "void" => Ok(LedgerValue::Void),
        "bool" => match body {
            Value::Bool(val) => Ok(LedgerValue::Bool(*val)),
            other => Err(DecodeError::UnrecognizedShape(format!("bool carrying {other}"))),
        },
        "u32" => decode_u32(body),
        "i128" => decode_i128(body),
        "symbol" | "sym" => body
            .as_str()
            .map(LedgerValue::symbol)
            .ok_or_else(|| DecodeError::UnrecognizedShape(format!("symbol carrying {body}"))),
        "string" | "str" => body
            .as_str()
            .map(LedgerValue::string)
            .ok_or_else(|| DecodeError::UnrecognizedShape(format!("string carrying {body}"))),
        "address" => body
            .as_str()
            .map(LedgerValue::address)
            .ok_or_else(|| DecodeError::UnrecognizedShape(format!("address carrying {body}"))),
        "vec" => match body {
            Value::Array(items) => items
                .iter()
                .map(LedgerValue::from_wire)
                .collect::<Result<_, _>>()
                .map(LedgerValue::Vec),
            other => Err(DecodeError::UnrecognizedShape(format!("vec carrying {other}"))),
        },
        "map" => decode_map(body),
        _ => unreachable!("tag membership checked by the caller"),
    }
}

fn decode_number(num: &Number) -> Result<LedgerValue, DecodeError> {
    if let Some(val) = num.as_u64() {
        return if val <= u32::MAX as u64 {
            Ok(LedgerValue::U32(val as u32))
        } else {
            Ok(LedgerValue::i128(val as i128))
        };
    }
    if let Some(val) = num.as_i64() {
        return Ok(LedgerValue::i128(val as i128));
    }
    // Floats appear when an upstream JSON layer has already converted the number; only exact
    // integral values inside the f64 mantissa are acceptable.
    let float = num.as_f64().unwrap_or(f64::NAN);
    if float.fract() == 0.0 && float.abs() < 9_007_199_254_740_992.0 {
        Ok(LedgerValue::i128(float as i128))
    } else {
        Err(DecodeError::FractionalNumber(num.to_string()))
    }
}

fn decode_u32(body: &Value) -> Result<LedgerValue, DecodeError> {
    let val = match body {
        Value::Number(num) => num
            .as_u64()
            .ok_or_else(|| DecodeError::NumericRange(num.to_string()))?,
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|_| DecodeError::NumericRange(s.clone()))?,
        other => return Err(DecodeError::UnrecognizedShape(format!("u32 carrying {other}"))),
    };
    u32::try_from(val)
        .map(LedgerValue::U32)
        .map_err(|_| DecodeError::NumericRange(val.to_string()))
}

fn decode_i128(body: &Value) -> Result<LedgerValue, DecodeError> {
    match body {
        Value::Object(obj) => {
            if let Some(inner) = obj.get("_value") {
                return decode_i128(inner);
            }
            if let Some(inner) = obj.get("_attributes") {
                return decode_i128(inner);
            }
            decode_i128_halves(obj)
        }
        // Already-converted big numbers arrive as decimal strings or plain numbers.
        Value::String(s) => s
            .parse::<i128>()
            .map(LedgerValue::i128)
            .map_err(|_| DecodeError::MalformedI128(s.clone())),
        Value::Number(num) => decode_number(num).map(|val| match val {
            LedgerValue::U32(small) => LedgerValue::i128(small as i128),
            wide => wide,
        }),
        other => Err(DecodeError::MalformedI128(other.to_string())),
    }
}

fn decode_i128_halves(obj: &Map<String, Value>) -> Result<LedgerValue, DecodeError> {
    let hi = obj
        .get("hi")
        .ok_or_else(|| DecodeError::MalformedI128("missing `hi` half".to_owned()))?;
    let lo = obj
        .get("lo")
        .ok_or_else(|| DecodeError::MalformedI128("missing `lo` half".to_owned()))?;
    let hi = decode_half_i64(hi)?;
    let lo = decode_half_u64(lo)?;
    Ok(LedgerValue::I128 { hi, lo })
}

fn decode_half_i64(val: &Value) -> Result<i64, DecodeError> {
    match val {
        Value::Number(num) => num
            .as_i64()
            .ok_or_else(|| DecodeError::MalformedI128(format!("`hi` half {num}"))),
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| DecodeError::MalformedI128(format!("`hi` half {s}"))),
        other => Err(DecodeError::MalformedI128(format!("`hi` half {other}"))),
    }
}

fn decode_half_u64(val: &Value) -> Result<u64, DecodeError> {
    match val {
        Value::Number(num) => num
            .as_u64()
            .ok_or_else(|| DecodeError::MalformedI128(format!("`lo` half {num}"))),
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|_| DecodeError::MalformedI128(format!("`lo` half {s}"))),
        other => Err(DecodeError::MalformedI128(format!("`lo` half {other}"))),
    }
}

fn decode_map(body: &Value) -> Result<LedgerValue, DecodeError> {
    let entries = match body {
        Value::Array(entries) => entries,
        // Some paths collapse the entry list back into a plain object.
        Value::Object(obj) => {
            return obj
                .iter()
                .map(|(key, val)| Ok((key.clone(), LedgerValue::from_wire(val)?)))
                .collect::<Result<_, _>>()
                .map(LedgerValue::Map);
        }
        other => return Err(DecodeError::UnrecognizedShape(format!("map carrying {other}"))),
    };
    entries
        .iter()
        .map(|entry| {
            let obj = entry
                .as_object()
                .ok_or_else(|| DecodeError::MalformedMapEntry(entry.to_string()))?;
            let key = obj
                .get("key")
                .ok_or_else(|| DecodeError::MalformedMapEntry("missing `key`".to_owned()))?;
            let val = obj
                .get("val")
                .or_else(|| obj.get("value"))
                .ok_or_else(|| DecodeError::MalformedMapEntry("missing `val`".to_owned()))?;
            let key = match LedgerValue::from_wire(key)? {
                LedgerValue::Symbol(sym) => sym,
                other => return Err(DecodeError::NonSymbolKey(other.kind_name().to_owned())),
            };
            Ok((key, LedgerValue::from_wire(val)?))
        })
        .collect::<Result<_, _>>()
        .map(LedgerValue::Map)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn three_shapes_one_value() {
        // tagged-object, bare-value and nested `_value` forms of the same logical number
        let tagged = LedgerValue::from_wire(&json!({ "u32": 7 })).unwrap();
        let bare = LedgerValue::from_wire(&json!(7)).unwrap();
        let nested = LedgerValue::from_wire(&json!({ "_value": 7 })).unwrap();
        assert_eq!(tagged, LedgerValue::U32(7));
        assert_eq!(tagged, bare);
        assert_eq!(tagged, nested);
    }

    #[test]
    fn i128_from_attribute_pair() {
        let val = LedgerValue::from_wire(&json!({ "i128": { "hi": 0, "lo": 10_000_000_000u64 } }))
            .unwrap();
        assert_eq!(val.as_i128().unwrap().to_string(), "10000000000");

        // halves as strings, the way 64-bit-safe serializers emit them
        let val =
            LedgerValue::from_wire(&json!({ "i128": { "hi": "2", "lo": "5" } })).unwrap();
        assert_eq!(val.as_i128().unwrap(), 2 * (1i128 << 64) + 5);

        // negative hi keeps two's complement
        let val =
            LedgerValue::from_wire(&json!({ "i128": { "hi": -1, "lo": u64::MAX } })).unwrap();
        assert_eq!(val.as_i128().unwrap(), -1);
    }

    #[test]
    fn i128_from_converted_forms() {
        // nested `_attributes` wrapping
        let val = LedgerValue::from_wire(
            &json!({ "i128": { "_attributes": { "hi": 0, "lo": 42 } } }),
        )
        .unwrap();
        assert_eq!(val.as_i128().unwrap(), 42);

        // already-converted big number as a decimal string
        let val =
            LedgerValue::from_wire(&json!({ "i128": "36893488147419103232" })).unwrap();
        assert_eq!(val.as_i128().unwrap(), 36_893_488_147_419_103_232i128);
        assert_eq!(val, LedgerValue::I128 { hi: 2, lo: 0 });

        // and as a plain number
        let val = LedgerValue::from_wire(&json!({ "i128": 1000 })).unwrap();
        assert_eq!(val.as_i128().unwrap(), 1000);
    }

    #[test]
    fn map_entry_list_and_bare_object() {
        let listed = LedgerValue::from_wire(&json!({ "map": [
            { "key": { "symbol": "depositor" }, "val": { "address": "GALICE" } },
            { "key": { "symbol": "total_amount" }, "val": { "i128": { "hi": 0, "lo": 100 } } },
        ] }))
        .unwrap();
        let bare = LedgerValue::from_wire(&json!({
            "depositor": { "address": "GALICE" },
            "total_amount": { "i128": { "hi": 0, "lo": 100 } },
        }))
        .unwrap();
        assert_eq!(listed, bare);
        assert_eq!(listed.get("depositor").unwrap().as_address().unwrap(), "GALICE");
    }

    #[test]
    fn map_entries_keep_unknown_keys() {
        let val = LedgerValue::from_wire(&json!({ "map": [
            { "key": { "symbol": "status" }, "val": { "u32": 1 } },
            { "key": { "symbol": "introduced_later" }, "val": { "bool": true } },
        ] }))
        .unwrap();
        let entries = val.as_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].0, "introduced_later");
    }

    #[test]
    fn map_key_must_be_symbol() {
        let err = LedgerValue::from_wire(&json!({ "map": [
            { "key": { "u32": 1 }, "val": { "u32": 2 } },
        ] }))
        .unwrap_err();
        assert_eq!(err, DecodeError::NonSymbolKey("u32".to_owned()));
    }

    #[test]
    fn fractional_numbers_fail_loudly() {
        assert_eq!(
            LedgerValue::from_wire(&json!(10.5)).unwrap_err(),
            DecodeError::FractionalNumber("10.5".to_owned())
        );
    }

    #[test]
    fn no_value_marker() {
        assert!(LedgerValue::from_wire(&json!(null)).unwrap().is_void());
        assert!(LedgerValue::from_wire(&json!({ "void": null })).unwrap().is_void());
    }
}
