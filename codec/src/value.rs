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

use core::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DecodeError;

/// Kind of a wire value, as declared by a contract call signature.
///
/// The wire format is kind-sensitive: a 32-bit counter and a 128-bit amount are not
/// interchangeable even when both are written down as a plain integer. Thus, the kind must always
/// come from the call signature and is never guessed from the shape of a native value.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueKind {
    Void,
    Bool,
    U32,
    I128,
    Symbol,
    String,
    Address,
    Vec(Box<ValueKind>),
    Map(Box<ValueKind>),
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Bool => f.write_str("bool"),
            Self::U32 => f.write_str("u32"),
            Self::I128 => f.write_str("i128"),
            Self::Symbol => f.write_str("symbol"),
            Self::String => f.write_str("string"),
            Self::Address => f.write_str("address"),
            Self::Vec(inner) => write!(f, "vec<{inner}>"),
            Self::Map(inner) => write!(f, "map<symbol, {inner}>"),
        }
    }
}

/// Native value provided by a caller (a form field, a CLI argument) before it is encoded for the
/// wire under an explicit [`ValueKind`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum NativeValue {
    /// Absent optional value; encodes as the wire "no value" marker under any kind.
    Absent,
    Bool(bool),
    /// Small counters and indexes.
    Num(u64),
    /// 128-bit amounts, kept in exact integer arithmetic end to end.
    Amount(i128),
    Text(String),
    Seq(Vec<NativeValue>),
    Record(IndexMap<String, NativeValue>),
}

impl NativeValue {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Bool(_) => "bool",
            Self::Num(_) => "number",
            Self::Amount(_) => "amount",
            Self::Text(_) => "text",
            Self::Seq(_) => "sequence",
            Self::Record(_) => "record",
        }
    }
}

impl From<bool> for NativeValue {
    fn from(val: bool) -> Self { Self::Bool(val) }
}
impl From<u32> for NativeValue {
    fn from(val: u32) -> Self { Self::Num(val as u64) }
}
impl From<u64> for NativeValue {
    fn from(val: u64) -> Self { Self::Num(val) }
}
impl From<i128> for NativeValue {
    fn from(val: i128) -> Self { Self::Amount(val) }
}
impl From<&str> for NativeValue {
    fn from(val: &str) -> Self { Self::Text(val.to_owned()) }
}
impl From<String> for NativeValue {
    fn from(val: String) -> Self { Self::Text(val) }
}

/// Tagged wire value of the ledger virtual machine.
///
/// 128-bit integers travel as two 64-bit halves in two's complement; the logical value is
/// `(hi << 64) | lo`. Map keys are always symbols; entry order is the wire order and is preserved.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum LedgerValue {
    Void,
    Bool(bool),
    U32(u32),
    I128 { hi: i64, lo: u64 },
    Symbol(String),
    String(String),
    Address(String),
    Vec(Vec<LedgerValue>),
    Map(Vec<(String, LedgerValue)>),
}

/// Enum discriminant extracted from a wire value.
///
/// Contract enums are integer-coded on the wire, but depending on the serializer path they may
/// also surface as a symbol, a bare string, or a unit variant wrapped into a one-element vector.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum VariantTag<'a> {
    Code(u32),
    Name(&'a str),
}

impl LedgerValue {
    pub fn u32(val: u32) -> Self { Self::U32(val) }

    /// Splits a 128-bit integer into the two's-complement `hi`/`lo` halves used on the wire.
    pub fn i128(val: i128) -> Self { Self::I128 { hi: (val >> 64) as i64, lo: val as u64 } }

    pub fn symbol(val: impl Into<String>) -> Self { Self::Symbol(val.into()) }

    pub fn string(val: impl Into<String>) -> Self { Self::String(val.into()) }

    pub fn address(val: impl Into<String>) -> Self { Self::Address(val.into()) }

    pub fn vec(items: impl IntoIterator<Item = LedgerValue>) -> Self {
        Self::Vec(items.into_iter().collect())
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, LedgerValue)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wraps an optional value the way the contract ABI does: absence is the wire "no value"
    /// marker.
    pub fn option(val: Option<LedgerValue>) -> Self { val.unwrap_or(Self::Void) }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool(_) => "bool",
            Self::U32(_) => "u32",
            Self::I128 { .. } => "i128",
            Self::Symbol(_) => "symbol",
            Self::String(_) => "string",
            Self::Address(_) => "address",
            Self::Vec(_) => "vec",
            Self::Map(_) => "map",
        }
    }

    pub fn is_void(&self) -> bool { matches!(self, Self::Void) }

    pub fn as_bool(&self) -> Result<bool, DecodeError> {
        match self {
            Self::Bool(val) => Ok(*val),
            other => Err(DecodeError::TypeMismatch("bool", other.kind_name())),
        }
    }

    pub fn as_u32(&self) -> Result<u32, DecodeError> {
        match self {
            Self::U32(val) => Ok(*val),
            Self::I128 { .. } => {
                let wide = self.as_i128()?;
                u32::try_from(wide).map_err(|_| DecodeError::NumericRange(wide.to_string()))
            }
            other => Err(DecodeError::TypeMismatch("u32", other.kind_name())),
        }
    }

    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        match self {
            Self::U32(val) => Ok(*val as u64),
            Self::I128 { .. } => {
                let wide = self.as_i128()?;
                u64::try_from(wide).map_err(|_| DecodeError::NumericRange(wide.to_string()))
            }
            other => Err(DecodeError::TypeMismatch("u64", other.kind_name())),
        }
    }

    /// Reconstructs the 128-bit integer `(hi << 64) | lo` in exact native arithmetic.
    ///
    /// No floating-point path exists here: 64-bit floats can't hold either half without precision
    /// loss.
    pub fn as_i128(&self) -> Result<i128, DecodeError> {
        match self {
            Self::I128 { hi, lo } => Ok(((*hi as i128) << 64) | (*lo as i128)),
            Self::U32(val) => Ok(*val as i128),
            other => Err(DecodeError::TypeMismatch("i128", other.kind_name())),
        }
    }

    pub fn as_text(&self) -> Result<&str, DecodeError> {
        match self {
            Self::Symbol(val) | Self::String(val) | Self::Address(val) => Ok(val),
            other => Err(DecodeError::TypeMismatch("text", other.kind_name())),
        }
    }

    pub fn as_symbol(&self) -> Result<&str, DecodeError> {
        match self {
            Self::Symbol(val) => Ok(val),
            other => Err(DecodeError::TypeMismatch("symbol", other.kind_name())),
        }
    }

    /// Addresses produced by some serializer paths lose their tag and arrive as plain strings.
    pub fn as_address(&self) -> Result<&str, DecodeError> {
        match self {
            Self::Address(val) | Self::String(val) | Self::Symbol(val) => Ok(val),
            other => Err(DecodeError::TypeMismatch("address", other.kind_name())),
        }
    }

    pub fn as_vec(&self) -> Result<&[LedgerValue], DecodeError> {
        match self {
            Self::Vec(items) => Ok(items),
            other => Err(DecodeError::TypeMismatch("vec", other.kind_name())),
        }
    }

    pub fn as_entries(&self) -> Result<&[(String, LedgerValue)], DecodeError> {
        match self {
            Self::Map(entries) => Ok(entries),
            other => Err(DecodeError::TypeMismatch("map", other.kind_name())),
        }
    }

    /// Looks up a map entry by its symbol key; `None` both when the value is not a map and when
    /// the key is missing, since callers treat both as field absence.
    pub fn get(&self, key: &str) -> Option<&LedgerValue> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Extracts an enum discriminant from any of the tolerated variant encodings.
    pub fn variant_tag(&self) -> Result<VariantTag<'_>, DecodeError> {
        match self {
            Self::U32(code) => Ok(VariantTag::Code(*code)),
            Self::I128 { .. } => self.as_u32().map(VariantTag::Code),
            Self::Symbol(name) | Self::String(name) => Ok(VariantTag::Name(name)),
            Self::Vec(items) if items.len() == 1 => items[0].variant_tag(),
            other => Err(DecodeError::UnknownVariant(other.kind_name().to_owned())),
        }
    }

    /// Converts a decoded wire value into its native form. Total: every wire value has exactly
    /// one native representation, independently of the wire shape it arrived in.
    pub fn to_native(&self) -> NativeValue {
        match self {
            Self::Void => NativeValue::Absent,
            Self::Bool(val) => NativeValue::Bool(*val),
            Self::U32(val) => NativeValue::Num(*val as u64),
            Self::I128 { hi, lo } => NativeValue::Amount(((*hi as i128) << 64) | (*lo as i128)),
            Self::Symbol(val) | Self::String(val) | Self::Address(val) => {
                NativeValue::Text(val.clone())
            }
            Self::Vec(items) => NativeValue::Seq(items.iter().map(Self::to_native).collect()),
            Self::Map(entries) => NativeValue::Record(
                entries
                    .iter()
                    .map(|(key, val)| (key.clone(), val.to_native()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for LedgerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LedgerValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = serde_json::Value::deserialize(deserializer)?;
        Self::from_wire(&wire).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn i128_halves_reconstruction() {
        // hi=0 must reproduce the plain value exactly
        let val = LedgerValue::i128(10_000_000_000);
        assert_eq!(val, LedgerValue::I128 { hi: 0, lo: 10_000_000_000 });
        assert_eq!(val.as_i128().unwrap().to_string(), "10000000000");

        // a value overflowing 64 bits must round-trip through the halves
        let wide = 3_402_823_669_209_384_634_633_746_074_317_682_114i128;
        let val = LedgerValue::i128(wide);
        let LedgerValue::I128 { hi, lo } = val else { panic!("not an i128") };
        assert_eq!((hi as i128) * (1i128 << 64) + lo as i128, wide);
        assert_eq!(val.as_i128().unwrap(), wide);

        // negative values keep two's complement across the halves
        let neg = -1_234_567_890_123_456_789_012_345i128;
        assert_eq!(LedgerValue::i128(neg).as_i128().unwrap(), neg);
        assert_eq!(LedgerValue::i128(-1), LedgerValue::I128 { hi: -1, lo: u64::MAX });
    }

    #[test]
    fn variant_tag_shapes() {
        assert_eq!(LedgerValue::U32(2).variant_tag().unwrap(), VariantTag::Code(2));
        assert_eq!(LedgerValue::symbol("Active").variant_tag().unwrap(), VariantTag::Name("Active"));
        assert_eq!(LedgerValue::string("Active").variant_tag().unwrap(), VariantTag::Name("Active"));
        assert_eq!(
            LedgerValue::vec([LedgerValue::symbol("Active")])
                .variant_tag()
                .unwrap(),
            VariantTag::Name("Active")
        );
        assert!(LedgerValue::Void.variant_tag().is_err());
    }

    #[test]
    fn map_lookup_preserves_order() {
        let map = LedgerValue::map([
            ("second", LedgerValue::u32(2)),
            ("first", LedgerValue::u32(1)),
        ]);
        let entries = map.as_entries().unwrap();
        assert_eq!(entries[0].0, "second");
        assert_eq!(map.get("first"), Some(&LedgerValue::u32(1)));
        assert_eq!(map.get("absent"), None);
    }
}
