//! Converts alloy-core `DynSolValue` → caller-facing `NormalizedValue`.
//!
//! Integers of every width become exact decimal strings, addresses are
//! EIP-55 checksummed and byte strings are lowercase `0x` hex. Tuples whose
//! components are all named (and unique) become records; anything else is a
//! positional sequence.

use std::fmt;

use alloy_core::dyn_abi::DynSolValue;
use alloy_json_abi::Param;
use serde_json::{Map, Value};

/// A decoded return value in its transport-neutral form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedValue {
    Bool(bool),
    /// Decimal string, signed or unsigned, never rounded.
    Integer(String),
    /// EIP-55 checksummed.
    Address(String),
    Bytes(Vec<u8>),
    Str(String),
    Sequence(Vec<NormalizedValue>),
    /// Named fields in declaration order.
    Record(Vec<(String, NormalizedValue)>),
}

impl NormalizedValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(s) | Self::Address(s) | Self::Str(s) => Value::String(s.clone()),
            Self::Bytes(b) => Value::String(format!("0x{}", hex::encode(b))),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Record(fields) => {
                let map: Map<String, Value> =
                    fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                Value::Object(map)
            }
        }
    }
}

impl From<NormalizedValue> for Value {
    fn from(v: NormalizedValue) -> Self {
        v.to_json()
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(s) | Self::Address(s) => f.write_str(s),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Record(fields) => {
                f.write_str("{")?;
                for (i, (name, item)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Convert a decoded value. `components` are the ABI components of the
/// parameter that produced it; they name tuple fields.
pub fn normalize(val: DynSolValue, components: &[Param]) -> NormalizedValue {
    match val {
        DynSolValue::Bool(b) => NormalizedValue::Bool(b),
        DynSolValue::Int(i, _) => NormalizedValue::Integer(i.to_string()),
        DynSolValue::Uint(u, _) => NormalizedValue::Integer(u.to_string()),
        DynSolValue::FixedBytes(word, size) => NormalizedValue::Bytes(word[..size].to_vec()),
        DynSolValue::Bytes(b) => NormalizedValue::Bytes(b),
        DynSolValue::String(s) => NormalizedValue::Str(s),
        DynSolValue::Address(a) => NormalizedValue::Address(a.to_checksum(None)),
        DynSolValue::Function(f) => NormalizedValue::Bytes(f.to_vec()),

        // Array elements share the parameter's components.
        DynSolValue::Array(vals) | DynSolValue::FixedArray(vals) => NormalizedValue::Sequence(
            vals.into_iter().map(|v| normalize(v, components)).collect(),
        ),

        DynSolValue::Tuple(fields) => group(fields, components),

        #[allow(unreachable_patterns)]
        other => NormalizedValue::Str(format!("{other:?}")),
    }
}

/// Shape a function's decoded outputs into the call result.
///
/// Zero outputs → empty sequence; one output → the value itself; several →
/// a record when every output is named, else a sequence.
pub fn normalize_outputs(values: Vec<DynSolValue>, outputs: &[Param]) -> NormalizedValue {
    if values.len() == 1 {
        let components = outputs.first().map(|p| p.components.as_slice()).unwrap_or(&[]);
        return values
            .into_iter()
            .next()
            .map(|v| normalize(v, components))
            .unwrap_or(NormalizedValue::Sequence(vec![]));
    }
    group(values, outputs)
}

fn group(values: Vec<DynSolValue>, params: &[Param]) -> NormalizedValue {
    let nested = |i: usize| params.get(i).map(|p| p.components.as_slice()).unwrap_or(&[]);

    if values.is_empty() || !names_are_usable(params, values.len()) {
        return NormalizedValue::Sequence(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| normalize(v, nested(i)))
                .collect(),
        );
    }

    NormalizedValue::Record(
        values
            .into_iter()
            .zip(params)
            .map(|(v, p)| (p.name.clone(), normalize(v, &p.components)))
            .collect(),
    )
}

fn names_are_usable(params: &[Param], len: usize) -> bool {
    if params.len() != len || params.iter().any(|p| p.name.is_empty()) {
        return false;
    }
    let mut names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    names.windows(2).all(|w| w[0] != w[1])
}
