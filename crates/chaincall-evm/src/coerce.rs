//! JSON argument → `DynSolValue` coercion.
//!
//! Each argument is converted against the ABI-declared input type. Tuple
//! components are threaded through so struct arguments can be given as
//! objects keyed by component name.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_dyn_abi::Specifier;
use alloy_json_abi::{Function, Param};
use alloy_primitives::{Address, Sign, B256, I256, U256};
use serde_json::{Number, Value};
use std::str::FromStr;

/// Largest integer a JSON number can carry without loss (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Convert positional JSON arguments for `func`.
///
/// Errors carry the parameter position and name, e.g.
/// `param 0 'account': invalid address "0x12"`.
pub fn coerce_args(func: &Function, args: &[Value]) -> Result<Vec<DynSolValue>, String> {
    if args.len() != func.inputs.len() {
        return Err(format!(
            "{} expects {} arguments, got {}",
            func.signature(),
            func.inputs.len(),
            args.len()
        ));
    }

    func.inputs
        .iter()
        .zip(args)
        .enumerate()
        .map(|(i, (param, arg))| {
            coerce_param(arg, param).map_err(|e| {
                if param.name.is_empty() {
                    format!("param {i}: {e}")
                } else {
                    format!("param {i} '{}': {e}", param.name)
                }
            })
        })
        .collect()
}

/// Convert one JSON value for an ABI parameter.
pub fn coerce_param(value: &Value, param: &Param) -> Result<DynSolValue, String> {
    let ty = param.resolve().map_err(|e| format!("unsupported type '{}': {e}", param.ty))?;
    coerce(value, &ty, &param.components)
}

/// Convert `value` to `expected`. `components` names the fields when
/// `expected` is (or contains) a tuple.
pub fn coerce(value: &Value, expected: &DynSolType, components: &[Param]) -> Result<DynSolValue, String> {
    match expected {
        DynSolType::Bool => match value {
            Value::Bool(b) => Ok(DynSolValue::Bool(*b)),
            Value::String(s) if s == "true" => Ok(DynSolValue::Bool(true)),
            Value::String(s) if s == "false" => Ok(DynSolValue::Bool(false)),
            other => Err(format!("expected bool, got {other}")),
        },

        DynSolType::Uint(bits) => {
            let u = parse_uint(value)?;
            if u.bit_len() > *bits {
                return Err(format!("value {u} out of range for uint{bits}"));
            }
            Ok(DynSolValue::Uint(u, *bits))
        }

        DynSolType::Int(bits) => {
            let i = parse_int(value, *bits)?;
            Ok(DynSolValue::Int(i, *bits))
        }

        DynSolType::Address => {
            let s = expect_str(value, "address")?;
            let addr = Address::from_str(s.trim()).map_err(|_| format!("invalid address {value}"))?;
            Ok(DynSolValue::Address(addr))
        }

        DynSolType::Bytes => Ok(DynSolValue::Bytes(parse_hex(value)?)),

        DynSolType::FixedBytes(n) => {
            let bytes = parse_hex(value)?;
            if bytes.len() != *n {
                return Err(format!("bytes{n} expects {n} bytes, got {}", bytes.len()));
            }
            let mut word = [0u8; 32];
            word[..*n].copy_from_slice(&bytes);
            Ok(DynSolValue::FixedBytes(B256::from(word), *n))
        }

        DynSolType::String => Ok(DynSolValue::String(expect_str(value, "string")?.to_string())),

        DynSolType::Array(inner) => {
            let items = expect_array(value)?;
            let vals = items
                .iter()
                .map(|v| coerce(v, inner, components))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DynSolValue::Array(vals))
        }

        DynSolType::FixedArray(inner, len) => {
            let items = expect_array(value)?;
            if items.len() != *len {
                return Err(format!("fixed array expects {len} elements, got {}", items.len()));
            }
            let vals = items
                .iter()
                .map(|v| coerce(v, inner, components))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DynSolValue::FixedArray(vals))
        }

        DynSolType::Tuple(types) => coerce_tuple(value, types, components),

        DynSolType::Function => Err("function-typed arguments are not supported".into()),

        #[allow(unreachable_patterns)]
        other => Err(format!("unsupported argument type {other:?}")),
    }
}

fn coerce_tuple(value: &Value, types: &[DynSolType], components: &[Param]) -> Result<DynSolValue, String> {
    let nested = |i: usize| components.get(i).map(|p| p.components.as_slice()).unwrap_or(&[]);

    let fields = match value {
        Value::Array(items) => {
            if items.len() != types.len() {
                return Err(format!("tuple expects {} fields, got {}", types.len(), items.len()));
            }
            items
                .iter()
                .zip(types)
                .enumerate()
                .map(|(i, (v, t))| coerce(v, t, nested(i)))
                .collect::<Result<Vec<_>, _>>()?
        }
        Value::Object(map) => {
            if components.len() != types.len() || components.iter().any(|p| p.name.is_empty()) {
                return Err("tuple has unnamed components; pass its fields as an array".into());
            }
            components
                .iter()
                .zip(types)
                .enumerate()
                .map(|(i, (p, t))| {
                    let v = map.get(&p.name).ok_or_else(|| format!("missing tuple field '{}'", p.name))?;
                    coerce(v, t, nested(i))
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        other => return Err(format!("expected tuple as array or object, got {other}")),
    };
    Ok(DynSolValue::Tuple(fields))
}

fn expect_str<'a>(value: &'a Value, what: &str) -> Result<&'a str, String> {
    value.as_str().ok_or_else(|| format!("expected {what} string, got {value}"))
}

fn expect_array(value: &Value) -> Result<&Vec<Value>, String> {
    value.as_array().ok_or_else(|| format!("expected array, got {value}"))
}

fn parse_hex(value: &Value) -> Result<Vec<u8>, String> {
    let s = expect_str(value, "hex")?.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| format!("hex data must start with 0x, got {value}"))?;
    hex::decode(digits).map_err(|e| format!("invalid hex data {value}: {e}"))
}

/// Split an integer literal into (negative, magnitude).
fn parse_magnitude(value: &Value) -> Result<(bool, U256), String> {
    match value {
        Value::Number(n) => number_magnitude(n),
        Value::String(s) => {
            let s = s.trim();
            let (negative, body) = match s.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, s),
            };
            let parsed = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
                Some(hex) => U256::from_str_radix(hex, 16),
                None => U256::from_str_radix(body, 10),
            };
            let magnitude = parsed.map_err(|_| format!("invalid integer {value}"))?;
            Ok((negative && !magnitude.is_zero(), magnitude))
        }
        other => Err(format!("expected integer, got {other}")),
    }
}

fn number_magnitude(n: &Number) -> Result<(bool, U256), String> {
    if let Some(u) = n.as_u64() {
        return Ok((false, U256::from(u)));
    }
    if let Some(i) = n.as_i64() {
        return Ok((i < 0, U256::from(i.unsigned_abs())));
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.fract() != 0.0 || !f.is_finite() {
        return Err(format!("{n} is not an integer"));
    }
    if f.abs() > MAX_SAFE_INTEGER {
        return Err(format!("{n} exceeds the safe JSON integer range; pass it as a string"));
    }
    Ok((f < 0.0, U256::from(f.abs() as u64)))
}

fn parse_uint(value: &Value) -> Result<U256, String> {
    match parse_magnitude(value)? {
        (true, _) => Err(format!("negative value {value} for unsigned integer")),
        (false, u) => Ok(u),
    }
}

fn parse_int(value: &Value, bits: usize) -> Result<I256, String> {
    let (negative, magnitude) = parse_magnitude(value)?;
    // int<bits> holds [-2^(bits-1), 2^(bits-1) - 1]
    let bound = U256::from(1u8) << (bits - 1);
    let in_range = if negative { magnitude <= bound } else { magnitude < bound };
    if !in_range {
        return Err(format!("value {value} out of range for int{bits}"));
    }
    let sign = if negative { Sign::Negative } else { Sign::Positive };
    I256::checked_from_sign_and_abs(sign, magnitude)
        .ok_or_else(|| format!("value {value} out of range for int{bits}"))
}
