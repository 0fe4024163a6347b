//! Turn raw revert data into a readable reason.
//!
//! Three payload kinds are understood:
//! - `Error(string)`, selector `0x08c379a0`, from `require(cond, "msg")`
//! - `Panic(uint256)`, selector `0x4e487b71`, from compiler-inserted checks
//! - custom errors declared in the caller's ABI

use alloy_core::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt};
use alloy_json_abi::JsonAbi;

use crate::normalizer::normalize;

/// The 4-byte selector for `Error(string)`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// The 4-byte selector for `Panic(uint256)`.
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Best-effort reason for `data`.
///
/// Returns `None` for empty data and for `Error("")`, so the caller can
/// report a reverted call without a reason.
pub fn decode_revert_reason(data: &[u8], abi: &JsonAbi) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    if let Some(msg) = decode_error_string(data) {
        return (!msg.is_empty()).then_some(msg);
    }
    if let Some((code, meaning)) = decode_panic(data) {
        return Some(format!("panic 0x{code:02x}: {meaning}"));
    }
    if let Some(custom) = decode_custom_error(data, abi) {
        return Some(custom);
    }
    Some(format!("unrecognized custom error 0x{}", hex::encode(&data[..4])))
}

/// Try to decode the revert data as an `Error(string)` payload.
pub fn decode_error_string(data: &[u8]) -> Option<String> {
    let payload = data.strip_prefix(&ERROR_STRING_SELECTOR)?;
    match DynSolType::String.abi_decode(payload) {
        Ok(DynSolValue::String(s)) => Some(s),
        _ => None,
    }
}

/// Decode `Panic(uint256)` revert data into `(code, meaning)`.
pub fn decode_panic(data: &[u8]) -> Option<(u64, &'static str)> {
    let payload = data.strip_prefix(&PANIC_SELECTOR)?;
    match DynSolType::Uint(256).abi_decode(payload) {
        Ok(DynSolValue::Uint(v, _)) => {
            let code = u64::try_from(v).unwrap_or(u64::MAX);
            Some((code, panic_meaning(code)))
        }
        _ => None,
    }
}

/// Map a Solidity panic code to a human-readable description.
pub fn panic_meaning(code: u64) -> &'static str {
    match code {
        0x00 => "generic compiler-inserted panic",
        0x01 => "assert() called with false condition",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x21 => "invalid enum value",
        0x22 => "corrupted storage byte array",
        0x31 => ".pop() on empty array",
        0x32 => "out-of-bounds array access",
        0x41 => "too much memory allocated (out of memory)",
        0x51 => "called zero-initialized internal function pointer",
        _ => "unknown panic code",
    }
}

/// Match the selector against the ABI's `error` fragments and render
/// `Name(arg=value, ...)`.
fn decode_custom_error(data: &[u8], abi: &JsonAbi) -> Option<String> {
    let selector = &data[..4];
    let error = abi.errors().find(|e| e.selector().as_slice() == selector)?;
    let values = error.abi_decode_input(&data[4..], true).ok()?;

    let args: Vec<String> = error
        .inputs
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (param, value))| {
            let rendered = normalize(value, &param.components);
            if param.name.is_empty() {
                format!("{i}={rendered}")
            } else {
                format!("{}={rendered}", param.name)
            }
        })
        .collect();
    Some(format!("{}({})", error.name, args.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    /// `require(false, "Not enough tokens to transfer")`
    const REVERT_HEX: &str = "08c379a00000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000001e4e6f7420656e6f75676820746f6b656e7320746f207472616e73666572000000";

    const PANIC_OVERFLOW_HEX: &str =
        "4e487b710000000000000000000000000000000000000000000000000000000000000011";

    fn abi_with_errors() -> JsonAbi {
        JsonAbi::parse([
            "error InsufficientBalance(address account, uint256 needed)",
            "error Unauthorized()",
        ])
        .unwrap()
    }

    #[test]
    fn error_string() {
        let data = hex::decode(REVERT_HEX).unwrap();
        assert_eq!(
            decode_revert_reason(&data, &JsonAbi::new()).as_deref(),
            Some("Not enough tokens to transfer")
        );
    }

    #[test]
    fn empty_error_string_has_no_reason() {
        let data = hex::decode(
            "08c379a0\
             0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert_eq!(decode_error_string(&data).as_deref(), Some(""));
        assert_eq!(decode_revert_reason(&data, &JsonAbi::new()), None);
    }

    #[test]
    fn panic_overflow() {
        let data = hex::decode(PANIC_OVERFLOW_HEX).unwrap();
        let (code, meaning) = decode_panic(&data).unwrap();
        assert_eq!(code, 0x11);
        assert!(meaning.contains("overflow"));
        assert_eq!(
            decode_revert_reason(&data, &JsonAbi::new()).as_deref(),
            Some("panic 0x11: arithmetic overflow or underflow")
        );
    }

    #[test]
    fn panic_meaning_known_codes() {
        assert_eq!(panic_meaning(0x01), "assert() called with false condition");
        assert_eq!(panic_meaning(0x32), "out-of-bounds array access");
        assert_eq!(panic_meaning(0x99), "unknown panic code");
    }

    #[test]
    fn custom_error_from_abi() {
        let abi = abi_with_errors();
        let error = abi.error("InsufficientBalance").unwrap().first().unwrap();
        let account: Address = "0x294edbdadce4c435a093383eda82a5f2e22ca0c1".parse().unwrap();
        let mut data = error.selector().to_vec();
        data.extend(
            DynSolValue::Tuple(vec![DynSolValue::Address(account), DynSolValue::Uint(U256::from(100u8), 256)])
                .abi_encode_params(),
        );

        assert_eq!(
            decode_revert_reason(&data, &abi).as_deref(),
            Some("InsufficientBalance(account=0x294EdBDadcE4c435A093383EdA82a5f2E22CA0C1, needed=100)")
        );
    }

    #[test]
    fn custom_error_without_args() {
        let abi = abi_with_errors();
        let error = abi.error("Unauthorized").unwrap().first().unwrap();
        let data = error.selector().to_vec();
        assert_eq!(decode_revert_reason(&data, &abi).as_deref(), Some("Unauthorized()"));
    }

    #[test]
    fn unknown_selector_is_reported() {
        let data = hex::decode("deadbeef").unwrap();
        assert_eq!(
            decode_revert_reason(&data, &JsonAbi::new()).as_deref(),
            Some("unrecognized custom error 0xdeadbeef")
        );
    }

    #[test]
    fn short_data_has_no_reason() {
        assert_eq!(decode_revert_reason(&[], &JsonAbi::new()), None);
        assert_eq!(decode_revert_reason(&[0x08, 0xc3], &JsonAbi::new()), None);
    }
}
