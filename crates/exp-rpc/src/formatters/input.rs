//! Input formatters: application values to protocol values
//!
//! Each formatter receives the raw argument and a per-call [`FormatContext`].

use serde_json::{Map, Value};

use exp_primitives::Address;

use crate::error::FormatError;
use crate::types::{BlockParam, FormatContext};

use super::utils::{from_decimal, is_truthy, to_hex};

/// Fields of a call/transaction object that carry quantities
const QUANTITY_FIELDS: [&str; 4] = ["gasPrice", "gas", "value", "nonce"];

/// Normalize an address to its lowercase `0x`-prefixed form
pub fn input_address(value: &Value, _ctx: &FormatContext) -> Result<Value, FormatError> {
    match value {
        Value::String(s) => Ok(Value::String(Address::from_hex(s)?.to_hex())),
        other => Err(FormatError::unexpected("address string", other)),
    }
}

/// Block number or predefined token; null passes through
pub fn input_block_number(value: &Value, _ctx: &FormatContext) -> Result<Value, FormatError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) if BlockParam::is_predefined(s) => Ok(value.clone()),
        other => to_hex(other),
    }
}

/// Like [`input_block_number`], but null becomes the context's default block
pub fn input_default_block_number(
    value: &Value,
    ctx: &FormatContext,
) -> Result<Value, FormatError> {
    match value {
        Value::Null => Ok(ctx.default_block.to_value()),
        other => input_block_number(other, ctx),
    }
}

/// Coerce to a boolean flag
pub fn input_bool(value: &Value, _ctx: &FormatContext) -> Result<Value, FormatError> {
    Ok(Value::Bool(is_truthy(value)))
}

/// Hex-encode any supported value
pub fn input_hex(value: &Value, _ctx: &FormatContext) -> Result<Value, FormatError> {
    to_hex(value)
}

/// Call object for `call` and `estimateGas`; `from` is optional
pub fn input_call(value: &Value, ctx: &FormatContext) -> Result<Value, FormatError> {
    let options = normalize_options(value, ctx)?;
    Ok(Value::Object(options))
}

/// Transaction object for `sendTransaction`; `from` is mandatory
pub fn input_transaction(value: &Value, ctx: &FormatContext) -> Result<Value, FormatError> {
    let options = normalize_options(value, ctx)?;
    if !options.contains_key("from") {
        return Err(FormatError::MissingField("from"));
    }
    Ok(Value::Object(options))
}

fn normalize_options(value: &Value, ctx: &FormatContext) -> Result<Map<String, Value>, FormatError> {
    let mut options = match value {
        Value::Object(map) => map.clone(),
        other => return Err(FormatError::unexpected("call object", other)),
    };

    // legacy spelling; a truthy `code` replaces `data`
    if options.get("code").map_or(false, is_truthy) {
        if let Some(code) = options.remove("code") {
            options.insert("data".to_string(), code);
        }
    }

    let from = options
        .get("from")
        .filter(|v| is_truthy(v))
        .cloned()
        .or_else(|| ctx.default_account.map(|a| Value::String(a.to_hex())));
    match from {
        Some(from) => {
            options.insert("from".to_string(), input_address(&from, ctx)?);
        }
        None => {
            options.remove("from");
        }
    }

    if let Some(to) = options.get("to").filter(|v| is_truthy(v)).cloned() {
        options.insert("to".to_string(), input_address(&to, ctx)?);
    }

    for key in QUANTITY_FIELDS {
        if let Some(raw) = options.get(key).filter(|v| !v.is_null()).cloned() {
            options.insert(key.to_string(), from_decimal(&raw)?);
        }
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDR: &str = "0x407d73d8a49eeb85d32cf465507dd71d507100c1";

    #[test]
    fn test_address_forms() {
        let ctx = FormatContext::default();
        assert_eq!(input_address(&json!(ADDR), &ctx).unwrap(), json!(ADDR));
        assert_eq!(
            input_address(&json!("407D73D8A49EEB85D32CF465507DD71D507100C1"), &ctx).unwrap(),
            json!(ADDR)
        );
        assert!(matches!(
            input_address(&json!("0x123"), &ctx),
            Err(FormatError::InvalidAddress(_))
        ));
        assert!(matches!(
            input_address(&json!(42), &ctx),
            Err(FormatError::UnexpectedType { .. })
        ));
    }

    #[test]
    fn test_block_number() {
        let ctx = FormatContext::default();
        assert_eq!(input_block_number(&json!("pending"), &ctx).unwrap(), json!("pending"));
        assert_eq!(input_block_number(&json!(5), &ctx).unwrap(), json!("0x5"));
        assert_eq!(input_block_number(&json!("0xabc"), &ctx).unwrap(), json!("0xabc"));
        assert_eq!(input_block_number(&Value::Null, &ctx).unwrap(), Value::Null);
    }

    #[test]
    fn test_default_block_number_uses_context() {
        let mut ctx = FormatContext::default();
        assert_eq!(
            input_default_block_number(&Value::Null, &ctx).unwrap(),
            json!("latest")
        );
        ctx.default_block = BlockParam::Number(16);
        assert_eq!(
            input_default_block_number(&Value::Null, &ctx).unwrap(),
            json!("0x10")
        );
        assert_eq!(
            input_default_block_number(&json!("earliest"), &ctx).unwrap(),
            json!("earliest")
        );
        assert_eq!(input_default_block_number(&json!(1), &ctx).unwrap(), json!("0x1"));
    }

    #[test]
    fn test_bool_coercion() {
        let ctx = FormatContext::default();
        assert_eq!(input_bool(&json!(1), &ctx).unwrap(), json!(true));
        assert_eq!(input_bool(&Value::Null, &ctx).unwrap(), json!(false));
    }

    #[test]
    fn test_call_object() {
        let ctx = FormatContext::default();
        let formatted = input_call(
            &json!({
                "to": "407D73D8A49EEB85D32CF465507DD71D507100C1",
                "gas": 21000,
                "gasPrice": "1000000000",
                "value": "0x10",
                "code": "0x6060",
            }),
            &ctx,
        )
        .unwrap();
        assert_eq!(
            formatted,
            json!({
                "to": ADDR,
                "gas": "0x5208",
                "gasPrice": "0x3b9aca00",
                "value": "0x10",
                "data": "0x6060",
            })
        );
    }

    #[test]
    fn test_call_object_fills_default_account() {
        let ctx = FormatContext {
            default_account: Some(Address::from_hex(ADDR).unwrap()),
            ..Default::default()
        };
        let formatted = input_call(&json!({"data": "0x"}), &ctx).unwrap();
        assert_eq!(formatted["from"], json!(ADDR));
    }

    #[test]
    fn test_code_overrides_data() {
        let ctx = FormatContext::default();
        let formatted = input_call(&json!({"data": "0x01", "code": "0x02"}), &ctx).unwrap();
        assert_eq!(formatted, json!({"data": "0x02"}));
    }

    #[test]
    fn test_empty_code_is_left_alone() {
        let ctx = FormatContext::default();
        let formatted = input_call(&json!({"data": "0x01", "code": ""}), &ctx).unwrap();
        assert_eq!(formatted, json!({"data": "0x01", "code": ""}));
    }

    #[test]
    fn test_transaction_requires_from() {
        let ctx = FormatContext::default();
        assert_eq!(
            input_transaction(&json!({"to": ADDR}), &ctx),
            Err(FormatError::MissingField("from"))
        );
        let formatted = input_transaction(&json!({"from": ADDR, "nonce": 3}), &ctx).unwrap();
        assert_eq!(formatted, json!({"from": ADDR, "nonce": "0x3"}));
    }

    #[test]
    fn test_call_object_rejects_non_objects() {
        let ctx = FormatContext::default();
        assert!(input_call(&json!("0x"), &ctx).is_err());
        assert!(input_call(&json!({"from": "nope"}), &ctx).is_err());
        assert!(input_call(&json!({"gas": 1.5}), &ctx).is_err());
    }
}
