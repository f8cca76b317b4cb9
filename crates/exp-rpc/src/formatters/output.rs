//! Output formatters: protocol values to application values

use serde_json::{Map, Value};

use crate::error::FormatError;

use super::utils::{to_big_number, to_decimal};

/// Quantity to a full-precision decimal string
pub fn output_big_number(value: Value) -> Result<Value, FormatError> {
    to_big_number(&value)
}

/// Quantity to a JSON integer
pub fn output_decimal(value: Value) -> Result<Value, FormatError> {
    to_decimal(&value)
}

/// Transaction object
pub fn output_transaction(value: Value) -> Result<Value, FormatError> {
    let mut tx = into_object(value, "transaction object")?;
    for key in ["blockNumber", "transactionIndex"] {
        convert_nullable(&mut tx, key, to_decimal)?;
    }
    convert(&mut tx, &["nonce", "gas"], to_decimal)?;
    convert(&mut tx, &["gasPrice", "value"], to_big_number)?;
    Ok(Value::Object(tx))
}

/// Log entry
pub fn output_log(value: Value) -> Result<Value, FormatError> {
    let mut log = into_object(value, "log object")?;
    for key in ["blockNumber", "transactionIndex", "logIndex"] {
        convert_nullable(&mut log, key, to_decimal)?;
    }
    Ok(Value::Object(log))
}

/// Transaction receipt, including its logs
pub fn output_transaction_receipt(value: Value) -> Result<Value, FormatError> {
    let mut receipt = into_object(value, "receipt object")?;
    convert(
        &mut receipt,
        &["blockNumber", "transactionIndex", "cumulativeGasUsed", "gasUsed"],
        to_decimal,
    )?;
    if let Some(logs) = receipt.remove("logs") {
        let logs = match logs {
            Value::Array(entries) => Value::Array(
                entries
                    .into_iter()
                    .map(output_log)
                    .collect::<Result<_, _>>()?,
            ),
            other => return Err(FormatError::unexpected("log array", &other)),
        };
        receipt.insert("logs".to_string(), logs);
    }
    Ok(Value::Object(receipt))
}

/// Block object; full transaction objects are formatted, hashes are kept
pub fn output_block(value: Value) -> Result<Value, FormatError> {
    let mut block = into_object(value, "block object")?;
    convert(&mut block, &["gasLimit", "gasUsed", "size", "timestamp"], to_decimal)?;
    convert_nullable(&mut block, "number", to_decimal)?;
    convert(&mut block, &["difficulty", "totalDifficulty"], to_big_number)?;

    if let Some(transactions) = block.remove("transactions") {
        let transactions = match transactions {
            Value::Array(entries) => Value::Array(
                entries
                    .into_iter()
                    .map(|tx| match tx {
                        Value::String(_) => Ok(tx),
                        other => output_transaction(other),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            other => return Err(FormatError::unexpected("transaction array", &other)),
        };
        block.insert("transactions".to_string(), transactions);
    }
    Ok(Value::Object(block))
}

fn into_object(value: Value, expected: &'static str) -> Result<Map<String, Value>, FormatError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(FormatError::unexpected(expected, &other)),
    }
}

/// Convert every listed field that is present
fn convert(
    object: &mut Map<String, Value>,
    keys: &[&str],
    f: fn(&Value) -> Result<Value, FormatError>,
) -> Result<(), FormatError> {
    for key in keys {
        if let Some(slot) = object.get_mut(*key) {
            *slot = f(slot)?;
        }
    }
    Ok(())
}

/// Convert a field unless it is present as null (e.g. pending blocks)
fn convert_nullable(
    object: &mut Map<String, Value>,
    key: &str,
    f: fn(&Value) -> Result<Value, FormatError>,
) -> Result<(), FormatError> {
    match object.get_mut(key) {
        Some(slot) if !slot.is_null() => {
            *slot = f(slot)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
