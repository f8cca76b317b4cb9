//! Descriptor tables for the `exp` namespace

use exp_rpc::formatters::{
    input_address, input_block_number, input_bool, input_call, input_default_block_number,
    input_hex, input_transaction, output_big_number, output_block, output_decimal,
    output_transaction, output_transaction_receipt,
};
use exp_rpc::{CallTarget, MethodDescriptor, PropertyDescriptor};

const BLOCK_CALL: CallTarget = CallTarget::ByBlockRef {
    by_hash: "exp_getBlockByHash",
    by_number: "exp_getBlockByNumber",
};

const UNCLE_CALL: CallTarget = CallTarget::ByBlockRef {
    by_hash: "exp_getUncleByBlockHashAndIndex",
    by_number: "exp_getUncleByBlockNumberAndIndex",
};

const TRANSACTION_FROM_BLOCK_CALL: CallTarget = CallTarget::ByBlockRef {
    by_hash: "exp_getTransactionByBlockHashAndIndex",
    by_number: "exp_getTransactionByBlockNumberAndIndex",
};

const BLOCK_TRANSACTION_COUNT_CALL: CallTarget = CallTarget::ByBlockRef {
    by_hash: "exp_getBlockTransactionCountByHash",
    by_number: "exp_getBlockTransactionCountByNumber",
};

const UNCLE_COUNT_CALL: CallTarget = CallTarget::ByBlockRef {
    by_hash: "exp_getUncleCountByBlockHash",
    by_number: "exp_getUncleCountByBlockNumber",
};

/// Method descriptors of the `exp` namespace
pub fn exp_methods() -> Vec<MethodDescriptor> {
    vec![
        // ==================== Account state ====================
        MethodDescriptor::new("getBalance", "exp_getBalance", 2)
            .input(input_address)
            .input(input_default_block_number)
            .output(output_big_number),
        MethodDescriptor::new("getStorageAt", "exp_getStorageAt", 3)
            .skip()
            .input(input_hex)
            .input(input_default_block_number),
        MethodDescriptor::new("getCode", "exp_getCode", 2)
            .input(input_address)
            .input(input_default_block_number),
        // ==================== Blocks ====================
        MethodDescriptor::new("getBlock", BLOCK_CALL, 2)
            .input(input_block_number)
            .input(input_bool)
            .output(output_block),
        MethodDescriptor::new("getUncle", UNCLE_CALL, 2)
            .input(input_block_number)
            .input(input_hex)
            .output(output_block),
        MethodDescriptor::new("getCompilers", "exp_getCompilers", 0),
        MethodDescriptor::new("getBlockTransactionCount", BLOCK_TRANSACTION_COUNT_CALL, 1)
            .input(input_block_number)
            .output(output_decimal),
        MethodDescriptor::new("getBlockUncleCount", UNCLE_COUNT_CALL, 1)
            .input(input_block_number)
            .output(output_decimal),
        // ==================== Transactions ====================
        MethodDescriptor::new("getTransaction", "exp_getTransactionByHash", 1)
            .output(output_transaction),
        MethodDescriptor::new("getTransactionFromBlock", TRANSACTION_FROM_BLOCK_CALL, 2)
            .input(input_block_number)
            .input(input_hex)
            .output(output_transaction),
        MethodDescriptor::new("getTransactionReceipt", "exp_getTransactionReceipt", 1)
            .output(output_transaction_receipt),
        MethodDescriptor::new("getTransactionCount", "exp_getTransactionCount", 2)
            .skip()
            .input(input_default_block_number)
            .output(output_decimal),
        MethodDescriptor::new("call", "exp_call", 2)
            .input(input_call)
            .input(input_default_block_number),
        MethodDescriptor::new("estimateGas", "exp_estimateGas", 1)
            .input(input_call)
            .output(output_decimal),
        MethodDescriptor::new("sendRawTransaction", "exp_sendRawTransaction", 1).skip(),
        MethodDescriptor::new("sendTransaction", "exp_sendTransaction", 1)
            .input(input_transaction),
        // ==================== Compilers ====================
        MethodDescriptor::new("compile.solidity", "exp_compileSolidity", 1),
        MethodDescriptor::new("compile.lll", "exp_compileLLL", 1),
        MethodDescriptor::new("compile.serpent", "exp_compileSerpent", 1),
        // ==================== Mining ====================
        MethodDescriptor::new("submitWork", "exp_submitWork", 3),
        MethodDescriptor::new("getWork", "exp_getWork", 0),
    ]
}

/// Property descriptors of the `exp` namespace, all live
pub fn exp_properties() -> Vec<PropertyDescriptor> {
    vec![
        PropertyDescriptor::new("coinbase", "exp_coinbase"),
        PropertyDescriptor::new("mining", "exp_mining"),
        PropertyDescriptor::new("hashrate", "exp_hashrate").output(output_decimal),
        PropertyDescriptor::new("gasPrice", "exp_gasPrice").output(output_big_number),
        PropertyDescriptor::new("accounts", "exp_accounts"),
        PropertyDescriptor::new("blockNumber", "exp_blockNumber").output(output_decimal),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_descriptors_validate() {
        for method in exp_methods() {
            assert!(method.validate().is_ok(), "{:?}", method);
        }
        for property in exp_properties() {
            assert!(property.validate().is_ok(), "{:?}", property);
        }
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(exp_methods().len(), 21);
        assert_eq!(exp_properties().len(), 6);
    }

    #[test]
    fn test_block_addressed_targets() {
        let methods = exp_methods();
        let find = |name: &str| methods.iter().find(|m| m.name == name).unwrap().call;

        let hash = [json!("0xabc"), json!(0)];
        let number = [json!(7), json!(0)];
        assert_eq!(find("getUncle").resolve(&hash), "exp_getUncleByBlockHashAndIndex");
        assert_eq!(find("getUncle").resolve(&number), "exp_getUncleByBlockNumberAndIndex");
        assert_eq!(
            find("getBlockUncleCount").resolve(&number[..1]),
            "exp_getUncleCountByBlockNumber"
        );
        assert_eq!(
            find("getTransactionFromBlock").resolve(&hash),
            "exp_getTransactionByBlockHashAndIndex"
        );
    }
}
