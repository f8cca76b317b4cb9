//! Formatter library
//!
//! Pure conversions between application-level values and the protocol's
//! representation. Quantities are carried through [`exp_primitives::Quantity`]
//! so nothing wider than 53 bits is ever squeezed through a float.

mod input;
mod output;
mod utils;

pub use input::{
    input_address, input_block_number, input_bool, input_call, input_default_block_number,
    input_hex, input_transaction,
};
pub use output::{
    output_big_number, output_block, output_decimal, output_log, output_transaction,
    output_transaction_receipt,
};
pub use utils::{
    from_decimal, is_hex_prefixed, is_truthy, quantity_of, to_big_number, to_decimal, to_hex,
};
