//! # exp-primitives
//!
//! Primitive value types shared by the exp RPC client.
//!
//! Protocol quantities routinely exceed the range of a `u64`, so every
//! numeric conversion here goes through [`U256`] and never through floating
//! point.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod quantity;

pub use address::{Address, AddressError};
pub use quantity::{Quantity, QuantityError};

// Re-export primitive-types for U256
pub use primitive_types::U256;
