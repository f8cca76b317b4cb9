//! Shared value types: default block parameter and client settings

use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use exp_primitives::{Address, Quantity};

use crate::error::FormatError;

/// Which point in the node's state history a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockParam {
    /// Latest mined block
    #[default]
    Latest,
    /// Genesis block
    Earliest,
    /// Pending state (includes pending transactions)
    Pending,
    /// Explicit block number
    Number(u64),
}

impl BlockParam {
    /// Whether `s` is one of the predefined tokens
    pub fn is_predefined(s: &str) -> bool {
        matches!(s, "latest" | "earliest" | "pending")
    }

    /// Protocol token (`latest`, `earliest`, `pending` or a hex number)
    pub fn to_token(&self) -> String {
        match self {
            BlockParam::Latest => "latest".to_string(),
            BlockParam::Earliest => "earliest".to_string(),
            BlockParam::Pending => "pending".to_string(),
            BlockParam::Number(n) => format!("0x{:x}", n),
        }
    }

    /// Protocol token as a JSON value
    pub fn to_value(&self) -> Value {
        Value::String(self.to_token())
    }
}

impl fmt::Display for BlockParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

impl FromStr for BlockParam {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockParam::Latest),
            "earliest" => Ok(BlockParam::Earliest),
            "pending" => Ok(BlockParam::Pending),
            other => {
                let quantity: Quantity = other.parse()?;
                quantity
                    .to_u64()
                    .map(BlockParam::Number)
                    .ok_or_else(|| FormatError::Overflow(other.to_string()))
            }
        }
    }
}

impl From<u64> for BlockParam {
    fn from(n: u64) -> Self {
        BlockParam::Number(n)
    }
}

impl Serialize for BlockParam {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_token())
    }
}

impl<'de> Deserialize<'de> for BlockParam {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Token(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(BlockParam::Number(n)),
            Raw::Token(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Per-call snapshot of the settings formatters may consult
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatContext {
    /// Substituted for an absent block argument
    pub default_block: BlockParam,
    /// Substituted for an absent `from` field
    pub default_account: Option<Address>,
}

/// Client-wide defaults shared by every binding of a namespace
///
/// These are local values: reading or writing them never touches the
/// network.
#[derive(Debug, Default)]
pub struct Settings {
    default_block: RwLock<BlockParam>,
    default_account: RwLock<Option<Address>>,
}

impl Settings {
    /// Create settings with explicit defaults
    pub fn new(default_block: BlockParam, default_account: Option<Address>) -> Self {
        Self {
            default_block: RwLock::new(default_block),
            default_account: RwLock::new(default_account),
        }
    }

    /// Current default block
    pub fn default_block(&self) -> BlockParam {
        *self.default_block.read()
    }

    /// Replace the default block
    pub fn set_default_block(&self, block: BlockParam) {
        *self.default_block.write() = block;
    }

    /// Current default account
    pub fn default_account(&self) -> Option<Address> {
        *self.default_account.read()
    }

    /// Replace the default account
    pub fn set_default_account(&self, account: Option<Address>) {
        *self.default_account.write() = account;
    }

    /// Snapshot for one call
    pub fn snapshot(&self) -> FormatContext {
        FormatContext {
            default_block: self.default_block(),
            default_account: self.default_account(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_param_tokens() {
        assert_eq!(BlockParam::Latest.to_token(), "latest");
        assert_eq!(BlockParam::Earliest.to_token(), "earliest");
        assert_eq!(BlockParam::Pending.to_token(), "pending");
        assert_eq!(BlockParam::Number(100).to_token(), "0x64");
        assert_eq!(BlockParam::default(), BlockParam::Latest);
    }

    #[test]
    fn test_block_param_parse() {
        assert_eq!("pending".parse::<BlockParam>().unwrap(), BlockParam::Pending);
        assert_eq!("0x64".parse::<BlockParam>().unwrap(), BlockParam::Number(100));
        assert_eq!("100".parse::<BlockParam>().unwrap(), BlockParam::Number(100));
        assert!("newest".parse::<BlockParam>().is_err());
        assert!("-1".parse::<BlockParam>().is_err());
    }

    #[test]
    fn test_block_param_serde() {
        assert_eq!(serde_json::to_value(BlockParam::Number(16)).unwrap(), json!("0x10"));
        let parsed: BlockParam = serde_json::from_value(json!("earliest")).unwrap();
        assert_eq!(parsed, BlockParam::Earliest);
        let parsed: BlockParam = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(parsed, BlockParam::Number(42));
    }

    #[test]
    fn test_settings_snapshot() {
        let settings = Settings::default();
        assert_eq!(settings.snapshot(), FormatContext::default());

        settings.set_default_block(BlockParam::Pending);
        settings.set_default_account(Some(Address::ZERO));
        let ctx = settings.snapshot();
        assert_eq!(ctx.default_block, BlockParam::Pending);
        assert_eq!(ctx.default_account, Some(Address::ZERO));
    }
}
