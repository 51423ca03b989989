use serde::{Deserialize, Serialize};

/// The subset of protocol constants the operation pool and its callers depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ChainSpec {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slots_per_epoch: u64,
}

impl ChainSpec {
    /// Returns a `ChainSpec` compatible with the Ethereum Foundation mainnet.
    pub fn mainnet() -> Self {
        Self {
            slots_per_epoch: 32,
        }
    }
}

impl Default for ChainSpec {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_style_keys() {
        let json = serde_json::to_value(ChainSpec::mainnet()).unwrap();
        assert_eq!(json["SLOTS_PER_EPOCH"], "32");
    }

    #[test]
    fn parse_spec() {
        let spec: ChainSpec = serde_json::from_str(r#"{"SLOTS_PER_EPOCH":"32"}"#).unwrap();
        assert_eq!(spec, ChainSpec::mainnet());
    }
}
