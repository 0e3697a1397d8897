// Static asset registry: logical symbol -> per-chain denoms, deputy hot
// wallet addresses and the unit conversion factor. Loaded once, never
// mutated afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwapError};

// One swappable asset. `conversion_factor` is the integer multiplier from a
// foreign-chain amount to the home-chain denom's smallest units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub symbol: String,
    pub home_denom: String,
    pub foreign_denom: String,
    pub home_deputy: String,
    pub foreign_deputy: String,
    pub conversion_factor: u64,
}

#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    assets: BTreeMap<String, AssetInfo>,
}

impl AssetRegistry {
    pub fn new(assets: impl IntoIterator<Item = AssetInfo>) -> Self {
        AssetRegistry {
            assets: assets
                .into_iter()
                .map(|info| (info.symbol.clone(), info))
                .collect(),
        }
    }

    /// Parses a JSON array of asset entries.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let assets: Vec<AssetInfo> =
            serde_json::from_str(raw).map_err(|e| SwapError::Config(e.to_string()))?;
        Ok(Self::new(assets))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| SwapError::Config(e.to_string()))?;
        Self::from_json_str(&raw)
    }

    /// Looks up an asset by its logical symbol.
    pub fn resolve(&self, symbol: &str) -> Result<&AssetInfo> {
        self.assets
            .get(symbol)
            .ok_or_else(|| SwapError::UnsupportedAsset(symbol.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetInfo> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busd() -> AssetInfo {
        AssetInfo {
            symbol: "busd".to_string(),
            home_denom: "busd".to_string(),
            foreign_denom: "BUSD-BD1".to_string(),
            home_deputy: "home1hh4x3a4suu5zyaeauvmv7ypf7w9llwlf".to_string(),
            foreign_deputy: "fore10zq89008gmedc6rrwzdfukjk94swynd7".to_string(),
            conversion_factor: 100,
        }
    }

    #[test]
    fn resolve_known_symbol() {
        let registry = AssetRegistry::new([busd()]);
        let info = registry.resolve("busd").expect("busd is registered");
        assert_eq!(info.conversion_factor, 100);
        assert_eq!(info.foreign_denom, "BUSD-BD1");
    }

    #[test]
    fn resolve_unknown_symbol_fails() {
        let registry = AssetRegistry::new([busd()]);
        let err = registry.resolve("doesnotexist").unwrap_err();
        assert!(matches!(err, SwapError::UnsupportedAsset(s) if s == "doesnotexist"));
    }

    #[test]
    fn load_from_json() {
        let raw = serde_json::to_string(&vec![busd()]).unwrap();
        let registry = AssetRegistry::from_json_str(&raw).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("busd").unwrap(), &busd());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = AssetRegistry::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, SwapError::Config(_)));
    }
}
