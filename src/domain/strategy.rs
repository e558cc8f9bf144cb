use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Strategy configuration, sent wholesale on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub risk_limits: BTreeMap<String, f64>,
}

const fn default_enabled() -> bool {
    true
}

impl StrategyConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            parameters: Map::new(),
            risk_limits: BTreeMap::new(),
        }
    }
}
