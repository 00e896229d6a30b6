use serde::Deserialize;

/// Engine tuning parameters loaded from environment variables
///
/// All fields have defaults, so an empty environment yields a working
/// configuration. Variables are prefixed with `RECO_`
/// (e.g. `RECO_NEIGHBORS_PER_SEED=50`).
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// How many ranked neighbors each seed contributes before interleaving.
    /// Sized so the union across three seeds comfortably exceeds a typical
    /// top_n; larger queries raise it per request.
    #[serde(default = "default_neighbors_per_seed")]
    pub neighbors_per_seed: usize,

    /// Minimum number of users who rated both items for an item-item
    /// similarity to count; pairs below this are statistically meaningless
    /// and are skipped.
    #[serde(default = "default_min_co_raters")]
    pub min_co_raters: usize,
}

fn default_neighbors_per_seed() -> usize {
    25
}

fn default_min_co_raters() -> usize {
    2
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neighbors_per_seed: default_neighbors_per_seed(),
            min_co_raters: default_min_co_raters(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("RECO_")
            .from_env::<EngineConfig>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.neighbors_per_seed, 25);
        assert_eq!(config.min_co_raters, 2);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.neighbors_per_seed, 25);
        assert_eq!(config.min_co_raters, 2);

        let config: EngineConfig =
            serde_json::from_str(r#"{"neighbors_per_seed": 50}"#).unwrap();
        assert_eq!(config.neighbors_per_seed, 50);
        assert_eq!(config.min_co_raters, 2);
    }
}
