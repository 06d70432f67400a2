//! Session configuration.

use xa_core::map::DEFAULT_MAP;

/// Configuration for a session: lobby capacity and game setup.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Maximum number of connected players.
    pub max_players: usize,
    /// RNG seed for deterministic games.
    pub seed: u64,
    /// Manhattan radius a shout carries.
    pub shout_radius: i32,
    /// Map in text form, parsed when a game starts.
    pub map: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: 8,
            seed: 42,
            shout_radius: 1,
            map: DEFAULT_MAP.to_string(),
        }
    }
}

impl GameConfig {
    /// Set the maximum number of connected players.
    pub fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = max;
        self
    }

    /// Set the RNG seed for deterministic games.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set how far a shout carries.
    pub fn with_shout_radius(mut self, radius: i32) -> Self {
        self.shout_radius = radius;
        self
    }

    /// Use a custom map.
    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = map.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = GameConfig::default();
        assert_eq!(config.max_players, 8);
        assert_eq!(config.seed, 42);
        assert_eq!(config.shout_radius, 1);
        assert_eq!(config.map, DEFAULT_MAP);
    }

    #[test]
    fn config_builder_chain() {
        let config = GameConfig::default()
            .with_max_players(3)
            .with_seed(123)
            .with_shout_radius(2)
            .with_map("1 1\n_\n");
        assert_eq!(config.max_players, 3);
        assert_eq!(config.seed, 123);
        assert_eq!(config.shout_radius, 2);
        assert_eq!(config.map, "1 1\n_\n");
    }
}
