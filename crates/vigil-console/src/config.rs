//! Console configuration

/// Configuration for the console
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Target width for rendered output
    pub width: usize,

    /// Seed the store with demo reports on startup
    pub seed_demo: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            width: 100,
            seed_demo: false,
        }
    }
}

impl ConsoleConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let width = std::env::var("VIGIL_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|w| *w > 0)
            .unwrap_or(100);

        let seed_demo = std::env::var("VIGIL_SEED_DEMO")
            .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self { width, seed_demo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.width, 100);
        assert!(!config.seed_demo);
    }
}
