use std::path::PathBuf;

/// Environment variable naming the listings file.
pub const DATA_ENV_VAR: &str = "RENT_PANDA_DATA";

/// File loaded when neither a CLI argument nor the env var is given.
pub const DEFAULT_DATA_FILE: &str = "dados_apartamentos_limpos.csv";

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
}

impl AppConfig {
    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::args_os().nth(1).map(PathBuf::from),
            std::env::var_os(DATA_ENV_VAR).map(PathBuf::from),
        )
    }

    /// First CLI argument, then [`DATA_ENV_VAR`], then [`DEFAULT_DATA_FILE`].
    pub fn resolve(arg: Option<PathBuf>, env: Option<PathBuf>) -> Self {
        let data_path = arg
            .or(env)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        AppConfig { data_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_wins_over_environment() {
        let cfg = AppConfig::resolve(Some("a.csv".into()), Some("b.csv".into()));
        assert_eq!(cfg.data_path, PathBuf::from("a.csv"));
    }

    #[test]
    fn environment_then_default() {
        let cfg = AppConfig::resolve(None, Some("b.csv".into()));
        assert_eq!(cfg.data_path, PathBuf::from("b.csv"));

        let cfg = AppConfig::resolve(None, None);
        assert_eq!(cfg.data_path, PathBuf::from(DEFAULT_DATA_FILE));
    }
}
