use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str =
    "data/Sustainable Development Goal 08 - Decent Work and Economic Growth data.csv";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key";

/// Process configuration, read once from the environment at startup.
///
/// * `DATA_FILE` — path to the dataset CSV
/// * `HOST` / `PORT` — bind address
/// * `DEBUG` — `true` lowers the default log filter to debug
/// * `SECRET_KEY` — session/signing key surface; change in production
#[derive(Clone, Debug)]
pub struct Config {
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub secret_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            debug: false,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_file: env::var("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            debug: env::var("DEBUG")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.debug),
            secret_key: env::var("SECRET_KEY").unwrap_or(defaults.secret_key),
        }
    }

    /// Address string for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(!config.debug);
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn debug_flag_parses_case_insensitively() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(parse_bool(" TRUE "));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("1"));
    }
}
