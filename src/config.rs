use std::{env, net::SocketAddr};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub bind_addr: String,
    pub bind_port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MEASURE_API_TOKEN is required and must not be empty")]
    MissingApiToken,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = env::var("MEASURE_API_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingApiToken)?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let bind_port = env::var("BIND_PORT")
            .ok()
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);

        let config = Self {
            api_token,
            bind_addr,
            bind_port,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Tests mutate process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn reset_env() {
        env::remove_var("MEASURE_API_TOKEN");
        env::remove_var("BIND_ADDR");
        env::remove_var("BIND_PORT");
    }

    #[test]
    fn parse_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        reset_env();
        env::set_var("MEASURE_API_TOKEN", "  abc  ");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.api_token, "abc");
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
    }

    #[test]
    fn missing_token_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        reset_env();

        let err = Config::from_env().expect_err("expected missing token error");
        assert!(matches!(err, ConfigError::MissingApiToken));
    }

    #[test]
    fn blank_token_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        reset_env();
        env::set_var("MEASURE_API_TOKEN", "   ");

        let err = Config::from_env().expect_err("expected missing token error");
        assert!(matches!(err, ConfigError::MissingApiToken));
    }

    #[test]
    fn invalid_port_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        reset_env();
        env::set_var("MEASURE_API_TOKEN", "abc");
        env::set_var("BIND_PORT", "99999");

        let err = Config::from_env().expect_err("expected invalid port error");
        assert!(matches!(err, ConfigError::InvalidPort));
    }

    #[test]
    fn invalid_bind_addr_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        reset_env();
        env::set_var("MEASURE_API_TOKEN", "abc");
        env::set_var("BIND_ADDR", "not an address");

        let err = Config::from_env().expect_err("expected invalid socket error");
        assert!(matches!(err, ConfigError::InvalidSocket));
    }

    #[test]
    fn custom_bind_parses() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        reset_env();
        env::set_var("MEASURE_API_TOKEN", "abc");
        env::set_var("BIND_ADDR", "0.0.0.0");
        env::set_var("BIND_PORT", "9000");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(
            config.bind_socket().expect("valid socket"),
            "0.0.0.0:9000".parse::<SocketAddr>().expect("socket literal")
        );
    }
}
