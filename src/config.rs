use std::env;
use std::time::Duration;
use anyhow::{Context, Result};

/// Database used when neither the URI nor `MONGODB_DATABASE` names one.
pub const DEFAULT_DATABASE: &str = "test";

#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_uri: String,
    pub mongodb_database: Option<String>,
    pub server_selection_timeout: Duration,
    pub connect_timeout: Duration,
    pub environment: String,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mongodb_uri = env::var("MONGODB_URI")
            .context("MONGODB_URI environment variable is required")?;

        let mongodb_database = env::var("MONGODB_DATABASE")
            .ok()
            .filter(|name| !name.is_empty());

        let server_selection_timeout = millis_from_env("MONGODB_SERVER_SELECTION_TIMEOUT_MS", 5000)?;
        let connect_timeout = millis_from_env("MONGODB_CONNECT_TIMEOUT_MS", 5000)?;

        let environment = env::var("APP_ENV")
            .unwrap_or_else(|_| "production".to_string());

        let service_port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            mongodb_uri,
            mongodb_database,
            server_selection_timeout,
            connect_timeout,
            environment,
            service_port,
            service_host,
        })
    }

    /// Development mode exposes panic details in 500 responses.
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Environment: {}", self.environment);
        tracing::info!("  MongoDB database: {}",
            self.mongodb_database.as_deref().unwrap_or("(from URI, else default)"));
        tracing::info!("  MongoDB server selection timeout: {:?}", self.server_selection_timeout);
        tracing::info!("  MongoDB connect timeout: {:?}", self.connect_timeout);
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

fn millis_from_env(name: &str, default: u64) -> Result<Duration> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_millis)
            .with_context(|| format!("{} must be a number of milliseconds", name)),
        Err(_) => Ok(Duration::from_millis(default)),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        mongodb_uri: "mongodb://localhost:27017".to_string(),
        mongodb_database: Some("items-api-test".to_string()),
        server_selection_timeout: Duration::from_millis(5000),
        connect_timeout: Duration::from_millis(5000),
        environment: "test".to_string(),
        service_port: 3000,
        service_host: "0.0.0.0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Tests in this module mutate process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env_vars() {
        unsafe {
            env::remove_var("MONGODB_URI");
            env::remove_var("MONGODB_DATABASE");
            env::remove_var("MONGODB_SERVER_SELECTION_TIMEOUT_MS");
            env::remove_var("MONGODB_CONNECT_TIMEOUT_MS");
            env::remove_var("APP_ENV");
            env::remove_var("PORT");
            env::remove_var("HOST");
        }
    }

    fn set_required_vars() {
        unsafe {
            env::set_var("MONGODB_URI", "mongodb://localhost:27017/items");
        }
    }

    #[test]
    fn test_config_with_all_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        set_required_vars();
        unsafe {
            env::set_var("MONGODB_DATABASE", "inventory");
            env::set_var("MONGODB_SERVER_SELECTION_TIMEOUT_MS", "1500");
            env::set_var("MONGODB_CONNECT_TIMEOUT_MS", "2500");
            env::set_var("APP_ENV", "development");
            env::set_var("PORT", "8080");
            env::set_var("HOST", "127.0.0.1");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017/items");
        assert_eq!(config.mongodb_database, Some("inventory".to_string()));
        assert_eq!(config.server_selection_timeout, Duration::from_millis(1500));
        assert_eq!(config.connect_timeout, Duration::from_millis(2500));
        assert!(config.is_development());
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
        clear_env_vars();
    }

    #[test]
    fn test_config_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        set_required_vars();

        let config = Config::from_env().unwrap();

        assert_eq!(config.mongodb_database, None);
        assert_eq!(config.server_selection_timeout, Duration::from_millis(5000));
        assert_eq!(config.connect_timeout, Duration::from_millis(5000));
        assert_eq!(config.environment, "production");
        assert!(!config.is_development());
        assert_eq!(config.service_port, 3000);
        assert_eq!(config.service_host, "0.0.0.0");
        clear_env_vars();
    }

    #[test]
    fn test_missing_required_var() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();

        let result = Config::from_env();
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("MONGODB_URI"));
    }

    #[test]
    fn test_invalid_port() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        set_required_vars();
        unsafe {
            env::set_var("PORT", "not-a-number");
        }

        let result = Config::from_env();
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("PORT"));
        clear_env_vars();
    }

    #[test]
    fn test_port_out_of_range() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        set_required_vars();
        unsafe {
            env::set_var("PORT", "99999");
        }

        let result = Config::from_env();
        assert!(result.is_err());
        clear_env_vars();
    }

    #[test]
    fn test_invalid_timeout() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        set_required_vars();
        unsafe {
            env::set_var("MONGODB_CONNECT_TIMEOUT_MS", "soon");
        }

        let error = Config::from_env().unwrap_err();
        assert!(error.to_string().contains("MONGODB_CONNECT_TIMEOUT_MS"));
        clear_env_vars();
    }
}
