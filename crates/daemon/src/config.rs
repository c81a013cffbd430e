//! Daemon configuration from environment variables

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use waitlist_api_rpc::server::DEFAULT_RPC_PORT;
use waitlist_core::application::constants::DEFAULT_DISPATCH_CAPACITY;
use waitlist_core::domain::DEFAULT_RESOURCE_NAME;

const DEFAULT_DB_PATH: &str = "~/.waitlist/waitlist.db";
const DEFAULT_MAIL_FROM: &str = "waitlist@localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Mail provider credentials; absent means notices are only logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub db_path: PathBuf,
    pub rpc_port: u16,
    pub log_format: LogFormat,
    pub resource_name: String,
    pub dispatch_capacity: usize,
    pub mail: Option<MailConfig>,
}

impl DaemonConfig {
    /// Read `WAITLIST_*` / `SENDGRID_API_KEY` from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = get("WAITLIST_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = PathBuf::from(shellexpand::tilde(&db_path).into_owned());

        let rpc_port = match get("WAITLIST_RPC_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("WAITLIST_RPC_PORT is not a port number: {}", raw))?,
            None => DEFAULT_RPC_PORT,
        };

        let log_format = match get("WAITLIST_LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let resource_name = get("WAITLIST_RESOURCE_NAME")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_RESOURCE_NAME.to_string());

        let dispatch_capacity = match get("WAITLIST_DISPATCH_CAPACITY") {
            Some(raw) => {
                let capacity: usize = raw.trim().parse().with_context(|| {
                    format!("WAITLIST_DISPATCH_CAPACITY is not a number: {}", raw)
                })?;
                if capacity == 0 {
                    bail!("WAITLIST_DISPATCH_CAPACITY must be at least 1");
                }
                capacity
            }
            None => DEFAULT_DISPATCH_CAPACITY,
        };

        let mail = get("SENDGRID_API_KEY").map(|api_key| MailConfig {
            api_key: api_key.trim().to_string(),
            from: get("WAITLIST_MAIL_FROM")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
        });

        Ok(Self {
            db_path,
            rpc_port,
            log_format,
            resource_name,
            dispatch_capacity,
            mail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<DaemonConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.rpc_port, DEFAULT_RPC_PORT);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.resource_name, "RDA Toolkit");
        assert_eq!(config.dispatch_capacity, DEFAULT_DISPATCH_CAPACITY);
        assert!(config.mail.is_none());
        assert!(config.db_path.ends_with(".waitlist/waitlist.db"));
        assert!(!config.db_path.starts_with("~"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("WAITLIST_DB_PATH", "/tmp/w.db"),
            ("WAITLIST_RPC_PORT", "9999"),
            ("WAITLIST_LOG_FORMAT", "json"),
            ("WAITLIST_RESOURCE_NAME", " Microfilm Reader "),
            ("WAITLIST_DISPATCH_CAPACITY", "8"),
            ("SENDGRID_API_KEY", "SG.key"),
            ("WAITLIST_MAIL_FROM", "desk@library.org"),
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/w.db"));
        assert_eq!(config.rpc_port, 9999);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.resource_name, "Microfilm Reader");
        assert_eq!(config.dispatch_capacity, 8);
        assert_eq!(
            config.mail,
            Some(MailConfig {
                api_key: "SG.key".to_string(),
                from: "desk@library.org".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_api_key_means_log_only() {
        let config = config_from(&[("SENDGRID_API_KEY", "   ")]).unwrap();
        assert!(config.mail.is_none());
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(config_from(&[("WAITLIST_RPC_PORT", "http")]).is_err());
        assert!(config_from(&[("WAITLIST_RPC_PORT", "70000")]).is_err());
        assert!(config_from(&[("WAITLIST_DISPATCH_CAPACITY", "0")]).is_err());
    }
}
