use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::ShelfError;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org/subjects/literature.json";
const DEFAULT_IMPORT_LIMIT: usize = 5;
const DEFAULT_IMPORT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the server and the catalog importer
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    /// Catalog endpoint without the `limit` query parameter
    pub catalog_url: Url,
    /// Batch size requested from the catalog
    pub import_limit: usize,
    /// Upper bound on the outbound catalog fetch
    pub import_timeout: Duration,
    pub import_policy: ImportPolicy,
}

/// When the catalog import runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Seed the shelf once before the server accepts requests;
    /// an import failure is fatal at startup.
    #[default]
    Startup,
    /// Re-import inside every list request; an import failure is
    /// surfaced to the caller as a gateway error.
    OnList,
}

impl Config {
    /// Build configuration from environment variables, falling back to
    /// defaults: `BIND_ADDR`, `PORT`, `CATALOG_URL`, `IMPORT_LIMIT`,
    /// `IMPORT_TIMEOUT_SECS`, `IMPORT_POLICY`.
    pub fn from_env() -> Result<Self, ShelfError> {
        let mut config = Self::default();

        if let Ok(addr) = env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Ok(raw) = env::var("CATALOG_URL") {
            config.catalog_url = Url::parse(&raw)?;
        }
        if let Some(limit) = env::var("IMPORT_LIMIT").ok().and_then(|v| v.parse().ok()) {
            config.import_limit = limit;
        }
        if let Some(secs) = env::var("IMPORT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.import_timeout = Duration::from_secs(secs);
        }
        if let Ok(raw) = env::var("IMPORT_POLICY") {
            config.import_policy = raw.parse()?;
        }

        Ok(config)
    }

    /// Full catalog endpoint with the batch limit applied
    pub fn catalog_endpoint(&self) -> Url {
        let mut url = self.catalog_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &self.import_limit.to_string());
        url
    }

    /// Socket address string for the HTTP listener
    pub fn bind_target(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            catalog_url: Url::parse(DEFAULT_CATALOG_URL).expect("default catalog URL parses"),
            import_limit: DEFAULT_IMPORT_LIMIT,
            import_timeout: Duration::from_secs(DEFAULT_IMPORT_TIMEOUT_SECS),
            import_policy: ImportPolicy::default(),
        }
    }
}

impl FromStr for ImportPolicy {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "startup" => Ok(Self::Startup),
            "on-list" | "onlist" => Ok(Self::OnList),
            _ => Err(ShelfError::InvalidConfig {
                name: "IMPORT_POLICY",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.bind_target(), "127.0.0.1:8000");
        assert_eq!(config.import_limit, 5);
        assert_eq!(config.import_timeout, Duration::from_secs(10));
        assert_eq!(config.import_policy, ImportPolicy::Startup);
    }

    #[test]
    fn test_catalog_endpoint_carries_limit() {
        let config = Config::default();
        let endpoint = config.catalog_endpoint();

        assert!(endpoint.as_str().starts_with(DEFAULT_CATALOG_URL));
        assert_eq!(endpoint.query(), Some("limit=5"));
    }

    #[test]
    fn test_import_policy_parse() {
        assert_eq!("startup".parse::<ImportPolicy>().unwrap(), ImportPolicy::Startup);
        assert_eq!("on-list".parse::<ImportPolicy>().unwrap(), ImportPolicy::OnList);
        assert_eq!("ON-LIST".parse::<ImportPolicy>().unwrap(), ImportPolicy::OnList);
        assert!("eager".parse::<ImportPolicy>().is_err());
    }
}
