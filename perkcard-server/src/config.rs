//! Server configuration

use std::net::IpAddr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Code issuance requests per IP per minute
    pub issue_rate_limit: u32,
    /// Code confirmation requests per IP per minute
    pub confirm_rate_limit: u32,
    /// Reverse proxies whose `X-Forwarded-For` is believed
    /// (env: TRUSTED_PROXIES, comma separated)
    pub trusted_proxies: Vec<IpAddr>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_proxies(raw: &str) -> Result<Vec<IpAddr>, BoxError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<IpAddr>()
                    .map_err(|_| format!("TRUSTED_PROXIES: invalid address {s:?}").into())
            })
            .collect()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: Self::parse_or("HTTP_PORT", 8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            issue_rate_limit: Self::parse_or("ISSUE_RATE_LIMIT", 10),
            confirm_rate_limit: Self::parse_or("CONFIRM_RATE_LIMIT", 30),
            trusted_proxies: Self::parse_proxies(
                &std::env::var("TRUSTED_PROXIES").unwrap_or_default(),
            )?,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proxies() {
        assert!(Config::parse_proxies("").unwrap().is_empty());
        let proxies = Config::parse_proxies("10.0.0.1, ::1,").unwrap();
        let expected: Vec<IpAddr> = vec!["10.0.0.1".parse().unwrap(), "::1".parse().unwrap()];
        assert_eq!(proxies, expected);
        assert!(Config::parse_proxies("10.0.0.1,proxy.local").is_err());
    }
}
