//! Server configuration read from the environment

use std::str::FromStr;

use thiserror::Error;

use crate::analysis::AnalysisOptions;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8086;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{var} must be finite and positive, got {value}")]
    NotPositive { var: &'static str, value: f64 },
}

/// HTTP server settings plus the analysis options applied to every request
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub analysis: AnalysisOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            analysis: AnalysisOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Read `TRUSS_HOST`, `TRUSS_PORT`, `TRUSS_PIVOT_TOLERANCE` and `TRUSS_CONDITIONING_LIMIT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("TRUSS_HOST").unwrap_or(defaults.host);
        let port = parse(&lookup, "TRUSS_PORT")?.unwrap_or(defaults.port);

        let mut analysis = defaults.analysis;
        if let Some(tol) = parse_positive(&lookup, "TRUSS_PIVOT_TOLERANCE")? {
            analysis.pivot_tolerance = tol;
        }
        if let Some(limit) = parse_positive(&lookup, "TRUSS_CONDITIONING_LIMIT")? {
            analysis.conditioning_limit = limit;
        }

        Ok(Self {
            host,
            port,
            analysis,
        })
    }

    /// `host:port` string to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            match parsed {
                Ok(parsed) => Ok(Some(parsed)),
                Err(e) => Err(ConfigError::Invalid {
                    var,
                    reason: e.to_string(),
                    value,
                }),
            }
        }
    }
}

fn parse_positive<F>(lookup: &F, var: &'static str) -> Result<Option<f64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse::<F, f64>(lookup, var)? {
        Some(value) if !(value.is_finite() && value > 0.0) => {
            Err(ConfigError::NotPositive { var, value })
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8086");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("TRUSS_HOST", "127.0.0.1"),
            ("TRUSS_PORT", "9000"),
            ("TRUSS_PIVOT_TOLERANCE", "1e-12"),
            ("TRUSS_CONDITIONING_LIMIT", "1e6"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.analysis.pivot_tolerance, 1e-12);
        assert_eq!(config.analysis.conditioning_limit, 1e6);
    }

    #[test]
    fn test_invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[("TRUSS_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TRUSS_PORT", .. }));

        let err =
            ServerConfig::from_lookup(lookup(&[("TRUSS_PIVOT_TOLERANCE", "-1")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotPositive {
                var: "TRUSS_PIVOT_TOLERANCE",
                value: -1.0
            }
        );
    }
}
