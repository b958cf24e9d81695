// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Environment-based configuration management for production deployment

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for deployment-dependent behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// Maximum ingredient nesting depth for nutrient aggregation
    pub max_recipe_depth: usize,
    /// Cross-validate recipe flags against actual row presence
    pub strict_integrity: bool,
    /// Deployment environment
    pub environment: Environment,
    /// Base log level
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8081,
            database: DatabaseConfig {
                url: "sqlite:./data/remy.db".to_owned(),
            },
            max_recipe_depth: crate::nutrition::aggregator::DEFAULT_MAX_DEPTH,
            strict_integrity: false,
            environment: Environment::Development,
            log_level: LogLevel::Info,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a development-friendly default; nothing is
    /// required to boot a local server.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a variable is present but cannot be
    /// parsed (e.g. a non-numeric `HTTP_PORT`).
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            http_port: parse_env_or("HTTP_PORT", 8081_u16)?,
            database: DatabaseConfig {
                url: env_var_or("DATABASE_URL", "sqlite:./data/remy.db"),
            },
            max_recipe_depth: parse_env_or(
                "MAX_RECIPE_DEPTH",
                crate::nutrition::aggregator::DEFAULT_MAX_DEPTH,
            )?,
            strict_integrity: parse_env_or("STRICT_INTEGRITY", false)?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&env_var_or("RUST_LOG", "info")),
        })
    }

    /// One-line summary logged at startup
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} max_recipe_depth={} strict_integrity={} env={:?}",
            self.http_port,
            self.database.url,
            self.max_recipe_depth,
            self.strict_integrity,
            self.environment
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("Invalid value for {key}: {raw}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse_fallback() {
        assert_eq!(LogLevel::from_str_or_default("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("nonsense"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert!(Environment::from_str_or_default("production").is_production());
        assert!(!Environment::from_str_or_default("dev").is_production());
    }
}
