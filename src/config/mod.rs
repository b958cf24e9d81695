// ABOUTME: Configuration module organization for environment-driven settings
// ABOUTME: Deployment configuration comes from environment variables only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Configuration management.

/// Environment-based server configuration
pub mod environment;

pub use environment::{Environment, LogLevel, ServerConfig};
