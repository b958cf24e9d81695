// ABOUTME: Shared server resources handed to every route handler
// ABOUTME: Bundles the database handle and loaded configuration behind an Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Dependency container for route handlers.

use crate::config::ServerConfig;
use crate::database::Database;

/// Resources shared by all HTTP handlers
pub struct ServerResources {
    /// Database handle (cheap to clone; pool-backed)
    pub database: Database,
    /// Configuration loaded at startup
    pub config: ServerConfig,
}

impl ServerResources {
    /// Bundle the database and configuration
    #[must_use]
    pub const fn new(database: Database, config: ServerConfig) -> Self {
        Self { database, config }
    }
}
