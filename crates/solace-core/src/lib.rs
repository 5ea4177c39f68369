// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Solace chat service.
//!
//! This crate provides the trait definitions, error type, and domain types
//! shared by every other crate in the workspace. Storage, provider, and auth
//! implementations all plug in through the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SolaceError;
pub use types::{
    AdapterType, AuthIdentity, AuthToken, DailyQuota, HealthStatus, Message, Mode, Role, Session,
    TokenUsage,
};

// Re-export all adapter traits at crate root.
pub use traits::{AuthAdapter, PluginAdapter, ProviderAdapter, StorageAdapter};
