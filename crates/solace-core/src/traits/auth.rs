// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait for identity verification.

use async_trait::async_trait;

use crate::error::SolaceError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AuthIdentity, AuthToken};

/// Adapter for verifying bearer tokens issued by the hosted auth service.
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Verifies the token and returns the caller's identity.
    ///
    /// Returns [`SolaceError::Unauthorized`] for any invalid token.
    async fn authenticate(&self, token: AuthToken) -> Result<AuthIdentity, SolaceError>;
}
