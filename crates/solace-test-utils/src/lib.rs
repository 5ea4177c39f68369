// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Solace integration tests.
//!
//! Provides a mock provider and a test harness for fast, deterministic,
//! CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock LLM provider with pre-configured replies
//! - [`TestHarness`] - Temp storage, chat service, token minting and router

pub mod harness;
pub mod mock_provider;

pub use harness::{TEST_JWT_SECRET, TestHarness};
pub use mock_provider::MockProvider;
