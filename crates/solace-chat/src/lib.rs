// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation logic for the Solace chat service.
//!
//! [`ChatService`] implements the five chat actions on top of a
//! [`StorageAdapter`](solace_core::StorageAdapter) and a
//! [`ProviderAdapter`](solace_core::ProviderAdapter). Mode prompts live in
//! [`prompts`].

pub mod prompts;
pub mod service;

pub use prompts::system_prompt;
pub use service::{ChatService, GenerationSettings};
