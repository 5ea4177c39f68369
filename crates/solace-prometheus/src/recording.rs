// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade, so every helper is a no-op until a recorder
//! is installed.

use metrics::{describe_counter, describe_gauge, describe_histogram};

pub const REQUESTS_TOTAL: &str = "solace_requests_total";
pub const MESSAGES_TOTAL: &str = "solace_messages_total";
pub const RATE_LIMITED_TOTAL: &str = "solace_rate_limited_total";
pub const PROVIDER_LATENCY_SECONDS: &str = "solace_provider_latency_seconds";
pub const TOKENS_TOTAL: &str = "solace_tokens_total";
pub const MEMORY_HEAP_BYTES: &str = "solace_memory_heap_bytes";
pub const MEMORY_RESIDENT_BYTES: &str = "solace_memory_resident_bytes";

/// Register all Solace metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Chat API requests by action and status");
    describe_counter!(MESSAGES_TOTAL, "User messages answered, by mode");
    describe_counter!(
        RATE_LIMITED_TOTAL,
        "Messages rejected by the daily message limit"
    );
    describe_histogram!(
        PROVIDER_LATENCY_SECONDS,
        "Chat-completion call latency in seconds"
    );
    describe_counter!(TOKENS_TOTAL, "Tokens consumed, by model and type");
    describe_gauge!(MEMORY_HEAP_BYTES, "Allocated heap bytes (jemalloc)");
    describe_gauge!(MEMORY_RESIDENT_BYTES, "Resident bytes (jemalloc)");
}

/// Record a handled API request.
pub fn record_request(action: &str, status: u16) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "action" => action.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record an answered user message.
pub fn record_message(mode: &str) {
    metrics::counter!(MESSAGES_TOTAL, "mode" => mode.to_string()).increment(1);
}

/// Record a message refused by the daily limit.
pub fn record_rate_limited() {
    metrics::counter!(RATE_LIMITED_TOTAL).increment(1);
}

/// Record the latency of one provider call.
pub fn record_provider_latency(seconds: f64) {
    metrics::histogram!(PROVIDER_LATENCY_SECONDS).record(seconds);
}

/// Record token consumption.
pub fn record_tokens(model: &str, input: u32, output: u32) {
    metrics::counter!(TOKENS_TOTAL, "model" => model.to_string(), "type" => "input")
        .increment(u64::from(input));
    metrics::counter!(TOKENS_TOTAL, "model" => model.to_string(), "type" => "output")
        .increment(u64::from(output));
}

/// Set allocator heap usage.
pub fn set_memory_heap(bytes: f64) {
    metrics::gauge!(MEMORY_HEAP_BYTES).set(bytes);
}

/// Set allocator resident memory.
pub fn set_memory_resident(bytes: f64) {
    metrics::gauge!(MEMORY_RESIDENT_BYTES).set(bytes);
}
