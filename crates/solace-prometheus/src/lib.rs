// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics adapter for the Solace chat service.
//!
//! Uses the metrics-rs facade with the Prometheus exporter.
//! Metrics are rendered as Prometheus text format via the `render()` method,
//! which is exposed through the gateway's /metrics endpoint.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

use solace_core::SolaceError;
use solace_core::traits::adapter::PluginAdapter;
use solace_core::types::{AdapterType, HealthStatus};

pub use recording::{
    record_message, record_provider_latency, record_rate_limited, record_request, record_tokens,
    set_memory_heap, set_memory_resident,
};

/// Prometheus metrics adapter.
///
/// Holds the handle used to render the exposition text.
#[derive(Clone)]
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Installs the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process. Returns an error if a
    /// recorder is already installed.
    pub fn new() -> Result<Self, SolaceError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            SolaceError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();

        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// Builds a recorder without installing it, for scoped use in tests.
    pub fn unregistered() -> (Self, PrometheusRecorder) {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        (Self { handle }, recorder)
    }

    /// Get a reference to the Prometheus handle for rendering.
    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_metrics_render_with_labels() {
        let (adapter, recorder) = PrometheusAdapter::unregistered();
        metrics::with_local_recorder(&recorder, || {
            record_request("sendMessage", 200);
            record_request("sendMessage", 429);
            record_rate_limited();
            record_message("reflect");
            record_tokens("gpt-4o-mini", 12, 3);
        });

        let text = adapter.render();
        assert!(text.contains("solace_requests_total"), "got: {text}");
        assert!(text.contains("action=\"sendMessage\""), "got: {text}");
        assert!(text.contains("status=\"429\""), "got: {text}");
        assert!(text.contains("solace_rate_limited_total 1"), "got: {text}");
        assert!(text.contains("mode=\"reflect\""), "got: {text}");
        assert!(text.contains("type=\"output\""), "got: {text}");
    }

    #[tokio::test]
    async fn adapter_identity() {
        let (adapter, _recorder) = PrometheusAdapter::unregistered();
        assert_eq!(adapter.name(), "prometheus");
        assert_eq!(adapter.adapter_type(), AdapterType::Observability);
        assert_eq!(adapter.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[test]
    fn helpers_are_noops_without_recorder() {
        record_request("getSessions", 200);
        record_provider_latency(0.25);
        set_memory_heap(1024.0);
    }
}
