// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solace doctor` command implementation.
//!
//! Runs diagnostic checks against the loaded configuration: database
//! reachability and the presence of the secrets `serve` needs.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use solace_config::SolaceConfig;
use solace_core::{HealthStatus, PluginAdapter, SolaceError, StorageAdapter};
use solace_storage::SqliteStorage;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Runs every check and prints a report. Returns the number of failed checks.
pub async fn run_doctor(config: &SolaceConfig, plain: bool) -> Result<usize, SolaceError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        CheckResult::new("Configuration", CheckStatus::Pass, "valid", Instant::now()),
        check_database(config).await,
        check_jwt_secret(config),
        check_api_key(config),
        check_metrics(config),
    ];

    println!();
    println!("  solace doctor");
    println!("  {}", "-".repeat(50));

    for result in &results {
        println!("{}", format_line(result, use_color));
    }
    println!();

    let fail_count = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    let warn_count = results
        .iter()
        .filter(|r| r.status == CheckStatus::Warn)
        .count();

    let issues = fail_count + warn_count;
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(fail_count)
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    use colored::Colorize;

    let duration_ms = result.duration.as_millis();
    let (symbol, message) = match (&result.status, use_color) {
        (CheckStatus::Pass, true) => ("✓".green().to_string(), result.message.clone()),
        (CheckStatus::Warn, true) => ("!".yellow().to_string(), result.message.yellow().to_string()),
        (CheckStatus::Fail, true) => ("✗".red().to_string(), result.message.red().to_string()),
        (CheckStatus::Pass, false) => ("[OK]  ".to_string(), result.message.clone()),
        (CheckStatus::Warn, false) => ("[WARN]".to_string(), result.message.clone()),
        (CheckStatus::Fail, false) => ("[FAIL]".to_string(), result.message.clone()),
    };
    format!(
        "    {symbol} {:<20} {message} ({duration_ms}ms)",
        result.name
    )
}

/// Opens the database (running migrations) and runs the storage health check.
async fn check_database(config: &SolaceConfig) -> CheckResult {
    let start = Instant::now();
    let storage = SqliteStorage::new(config.storage.clone());

    if let Err(e) = storage.initialize().await {
        return CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start);
    }

    let result = match storage.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new(
            "Database",
            CheckStatus::Pass,
            format!("connected ({})", config.storage.database_path),
            start,
        ),
        Ok(HealthStatus::Degraded(msg)) => {
            CheckResult::new("Database", CheckStatus::Warn, msg, start)
        }
        Ok(HealthStatus::Unhealthy(msg)) => {
            CheckResult::new("Database", CheckStatus::Fail, msg, start)
        }
        Err(e) => CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start),
    };
    let _ = storage.close().await;
    result
}

fn check_jwt_secret(config: &SolaceConfig) -> CheckResult {
    let start = Instant::now();
    match config.auth.jwt_secret.as_deref() {
        Some(secret) if !secret.is_empty() => {
            CheckResult::new("JWT secret", CheckStatus::Pass, "set", start)
        }
        _ => CheckResult::new(
            "JWT secret",
            CheckStatus::Fail,
            "auth.jwt_secret is not set (serve will refuse to start)",
            start,
        ),
    }
}

fn check_api_key(config: &SolaceConfig) -> CheckResult {
    let start = Instant::now();
    match solace_openai::resolve_api_key(&config.openai.api_key) {
        Ok(_) => CheckResult::new(
            "OpenAI API key",
            CheckStatus::Pass,
            format!("set (model {})", config.openai.model),
            start,
        ),
        Err(e) => CheckResult::new("OpenAI API key", CheckStatus::Fail, e.to_string(), start),
    }
}

fn check_metrics(config: &SolaceConfig) -> CheckResult {
    let start = Instant::now();
    let message = if config.prometheus.enabled {
        "enabled (/metrics)"
    } else {
        "disabled"
    };
    CheckResult::new("Metrics", CheckStatus::Pass, message, start)
}
