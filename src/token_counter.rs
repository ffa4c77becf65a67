/*!
 * Persistent token usage ledger.
 *
 * Records how many tokens each engine consumed per calendar month and keeps
 * the ledger file in sync after every recorded translation.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use log::warn;

/// Default ledger file, kept in the working directory
pub const DEFAULT_USAGE_FILE: &str = "token_usage.json";

/// Month-keyed token usage ledger with write-through persistence.
///
/// The outer map is keyed by month ("YYYY-MM"), the inner map by engine
/// display name.
#[derive(Debug)]
pub struct TokenCounter {
    /// Where the ledger is persisted
    path: PathBuf,
    monthly_usage: BTreeMap<String, BTreeMap<String, u64>>,
}

impl TokenCounter {
    /// Load the ledger from a file.
    ///
    /// A missing or unreadable file yields an empty ledger; a damaged ledger
    /// must not keep the application from starting.
    pub fn load<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let monthly_usage = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(usage) => usage,
                Err(e) => {
                    warn!(
                        "Ignoring unreadable token usage file {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            monthly_usage,
        }
    }

    /// Path the ledger persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key for the current calendar month, e.g. "2025-07"
    pub fn current_month_key() -> String {
        Local::now().format("%Y-%m").to_string()
    }

    /// Record tokens for a given month and engine without persisting
    pub fn record_tokens(&mut self, month: &str, engine: &str, count: u64) {
        let month_entry = self.monthly_usage.entry(month.to_string()).or_default();
        *month_entry.entry(engine.to_string()).or_default() += count;
    }

    /// Record tokens for the current month and persist the ledger immediately
    pub fn add_tokens(&mut self, count: u64, engine: &str) -> Result<()> {
        let month = Self::current_month_key();
        self.record_tokens(&month, engine, count);
        self.save()
    }

    /// Write the ledger to its file
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.monthly_usage)
            .context("Failed to serialize token usage to JSON")?;
        std::fs::write(&self.path, json).context(format!(
            "Failed to write token usage file: {}",
            self.path.display()
        ))?;
        Ok(())
    }

    /// Usage for the current month, optionally restricted to one engine
    pub fn current_month_usage(&self, engine: Option<&str>) -> u64 {
        self.month_usage(&Self::current_month_key(), engine)
    }

    /// Usage for a given month, optionally restricted to one engine
    pub fn month_usage(&self, month: &str, engine: Option<&str>) -> u64 {
        let Some(engines) = self.monthly_usage.get(month) else {
            return 0;
        };
        match engine {
            Some(name) => engines.get(name).copied().unwrap_or(0),
            None => engines.values().sum(),
        }
    }

    /// Usage across all recorded months, optionally restricted to one engine
    pub fn total_usage(&self, engine: Option<&str>) -> u64 {
        self.monthly_usage
            .keys()
            .map(|month| self.month_usage(month, engine))
            .sum()
    }

    /// Per-month totals, optionally restricted to one engine
    pub fn usage_by_month(&self, engine: Option<&str>) -> BTreeMap<String, u64> {
        self.monthly_usage
            .keys()
            .map(|month| (month.clone(), self.month_usage(month, engine)))
            .collect()
    }

    /// Per-engine breakdown for one month, if any usage was recorded
    pub fn month_breakdown(&self, month: &str) -> Option<&BTreeMap<String, u64>> {
        self.monthly_usage.get(month)
    }

    /// Render a human readable usage report
    pub fn summary(&self) -> String {
        if self.monthly_usage.is_empty() {
            return "No token usage recorded yet".to_string();
        }

        let mut lines = vec!["Token usage by month:".to_string()];
        for (month, engines) in &self.monthly_usage {
            let breakdown = engines
                .iter()
                .map(|(engine, count)| format!("{} {}", engine, count))
                .collect::<Vec<_>>()
                .join(", ");
            let total: u64 = engines.values().sum();
            lines.push(format!("  {}  {}  (total {})", month, breakdown, total));
        }
        lines.push(format!(
            "Current month: {} tokens",
            self.current_month_usage(None)
        ));
        lines.push(format!("All time: {} tokens", self.total_usage(None)));
        lines.join("\n")
    }
}
