use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::Config;
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::clipboard_monitor::{ClipboardMonitor, MonitorEvent, MonitorSettings};
use crate::language_utils;
use crate::text_analyzer;
use crate::token_counter::TokenCounter;
use crate::translator::TranslationRouter;
use tokio::sync::mpsc;

// @module: Application controller for the clipboard watch session

/// Longest clipboard excerpt shown in the session history
const PREVIEW_CHARS: usize = 60;

/// How often the status spinner redraws
const SPINNER_TICK: Duration = Duration::from_millis(120);

/// Drives a watch session: wires the clipboard monitor to the translation
/// router and folds monitor events into the usage ledger and status line.
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Where the configuration is saved on start and stop
    config_path: PathBuf,
    monitor: ClipboardMonitor,
    events: mpsc::UnboundedReceiver<MonitorEvent>,
    ledger: TokenCounter,
    session_translations: u64,
    session_tokens: u64,
}

impl Controller {
    // @method: Create a controller watching the system clipboard
    pub fn new(config: Config, config_path: PathBuf, ledger: TokenCounter) -> Self {
        Self::with_parts(
            config,
            config_path,
            Box::new(SystemClipboard::new()),
            TranslationRouter::new(),
            ledger,
        )
    }

    /// Create a controller over explicit clipboard and router implementations
    pub fn with_parts(
        config: Config,
        config_path: PathBuf,
        clipboard: Box<dyn Clipboard>,
        router: TranslationRouter,
        ledger: TokenCounter,
    ) -> Self {
        let (monitor, events) = ClipboardMonitor::new(clipboard, router);
        Self {
            config,
            config_path,
            monitor,
            events,
            ledger,
            session_translations: 0,
            session_tokens: 0,
        }
    }

    /// Monitor settings derived from the current configuration.
    ///
    /// Languages travel as full names so the instruction sent to the engine
    /// reads naturally.
    fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            api_key: self.config.api_key.clone(),
            source_lang: language_utils::get_language_name(&self.config.source_language)
                .to_string(),
            target_lang: language_utils::get_language_name(&self.config.target_language)
                .to_string(),
            tone: self.config.tone.clone(),
            context: self.config.context.clone(),
            engine: self.config.api_engine.to_lowercase_string(),
        }
    }

    fn watching_message(&self) -> String {
        format!(
            "Watching clipboard: {} -> {} via {} ({} tokens this month)",
            language_utils::get_language_name(&self.config.source_language),
            language_utils::get_language_name(&self.config.target_language),
            self.config.api_engine.display_name(),
            self.ledger.current_month_usage(None)
        )
    }

    /// Run the watch session until the user interrupts it
    pub async fn run(&mut self) -> Result<()> {
        // Persist the effective settings so CLI overrides survive restarts
        if let Err(e) = self.config.save_to(&self.config_path) {
            warn!("Failed to save settings on start: {}", e);
        }

        let status = ProgressBar::new_spinner();
        let template_result = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .or_else(|_| ProgressStyle::default_spinner().template("{spinner} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        status.set_style(template_result);
        status.enable_steady_tick(SPINNER_TICK);
        status.set_message(self.watching_message());

        self.monitor.start(self.monitor_settings());
        info!("Press Ctrl+C to stop watching");

        loop {
            let event = tokio::select! {
                event = self.events.recv() => event,
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, shutting down");
                    None
                }
            };
            let Some(event) = event else {
                break;
            };
            self.handle_event(event, &status);
        }

        self.monitor.stop().await;

        // Account for translations that finished while we were shutting down
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event, &status);
        }
        status.finish_and_clear();

        self.config
            .save_to(&self.config_path)
            .context("Failed to save settings on stop")?;
        self.log_session_summary();
        Ok(())
    }

    /// Fold one monitor event into the ledger and the status line
    fn handle_event(&mut self, event: MonitorEvent, status: &ProgressBar) {
        match event {
            MonitorEvent::TextDetected { text } => {
                let words = text_analyzer::count_words(&text);
                let language = text_analyzer::detect_language(&text);
                debug!(
                    "Clipboard text detected: {} words, language guess {}",
                    words, language
                );
                status.set_message(format!("Translating {} words...", words));
            }
            MonitorEvent::TranslationComplete {
                original,
                translated,
                token_count,
            } => {
                self.session_translations += 1;
                self.session_tokens += token_count;
                self.config.token_count += token_count;

                let engine = self.config.api_engine.display_name();
                if let Err(e) = self.ledger.add_tokens(token_count, engine) {
                    warn!("Failed to persist token usage: {}", e);
                }

                status.println(format!(
                    "{}  =>  {}",
                    preview(&original, PREVIEW_CHARS),
                    preview(&translated, PREVIEW_CHARS)
                ));
                status.set_message(self.watching_message());
                info!("Translation complete ({} tokens via {})", token_count, engine);
            }
            MonitorEvent::Error { message } => {
                warn!("Translation attempt failed: {}", message);
                status.set_message(self.watching_message());
            }
        }
    }

    fn log_session_summary(&self) {
        info!(
            "Session summary: {} translations, {} tokens",
            self.session_translations, self.session_tokens
        );
        info!(
            "Month to date: {} tokens, all time: {} tokens",
            self.ledger.current_month_usage(None),
            self.config.token_count
        );
    }
}

/// Collapse whitespace and cap the excerpt shown for a clipboard entry
fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let head: String = collapsed.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
