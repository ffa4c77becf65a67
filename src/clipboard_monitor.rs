/*!
 * Clipboard monitoring service.
 *
 * The monitor owns the start/stop lifecycle of a single background polling
 * task. Each cycle reads the clipboard, gates the content through the code
 * heuristic, dispatches a translation through the router, writes the result
 * back, and publishes what happened on an event channel consumed by the
 * presentation layer.
 *
 * The loop is strictly sequential: one clipboard item at a time, no
 * concurrent translations. Cancellation is cooperative via a watch signal
 * checked once per cycle; `stop` awaits the task with a bounded timeout and
 * aborts it as a backstop.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::clipboard::Clipboard;
use crate::errors::TranslationError;
use crate::text_analyzer::is_code;
use crate::translator::{TranslationRequest, TranslationRouter};

/// Idle delay between poll cycles
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How long `stop` waits for the polling task to observe cancellation
pub const STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration snapshot captured when monitoring starts.
/// The task never re-reads settings after start.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Key for the upstream translation service
    pub api_key: String,
    /// Source language, as written into the instruction
    pub source_lang: String,
    /// Target language, as written into the instruction
    pub target_lang: String,
    /// Desired tone of the translation
    pub tone: String,
    /// Optional additional context for the instruction
    pub context: String,
    /// Engine identifier
    pub engine: String,
}

/// What happened during a poll cycle, published to the event channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// New translatable text was observed on the clipboard
    TextDetected {
        /// The raw clipboard content
        text: String,
    },
    /// A translation completed and was written back to the clipboard
    TranslationComplete {
        /// The text that was observed
        original: String,
        /// The translated text now on the clipboard
        translated: String,
        /// Tokens the engine reported for the call
        token_count: u64,
    },
    /// A cycle failed; monitoring continues
    Error {
        /// Human-readable failure description
        message: String,
    },
}

/// Handle to the spawned polling task
struct MonitorTask {
    /// Cancellation signal observed once per cycle
    shutdown: watch::Sender<bool>,
    /// Join handle awaited by `stop`
    handle: JoinHandle<()>,
}

/// Stateful clipboard polling engine
pub struct ClipboardMonitor {
    /// Clipboard shared with the polling task
    clipboard: Arc<Mutex<Box<dyn Clipboard>>>,
    /// Router shared with the polling task
    router: Arc<TranslationRouter>,
    /// Sender side of the event channel, cloned into each task
    events: mpsc::UnboundedSender<MonitorEvent>,
    /// The active task, if any
    task: Option<MonitorTask>,
}

impl ClipboardMonitor {
    /// Create a monitor over a clipboard and router.
    /// Returns the monitor and the receiving side of its event channel.
    pub fn new(
        clipboard: Box<dyn Clipboard>,
        router: TranslationRouter,
    ) -> (Self, mpsc::UnboundedReceiver<MonitorEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let monitor = Self {
            clipboard: Arc::new(Mutex::new(clipboard)),
            router: Arc::new(router),
            events,
            task: None,
        };
        (monitor, receiver)
    }

    /// Whether a polling task is currently active
    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Start polling with the given settings snapshot.
    /// No-op when a polling task is already active.
    pub fn start(&mut self, settings: MonitorSettings) {
        if self.is_running() {
            debug!("Monitor already running, ignoring start request");
            return;
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let clipboard = Arc::clone(&self.clipboard);
        let router = Arc::clone(&self.router);
        let events = self.events.clone();
        let engine = settings.engine.clone();

        let handle = tokio::spawn(async move {
            poll_loop(clipboard, router, settings, events, shutdown_rx).await;
        });

        self.task = Some(MonitorTask { shutdown, handle });
        info!("Clipboard monitor started (engine: {})", engine);
    }

    /// Stop polling. Signals cancellation, waits up to [`STOP_TIMEOUT`]
    /// for the task to exit, and aborts it if it does not. Idempotent.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        let _ = task.shutdown.send(true);
        let abort = task.handle.abort_handle();
        match tokio::time::timeout(STOP_TIMEOUT, task.handle).await {
            Ok(_) => debug!("Monitor task exited cleanly"),
            Err(_) => {
                warn!("Monitor task did not exit within {:?}, aborting", STOP_TIMEOUT);
                abort.abort();
            }
        }
        info!("Clipboard monitor stopped");
    }
}

/// The background polling loop: run a cycle, sleep, repeat until cancelled.
async fn poll_loop(
    clipboard: Arc<Mutex<Box<dyn Clipboard>>>,
    router: Arc<TranslationRouter>,
    settings: MonitorSettings,
    events: mpsc::UnboundedSender<MonitorEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut last_observed = String::new();

    loop {
        if *shutdown.borrow() {
            break;
        }

        poll_cycle(&clipboard, &router, &settings, &events, &mut last_observed).await;

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }

    debug!("Poll loop exited");
}

/// One poll cycle. Any failure surfaces as an error event; the loop itself
/// keeps running.
async fn poll_cycle(
    clipboard: &Arc<Mutex<Box<dyn Clipboard>>>,
    router: &Arc<TranslationRouter>,
    settings: &MonitorSettings,
    events: &mpsc::UnboundedSender<MonitorEvent>,
    last_observed: &mut String,
) {
    if let Err(e) = try_cycle(clipboard, router, settings, events, last_observed).await {
        let _ = events.send(MonitorEvent::Error {
            message: e.to_string(),
        });
    }
}

/// Read, gate, translate, write back, publish.
async fn try_cycle(
    clipboard: &Arc<Mutex<Box<dyn Clipboard>>>,
    router: &Arc<TranslationRouter>,
    settings: &MonitorSettings,
    events: &mpsc::UnboundedSender<MonitorEvent>,
    last_observed: &mut String,
) -> Result<(), TranslationError> {
    let current = clipboard.lock().get_text()?;

    // Skip rules: unchanged, blank, or code-looking content
    if current == *last_observed || current.trim().is_empty() || is_code(&current) {
        return Ok(());
    }

    let _ = events.send(MonitorEvent::TextDetected {
        text: current.clone(),
    });

    let request = TranslationRequest {
        text: current.clone(),
        source_lang: settings.source_lang.clone(),
        target_lang: settings.target_lang.clone(),
        tone: settings.tone.clone(),
        context: settings.context.clone(),
        engine: settings.engine.clone(),
        api_key: settings.api_key.clone(),
    };

    let response = router.translate(&request).await?;
    if response.text.is_empty() {
        debug!("Engine returned an empty translation, nothing written back");
        return Ok(());
    }

    // Remember the translated text before writing it back, so the
    // next cycle sees it as unchanged instead of re-translating it
    *last_observed = response.text.clone();
    clipboard.lock().set_text(&response.text)?;

    let _ = events.send(MonitorEvent::TranslationComplete {
        original: current,
        translated: response.text,
        token_count: response.token_count,
    });
    Ok(())
}
