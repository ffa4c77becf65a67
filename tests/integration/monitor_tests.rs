/*!
 * Integration tests for the clipboard watch loop
 */

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use cliptrans::clipboard::{Clipboard, MemoryClipboard};
use cliptrans::clipboard_monitor::{ClipboardMonitor, MonitorEvent, MonitorSettings};
use cliptrans::engines::mock::MockEngine;
use cliptrans::errors::ClipboardError;
use cliptrans::translator::TranslationRouter;
use crate::common;

/// Clipboard wrapper that injects failures: a fixed number of failed reads,
/// and optionally failing every write
struct FlakyClipboard {
    read_failures: usize,
    fail_writes: bool,
    inner: MemoryClipboard,
}

impl FlakyClipboard {
    fn new(read_failures: usize, fail_writes: bool, inner: MemoryClipboard) -> Self {
        Self {
            read_failures,
            fail_writes,
            inner,
        }
    }
}

impl Clipboard for FlakyClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        if self.read_failures > 0 {
            self.read_failures -= 1;
            return Err(ClipboardError::ReadFailed("simulated read failure".to_string()));
        }
        self.inner.get_text()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail_writes {
            return Err(ClipboardError::WriteFailed("simulated write failure".to_string()));
        }
        self.inner.set_text(text)
    }
}

/// Settings used by most tests; the engine identifier is irrelevant when the
/// router carries a single mock
fn test_settings() -> MonitorSettings {
    MonitorSettings {
        api_key: "test-key-123".to_string(),
        source_lang: "Portuguese".to_string(),
        target_lang: "English".to_string(),
        tone: "neutral".to_string(),
        context: String::new(),
        engine: "openai".to_string(),
    }
}

/// Receive the next event or fail the test after a generous timeout
async fn next_event(
    events: &mut tokio::sync::mpsc::UnboundedReceiver<MonitorEvent>,
) -> MonitorEvent {
    timeout(Duration::from_secs(30), events.recv())
        .await
        .expect("timed out waiting for a monitor event")
        .expect("event channel closed unexpectedly")
}

/// Test the full detect-translate-write-back cycle and the anti-loop rule
#[tokio::test(start_paused = true)]
async fn test_monitor_withProseOnClipboard_shouldTranslateOnceAndWriteBack() {
    let clipboard = MemoryClipboard::with_text(common::PROSE_TEXT);
    let mock = Arc::new(MockEngine::working());
    let router = TranslationRouter::with_single_engine(mock.clone());
    let (mut monitor, mut events) = ClipboardMonitor::new(Box::new(clipboard.clone()), router);

    monitor.start(test_settings());
    assert!(monitor.is_running());

    let detected = next_event(&mut events).await;
    assert_eq!(
        detected,
        MonitorEvent::TextDetected {
            text: common::PROSE_TEXT.to_string()
        }
    );

    let expected = format!("[Mock translation] {}", common::PROSE_TEXT);
    let completed = next_event(&mut events).await;
    match completed {
        MonitorEvent::TranslationComplete {
            original,
            translated,
            token_count,
        } => {
            assert_eq!(original, common::PROSE_TEXT);
            assert_eq!(translated, expected);
            assert_eq!(token_count, common::PROSE_TEXT.chars().count() as u64 + 10);
        }
        other => panic!("expected TranslationComplete, got {:?}", other),
    }

    // The translation has been written back to the clipboard
    assert_eq!(clipboard.snapshot(), expected);

    // The written-back translation must not be picked up again
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(events.try_recv().is_err());
    assert_eq!(mock.call_count(), 1);

    monitor.stop().await;
    assert!(!monitor.is_running());
}

/// Test that code on the clipboard is left alone
#[tokio::test(start_paused = true)]
async fn test_monitor_withCodeOnClipboard_shouldSkipTranslation() {
    let clipboard = MemoryClipboard::with_text(common::CODE_TEXT);
    let mock = Arc::new(MockEngine::working());
    let router = TranslationRouter::with_single_engine(mock.clone());
    let (mut monitor, mut events) = ClipboardMonitor::new(Box::new(clipboard.clone()), router);

    monitor.start(test_settings());
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(events.try_recv().is_err());
    assert_eq!(mock.call_count(), 0);
    assert_eq!(clipboard.snapshot(), common::CODE_TEXT);

    monitor.stop().await;
}

/// Test that blank clipboard content is ignored
#[tokio::test(start_paused = true)]
async fn test_monitor_withBlankClipboard_shouldStayIdle() {
    let clipboard = MemoryClipboard::with_text("   \n  ");
    let mock = Arc::new(MockEngine::working());
    let router = TranslationRouter::with_single_engine(mock.clone());
    let (mut monitor, mut events) = ClipboardMonitor::new(Box::new(clipboard.clone()), router);

    monitor.start(test_settings());
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(events.try_recv().is_err());
    assert_eq!(mock.call_count(), 0);

    monitor.stop().await;
}

/// Test that engine failures are reported and polling continues
#[tokio::test(start_paused = true)]
async fn test_monitor_withFailingEngine_shouldReportErrorAndKeepPolling() {
    let clipboard = MemoryClipboard::with_text(common::PROSE_TEXT);
    let router = TranslationRouter::with_single_engine(Arc::new(MockEngine::failing()));
    let (mut monitor, mut events) = ClipboardMonitor::new(Box::new(clipboard.clone()), router);

    monitor.start(test_settings());

    let detected = next_event(&mut events).await;
    assert!(matches!(detected, MonitorEvent::TextDetected { .. }));

    let failed = next_event(&mut events).await;
    match failed {
        MonitorEvent::Error { message } => assert!(message.contains("500")),
        other => panic!("expected Error, got {:?}", other),
    }

    // The clipboard was not touched and the same text is attempted again
    assert_eq!(clipboard.snapshot(), common::PROSE_TEXT);
    let retried = next_event(&mut events).await;
    assert_eq!(
        retried,
        MonitorEvent::TextDetected {
            text: common::PROSE_TEXT.to_string()
        }
    );

    monitor.stop().await;
}

/// Test that an empty translation is discarded without touching the clipboard
#[tokio::test(start_paused = true)]
async fn test_monitor_withEmptyTranslation_shouldNotWriteBack() {
    let clipboard = MemoryClipboard::with_text(common::PROSE_TEXT);
    let mock = Arc::new(MockEngine::empty());
    let router = TranslationRouter::with_single_engine(mock.clone());
    let (mut monitor, mut events) = ClipboardMonitor::new(Box::new(clipboard.clone()), router);

    monitor.start(test_settings());

    let detected = next_event(&mut events).await;
    assert!(matches!(detected, MonitorEvent::TextDetected { .. }));

    // No completion follows; the text was never marked as observed, so the
    // next cycle detects the same content again
    let retried = next_event(&mut events).await;
    assert_eq!(
        retried,
        MonitorEvent::TextDetected {
            text: common::PROSE_TEXT.to_string()
        }
    );
    assert_eq!(clipboard.snapshot(), common::PROSE_TEXT);
    assert!(mock.call_count() >= 2);

    monitor.stop().await;
}

/// Test that a second start while running is a no-op
#[tokio::test(start_paused = true)]
async fn test_monitor_startWhileRunning_shouldBeNoOp() {
    let clipboard = MemoryClipboard::with_text(common::PROSE_TEXT);
    let mock = Arc::new(MockEngine::working());
    let router = TranslationRouter::with_single_engine(mock.clone());
    let (mut monitor, mut events) = ClipboardMonitor::new(Box::new(clipboard.clone()), router);

    monitor.start(test_settings());
    monitor.start(test_settings());
    assert!(monitor.is_running());

    // Exactly one cycle picks up the text
    let _ = next_event(&mut events).await;
    let _ = next_event(&mut events).await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(mock.call_count(), 1);

    monitor.stop().await;
}

/// Test that stop is safe when the monitor never started, and twice in a row
#[tokio::test(start_paused = true)]
async fn test_monitor_stop_withoutStart_shouldBeIdempotent() {
    let clipboard = MemoryClipboard::new();
    let router = TranslationRouter::with_single_engine(Arc::new(MockEngine::working()));
    let (mut monitor, _events) = ClipboardMonitor::new(Box::new(clipboard), router);

    assert!(!monitor.is_running());
    monitor.stop().await;
    monitor.stop().await;
    assert!(!monitor.is_running());
}

/// Test that stop aborts a translation still in flight
#[tokio::test(start_paused = true)]
async fn test_monitor_stop_withTranslationInFlight_shouldAbortPromptly() {
    let clipboard = MemoryClipboard::with_text(common::PROSE_TEXT);
    let mock = Arc::new(MockEngine::slow(10_000));
    let router = TranslationRouter::with_single_engine(mock.clone());
    let (mut monitor, mut events) = ClipboardMonitor::new(Box::new(clipboard.clone()), router);

    monitor.start(test_settings());

    // Wait until the cycle is inside the slow engine call
    let detected = next_event(&mut events).await;
    assert!(matches!(detected, MonitorEvent::TextDetected { .. }));

    monitor.stop().await;
    assert!(!monitor.is_running());

    // The aborted call never completed and never touched the clipboard
    assert!(events.try_recv().is_err());
    assert_eq!(clipboard.snapshot(), common::PROSE_TEXT);
}

/// Test that a stopped monitor can be started again
#[tokio::test(start_paused = true)]
async fn test_monitor_restartAfterStop_shouldTranslateAgain() {
    let clipboard = MemoryClipboard::with_text(common::PROSE_TEXT);
    let mock = Arc::new(MockEngine::working());
    let router = TranslationRouter::with_single_engine(mock.clone());
    let (mut monitor, mut events) = ClipboardMonitor::new(Box::new(clipboard.clone()), router);

    monitor.start(test_settings());
    let _ = next_event(&mut events).await;
    let _ = next_event(&mut events).await;
    monitor.stop().await;

    // A user copies something new while the monitor is stopped
    clipboard.put(common::PROSE_TEXT_ALT);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(events.try_recv().is_err());

    monitor.start(test_settings());
    let detected = next_event(&mut events).await;
    assert_eq!(
        detected,
        MonitorEvent::TextDetected {
            text: common::PROSE_TEXT_ALT.to_string()
        }
    );
    let _ = next_event(&mut events).await;
    assert_eq!(mock.call_count(), 2);

    monitor.stop().await;
}

/// Test a full cycle against the simulated Gemini engine through the router
#[tokio::test(start_paused = true)]
async fn test_monitor_withGeminiEngine_shouldProduceTaggedTranslation() {
    let clipboard = MemoryClipboard::with_text(common::PROSE_TEXT);
    let (mut monitor, mut events) =
        ClipboardMonitor::new(Box::new(clipboard.clone()), TranslationRouter::new());

    let mut settings = test_settings();
    settings.engine = "gemini".to_string();
    monitor.start(settings);

    let _ = next_event(&mut events).await;
    let completed = next_event(&mut events).await;
    match completed {
        MonitorEvent::TranslationComplete {
            translated,
            token_count,
            ..
        } => {
            assert_eq!(
                translated,
                format!("[Gemini 2.0 translation] {}", common::PROSE_TEXT)
            );
            let base = common::PROSE_TEXT.chars().count() as u64 / 2;
            assert!(token_count >= base + 10 && token_count <= base + 40);
        }
        other => panic!("expected TranslationComplete, got {:?}", other),
    }
    assert_eq!(
        clipboard.snapshot(),
        format!("[Gemini 2.0 translation] {}", common::PROSE_TEXT)
    );

    monitor.stop().await;
}

/// Test that read failures surface as error events and polling continues
#[tokio::test(start_paused = true)]
async fn test_monitor_withFailingReads_shouldRecoverAndTranslate() {
    let buffer = MemoryClipboard::with_text(common::PROSE_TEXT);
    let clipboard = FlakyClipboard::new(2, false, buffer.clone());
    let engine = MockEngine::working();
    let (mut monitor, mut events) = ClipboardMonitor::new(
        Box::new(clipboard),
        TranslationRouter::with_single_engine(Arc::new(engine)),
    );

    monitor.start(test_settings());

    for _ in 0..2 {
        match next_event(&mut events).await {
            MonitorEvent::Error { message } => {
                assert!(message.contains("simulated read failure"));
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    let detected = next_event(&mut events).await;
    assert_eq!(
        detected,
        MonitorEvent::TextDetected {
            text: common::PROSE_TEXT.to_string(),
        }
    );
    let _ = next_event(&mut events).await;
    assert_eq!(
        buffer.snapshot(),
        format!("[Mock translation] {}", common::PROSE_TEXT)
    );

    monitor.stop().await;
}

/// Test that a failed clipboard write reports an error and the text is retried
#[tokio::test(start_paused = true)]
async fn test_monitor_withFailingWrites_shouldReportErrorAndRetry() {
    let buffer = MemoryClipboard::with_text(common::PROSE_TEXT);
    let clipboard = FlakyClipboard::new(0, true, buffer.clone());
    let engine = MockEngine::working();
    let shared = engine.clone();
    let (mut monitor, mut events) = ClipboardMonitor::new(
        Box::new(clipboard),
        TranslationRouter::with_single_engine(Arc::new(engine)),
    );

    monitor.start(test_settings());

    let _ = next_event(&mut events).await;
    match next_event(&mut events).await {
        MonitorEvent::Error { message } => {
            assert!(message.contains("simulated write failure"));
        }
        other => panic!("expected Error, got {:?}", other),
    }

    // The buffer still holds the original text, so the next cycle picks it
    // up again and the translation is re-attempted
    let retried = next_event(&mut events).await;
    assert_eq!(
        retried,
        MonitorEvent::TextDetected {
            text: common::PROSE_TEXT.to_string(),
        }
    );
    assert!(shared.call_count() >= 2);
    assert_eq!(buffer.snapshot(), common::PROSE_TEXT);

    monitor.stop().await;
}
