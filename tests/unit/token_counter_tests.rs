/*!
 * Tests for the token usage ledger
 */

use anyhow::Result;

use cliptrans::token_counter::TokenCounter;
use crate::common;

/// Test that a missing ledger file yields an empty ledger
#[test]
fn test_tokenCounter_load_withMissingFile_shouldStartEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let ledger = TokenCounter::load(temp_dir.path().join("token_usage.json"));

    assert_eq!(ledger.current_month_usage(None), 0);
    assert_eq!(ledger.total_usage(None), 0);
    assert!(ledger.usage_by_month(None).is_empty());

    Ok(())
}

/// Test that a corrupt ledger file is ignored rather than fatal
#[test]
fn test_tokenCounter_load_withCorruptFile_shouldStartEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "token_usage.json", "not json at all")?;

    let mut ledger = TokenCounter::load(&path);
    assert_eq!(ledger.total_usage(None), 0);

    // A damaged file can still be overwritten with fresh data
    ledger.add_tokens(5, "OpenAI")?;
    let reloaded = TokenCounter::load(&path);
    assert_eq!(reloaded.total_usage(Some("OpenAI")), 5);

    Ok(())
}

/// Test recording and querying usage across months and engines
#[test]
fn test_tokenCounter_queries_withSeededMonths_shouldFilterCorrectly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut ledger = TokenCounter::load(temp_dir.path().join("token_usage.json"));

    ledger.record_tokens("2025-06", "OpenAI", 100);
    ledger.record_tokens("2025-06", "Gemini 2.0", 40);
    ledger.record_tokens("2025-07", "OpenAI", 10);

    assert_eq!(ledger.month_usage("2025-06", None), 140);
    assert_eq!(ledger.month_usage("2025-06", Some("OpenAI")), 100);
    assert_eq!(ledger.month_usage("2025-06", Some("DeepSeek V3")), 0);
    assert_eq!(ledger.month_usage("2024-01", None), 0);

    assert_eq!(ledger.total_usage(None), 150);
    assert_eq!(ledger.total_usage(Some("OpenAI")), 110);
    assert_eq!(ledger.total_usage(Some("Gemini 2.0")), 40);

    let by_month = ledger.usage_by_month(Some("OpenAI"));
    assert_eq!(by_month.get("2025-06"), Some(&100));
    assert_eq!(by_month.get("2025-07"), Some(&10));

    let breakdown = ledger.month_breakdown("2025-06").unwrap();
    assert_eq!(breakdown.get("OpenAI"), Some(&100));
    assert_eq!(breakdown.get("Gemini 2.0"), Some(&40));
    assert!(ledger.month_breakdown("2024-01").is_none());

    Ok(())
}

/// Test that counts accumulate inside one month and engine
#[test]
fn test_tokenCounter_recordTokens_withRepeatedCalls_shouldAccumulate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut ledger = TokenCounter::load(temp_dir.path().join("token_usage.json"));

    ledger.record_tokens("2025-06", "OpenAI", 10);
    ledger.record_tokens("2025-06", "OpenAI", 15);
    assert_eq!(ledger.month_usage("2025-06", Some("OpenAI")), 25);

    Ok(())
}

/// Test that add_tokens persists immediately under the current month
#[test]
fn test_tokenCounter_addTokens_shouldWriteThrough() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("token_usage.json");

    let mut ledger = TokenCounter::load(&path);
    ledger.add_tokens(42, "Gemini 2.0")?;
    ledger.add_tokens(8, "Gemini 2.0")?;

    assert!(path.exists());
    assert_eq!(ledger.current_month_usage(Some("Gemini 2.0")), 50);

    // A fresh load sees the same numbers without an explicit save
    let reloaded = TokenCounter::load(&path);
    let month = TokenCounter::current_month_key();
    assert_eq!(reloaded.month_usage(&month, Some("Gemini 2.0")), 50);
    assert_eq!(reloaded.total_usage(None), 50);

    Ok(())
}

/// Test the month key format
#[test]
fn test_tokenCounter_currentMonthKey_shouldBeYearDashMonth() {
    let key = TokenCounter::current_month_key();
    assert_eq!(key.len(), 7);
    assert_eq!(key.as_bytes()[4], b'-');
    assert!(key[..4].chars().all(|c| c.is_ascii_digit()));
    assert!(key[5..].chars().all(|c| c.is_ascii_digit()));
}

/// Test the rendered usage report
#[test]
fn test_tokenCounter_summary_withSeededData_shouldListMonths() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut ledger = TokenCounter::load(temp_dir.path().join("token_usage.json"));

    let report = ledger.summary();
    assert_eq!(report, "No token usage recorded yet");

    ledger.record_tokens("2025-06", "OpenAI", 100);
    ledger.record_tokens("2025-06", "DeepSeek V3", 30);

    // Engines are listed alphabetically within a month line
    let report = ledger.summary();
    assert!(report.contains("  2025-06  DeepSeek V3 30, OpenAI 100  (total 130)"));
    assert!(report.contains("All time: 130 tokens"));

    Ok(())
}
