//! convlog-cli — operator scripts for the conversation log database
//!
//! Talks straight to PostgreSQL and writes formatted results to stdout;
//! nothing here is network-reachable. The destructive `flush` mode exists
//! only in this binary — the HTTP server never imports the maintenance
//! module, so the API cannot reach it.
//!
//! # Modes
//! - `all`    — print every record, most recent first, with a total count
//! - `last`   — print the single most recent record
//! - `weekly` — per-day counts over the trailing 7-day window
//! - `flush`  — delete every record, irreversibly

use chrono::Utc;
use clap::{Parser, Subcommand};
use convlog_core::{maintenance, ConversationLog, ConvlogConfig, DailyCount, LogStore};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "convlog-cli",
    version,
    about = "Conversation log maintenance and analytics scripts"
)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Print every record, most recent first
    All,
    /// Print the single most recent record
    Last,
    /// Print per-day record counts for the last 7 days
    Weekly,
    /// Delete all records. Irreversible — manual/offline use only
    Flush,
}

// ============================================================================
// Output Formatting
// ============================================================================

const SEPARATOR: &str = "--------------------------------------------------";
const EMPTY_MESSAGE: &str = "No records found in the database.";

/// One record as a labelled block, matching the operator dump format.
fn format_record(log: &ConversationLog) -> String {
    let user_id = log.user_id.as_deref().unwrap_or("(none)");
    let metadata = match &log.metadata {
        Some(v) => v.to_string(),
        None => "(none)".to_string(),
    };
    format!(
        "ID: {}\nConversation ID: {}\nUser ID: {}\nContent: {}\nTimestamp: {}\nMetadata: {}\n{}",
        log.id, log.conversation_id, user_id, log.content, log.timestamp, metadata, SEPARATOR
    )
}

/// Fixed-width table of per-day counts with a trailing total row.
fn render_weekly_table(rows: &[DailyCount]) -> String {
    let total: i64 = rows.iter().map(|r| r.count).sum();
    let rule = format!("{}  {}", "-".repeat(10), "-".repeat(5));

    let mut out = String::new();
    out.push_str(&format!("{:<10}  {:>5}\n", "Date", "Count"));
    out.push_str(&rule);
    out.push('\n');
    for row in rows {
        out.push_str(&format!("{:<10}  {:>5}\n", row.day.to_string(), row.count));
    }
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("{:<10}  {:>5}", "Total", total));
    out
}

// ============================================================================
// Mode Implementations
// ============================================================================

async fn dump_all(store: &LogStore) -> anyhow::Result<()> {
    // Operator dump: no practical bound on the row count
    let logs = store.list(None, None, i64::MAX).await?;

    if logs.is_empty() {
        println!("{EMPTY_MESSAGE}");
        return Ok(());
    }

    for log in &logs {
        println!("\n{}", format_record(log));
    }
    println!("\nTotal records: {}", logs.len());

    Ok(())
}

async fn dump_last(store: &LogStore) -> anyhow::Result<()> {
    match store.get_latest().await? {
        Some(log) => println!("{}", format_record(&log)),
        None => println!("{EMPTY_MESSAGE}"),
    }
    Ok(())
}

async fn weekly_report(store: &LogStore) -> anyhow::Result<()> {
    let rows = store.weekly_counts(Utc::now()).await?;

    if rows.is_empty() {
        println!("No records in the last 7 days.");
        return Ok(());
    }

    println!("{}", render_weekly_table(&rows));
    Ok(())
}

async fn flush(store: &LogStore) -> anyhow::Result<()> {
    match maintenance::flush_all(store.pool()).await {
        Ok(deleted) => {
            println!("Database flushed successfully ({deleted} rows deleted)");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error flushing database: {e}");
            std::process::exit(1);
        }
    }
}

// ============================================================================
// Main
// ============================================================================

async fn run(mode: Mode) -> anyhow::Result<()> {
    let config = ConvlogConfig::from_env()?;
    let pool = convlog_core::db::create_pool(&config).await?;
    convlog_core::db::init_schema(&pool).await?;
    let store = LogStore::new(pool);

    match mode {
        Mode::All => dump_all(&store).await,
        Mode::Last => dump_last(&store).await,
        Mode::Weekly => weekly_report(&store).await,
        Mode::Flush => flush(&store).await,
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    // Parsing happens before any database connection is opened; an invalid
    // mode never touches the store.
    let cli = Cli::parse();

    if let Err(e) = run(cli.mode).await {
        eprintln!("convlog-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    fn mock_record(id: i64, content: &str) -> ConversationLog {
        ConversationLog {
            id,
            conversation_id: "c1".to_string(),
            user_id: None,
            content: content.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap(),
            metadata: None,
        }
    }

    // ========================================================================
    // TEST 1: record block carries every field and the dashed separator
    // ========================================================================
    #[test]
    fn test_format_record_fields() {
        let mut log = mock_record(7, "hello there");
        log.user_id = Some("user-1".to_string());

        let block = format_record(&log);
        assert!(block.starts_with("ID: 7\n"));
        assert!(block.contains("Conversation ID: c1\n"));
        assert!(block.contains("User ID: user-1\n"));
        assert!(block.contains("Content: hello there\n"));
        assert!(block.contains("Timestamp: 2026-08-06 10:00:00 UTC\n"));
        assert!(block.ends_with(SEPARATOR));
    }

    // ========================================================================
    // TEST 2: absent user and metadata print as "(none)"
    // ========================================================================
    #[test]
    fn test_format_record_absent_optionals() {
        let block = format_record(&mock_record(1, "x"));
        assert!(block.contains("User ID: (none)\n"));
        assert!(block.contains("Metadata: (none)\n"));
    }

    // ========================================================================
    // TEST 3: metadata rendered as its JSON text
    // ========================================================================
    #[test]
    fn test_format_record_metadata_json() {
        let mut log = mock_record(1, "x");
        log.metadata = Some(json!({"channel": "web"}));

        let block = format_record(&log);
        assert!(block.contains(r#"Metadata: {"channel":"web"}"#));
    }

    // ========================================================================
    // TEST 4: weekly table — rows in given order, total row summed
    // ========================================================================
    #[test]
    fn test_render_weekly_table() {
        let rows = vec![
            DailyCount {
                day: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
                count: 4,
            },
            DailyCount {
                day: NaiveDate::from_ymd_opt(2026, 8, 4).unwrap(),
                count: 11,
            },
        ];

        let table = render_weekly_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6, "header, two rules, two rows, total");

        let tokens = |line: &str| line.split_whitespace().map(String::from).collect::<Vec<_>>();
        assert_eq!(tokens(lines[0]), ["Date", "Count"]);
        assert_eq!(lines[1], "----------  -----");
        assert_eq!(tokens(lines[2]), ["2026-08-06", "4"]);
        assert_eq!(tokens(lines[3]), ["2026-08-04", "11"]);
        assert_eq!(lines[4], "----------  -----");
        assert_eq!(tokens(lines[5]), ["Total", "15"]);
    }

    // ========================================================================
    // TEST 5: every table line shares the same fixed width
    // ========================================================================
    #[test]
    fn test_weekly_table_fixed_width() {
        let rows = vec![DailyCount {
            day: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            count: 2,
        }];

        let table = render_weekly_table(&rows);
        for line in table.lines() {
            assert_eq!(line.len(), 17, "line {:?} should be 17 chars", line);
        }
    }

    // ========================================================================
    // TEST 6: invalid mode rejected by the parser (no store access possible)
    // ========================================================================
    #[test]
    fn test_invalid_mode_rejected() {
        let result = Cli::try_parse_from(["convlog-cli", "everything"]);
        assert!(result.is_err(), "unknown mode must fail to parse");

        let result = Cli::try_parse_from(["convlog-cli"]);
        assert!(result.is_err(), "a mode selector is required");
    }

    // ========================================================================
    // TEST 7: all four documented modes parse
    // ========================================================================
    #[test]
    fn test_valid_modes_parse() {
        for mode in ["all", "last", "weekly", "flush"] {
            assert!(
                Cli::try_parse_from(["convlog-cli", mode]).is_ok(),
                "mode {mode} must parse"
            );
        }
    }
}
