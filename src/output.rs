use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use chrono::{DateTime, FixedOffset, Local, Utc};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::OutputFormat;

/// Global output settings, written once in `main` before any command runs.
static OUTPUT_FORMAT: AtomicU8 = AtomicU8::new(0);
static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_format(format: OutputFormat) {
    let raw = match format {
        OutputFormat::Table => 0,
        OutputFormat::Json => 1,
        OutputFormat::Compact => 2,
    };
    OUTPUT_FORMAT.store(raw, Ordering::Relaxed);
}

pub fn format() -> OutputFormat {
    match OUTPUT_FORMAT.load(Ordering::Relaxed) {
        1 => OutputFormat::Json,
        2 => OutputFormat::Compact,
        _ => OutputFormat::Table,
    }
}

pub fn is_json_output() -> bool {
    matches!(format(), OutputFormat::Json)
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a list as a table, JSON array, or one line per item.
pub fn print_table<'a, T, R, F, C>(items: &'a [T], to_row: F, to_compact: C)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&'a T) -> R,
    C: Fn(&T) -> String,
{
    match format() {
        OutputFormat::Json => print_json(&items),
        OutputFormat::Compact => {
            for item in items {
                println!("{}", to_compact(item));
            }
        }
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{table}");
        }
    }
}

/// Print a single item or JSON depending on output mode
pub fn print_item<T: Serialize>(item: &T, display: impl FnOnce(&T)) {
    if is_json_output() {
        print_json(item);
    } else {
        display(item);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "failed to serialize output"),
    }
}

/// Print a status message. Suppressed by `--quiet`; JSON mode wraps it in an object.
pub fn print_message(message: &str) {
    if is_quiet() {
        return;
    }
    if is_json_output() {
        print_json(&serde_json::json!({ "message": message }));
    } else {
        println!("{message}");
    }
}

/// Colour a status name by its Jira status category.
pub fn status_colored(status: &str, category: Option<&str>) -> String {
    if is_json_output() {
        return status.to_string();
    }
    match category {
        Some("done") => status.green().to_string(),
        Some("indeterminate") => status.blue().to_string(),
        Some("new") => status.bright_black().to_string(),
        _ => status.to_string(),
    }
}

/// Parse a Jira timestamp (`2024-01-31T09:15:00.000+0000`) or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::<FixedOffset>::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a timestamp in local time
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => {
            let local: DateTime<Local> = dt.into();
            local.format("%Y-%m-%d %H:%M").to_string()
        }
        None => date_prefix(raw),
    }
}

/// Format a timestamp as date only
pub fn format_date_only(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => date_prefix(raw),
    }
}

/// Format a relative time (e.g., "2 days ago")
pub fn format_relative(raw: &str) -> String {
    format_relative_to(raw, Utc::now())
}

fn format_relative_to(raw: &str, now: DateTime<Utc>) -> String {
    let Some(dt) = parse_timestamp(raw) else {
        return date_prefix(raw);
    };

    let diff = now.signed_duration_since(dt);
    let plural = |n: i64| if n == 1 { "" } else { "s" };

    if diff.num_seconds() < 60 {
        "just now".to_string()
    } else if diff.num_minutes() < 60 {
        let mins = diff.num_minutes();
        format!("{} min{} ago", mins, plural(mins))
    } else if diff.num_hours() < 24 {
        let hours = diff.num_hours();
        format!("{} hour{} ago", hours, plural(hours))
    } else if diff.num_days() < 30 {
        let days = diff.num_days();
        format!("{} day{} ago", days, plural(days))
    } else {
        format_date_only(raw)
    }
}

fn date_prefix(raw: &str) -> String {
    raw.split('T').next().unwrap_or(raw).to_string()
}

/// Truncate a string with ellipsis, counting characters rather than bytes.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Human-readable byte size.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
