//! Terminal output for command results.
//!
//! Layout (widths, truncation, padding) is computed here with
//! `unicode-width`; colour comes from `colored`, which turns itself off when
//! stdout is not a terminal.

use barcodez::commands::{CmdMessage, MessageLevel};
use barcodez::config::BarcodezConfig;
use barcodez::index::DisplayRecord;
use chrono::{DateTime, Utc};
use colored::Colorize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const TYPE_WIDTH: usize = 5;
const SIZE_WIDTH: usize = 9;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_records(records: &[DisplayRecord]) {
    for line in render_record_lines(records, Utc::now()) {
        println!("{}", line);
    }
}

pub fn print_config(config: &BarcodezConfig) {
    for (key, value) in config.list_all() {
        println!("{} = {}", key, value);
    }
}

/// One row per record: index, type, value, size, then age right-aligned.
fn render_record_lines(records: &[DisplayRecord], now: DateTime<Utc>) -> Vec<String> {
    let idx_width = records
        .iter()
        .map(|dr| format!("{}. ", dr.index).width())
        .max()
        .unwrap_or(0);

    records
        .iter()
        .map(|dr| {
            let idx = format!("{:>width$}", format!("{}. ", dr.index), width = idx_width);
            let label = format!("{:<width$}", dr.record.symbology.label(), width = TYPE_WIDTH);
            let size = format!(
                "{:<width$}",
                format!("{}x{}", dr.record.size.module_width, dr.record.size.bar_height),
                width = SIZE_WIDTH
            );

            let fixed = 2 + idx_width + TYPE_WIDTH + 1 + SIZE_WIDTH + 1 + TIME_WIDTH;
            let available = LINE_WIDTH.saturating_sub(fixed);
            let value = truncate_to_width(&dr.record.value, available);
            let padding = " ".repeat(available.saturating_sub(value.width()));

            format!(
                "  {}{} {}{} {}{}",
                idx.yellow(),
                label.cyan(),
                value,
                padding,
                size.dimmed(),
                format_time_ago(dr.record.created_at, now).dimmed()
            )
        })
        .collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
