//! Output formatters for normalized records and overlap summaries

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::normalizer::Record;
use crate::processing::overlap::TokenSummary;
use colored::{Color, Colorize};
use serde::Serialize;
use serde_json::Value;

/// Trait for rendering loader output
pub trait OutputFormatter {
    fn format_records(&self, records: &[Record]) -> Result<String>;
    fn format_summary(&self, tokens: &[TokenSummary]) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// JSON array output, indented or on a single line
pub struct JsonFormatter {
    pretty: bool,
}

/// One JSON document per line
pub struct JsonLinesFormatter;

/// Aligned table for terminals
pub struct ConsoleFormatter {
    use_colors: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(escape_non_ascii(&json))
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_records(&self, records: &[Record]) -> Result<String> {
        self.render(records)
    }

    fn format_summary(&self, tokens: &[TokenSummary]) -> Result<String> {
        self.render(tokens)
    }

    fn supports_format(&self) -> OutputFormat {
        if self.pretty {
            OutputFormat::Pretty
        } else {
            OutputFormat::Compact
        }
    }
}

impl JsonLinesFormatter {
    fn render<T: Serialize>(items: &[T]) -> Result<String> {
        let lines = items
            .iter()
            .map(|item| serde_json::to_string(item).map(|line| escape_non_ascii(&line)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }
}

impl OutputFormatter for JsonLinesFormatter {
    fn format_records(&self, records: &[Record]) -> Result<String> {
        Self::render(records)
    }

    fn format_summary(&self, tokens: &[TokenSummary]) -> Result<String> {
        Self::render(tokens)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Jsonl
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn grade_color(grade: &str) -> Color {
        match grade {
            "CRITICAL" => Color::Red,
            "HIGH" => Color::BrightRed,
            "MEDIUM" => Color::Yellow,
            "LOW" => Color::Green,
            _ => Color::White,
        }
    }

    fn cell(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_records(&self, records: &[Record]) -> Result<String> {
        // Columns in first-seen order across all records
        let mut columns: Vec<&str> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }

        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(*column).map(Self::cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                rows.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut output = String::new();
        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| format!("{:<width$}", column, width = *width))
            .collect();
        output.push_str(&self.colorize(header.join("  ").trim_end(), Color::Cyan));
        output.push('\n');

        for row in &rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            output.push_str(line.join("  ").trim_end());
            output.push('\n');
        }

        output.push_str(&format!("{} records", records.len()));
        Ok(output)
    }

    fn format_summary(&self, tokens: &[TokenSummary]) -> Result<String> {
        let mut output = self.colorize(
            &format!(
                "{:<4} {:<12} {:<24} {:<9} {:>9} {:>13}  {}",
                "#", "SYMBOL", "NAME", "GRADE", "OVERLAP", "CONCENTRATION", "CHECKED AT"
            ),
            Color::Cyan,
        );
        output.push('\n');

        for (i, token) in tokens.iter().enumerate() {
            let grade = format!("{:<9}", token.grade);
            output.push_str(&format!(
                "{:<4} {:<12} {:<24} {} {:>8.1}% {:>13.2}  {}\n",
                i + 1,
                truncate(&token.symbol, 12),
                truncate(&token.name, 24),
                self.colorize(&grade, Self::grade_color(&token.grade)),
                token.overlap_percentage,
                token.concentration,
                token.discovered_at.as_deref().unwrap_or("-"),
            ));
        }

        output.push_str(&format!("{} tokens", tokens.len()));
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Table
    }
}

/// Rewrite every non-ASCII character of a serialized document as a `\uXXXX`
/// escape (UTF-16 surrogate pairs above the BMP), so output is plain ASCII.
/// Such characters only occur inside string literals, so the result parses to
/// the same value.
fn escape_non_ascii(json: &str) -> String {
    if json.is_ascii() {
        return json.to_string();
    }

    let mut escaped = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    escaped
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Pick the formatter for an output format
pub fn formatter_for(format: OutputFormat, use_colors: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Pretty => Box::new(JsonFormatter::new(true)),
        OutputFormat::Compact => Box::new(JsonFormatter::new(false)),
        OutputFormat::Jsonl => Box::new(JsonLinesFormatter),
        OutputFormat::Table => Box::new(ConsoleFormatter::new(use_colors)),
    }
}
