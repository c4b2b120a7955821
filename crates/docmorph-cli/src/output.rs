//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with dedicated
//! layouts for extracted documents, query matches and rule reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use docmorph_core::{find_envelopes, ExtendedValue, MatchedNode};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, trace, warn};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format query matches
    fn format_matches(&self, matches: &[MatchedNode<'_>]) -> Result<String>;

    /// Format a rule file validation report
    fn format_rule_report(&self, report: &RuleReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_matches(&self, matches: &[MatchedNode<'_>]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_matches_human(matches)),
            _ => {
                let records: Vec<MatchRecord<'_>> = matches
                    .iter()
                    .map(|m| MatchRecord {
                        path: m.normalized_path(),
                        value: m.value,
                    })
                    .collect();
                self.format(&records)
            }
        }
    }

    fn format_rule_report(&self, report: &RuleReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_rule_report_human(report)),
            _ => self.format(report),
        }
    }
}

/// A query match as written in machine formats
#[derive(Debug, Serialize)]
struct MatchRecord<'a> {
    path: String,
    value: &'a Value,
}

/// Outcome of validating a rule file
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleReport {
    pub file: String,
    pub groups: Vec<GroupReport>,
}

/// Validation outcome for one rule group
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub id: String,
    pub label: String,
    pub rules: usize,
    pub problems: Vec<RuleProblem>,
}

/// A rule that failed validation
#[derive(Debug, Clone, Serialize)]
pub struct RuleProblem {
    pub index: usize,
    pub source: String,
    pub message: String,
}

impl RuleReport {
    /// Total number of invalid rules across all groups
    pub fn problem_count(&self) -> usize {
        self.groups.iter().map(|g| g.problems.len()).sum()
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Yaml {
            // serde_yaml already ends with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write a converted or extracted document
    ///
    /// Human output follows the document with a list of the extended
    /// values it contains, decoded. Objects whose `@ext` member does not
    /// decode are left out of that list.
    pub fn document(&mut self, document: &Value) -> Result<()> {
        self.data(document)?;

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        let extended: Vec<(String, ExtendedValue)> = find_envelopes(document)
            .into_iter()
            .filter_map(|(path, raw)| match ExtendedValue::decode(raw) {
                Ok(value) => Some((path, value)),
                Err(e) => {
                    warn!(path = %path, error = %e, "Skipping undecodable extended value");
                    None
                }
            })
            .collect();
        if extended.is_empty() {
            return Ok(());
        }

        self.section("Extended Values")?;
        for (path, value) in &extended {
            let line = format_extended_human(path, value);
            self.writeln(&line)?;
        }
        Ok(())
    }

    /// Write query matches
    pub fn matches(&mut self, matches: &[MatchedNode<'_>]) -> Result<()> {
        let formatted = self.format.format_matches(matches)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a rule file validation report
    pub fn rule_report(&mut self, report: &RuleReport) -> Result<()> {
        let formatted = self.format.format_rule_report(report)?;
        let formatted = if self.use_color && self.format == OutputFormat::Human {
            colorize_report(&formatted)
        } else {
            formatted
        };
        self.writeln(formatted.trim_end())
    }
}

fn format_matches_human(matches: &[MatchedNode<'_>]) -> String {
    if matches.is_empty() {
        return "No matches".to_string();
    }

    let mut output = format!("{} match(es)\n", matches.len());
    for node in matches {
        output.push_str(&format!(
            "{} = {}\n",
            node.normalized_path(),
            format_value_compact(node.value)
        ));
    }
    output
}

fn format_rule_report_human(report: &RuleReport) -> String {
    let mut output = format!("Rule file: {}\n", report.file);
    for group in &report.groups {
        let marker = if group.problems.is_empty() { "✓" } else { "✗" };
        output.push_str(&format!(
            "{} {} ({}): {} rule(s)\n",
            marker, group.id, group.label, group.rules
        ));
        for problem in &group.problems {
            output.push_str(&format!("  rule {} `{}`\n", problem.index, problem.source));
            for line in problem.message.lines() {
                output.push_str(&format!("    {}\n", line));
            }
        }
    }

    match report.problem_count() {
        0 => output.push_str("All rules are valid\n"),
        n => output.push_str(&format!("{} invalid rule(s)\n", n)),
    }
    output
}

fn colorize_report(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.starts_with('✓') {
                line.green().to_string()
            } else if line.starts_with('✗') {
                line.red().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_extended_human(path: &str, value: &ExtendedValue) -> String {
    let path = if path.is_empty() { "(root)" } else { path };
    match value {
        ExtendedValue::BigInt(n) => format!("{}: bigint {}", path, n),
        ExtendedValue::Date(dt) => format!("{}: date {}", path, dt.to_rfc3339()),
        ExtendedValue::Bytes(bytes) => format!("{}: uint8array ({} bytes)", path, bytes.len()),
        ExtendedValue::Plain(v) => format!("{}: {}", path, format_value_compact(v)),
    }
}

/// Single-line rendering of a value, truncating long containers
fn format_value_compact(value: &Value) -> String {
    const MAX_LEN: usize = 80;
    let text = value.to_string();
    if text.chars().count() <= MAX_LEN {
        return text;
    }
    let truncated: String = text.chars().take(MAX_LEN - 3).collect();
    format!("{}...", truncated)
}
