use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{in_range, DrawRecord, HistoricalSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Every digit run of a line starting with a digit, dates included.
    #[default]
    Lenient,
    /// Delimited columns: optional leading date, then numbers within `1..=N`.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub records: HistoricalSet,
    /// Header, comment and blank lines.
    pub ignored: u32,
    /// Data rows refused in strict mode.
    pub rejected: u32,
    /// Digit runs too long for a `u64`, left out of their record.
    pub overflowed: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("champ non numérique : '{0}'")]
    NotANumber(String),
    #[error("numéro {number} hors limites (1-{max})")]
    OutOfRange { number: u64, max: u32 },
    #[error("ligne sans numéro")]
    NoNumbers,
}

fn leading_digit() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d").expect("valid regex"))
}

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
}

/// Lenient parsing of one line, with the count of digit runs that overflow a
/// `u64`. `None` when the line does not start with a digit.
pub fn scan_line(line: &str) -> Option<(DrawRecord, u32)> {
    if !leading_digit().is_match(line) {
        return None;
    }
    let mut numbers = Vec::new();
    let mut overflowed = 0;
    for m in digit_run().find_iter(line) {
        match m.as_str().parse::<u64>() {
            Ok(n) => numbers.push(n),
            Err(_) => overflowed += 1,
        }
    }
    Some((DrawRecord::new(numbers), overflowed))
}

/// Lenient parsing of one line. `None` when the line does not start with a digit.
pub fn parse_line(line: &str) -> Option<DrawRecord> {
    scan_line(line).map(|(record, _)| record)
}

/// Strict parsing of one delimited row. `Ok(None)` for header rows.
pub fn parse_strict_row(fields: &[&str], max_number: u32) -> Result<Option<DrawRecord>, RowError> {
    let Some(first) = fields.first().map(|f| f.trim()) else {
        return Ok(None);
    };
    if !first.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(None);
    }

    let skip = usize::from(first.contains('-') || first.contains('/'));
    let mut numbers = Vec::with_capacity(fields.len());
    for field in &fields[skip..] {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let number = field
            .parse::<u64>()
            .map_err(|_| RowError::NotANumber(field.to_string()))?;
        if !in_range(number, max_number) {
            return Err(RowError::OutOfRange { number, max: max_number });
        }
        numbers.push(number);
    }

    if numbers.is_empty() {
        return Err(RowError::NoNumbers);
    }
    Ok(Some(DrawRecord::new(numbers)))
}

fn detect_delimiter(text: &str) -> u8 {
    let semicolons = text.matches(';').count();
    let commas = text.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

fn parse_lenient(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    for (i, line) in text.lines().enumerate() {
        match scan_line(line) {
            Some((record, overflowed)) => {
                if overflowed > 0 {
                    log::warn!(
                        "ligne {} : {} nombre(s) trop grand(s) ignoré(s)",
                        i + 1,
                        overflowed
                    );
                    report.overflowed += overflowed;
                }
                report.records.push(record);
            }
            None => report.ignored += 1,
        }
    }
    report
}

fn parse_strict(text: &str, max_number: u32) -> ParseReport {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(text))
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut report = ParseReport::default();
    for (line, record_result) in reader.records().enumerate() {
        let record = match record_result {
            Ok(record) => record,
            Err(e) => {
                log::debug!("ligne {} illisible : {}", line + 1, e);
                report.rejected += 1;
                continue;
            }
        };
        let fields: Vec<&str> = record.iter().collect();
        match parse_strict_row(&fields, max_number) {
            Ok(Some(draw)) => report.records.push(draw),
            Ok(None) => report.ignored += 1,
            Err(e) => {
                log::debug!("ligne {} rejetée : {}", line + 1, e);
                report.rejected += 1;
            }
        }
    }
    report
}

/// Parses a whole text resource. `max_number` is only consulted in strict mode.
pub fn parse_text(text: &str, mode: ParseMode, max_number: u32) -> ParseReport {
    match mode {
        ParseMode::Lenient => parse_lenient(text),
        ParseMode::Strict => parse_strict(text, max_number),
    }
}

pub fn read_draws(path: &Path, mode: ParseMode, max_number: u32) -> std::io::Result<ParseReport> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_text(&text, mode, max_number))
}
