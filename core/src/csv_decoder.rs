//! CSV decoder: raw delimited text to ordered rows of trimmed fields.
//!
//! The grammar is deliberately small:
//!   - `"` toggles an in-quotes flag and is never part of a value.
//!   - `,` separates fields only outside quotes.
//!   - CR or LF ends a row only outside quotes.
//!   - Every field is trimmed.
//!   - A line holding nothing but whitespace is blank and dropped.
//!
//! The first non-blank row is the header. Line numbers count non-blank rows
//! from 1, so the header is line 1 and the k-th data row is line k + 1.
//! A row of empty fields such as `,,` is not blank; it keeps its line number
//! and is left to the caller to skip.
//!
//! A quote still open at the end of the text would swallow every row after
//! it. The decoder then rescans from the row where the quote opened with
//! line breaks always ending rows, and reports that row's line.

use thiserror::Error;

/// One decoded data row with its line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub line: usize,
    pub fields: Vec<String>,
}

impl CsvRow {
    /// Field at `index`, or "" when the row is shorter than the header.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// True when every field is empty, e.g. a `,,` line.
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(String::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCsv {
    pub header: Vec<String>,
    pub rows: Vec<CsvRow>,
    /// Line of the row whose quote was never closed, if any.
    pub unterminated_quote: Option<usize>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer than two non-blank rows: nothing beyond a header.
    #[error("File is empty or contains only a header")]
    TooShort { rows: usize },
}

/// Decode `text` into a header and its data rows.
pub fn decode(text: &str) -> Result<DecodedCsv, DecodeError> {
    let (records, unterminated_quote) = split_records(text);
    if records.len() < 2 {
        return Err(DecodeError::TooShort { rows: records.len() });
    }
    if let Some(line) = unterminated_quote {
        log::warn!("line {line}: quote is never closed, rows after it rescanned");
    }

    let mut records = records.into_iter();
    let header = records.next().unwrap_or_default();
    let rows = records
        .enumerate()
        .map(|(i, fields)| CsvRow { line: i + 2, fields })
        .collect::<Vec<_>>();

    log::debug!("decoded csv: {} columns, {} data rows", header.len(), rows.len());
    Ok(DecodedCsv {
        header,
        rows,
        unterminated_quote,
    })
}

/// Split text into non-blank records of trimmed fields, plus the line of
/// the record left inside an open quote.
fn split_records(text: &str) -> (Vec<Vec<String>>, Option<usize>) {
    let mut scanner = Scanner::default();
    match scanner.scan(text, true) {
        None => (scanner.finish(), None),
        Some(open_at) => {
            let line = scanner.records.len() + 1;
            scanner.discard_record();
            scanner.scan(&text[open_at..], false);
            (scanner.finish(), Some(line))
        }
    }
}

#[derive(Default)]
struct Scanner {
    records: Vec<Vec<String>>,
    fields: Vec<String>,
    current: String,
    /// Any non-whitespace character seen in the current record.
    has_content: bool,
}

impl Scanner {
    /// Feed `text`. Returns the byte offset where the open record starts
    /// when a quote is still open at the end.
    fn scan(&mut self, text: &str, quotes_span_lines: bool) -> Option<usize> {
        let mut in_quotes = false;
        let mut record_start = 0;
        for (pos, c) in text.char_indices() {
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    self.has_content = true;
                }
                ',' if !in_quotes => {
                    self.end_field();
                    self.has_content = true;
                }
                '\r' | '\n' if !in_quotes || !quotes_span_lines => {
                    in_quotes = false;
                    self.end_record();
                    record_start = pos + 1;
                }
                _ => {
                    self.has_content |= !c.is_whitespace();
                    self.current.push(c);
                }
            }
        }
        in_quotes.then_some(record_start)
    }

    fn end_field(&mut self) {
        self.fields.push(self.current.trim().to_string());
        self.current.clear();
    }

    fn end_record(&mut self) {
        self.end_field();
        let fields = std::mem::take(&mut self.fields);
        if std::mem::take(&mut self.has_content) {
            self.records.push(fields);
        }
    }

    fn discard_record(&mut self) {
        self.fields.clear();
        self.current.clear();
        self.has_content = false;
    }

    fn finish(mut self) -> Vec<Vec<String>> {
        if self.has_content {
            self.end_record();
        }
        self.records
    }
}
