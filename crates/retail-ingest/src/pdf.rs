//! Tables extracted from PDF documents.
//!
//! Text is pulled from every page with `pdf-extract`, then parsed line by
//! line: the first line whose tokens equal the configured column names is
//! the header, and each following non-empty line is one row split on
//! whitespace. Values in one "wide" column may contain spaces (card
//! provider names such as `Diners Club / Carte Blanche`); that column
//! absorbs whatever tokens are left over once every other column has one.
//! Header lines repeated at the top of later pages are skipped.

use std::time::Duration;

use polars::prelude::DataFrame;
use retail_common::{CellValue, build_frame};

use crate::error::{IngestError, Result};
use crate::http::{DEFAULT_TIMEOUT, HttpClient};
use crate::source::SourceAdapter;

/// Column layout of a PDF table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfTableLayout {
    pub columns: Vec<String>,
    /// Column whose values may span several tokens. Defaults to the last column.
    pub wide_column: Option<String>,
}

impl PdfTableLayout {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            wide_column: None,
        }
    }

    #[must_use]
    pub fn with_wide_column(mut self, column: impl Into<String>) -> Self {
        self.wide_column = Some(column.into());
        self
    }

    /// Layout of the card details document.
    pub fn card_details() -> Self {
        Self::new([
            "card_number",
            "expiry_date",
            "card_provider",
            "date_payment_confirmed",
        ])
        .with_wide_column("card_provider")
    }

    fn wide_index(&self) -> usize {
        self.wide_column
            .as_ref()
            .and_then(|wide| self.columns.iter().position(|c| c == wide))
            .unwrap_or(self.columns.len().saturating_sub(1))
    }

    fn is_header(&self, tokens: &[&str]) -> bool {
        tokens.len() == self.columns.len()
            && tokens.iter().zip(&self.columns).all(|(t, c)| *t == c.as_str())
    }
}

/// Parses extracted PDF text into a table.
///
/// # Errors
///
/// [`IngestError::NoHeaderDetected`] when no header line is found and
/// [`IngestError::EmptySource`] when the header has no rows under it.
pub fn parse_table_text(source_name: &str, text: &str, layout: &PdfTableLayout) -> Result<DataFrame> {
    let width = layout.columns.len();
    let wide = layout.wide_index();
    let mut headers_seen = 0usize;
    let mut rows: Vec<Vec<CellValue>> = Vec::new();

    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if layout.is_header(&tokens) {
            headers_seen += 1;
            continue;
        }
        // Titles and captions before the first header
        if headers_seen == 0 {
            continue;
        }
        rows.push(split_row(&tokens, width, wide));
    }

    if headers_seen == 0 {
        return Err(IngestError::NoHeaderDetected {
            source_name: source_name.to_string(),
        });
    }
    if rows.is_empty() {
        return Err(IngestError::EmptySource {
            source_name: source_name.to_string(),
        });
    }

    tracing::debug!(
        source = source_name,
        rows = rows.len(),
        pages = headers_seen,
        "parsed PDF table"
    );
    Ok(build_frame(&layout.columns, rows)?)
}

/// Splits row tokens into `width` cells, merging surplus tokens into the wide column.
///
/// Short rows are padded with nulls.
fn split_row(tokens: &[&str], width: usize, wide: usize) -> Vec<CellValue> {
    if tokens.len() <= width {
        return tokens.iter().copied().map(text_cell).collect();
    }

    let after = width - wide - 1;
    let wide_end = tokens.len() - after;
    let mut cells = Vec::with_capacity(width);
    cells.extend(tokens[..wide].iter().copied().map(text_cell));
    cells.push(CellValue::Text(tokens[wide..wide_end].join(" ")));
    cells.extend(tokens[wide_end..].iter().copied().map(text_cell));
    cells
}

fn text_cell(token: &str) -> CellValue {
    CellValue::Text(token.to_string())
}

/// Extracts the text of every page of a PDF held in memory.
pub fn extract_pdf_text(source_name: &str, bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::PdfExtract {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

/// A PDF table read from a local path or an HTTP(S) URL.
#[derive(Debug, Clone)]
pub struct PdfSource {
    location: String,
    layout: PdfTableLayout,
    timeout: Duration,
}

impl PdfSource {
    pub fn new(location: impl Into<String>, layout: PdfTableLayout) -> Self {
        Self {
            location: location.into(),
            layout,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn is_remote(&self) -> bool {
        self.location.starts_with("https://") || self.location.starts_with("http://")
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        if self.is_remote() {
            HttpClient::new(self.timeout)?.get_bytes(&self.location, &[])
        } else {
            crate::read_file(std::path::Path::new(&self.location))
        }
    }
}

impl SourceAdapter for PdfSource {
    fn describe(&self) -> String {
        self.location.clone()
    }

    fn fetch(&self) -> Result<DataFrame> {
        let bytes = self.read_bytes()?;
        let text = extract_pdf_text(&self.location, &bytes)?;
        parse_table_text(&self.location, &text, &self.layout)
    }
}
