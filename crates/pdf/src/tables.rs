//! Table extraction using text position analysis.
//!
//! Tables are found without ruling lines: spans are grouped into rows by baseline,
//! column edges are the left edges that recur across rows, and a table is a run of
//! consecutive rows that line up with those edges. Each page contributes at most one
//! table, the top-most one.

use crate::errors::ExtractError;
use crate::layout::{walk_pages, TextSpan};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// A table found on one page, first row promoted to headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedTable {
    /// 1-indexed source page.
    pub page_number: u32,
    pub headers: Vec<String>,
    /// Data rows, each exactly `headers.len()` wide. `None` marks an empty cell.
    pub rows: Vec<Vec<Option<String>>>,
}

impl ExtractedTable {
    /// Builds a table from raw rows, using the first row as headers.
    ///
    /// Data rows wider than the header row are truncated and narrower ones are padded
    /// with `None`. Returns `None` when there are no rows at all.
    pub fn from_raw_rows(page_number: u32, raw_rows: Vec<Vec<Option<String>>>) -> Option<Self> {
        let mut rows = raw_rows.into_iter();
        let headers: Vec<String> = rows
            .next()?
            .into_iter()
            .map(|cell| cell.unwrap_or_default())
            .collect();
        let width = headers.len();
        let rows = rows.map(|row| normalize_row(row, width)).collect();
        Some(Self {
            page_number,
            headers,
            rows,
        })
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// Pads with `None` or truncates `row` to exactly `width` cells.
pub fn normalize_row(mut row: Vec<Option<String>>, width: usize) -> Vec<Option<String>> {
    row.resize(width, None);
    row
}

/// Tables found in a document, in page order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableExtraction {
    pub tables: Vec<ExtractedTable>,
    /// Set when extraction failed. `tables` is empty in that case.
    #[serde(skip)]
    pub warning: Option<ExtractError>,
}

/// Extracts at most one table per page from `pdf_data`.
///
/// Never fails: a parse error yields an empty result carrying a warning, so table
/// problems never block text extraction or Q&A.
#[instrument(skip(pdf_data), fields(bytes = pdf_data.len()))]
pub fn extract_tables(pdf_data: &[u8]) -> TableExtraction {
    let detector = TableDetector::new();
    let mut tables = Vec::new();

    let walked = walk_pages(pdf_data, |page_number, spans| {
        if let Some(table) = detector.first_table(page_number, &spans) {
            debug!(
                page_number,
                columns = table.column_count(),
                rows = table.rows.len(),
                "Detected table"
            );
            tables.push(table);
        }
    });

    match walked {
        Ok(page_count) => {
            info!(page_count, tables = tables.len(), "Table extraction finished");
            TableExtraction {
                tables,
                warning: None,
            }
        }
        Err(e) => {
            warn!(error = %e, "Table extraction failed");
            TableExtraction {
                tables: Vec::new(),
                warning: Some(ExtractError::TableExtractionFailed(e.to_string())),
            }
        }
    }
}

/// A row of spans sharing a baseline.
#[derive(Debug, Clone)]
struct RowData {
    y: f32,
    spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows, header included.
    pub min_rows: usize,
    pub min_columns: usize,
    /// Above this, the alignment is more likely word-level splitting than a table.
    pub max_columns: usize,
    /// Baseline tolerance for grouping spans into rows, as a fraction of font size.
    pub y_tolerance_factor: f32,
    /// Fraction of a row's spans that must sit on a column edge.
    pub min_alignment_ratio: f32,
    /// Minimum distance between two column edges, in points.
    pub min_column_gap: f32,
    /// Width of the buckets left edges are snapped to, in points.
    pub edge_bucket: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 12,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.6,
            min_column_gap: 15.0,
            edge_bucket: 5.0,
        }
    }
}

/// Finds tables among the spans of one page.
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDetector {
    pub fn new() -> Self {
        Self::with_config(TableDetectorConfig::default())
    }

    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Returns the top-most table on the page, if any.
    pub fn first_table(&self, page_number: u32, spans: &[TextSpan]) -> Option<ExtractedTable> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            return None;
        }

        let rows = self.group_into_rows(spans);
        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns {
            return None;
        }

        for (start, end) in self.find_table_regions(&rows, &columns) {
            let region = &rows[start..=end];
            // Column edges are re-derived from the region alone.
            let region_columns = self.detect_columns(region);
            if region_columns.len() < self.config.min_columns
                || region_columns.len() > self.config.max_columns
            {
                debug!(
                    page_number,
                    columns = region_columns.len(),
                    "Skipping region with unusable column count"
                );
                continue;
            }
            let raw_rows = region
                .iter()
                .map(|row| self.cells_for_row(row, &region_columns))
                .collect();
            return ExtractedTable::from_raw_rows(page_number, raw_rows);
        }
        None
    }

    /// Groups spans into rows, top of the page first.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<RowData> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        let mut rows: Vec<RowData> = Vec::new();
        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match rows.last_mut() {
                Some(row) if (row.y - span.y).abs() <= tolerance => row.spans.push(span),
                _ => rows.push(RowData {
                    y: span.y,
                    spans: vec![span],
                }),
            }
        }
        for row in &mut rows {
            row.spans.sort_by(|a, b| a.x.total_cmp(&b.x));
        }
        rows
    }

    /// Left edges shared by enough multi-span rows, merged when closer than the gap.
    fn detect_columns(&self, rows: &[RowData]) -> Vec<f32> {
        let multi_span_rows: Vec<&RowData> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        if multi_span_rows.len() < self.config.min_rows {
            return Vec::new();
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &multi_span_rows {
            let buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|s| (s.x / self.config.edge_bucket).round() as i32)
                .collect();
            for bucket in buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences = ((multi_span_rows.len() as f32 * self.config.min_alignment_ratio)
            as usize)
            .max(2);
        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * self.config.edge_bucket)
            .collect();
        edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Runs of consecutive aligned rows, at least `min_rows` long.
    fn find_table_regions(&self, rows: &[RowData], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = row.spans.len() >= 2
                && self.alignment_score(row, columns) >= self.config.min_alignment_ratio;
            match (aligned, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    if i - s >= self.config.min_rows {
                        regions.push((s, i - 1));
                    }
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }
        regions
    }

    fn alignment_score(&self, row: &RowData, columns: &[f32]) -> f32 {
        if row.spans.is_empty() {
            return 0.0;
        }
        let tolerance = self.config.edge_bucket;
        let aligned = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= tolerance))
            .count();
        aligned as f32 / row.spans.len() as f32
    }

    /// Distributes a row's spans over the columns; empty columns become `None`.
    fn cells_for_row(&self, row: &RowData, columns: &[f32]) -> Vec<Option<String>> {
        let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
        for span in &row.spans {
            let index = column_for(span.x, columns, self.config.edge_bucket);
            cells[index].push(span.text.trim());
        }
        cells
            .into_iter()
            .map(|parts| {
                let text = parts.join(" ");
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            })
            .collect()
    }
}

/// The right-most column whose edge is at or left of `x`, allowing `tolerance`.
fn column_for(x: f32, columns: &[f32], tolerance: f32) -> usize {
    columns
        .iter()
        .rposition(|edge| x >= edge - tolerance)
        .unwrap_or(0)
}
