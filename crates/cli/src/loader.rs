//! CSV in and out.
//!
//! Input cells are handed to the core as text; price and timestamp parsing
//! happen in the row conversion so every caller shares one validation path.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use rfm_core::{FieldValue, OrderRow};

/// Read order rows from a CSV file with a header line.
pub fn read_orders(path: &Path) -> Result<Vec<OrderRow>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let rows = read_orders_from(file).with_context(|| format!("failed to read {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "orders loaded");
    Ok(rows)
}

pub fn read_orders_from<R: Read>(reader: R) -> Result<Vec<OrderRow>> {
    let start = Instant::now();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers().context("missing CSV header")?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV record {}", index + 1))?;
        let row: OrderRow = headers
            .iter()
            .zip(record.iter())
            .map(|(column, cell)| (column.to_owned(), FieldValue::from_cell(cell)))
            .collect();
        rows.push(row);
    }

    debug!(
        rows = rows.len(),
        columns = headers.len(),
        elapsed_us = start.elapsed().as_micros(),
        "csv parsed"
    );
    Ok(rows)
}

/// Write any serializable table as CSV, header taken from field names.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "table written");
    Ok(())
}
