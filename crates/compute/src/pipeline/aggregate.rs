//! RFM aggregation: reduce order rows to one metrics record per customer.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use rfm_core::{CustomerMetrics, OrderRecord, OrderRow, Result};

/// Running totals for a single customer.
struct CustomerAccumulator<'a> {
    latest_purchase: NaiveDateTime,
    orders: HashSet<&'a str>,
    monetary: f64,
}

/// Validate raw rows and aggregate them.
///
/// Stops at the first row that fails conversion; no partial output is
/// returned. An empty row set yields an empty result.
pub fn aggregate(rows: &[OrderRow], reference_date: NaiveDate) -> Result<Vec<CustomerMetrics>> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| OrderRecord::from_row(row, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(aggregate_records(&records, reference_date))
}

/// Aggregate typed records into per-customer metrics, ordered by `customer_id`.
///
/// Recency is measured from the *date* of the latest purchase; the time of
/// day is dropped before subtracting from `reference_date`.
pub fn aggregate_records(records: &[OrderRecord], reference_date: NaiveDate) -> Vec<CustomerMetrics> {
    let start = Instant::now();

    let mut customers: BTreeMap<&str, CustomerAccumulator<'_>> = BTreeMap::new();
    for record in records {
        let acc = customers
            .entry(record.customer_id.as_str())
            .or_insert_with(|| CustomerAccumulator {
                latest_purchase: record.order_purchase_timestamp,
                orders: HashSet::new(),
                monetary: 0.0,
            });

        acc.latest_purchase = acc.latest_purchase.max(record.order_purchase_timestamp);
        acc.orders.insert(record.order_id.as_str());
        acc.monetary += record.price;
    }

    let metrics: Vec<CustomerMetrics> = customers
        .into_iter()
        .map(|(customer_id, acc)| CustomerMetrics {
            customer_id: customer_id.to_owned(),
            recency: (reference_date - acc.latest_purchase.date()).num_days(),
            frequency: acc.orders.len() as u64,
            monetary: acc.monetary,
        })
        .collect();

    let future_purchases = metrics.iter().filter(|m| m.recency < 0).count();
    if future_purchases > 0 {
        warn!(
            customers = future_purchases,
            %reference_date,
            "latest purchase after reference date, recency is negative"
        );
    }

    debug!(
        rows = records.len(),
        customers = metrics.len(),
        elapsed_us = start.elapsed().as_micros(),
        "aggregate completed"
    );

    metrics
}
