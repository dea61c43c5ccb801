//! # Display Indexes
//!
//! Records have no identifier of their own. The CLI addresses them by a
//! 1-based display index: their position in the full stored sequence.
//!
//! Indexes are assigned before any filtering, so `barcodez export 3` always
//! targets the third record ever created, whatever the current search shows.
//! The sequence is append-only, so an index never moves once assigned.
//!
//! - [`index_records`]: pairs every record with its display index.
//! - [`parse_index_or_range`]: parses `"3"` or `"2-5"`.
//! - [`select`]: resolves user selectors against the indexed list.
//!
//! When listing, always index first and filter second. Enumerating a filtered
//! list would renumber it.

use crate::error::{BarcodezError, Result};
use crate::model::BarcodeRecord;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub index: usize,
    pub record: BarcodeRecord,
}

pub fn index_records(records: &[BarcodeRecord]) -> Vec<DisplayRecord> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| DisplayRecord {
            index: i + 1,
            record: record.clone(),
        })
        .collect()
}

/// A parsed user selector: one display index or an inclusive range.
///
/// Ranges stay as their two bounds until [`select`] has checked them against
/// the stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSelector {
    Single(usize),
    Range(usize, usize),
}

impl IndexSelector {
    fn last(&self) -> usize {
        match self {
            IndexSelector::Single(i) => *i,
            IndexSelector::Range(_, end) => *end,
        }
    }

    fn indexes(&self) -> std::ops::RangeInclusive<usize> {
        match *self {
            IndexSelector::Single(i) => i..=i,
            IndexSelector::Range(start, end) => start..=end,
        }
    }
}

impl fmt::Display for IndexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexSelector::Single(i) => write!(f, "{}", i),
            IndexSelector::Range(start, end) => write!(f, "{}-{}", start, end),
        }
    }
}

/// Parses a single index (`"3"`) or an inclusive range (`"2-5"`).
pub fn parse_index_or_range(s: &str) -> std::result::Result<IndexSelector, String> {
    let s = s.trim();
    if let Some((start, end)) = s.split_once('-') {
        let start = parse_index(start)?;
        let end = parse_index(end)?;
        if start > end {
            return Err(format!("Invalid range {}: start is after end", s));
        }
        return Ok(IndexSelector::Range(start, end));
    }
    parse_index(s).map(IndexSelector::Single)
}

fn parse_index(s: &str) -> std::result::Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("Indexes start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid index: {}", s)),
    }
}

/// Resolves selectors to records, in selector order with duplicates removed.
///
/// A selector reaching past the last record is rejected before it is expanded.
pub fn select<I: AsRef<str>>(records: &[BarcodeRecord], selectors: &[I]) -> Result<Vec<DisplayRecord>> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for selector in selectors {
        let selector = parse_index_or_range(selector.as_ref()).map_err(BarcodezError::Api)?;
        if selector.last() > records.len() {
            return Err(BarcodezError::Api(format!(
                "No barcode at index {} ({} stored)",
                selector,
                records.len()
            )));
        }
        for index in selector.indexes() {
            if !seen.insert(index) {
                continue;
            }
            selected.push(DisplayRecord {
                index,
                record: records[index - 1].clone(),
            });
        }
    }

    Ok(selected)
}
