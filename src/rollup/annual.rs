//! Assembles the annual rollup for one year.

use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::events::EventCache;
use crate::loader;
use crate::rollup::categories::CATEGORIES;
use crate::rollup::{attendance, metadata, recompute};
use crate::types::{AnnualRow, AnnualSummary};

/// Recomputes the annual summary for `year` from the monthly summaries and
/// enriched archives under `data_dir`.
///
/// The event cache is built once here and shared by reference across every
/// category recomputation and the metadata synthesis. A year with zero
/// included months still yields a document (all-zero metadata, empty
/// category tables, all twelve months listed missing).
///
/// # Errors
///
/// Fails if `year` is not a 4-digit number or the aggregated directory
/// cannot be accessed; per-month problems are classified, not raised.
#[tracing::instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn rollup_year(data_dir: &Path, year: i32) -> Result<AnnualSummary> {
    if !(1000..=9999).contains(&year) {
        bail!("year must be a 4-digit number, got {year}");
    }

    let months = loader::load_year(data_dir, year)?;
    info!(
        included = months.included.len(),
        missing = months.missing.len(),
        "Monthly summaries loaded"
    );

    let cache = EventCache::new(data_dir, year);

    let mut tables: BTreeMap<&str, Vec<AnnualRow>> = BTreeMap::new();
    for def in CATEGORIES {
        let rows = recompute::recompute(def, &months, &cache);
        info!(category = def.key, rows = rows.len(), "Category recomputed");
        tables.insert(def.key, rows);
    }
    let mut table = |key: &str| tables.remove(key).unwrap_or_default();

    let summary = AnnualSummary {
        razors: table("razors"),
        razor_manufacturers: table("razor_manufacturers"),
        razor_formats: table("razor_formats"),
        blades: table("blades"),
        blade_manufacturers: table("blade_manufacturers"),
        brushes: table("brushes"),
        brush_manufacturers: table("brush_manufacturers"),
        brush_fibers: table("brush_fibers"),
        brush_knot_sizes: table("brush_knot_sizes"),
        soaps: table("soaps"),
        soap_makers: table("soap_makers"),
        highest_use_count_of_blades: recompute::recompute_peak_blade_use(&months),
        users: attendance::compute(&months, year)?,
        meta: metadata::synthesize(year, &months, &cache),
    };

    Ok(summary)
}
