//! Data types for the annual rollup pipeline.
//!
//! Monthly summaries and enriched event archives are the two file-shaped
//! inputs; the annual summary is the single file-shaped output. Output
//! structs declare `rank` first so serialized rows keep a stable field order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata block of a monthly summary file.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyMeta {
    pub month: String,
    pub total_shaves: u64,
    pub unique_shavers: u64,
}

/// One pre-aggregated category row from a monthly summary.
///
/// `name` is the composite identity computed at monthly-aggregation time
/// (e.g. "Karve Christopher Bradley"); it is never recomputed here, only
/// matched against event-derived identities.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyRow {
    pub name: String,
    pub shaves: u64,
    pub unique_users: u64,
    #[serde(default)]
    pub rank: Option<u32>,
}

/// One "highest use count of blades" row: peak repeated-use count reported
/// for a (user, blade, format) tuple within the month.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyBladeUseRow {
    pub user: String,
    pub blade: String,
    pub format: String,
    pub uses: u64,
    #[serde(default)]
    pub rank: Option<u32>,
}

/// One per-user row from a monthly summary.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyUserRow {
    pub user: String,
    pub shaves: u64,
    pub missed_days: u32,
    #[serde(default)]
    pub rank: Option<u32>,
}

/// A fully parsed monthly summary file.
///
/// Every section is required; a file with a section absent or not shaped as
/// a list of objects fails deserialization and the month is classified
/// missing by the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlySummary {
    pub meta: MonthlyMeta,

    pub razors: Vec<MonthlyRow>,
    pub razor_manufacturers: Vec<MonthlyRow>,
    pub razor_formats: Vec<MonthlyRow>,
    pub blades: Vec<MonthlyRow>,
    pub blade_manufacturers: Vec<MonthlyRow>,
    pub brushes: Vec<MonthlyRow>,
    pub brush_manufacturers: Vec<MonthlyRow>,
    pub brush_fibers: Vec<MonthlyRow>,
    pub brush_knot_sizes: Vec<MonthlyRow>,
    pub soaps: Vec<MonthlyRow>,
    pub soap_makers: Vec<MonthlyRow>,

    pub highest_use_count_of_blades: Vec<MonthlyBladeUseRow>,
    pub users: Vec<MonthlyUserRow>,
}

impl MonthlySummary {
    /// Looks up a summed-category section by its registry key.
    pub fn category_rows(&self, key: &str) -> Option<&[MonthlyRow]> {
        let rows = match key {
            "razors" => &self.razors,
            "razor_manufacturers" => &self.razor_manufacturers,
            "razor_formats" => &self.razor_formats,
            "blades" => &self.blades,
            "blade_manufacturers" => &self.blade_manufacturers,
            "brushes" => &self.brushes,
            "brush_manufacturers" => &self.brush_manufacturers,
            "brush_fibers" => &self.brush_fibers,
            "brush_knot_sizes" => &self.brush_knot_sizes,
            "soaps" => &self.soaps,
            "soap_makers" => &self.soap_makers,
            _ => return None,
        };
        Some(rows)
    }
}

/// The loader's result for one year: parsed summaries keyed by `YYYY-MM`,
/// plus the sorted included/missing month lists. `rejected` records why a
/// present-but-invalid file was classified missing.
#[derive(Debug, Default)]
pub struct MonthlySummaries {
    pub by_month: BTreeMap<String, MonthlySummary>,
    pub included: Vec<String>,
    pub missing: Vec<String>,
    pub rejected: Vec<(String, String)>,
}

/// Razor attributes of an enriched event record.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorInfo {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub format: Option<String>,
}

/// Blade attributes of an enriched event record.
#[derive(Debug, Clone, Deserialize)]
pub struct BladeInfo {
    pub brand: String,
    pub model: String,
}

/// Brush attributes of an enriched event record.
#[derive(Debug, Clone, Deserialize)]
pub struct BrushInfo {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub fiber: Option<String>,
    #[serde(default)]
    pub knot_size: Option<f64>,
}

/// Soap attributes of an enriched event record.
#[derive(Debug, Clone, Deserialize)]
pub struct SoapInfo {
    pub maker: String,
    pub scent: String,
}

/// One atomic logged shave from a per-month enriched archive.
///
/// Authors are case-preserving and compared case-sensitively. Every product
/// section is optional; an event with no recognized attributes for a
/// category is excluded from that category's extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub author: String,
    #[serde(default)]
    pub razor: Option<RazorInfo>,
    #[serde(default)]
    pub blade: Option<BladeInfo>,
    #[serde(default)]
    pub brush: Option<BrushInfo>,
    #[serde(default)]
    pub soap: Option<SoapInfo>,
}

/// A per-month enriched archive file.
#[derive(Debug, Deserialize)]
pub struct EnrichedArchive {
    pub month: String,
    pub data: Vec<EventRecord>,
}

/// One annual output row for a summed category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualRow {
    pub rank: u32,
    pub name: String,
    pub shaves: u64,
    pub unique_users: u64,
    pub avg_shaves_per_user: f64,
    pub median_shaves_per_user: f64,
}

/// One annual output row for the peak blade-use table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualBladeUseRow {
    pub rank: u32,
    pub user: String,
    pub blade: String,
    pub format: String,
    pub uses: u64,
}

/// One annual attendance row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualUserRow {
    pub rank: u32,
    pub user: String,
    pub shaves: u64,
    pub missed_days: i64,
}

/// Year-level metadata of the annual document.
///
/// `total_shaves` is trusted from monthly metadata; `unique_shavers` is
/// recomputed from the event cache. `event_archive_months` counts the
/// enriched archives that actually loaded, so understated participant
/// statistics are visible when archives are incomplete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualMeta {
    pub year: i32,
    pub total_shaves: u64,
    pub unique_shavers: u64,
    pub avg_shaves_per_user: f64,
    pub median_shaves_per_user: f64,
    pub event_archive_months: usize,
    pub included_months: Vec<String>,
    pub missing_months: Vec<String>,
}

/// The complete annual rollup document, written as
/// `aggregated/annual/{year}.json`.
#[derive(Debug, Clone, Serialize)]
pub struct AnnualSummary {
    pub meta: AnnualMeta,

    pub razors: Vec<AnnualRow>,
    pub razor_manufacturers: Vec<AnnualRow>,
    pub razor_formats: Vec<AnnualRow>,
    pub blades: Vec<AnnualRow>,
    pub blade_manufacturers: Vec<AnnualRow>,
    pub brushes: Vec<AnnualRow>,
    pub brush_manufacturers: Vec<AnnualRow>,
    pub brush_fibers: Vec<AnnualRow>,
    pub brush_knot_sizes: Vec<AnnualRow>,
    pub soaps: Vec<AnnualRow>,
    pub soap_makers: Vec<AnnualRow>,

    pub highest_use_count_of_blades: Vec<AnnualBladeUseRow>,
    pub users: Vec<AnnualUserRow>,
}
