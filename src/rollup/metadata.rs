//! Year-level metadata assembly.

use std::collections::BTreeMap;
use tracing::warn;

use crate::events::EventCache;
use crate::rollup::utility::{median, round1};
use crate::types::{AnnualMeta, MonthlySummaries};

/// Builds the annual metadata block.
///
/// `total_shaves` trusts each included month's own reported total (a month's
/// total may cover events outside any single category, so recomputing it
/// from events would undercount). `unique_shavers` comes from the event
/// cache instead of monthly sums, which would overcount repeat shavers.
pub fn synthesize(year: i32, months: &MonthlySummaries, cache: &EventCache) -> AnnualMeta {
    let total_shaves: u64 = months
        .by_month
        .values()
        .map(|s| s.meta.total_shaves)
        .sum();

    let unique_shavers = cache.distinct_authors();
    let avg = if unique_shavers == 0 {
        0.0
    } else {
        round1(total_shaves as f64 / unique_shavers as f64)
    };

    // Median of per-user annual totals, from the monthly user rows.
    let mut per_user: BTreeMap<&str, u64> = BTreeMap::new();
    for summary in months.by_month.values() {
        for row in &summary.users {
            *per_user.entry(row.user.as_str()).or_insert(0) += row.shaves;
        }
    }
    let mut totals: Vec<u64> = per_user.into_values().collect();
    let median_shaves = round1(median(&mut totals));

    let event_archive_months = cache.months_loaded();
    if event_archive_months < months.included.len() {
        warn!(
            year,
            included_months = months.included.len(),
            event_archive_months,
            "Fewer event archives than included months; participant statistics may be understated"
        );
    }

    AnnualMeta {
        year,
        total_shaves,
        unique_shavers,
        avg_shaves_per_user: avg,
        median_shaves_per_user: median_shaves,
        event_archive_months,
        included_months: months.included.clone(),
        missing_months: months.missing.clone(),
    }
}
