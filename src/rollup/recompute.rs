//! The generic category reducer.
//!
//! Event counts are summed straight from the monthly rows (months never
//! overlap, so summation conserves events). Participant counts and medians
//! are a different story: adding monthly `unique_users` values overcounts
//! anyone active in more than one month, so both are re-derived from the
//! Event Record Cache and overwrite whatever the monthly rows reported.

use std::collections::{BTreeMap, HashMap};

use crate::events::EventCache;
use crate::rollup::categories::CategoryDef;
use crate::rollup::rank::competition_ranks;
use crate::rollup::utility::{join_key, median, round1};
use crate::types::{AnnualBladeUseRow, AnnualRow, MonthlySummaries};

/// Merges one category's monthly rows into annual rows.
///
/// Monthly `shaves` are summed by row name; `unique_users` and the median
/// are recomputed from the cache, joined through [`join_key`] so numeric
/// identities survive int/float serialization differences. An empty cache
/// leaves every recomputed statistic at zero while the summed `shaves`
/// remain valid.
pub fn recompute(
    def: &CategoryDef,
    months: &MonthlySummaries,
    cache: &EventCache,
) -> Vec<AnnualRow> {
    // Step 1: sum event counts per monthly identity across included months.
    let mut shaves_by_name: BTreeMap<String, u64> = BTreeMap::new();
    for summary in months.by_month.values() {
        let Some(rows) = summary.category_rows(def.key) else {
            continue;
        };
        for row in rows {
            *shaves_by_name.entry(row.name.clone()).or_insert(0) += row.shaves;
        }
    }

    // Step 2: per-identity author activity from the raw events.
    let mut events_by_identity: HashMap<String, HashMap<&str, u64>> = HashMap::new();
    for event in cache.load() {
        let Some(identity) = def.event_identity(event) else {
            continue;
        };
        *events_by_identity
            .entry(join_key(&identity))
            .or_default()
            .entry(event.author.as_str())
            .or_insert(0) += 1;
    }

    // Steps 3-5: join and derive per-row statistics.
    let mut rows: Vec<AnnualRow> = shaves_by_name
        .into_iter()
        .map(|(name, shaves)| {
            let (unique_users, median_shaves) = match events_by_identity.get(&join_key(&name)) {
                Some(by_author) => {
                    let mut counts: Vec<u64> = by_author.values().copied().collect();
                    (by_author.len() as u64, round1(median(&mut counts)))
                }
                None => (0, 0.0),
            };
            let avg = if unique_users == 0 {
                0.0
            } else {
                round1(shaves as f64 / unique_users as f64)
            };
            AnnualRow {
                rank: 0,
                name,
                shaves,
                unique_users,
                avg_shaves_per_user: avg,
                median_shaves_per_user: median_shaves,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.shaves
            .cmp(&a.shaves)
            .then(b.unique_users.cmp(&a.unique_users))
            .then(a.name.cmp(&b.name))
    });

    let ranks = competition_ranks(&rows, |r| (r.shaves, r.unique_users));
    for (row, rank) in rows.iter_mut().zip(ranks) {
        row.rank = rank;
    }

    rows
}

/// The max-per-tuple variant for `highest_use_count_of_blades`.
///
/// Monthly rows report the peak consecutive-use count of one blade by one
/// user within that month; across the year the annual figure is the maximum
/// per (user, blade, format) tuple, never a sum.
pub fn recompute_peak_blade_use(months: &MonthlySummaries) -> Vec<AnnualBladeUseRow> {
    let mut max_uses: BTreeMap<(String, String, String), u64> = BTreeMap::new();
    for summary in months.by_month.values() {
        for row in &summary.highest_use_count_of_blades {
            let key = (row.user.clone(), row.blade.clone(), row.format.clone());
            let entry = max_uses.entry(key).or_insert(0);
            *entry = (*entry).max(row.uses);
        }
    }

    let mut rows: Vec<AnnualBladeUseRow> = max_uses
        .into_iter()
        .map(|((user, blade, format), uses)| AnnualBladeUseRow {
            rank: 0,
            user,
            blade,
            format,
            uses,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.uses
            .cmp(&a.uses)
            .then(a.user.cmp(&b.user))
            .then(a.blade.cmp(&b.blade))
    });

    let ranks = competition_ranks(&rows, |r| r.uses);
    for (row, rank) in rows.iter_mut().zip(ranks) {
        row.rank = rank;
    }

    rows
}
