//! Per-user yearly attendance.
//!
//! Each monthly user row reports the days of that month the user skipped.
//! The annual figure folds those into unique activity days and takes the
//! complement against a fixed 365-day year. A user absent from a month has
//! no row there and contributes zero unique days for it, which the fold
//! handles naturally by only ever adding days for rows that exist.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::loader::month_number;
use crate::rollup::rank::competition_ranks;
use crate::types::{AnnualUserRow, MonthlySummaries};

const DAYS_IN_YEAR: i64 = 365;

/// Number of days in a calendar month.
pub fn days_in_month(year: i32, month: u32) -> Result<i64> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("invalid month {year}-{month:02}"))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .with_context(|| format!("invalid month {year}-{month:02}"))?;
    Ok((next - first).num_days())
}

/// Computes the annual attendance table from the monthly user rows.
///
/// Rows are ordered `(missed_days asc, shaves desc, user asc)` and ranked
/// on `(missed_days, shaves)` with competition semantics.
pub fn compute(months: &MonthlySummaries, year: i32) -> Result<Vec<AnnualUserRow>> {
    let mut totals: BTreeMap<&str, (u64, i64)> = BTreeMap::new();

    for (key, summary) in &months.by_month {
        let month = month_number(key)?;
        let days = days_in_month(year, month)?;
        for row in &summary.users {
            let entry = totals.entry(row.user.as_str()).or_insert((0, 0));
            entry.0 += row.shaves;
            entry.1 += days - i64::from(row.missed_days);
        }
    }

    let mut rows: Vec<AnnualUserRow> = totals
        .into_iter()
        .map(|(user, (shaves, unique_days))| AnnualUserRow {
            rank: 0,
            user: user.to_string(),
            shaves,
            missed_days: DAYS_IN_YEAR - unique_days,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.missed_days
            .cmp(&b.missed_days)
            .then(b.shaves.cmp(&a.shaves))
            .then(a.user.cmp(&b.user))
    });

    let ranks = competition_ranks(&rows, |r| (r.missed_days, r.shaves));
    for (row, rank) in rows.iter_mut().zip(ranks) {
        row.rank = rank;
    }

    Ok(rows)
}
