//! Monthly summary loading and per-month classification.
//!
//! Attempts all twelve `aggregated/{year}-{01..12}.json` files for a year.
//! An absent file is classified missing; a present file that fails
//! structural validation is classified missing with the reason recorded.
//! Only an unreadable base directory aborts the load.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::types::{MonthlySummaries, MonthlySummary};

/// Formats the canonical `YYYY-MM` key for a month of a year.
pub fn month_key(year: i32, month: u32) -> String {
    format!("{year}-{month:02}")
}

/// Parses the month number out of a `YYYY-MM` key.
pub fn month_number(key: &str) -> Result<u32> {
    let (_, month) = key
        .split_once('-')
        .with_context(|| format!("malformed month key {key:?}"))?;
    month
        .parse::<u32>()
        .with_context(|| format!("malformed month key {key:?}"))
}

/// Loads all monthly summaries for `year` from `data_dir/aggregated`.
///
/// # Errors
///
/// Returns an error only if the aggregated directory itself cannot be
/// accessed; individual month failures are classified, never raised.
pub fn load_year(data_dir: &Path, year: i32) -> Result<MonthlySummaries> {
    let agg_dir = data_dir.join("aggregated");
    if !agg_dir.is_dir() {
        bail!("aggregated directory not found: {}", agg_dir.display());
    }
    // Surface permission problems on the directory up front.
    fs::read_dir(&agg_dir)
        .with_context(|| format!("cannot read aggregated directory {}", agg_dir.display()))?;

    let mut out = MonthlySummaries::default();

    for month in 1..=12 {
        let key = month_key(year, month);
        let path = agg_dir.join(format!("{key}.json"));

        if !path.exists() {
            debug!(month = %key, "Monthly summary absent");
            out.missing.push(key);
            continue;
        }

        match load_month(&path) {
            Ok(summary) => {
                out.included.push(key.clone());
                out.by_month.insert(key, summary);
            }
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(month = %key, reason = %reason, "Monthly summary rejected");
                out.missing.push(key.clone());
                out.rejected.push((key, reason));
            }
        }
    }

    out.included.sort();
    out.missing.sort();
    Ok(out)
}

fn load_month(path: &Path) -> Result<MonthlySummary> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let summary: MonthlySummary = serde_json::from_str(&contents)
        .with_context(|| format!("structural validation failed for {}", path.display()))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn fixture_dir(name: &str) -> std::path::PathBuf {
        let dir = env::temp_dir().join(format!("sotd_rollup_loader_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("aggregated")).unwrap();
        dir
    }

    fn minimal_summary(month: &str) -> String {
        format!(
            r#"{{
              "meta": {{"month": "{month}", "total_shaves": 10, "unique_shavers": 3}},
              "razors": [], "razor_manufacturers": [], "razor_formats": [],
              "blades": [], "blade_manufacturers": [],
              "brushes": [], "brush_manufacturers": [], "brush_fibers": [],
              "brush_knot_sizes": [],
              "soaps": [], "soap_makers": [],
              "highest_use_count_of_blades": [], "users": []
            }}"#
        )
    }

    #[test]
    fn test_month_key_zero_pads() {
        assert_eq!(month_key(2024, 3), "2024-03");
        assert_eq!(month_key(2024, 12), "2024-12");
    }

    #[test]
    fn test_month_number_round_trip() {
        assert_eq!(month_number("2024-03").unwrap(), 3);
        assert!(month_number("garbage").is_err());
    }

    #[test]
    fn test_all_months_absent() {
        let dir = fixture_dir("all_absent");
        let loaded = load_year(&dir, 2024).unwrap();

        assert!(loaded.included.is_empty());
        assert_eq!(loaded.missing.len(), 12);
        assert_eq!(loaded.missing[0], "2024-01");
        assert_eq!(loaded.missing[11], "2024-12");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_valid_month_included() {
        let dir = fixture_dir("one_valid");
        fs::write(
            dir.join("aggregated/2024-05.json"),
            minimal_summary("2024-05"),
        )
        .unwrap();

        let loaded = load_year(&dir, 2024).unwrap();
        assert_eq!(loaded.included, vec!["2024-05"]);
        assert_eq!(loaded.missing.len(), 11);
        assert!(loaded.by_month.contains_key("2024-05"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_month_classified_missing_with_reason() {
        let dir = fixture_dir("corrupt");
        fs::write(dir.join("aggregated/2024-02.json"), "{not json").unwrap();
        // Present but structurally invalid: razors is not a list of objects.
        fs::write(
            dir.join("aggregated/2024-03.json"),
            r#"{"meta": {"month": "2024-03", "total_shaves": 1, "unique_shavers": 1}, "razors": 7}"#,
        )
        .unwrap();

        let loaded = load_year(&dir, 2024).unwrap();
        assert!(loaded.included.is_empty());
        assert_eq!(loaded.missing.len(), 12);
        assert_eq!(loaded.rejected.len(), 2);
        assert!(loaded.rejected.iter().any(|(m, _)| m == "2024-02"));
        assert!(loaded.rejected.iter().any(|(m, _)| m == "2024-03"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_base_dir_is_fatal() {
        let dir = env::temp_dir().join("sotd_rollup_loader_no_such_dir");
        let _ = fs::remove_dir_all(&dir);
        assert!(load_year(&dir, 2024).is_err());
    }

    #[test]
    fn test_included_and_missing_partition_the_year() {
        let dir = fixture_dir("partition");
        for m in ["2024-01", "2024-06", "2024-12"] {
            fs::write(
                dir.join(format!("aggregated/{m}.json")),
                minimal_summary(m),
            )
            .unwrap();
        }

        let loaded = load_year(&dir, 2024).unwrap();
        let mut all: Vec<String> = loaded
            .included
            .iter()
            .chain(loaded.missing.iter())
            .cloned()
            .collect();
        all.sort();
        let expected: Vec<String> = (1..=12).map(|m| month_key(2024, m)).collect();
        assert_eq!(all, expected);

        fs::remove_dir_all(&dir).unwrap();
    }
}
