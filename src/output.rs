//! Persistence for the annual rollup.
//!
//! Writes the annual document as pretty-printed JSON under
//! `aggregated/annual/`, and optionally exports each category table as CSV.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::AnnualSummary;

/// Writes the annual document to `data_dir/aggregated/annual/{year}.json`
/// and returns the path written.
pub fn write_annual(data_dir: &Path, summary: &AnnualSummary) -> Result<PathBuf> {
    let annual_dir = data_dir.join("aggregated").join("annual");
    fs::create_dir_all(&annual_dir)
        .with_context(|| format!("cannot create {}", annual_dir.display()))?;

    let path = annual_dir.join(format!("{}.json", summary.meta.year));
    let body = serde_json::to_string_pretty(summary)?;
    fs::write(&path, body).with_context(|| format!("cannot write {}", path.display()))?;

    info!(path = %path.display(), "Annual summary written");
    Ok(path)
}

/// Exports every category table of the annual document as one CSV file per
/// section under `csv_dir/{year}/`.
pub fn export_csv(csv_dir: &Path, summary: &AnnualSummary) -> Result<()> {
    let year_dir = csv_dir.join(summary.meta.year.to_string());
    fs::create_dir_all(&year_dir)
        .with_context(|| format!("cannot create {}", year_dir.display()))?;

    write_table(&year_dir, "razors", &summary.razors)?;
    write_table(&year_dir, "razor_manufacturers", &summary.razor_manufacturers)?;
    write_table(&year_dir, "razor_formats", &summary.razor_formats)?;
    write_table(&year_dir, "blades", &summary.blades)?;
    write_table(&year_dir, "blade_manufacturers", &summary.blade_manufacturers)?;
    write_table(&year_dir, "brushes", &summary.brushes)?;
    write_table(&year_dir, "brush_manufacturers", &summary.brush_manufacturers)?;
    write_table(&year_dir, "brush_fibers", &summary.brush_fibers)?;
    write_table(&year_dir, "brush_knot_sizes", &summary.brush_knot_sizes)?;
    write_table(&year_dir, "soaps", &summary.soaps)?;
    write_table(&year_dir, "soap_makers", &summary.soap_makers)?;
    write_table(
        &year_dir,
        "highest_use_count_of_blades",
        &summary.highest_use_count_of_blades,
    )?;
    write_table(&year_dir, "users", &summary.users)?;

    info!(dir = %year_dir.display(), "CSV export complete");
    Ok(())
}

fn write_table<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<()> {
    let path = dir.join(format!("{name}.csv"));
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");

    let mut writer = WriterBuilder::new()
        .from_path(&path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnnualMeta, AnnualRow};
    use std::env;

    fn empty_summary(year: i32) -> AnnualSummary {
        AnnualSummary {
            meta: AnnualMeta {
                year,
                total_shaves: 0,
                unique_shavers: 0,
                avg_shaves_per_user: 0.0,
                median_shaves_per_user: 0.0,
                event_archive_months: 0,
                included_months: vec![],
                missing_months: vec![],
            },
            razors: vec![],
            razor_manufacturers: vec![],
            razor_formats: vec![],
            blades: vec![],
            blade_manufacturers: vec![],
            brushes: vec![],
            brush_manufacturers: vec![],
            brush_fibers: vec![],
            brush_knot_sizes: vec![],
            soaps: vec![],
            soap_makers: vec![],
            highest_use_count_of_blades: vec![],
            users: vec![],
        }
    }

    #[test]
    fn test_write_annual_creates_file() {
        let dir = env::temp_dir().join("sotd_rollup_output_write");
        let _ = fs::remove_dir_all(&dir);

        let path = write_annual(&dir, &empty_summary(2024)).unwrap();
        assert!(path.ends_with("aggregated/annual/2024.json"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"year\": 2024"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_annual_row_field_order_is_rank_first() {
        let mut summary = empty_summary(2024);
        summary.razors.push(AnnualRow {
            rank: 1,
            name: "Karve Christopher Bradley".to_string(),
            shaves: 55,
            unique_users: 45,
            avg_shaves_per_user: 1.2,
            median_shaves_per_user: 1.0,
        });

        let json = serde_json::to_string(&summary).unwrap();
        let rank_pos = json.find("\"rank\"").unwrap();
        let name_pos = json.find("\"name\"").unwrap();
        let shaves_pos = json.find("\"shaves\":55").unwrap();
        assert!(rank_pos < name_pos && name_pos < shaves_pos);
    }

    #[test]
    fn test_export_csv_writes_headers() {
        let dir = env::temp_dir().join("sotd_rollup_output_csv");
        let _ = fs::remove_dir_all(&dir);

        let mut summary = empty_summary(2024);
        summary.razors.push(AnnualRow {
            rank: 1,
            name: "Karve Christopher Bradley".to_string(),
            shaves: 55,
            unique_users: 45,
            avg_shaves_per_user: 1.2,
            median_shaves_per_user: 1.0,
        });
        export_csv(&dir, &summary).unwrap();

        let content = fs::read_to_string(dir.join("2024/razors.csv")).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "rank,name,shaves,unique_users,avg_shaves_per_user,median_shaves_per_user"
        );
        assert!(lines.next().unwrap().starts_with("1,Karve Christopher Bradley,55,45"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
