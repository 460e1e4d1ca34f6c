//! Event Record Cache: the single source of truth for recomputed
//! participant statistics.
//!
//! Loads and concatenates every `enriched/{year}-{MM}.json` archive that
//! exists. The load is memoized: one cache instance is built per year and
//! passed by reference into every consumer, so the archive I/O happens at
//! most once per run. Missing or corrupted archives are skipped; the
//! `months_loaded` counter is the only trace they leave.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::loader::month_key;
use crate::types::{EnrichedArchive, EventRecord};

#[derive(Debug)]
struct CacheData {
    records: Vec<EventRecord>,
    months_loaded: usize,
}

/// Lazily loaded, per-year cache of enriched event records.
#[derive(Debug)]
pub struct EventCache {
    enriched_dir: PathBuf,
    year: i32,
    data: OnceCell<CacheData>,
}

impl EventCache {
    pub fn new(data_dir: &Path, year: i32) -> Self {
        EventCache {
            enriched_dir: data_dir.join("enriched"),
            year,
            data: OnceCell::new(),
        }
    }

    /// Builds a cache from in-memory records, bypassing file I/O.
    pub fn from_records(records: Vec<EventRecord>, months_loaded: usize) -> Self {
        let data = OnceCell::new();
        let _ = data.set(CacheData {
            records,
            months_loaded,
        });
        EventCache {
            enriched_dir: PathBuf::new(),
            year: 0,
            data,
        }
    }

    /// Returns all event records for the year, reading the archives on the
    /// first call and the cache afterwards.
    pub fn load(&self) -> &[EventRecord] {
        &self.data.get_or_init(|| self.read_all()).records
    }

    /// Number of enriched archives that actually loaded (0..=12).
    pub fn months_loaded(&self) -> usize {
        self.data.get_or_init(|| self.read_all()).months_loaded
    }

    /// Count of distinct authors across all cached events, case-sensitive.
    pub fn distinct_authors(&self) -> u64 {
        let authors: HashSet<&str> = self.load().iter().map(|r| r.author.as_str()).collect();
        authors.len() as u64
    }

    fn read_all(&self) -> CacheData {
        let mut records = Vec::new();
        let mut months_loaded = 0;

        for month in 1..=12 {
            let key = month_key(self.year, month);
            let path = self.enriched_dir.join(format!("{key}.json"));

            let contents = match fs::read_to_string(&path) {
                Ok(c) => c,
                Err(_) => {
                    debug!(month = %key, "Enriched archive absent, skipping");
                    continue;
                }
            };

            match serde_json::from_str::<EnrichedArchive>(&contents) {
                Ok(archive) => {
                    debug!(month = %key, events = archive.data.len(), "Enriched archive loaded");
                    records.extend(archive.data);
                    months_loaded += 1;
                }
                Err(e) => {
                    warn!(month = %key, error = %e, "Enriched archive corrupted, skipping");
                }
            }
        }

        CacheData {
            records,
            months_loaded,
        }
    }
}
