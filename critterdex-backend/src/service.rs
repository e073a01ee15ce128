///! Session: one user's view of the catalogue.
///!
///! Owns the record store, the table engine built over it, the caught-state
///! store and every piece of filter/sort state. All table recomputation is
///! synchronous; only caught-state persistence and imports touch storage.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use critterdex_common::Species;
use strsim::jaro_winkler;
use tracing::{debug, info, warn};

use crate::config::CritterConfig;
use crate::error::CritterError;
use crate::module::caught::{CaughtSet, CaughtStore, FileStorage};
use crate::module::dataset::{parse_wiki_table, save_collection, RecordStore};
use crate::module::table::{
    toggle_species, ColumnFilterState, ColumnKey, FilterControl, FilterValue, GameTime, GlobalFilterPatch,
    GlobalFilterState, SortState, TableEngine, TableView,
};

const MAX_SUGGESTIONS: usize = 3;

pub struct Session {
    data_dir: PathBuf,
    store: RecordStore,
    engine: TableEngine,
    caught: CaughtStore,
    global: GlobalFilterState,
    column_filters: ColumnFilterState,
    sort: SortState,
    suggestion_threshold: f64,
}

impl Session {
    pub fn new(store: RecordStore, caught: CaughtStore, data_dir: impl AsRef<Path>) -> Self {
        let engine = TableEngine::new(store.all());
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            store,
            engine,
            caught,
            global: GlobalFilterState::default(),
            column_filters: ColumnFilterState::new(),
            sort: SortState::default(),
            suggestion_threshold: 0.85,
        }
    }

    /// Load dataset and caught state as configured
    pub async fn open(config: &CritterConfig) -> Result<Self> {
        let store = RecordStore::load_dir(&config.data_dir)
            .await
            .context("Failed to load creature dataset")?;
        let caught = CaughtStore::load(FileStorage::new(config.caught_path())).await;

        let mut session = Self::new(store, caught, &config.data_dir);
        session.suggestion_threshold = config.suggestion_threshold;
        session.global.is_southern_hemisphere = config.southern_hemisphere;
        Ok(session)
    }

    pub fn engine(&self) -> &TableEngine {
        &self.engine
    }

    pub fn global_filter(&self) -> &GlobalFilterState {
        &self.global
    }

    pub fn column_filters(&self) -> &ColumnFilterState {
        &self.column_filters
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn update_global(&mut self, patch: GlobalFilterPatch) {
        self.global.merge(patch);
        debug!("Global filter now {:?}", self.global);
    }

    pub fn set_filter(&mut self, key: ColumnKey, value: Option<FilterValue>) {
        self.column_filters.set_filter(key, value);
        debug!("Column filter {} now {:?}", key, self.column_filters.get(key));
    }

    /// Flip one species in the species filter
    pub fn toggle_species(&mut self, species: Species) {
        let current = self.column_filters.species_selection();
        let next = toggle_species(&current, species);
        self.set_filter(ColumnKey::Species, Some(FilterValue::Species(next)));
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn reset_filters(&mut self) {
        let southern = self.global.is_southern_hemisphere;
        self.global = GlobalFilterState {
            is_southern_hemisphere: southern,
            ..Default::default()
        };
        self.column_filters.clear();
        self.sort = SortState::default();
    }

    pub async fn caught_snapshot(&self) -> CaughtSet {
        self.caught.snapshot().await
    }

    /// Rows for the current state at the current wall-clock time
    pub fn visible_rows<'a>(&'a self, caught: &CaughtSet) -> TableView<'a> {
        self.engine
            .visible_rows(&self.global, &self.column_filters, &self.sort, caught)
    }

    pub fn visible_rows_at<'a>(&'a self, caught: &CaughtSet, now: GameTime) -> TableView<'a> {
        self.engine
            .visible_rows_at(&self.global, &self.column_filters, &self.sort, caught, now)
    }

    pub fn filter_controls(&self) -> Vec<FilterControl> {
        self.engine.filter_controls(&self.column_filters)
    }

    /// Resolve a user-typed creature name to the stored one (case-insensitive)
    pub fn resolve_name(&self, query: &str) -> Option<String> {
        let query = query.trim();
        self.engine
            .records()
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(query))
            .map(|r| r.name.clone())
    }

    /// Closest record names for a mistyped query
    pub fn suggest_names(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .engine
            .records()
            .iter()
            .map(|r| (jaro_winkler(&query, &r.name.to_lowercase()), r.name.as_str()))
            .filter(|(score, _)| *score >= self.suggestion_threshold)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        let mut names: Vec<String> = Vec::new();
        for (_, name) in scored {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
            if names.len() == MAX_SUGGESTIONS {
                break;
            }
        }
        names
    }

    pub async fn set_caught(&self, name: &str, caught: bool) -> Result<CaughtSet> {
        self.caught
            .toggle(name, caught)
            .await
            .with_context(|| format!("Failed to persist caught state for {}", name))
    }

    pub async fn clear_caught(&self) -> Result<usize> {
        self.caught
            .clear()
            .await
            .context("Failed to clear caught state")
    }

    /// Import a saved wiki page into the dataset and rebuild the engine
    pub async fn import(&mut self, species: Species, html_path: impl AsRef<Path>) -> Result<usize> {
        let html_path = html_path.as_ref();
        let html = tokio::fs::read_to_string(html_path)
            .await
            .with_context(|| format!("Failed to read {:?}", html_path))?;

        let records = parse_wiki_table(&html, species).context("Failed to parse wiki table")?;
        if records.is_empty() {
            warn!("Import of {:?} produced no {} rows", html_path, species);
            return Err(CritterError::EmptyImport(species).into());
        }
        save_collection(&self.data_dir, species, &records)
            .await
            .context("Failed to save imported collection")?;

        let count = records.len();
        self.store.replace(species, records);
        self.engine = TableEngine::new(self.store.all());
        info!("Imported {} {} records from {:?}", count, species, html_path);
        Ok(count)
    }
}
