///! Table engine: caught merge → global filter → column filters → sort.

use std::collections::{BTreeSet, HashSet};

use critterdex_common::{Record, Species, MONTH_NAMES, UNKNOWN_CELL};

use super::availability::GameTime;
use super::column::{default_columns, filter_column, find_column, ColumnDescriptor, ColumnFilterState, ColumnKey};
use super::global::{global_filter, GlobalFilterState};
use super::row::Row;
use super::sort::{sort_rows, SortState};
use crate::module::caught::CaughtSet;

/// Distinct option values per filterable column, taken from the full
/// record set so option lists do not shrink as other filters change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnDomains {
    pub species: Vec<Species>,
    pub locations: Vec<String>,
    pub shadow_sizes: Vec<String>,
    pub time_ranges: Vec<String>,
    /// Month indices available for at least one record
    pub months: Vec<usize>,
}

impl ColumnDomains {
    pub fn from_records(records: &[Record]) -> Self {
        let species: BTreeSet<Species> = records.iter().map(|r| r.species).collect();
        let months = (0..MONTH_NAMES.len())
            .filter(|m| records.iter().any(|r| r.is_in_month(*m)))
            .collect();

        Self {
            species: species.into_iter().collect(),
            locations: distinct(records.iter().map(|r| r.location.as_str())),
            shadow_sizes: distinct(records.iter().filter_map(|r| r.shadow_size.as_deref())),
            time_ranges: distinct(records.iter().map(|r| r.time_range.as_str())),
            months,
        }
    }

    /// Option labels for a column's control, `None` for unfilterable columns
    pub fn options(&self, key: ColumnKey) -> Option<Vec<String>> {
        match key {
            ColumnKey::Species => Some(self.species.iter().map(|s| s.as_str().to_string()).collect()),
            ColumnKey::Location => Some(self.locations.clone()),
            ColumnKey::ShadowSize => Some(self.shadow_sizes.clone()),
            ColumnKey::Time => Some(self.time_ranges.clone()),
            ColumnKey::Months => Some(self.months.iter().map(|m| MONTH_NAMES[*m].to_string()).collect()),
            ColumnKey::Caught => Some(vec!["on".to_string(), "off".to_string()]),
            _ => None,
        }
    }
}

/// First-seen order, empty strings and the `?` placeholder dropped
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty() && *v != UNKNOWN_CELL)
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// What the presentation layer needs to draw one filter control
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControl {
    pub key: ColumnKey,
    pub label: &'static str,
    pub options: Vec<String>,
    pub current: Option<String>,
}

/// Result of one recomputation
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub rows: Vec<Row<'a>>,
    /// Row count before the global filter, for the search placeholder
    pub pre_global_count: usize,
    pub global_count: usize,
}

impl TableView<'_> {
    pub fn visible_count(&self) -> usize {
        self.rows.len()
    }
}

pub fn compute_visible_rows<'a>(
    records: &'a [Record],
    columns: &[ColumnDescriptor],
    global: &GlobalFilterState,
    column_filters: &ColumnFilterState,
    sort: &SortState,
    caught: &CaughtSet,
    now: GameTime,
) -> TableView<'a> {
    let rows: Vec<Row<'a>> = records
        .iter()
        .map(|record| Row::new(record, caught.contains(&record.name)))
        .collect();
    let pre_global_count = rows.len();

    let searchable: Vec<&ColumnDescriptor> = columns.iter().filter(|c| c.searchable).collect();
    let mut rows = global_filter(rows, &searchable, global, now);
    let global_count = rows.len();

    for (key, value) in column_filters.iter() {
        match find_column(columns, key) {
            Some(column) => rows = filter_column(rows, column, value),
            None => tracing::warn!("Filter set on unknown column {}", key),
        }
    }

    let rows = sort_rows(rows, columns, sort);

    TableView {
        rows,
        pre_global_count,
        global_count,
    }
}

/// Owns the record set, its column descriptors and the derived domains
pub struct TableEngine {
    records: Vec<Record>,
    columns: Vec<ColumnDescriptor>,
    domains: ColumnDomains,
}

impl TableEngine {
    pub fn new(records: Vec<Record>) -> Self {
        let domains = ColumnDomains::from_records(&records);
        Self {
            records,
            columns: default_columns(),
            domains,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn domains(&self) -> &ColumnDomains {
        &self.domains
    }

    /// Recompute against the wall clock
    pub fn visible_rows(
        &self,
        global: &GlobalFilterState,
        column_filters: &ColumnFilterState,
        sort: &SortState,
        caught: &CaughtSet,
    ) -> TableView<'_> {
        self.visible_rows_at(global, column_filters, sort, caught, GameTime::now())
    }

    pub fn visible_rows_at(
        &self,
        global: &GlobalFilterState,
        column_filters: &ColumnFilterState,
        sort: &SortState,
        caught: &CaughtSet,
        now: GameTime,
    ) -> TableView<'_> {
        compute_visible_rows(&self.records, &self.columns, global, column_filters, sort, caught, now)
    }

    /// Control descriptors for every filterable column
    pub fn filter_controls(&self, column_filters: &ColumnFilterState) -> Vec<FilterControl> {
        self.columns
            .iter()
            .filter(|c| c.can_filter())
            .filter_map(|c| {
                Some(FilterControl {
                    key: c.key,
                    label: c.header,
                    options: self.domains.options(c.key)?,
                    current: column_filters.get(c.key).map(|v| v.display()),
                })
            })
            .collect()
    }
}
