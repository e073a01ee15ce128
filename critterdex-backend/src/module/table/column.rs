///! Declarative column descriptors and per-column filters.
///!
///! Every column is one [`ColumnDescriptor`]: how to read its cell value, how
///! to render it, and optionally how to filter and sort on it. The engine only
///! ever goes through these descriptors.

use std::collections::{BTreeSet, HashMap};
use std::cmp::Ordering;

use critterdex_common::{Species, MONTH_NAMES, UNKNOWN_CELL};

use super::row::{CellValue, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKey {
    Name,
    Species,
    Price,
    Location,
    ShadowSize,
    Time,
    Months,
    Caught,
}

impl ColumnKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKey::Name => "name",
            ColumnKey::Species => "species",
            ColumnKey::Price => "price",
            ColumnKey::Location => "location",
            ColumnKey::ShadowSize => "shadow",
            ColumnKey::Time => "time",
            ColumnKey::Months => "months",
            ColumnKey::Caught => "caught",
        }
    }
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ColumnKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(ColumnKey::Name),
            "species" | "type" => Ok(ColumnKey::Species),
            "price" | "bells" => Ok(ColumnKey::Price),
            "location" => Ok(ColumnKey::Location),
            "shadow" | "shadow_size" | "shadowsize" => Ok(ColumnKey::ShadowSize),
            "time" => Ok(ColumnKey::Time),
            "months" | "month" => Ok(ColumnKey::Months),
            "caught" => Ok(ColumnKey::Caught),
            _ => Err(format!("Unknown column: {}", s)),
        }
    }
}

/// Current value of one column's filter control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Species(BTreeSet<Species>),
    Month(usize),
    Flag(bool),
}

impl FilterValue {
    /// Values that restrict nothing. These are dropped from the filter state.
    pub fn is_pass_all(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::Species(set) => set.is_empty() || set.len() == Species::ALL.len(),
            FilterValue::Month(_) => false,
            FilterValue::Flag(on) => !on,
        }
    }

    pub fn display(&self) -> String {
        match self {
            FilterValue::Text(s) => s.clone(),
            FilterValue::Species(set) => set
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            FilterValue::Month(m) => MONTH_NAMES.get(*m).copied().unwrap_or("?").to_string(),
            FilterValue::Flag(on) => String::from(if *on { "on" } else { "off" }),
        }
    }
}

/// Toggle one species in the selection.
///
/// Deselecting the last selected species selects every species again, so the
/// table can never be filtered down to nothing by this control alone.
pub fn toggle_species(current: &BTreeSet<Species>, species: Species) -> BTreeSet<Species> {
    let mut next = if current.is_empty() {
        Species::ALL.iter().copied().collect()
    } else {
        current.clone()
    };

    if !next.remove(&species) {
        next.insert(species);
    }
    if next.is_empty() {
        next = Species::ALL.iter().copied().collect();
    }
    next
}

/// Per-column filter values. A column absent from the map is unfiltered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnFilterState {
    values: HashMap<ColumnKey, FilterValue>,
}

impl ColumnFilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a column's filter wholesale. `None` or a pass-all value clears it.
    pub fn set_filter(&mut self, key: ColumnKey, value: Option<FilterValue>) {
        match value {
            Some(v) if !v.is_pass_all() => {
                self.values.insert(key, v);
            }
            _ => {
                self.values.remove(&key);
            }
        }
    }

    pub fn get(&self, key: ColumnKey) -> Option<&FilterValue> {
        self.values.get(&key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnKey, &FilterValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Currently selected species, empty meaning all
    pub fn species_selection(&self) -> BTreeSet<Species> {
        match self.values.get(&ColumnKey::Species) {
            Some(FilterValue::Species(set)) => set.clone(),
            _ => BTreeSet::new(),
        }
    }
}

pub type CellAccessor = fn(&Row) -> CellValue;
pub type FilterPredicate = fn(&Row, &FilterValue) -> bool;
pub type SortComparator = fn(&Row, &Row) -> Ordering;
pub type CellRenderer = fn(&Row) -> String;

pub struct ColumnDescriptor {
    pub key: ColumnKey,
    pub header: &'static str,
    /// Included in the free-text search
    pub searchable: bool,
    pub value: CellAccessor,
    pub render: CellRenderer,
    pub filter: Option<FilterPredicate>,
    pub sort: Option<SortComparator>,
}

impl ColumnDescriptor {
    pub fn can_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn can_sort(&self) -> bool {
        self.sort.is_some()
    }
}

impl std::fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("searchable", &self.searchable)
            .field("filter", &self.filter.is_some())
            .field("sort", &self.sort.is_some())
            .finish()
    }
}

/// Apply one column filter. Pass-through when the column has no predicate.
pub fn filter_column<'a>(rows: Vec<Row<'a>>, column: &ColumnDescriptor, value: &FilterValue) -> Vec<Row<'a>> {
    match column.filter {
        Some(predicate) if !value.is_pass_all() => {
            rows.into_iter().filter(|row| predicate(row, value)).collect()
        }
        _ => rows,
    }
}

pub fn find_column(columns: &[ColumnDescriptor], key: ColumnKey) -> Option<&ColumnDescriptor> {
    columns.iter().find(|c| c.key == key)
}

// ---------------------------------------------------------------------------
// Column definitions
// ---------------------------------------------------------------------------

/// All columns in display order
pub fn default_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor {
            key: ColumnKey::Caught,
            header: "Caught",
            searchable: false,
            value: |row| CellValue::Flag(row.caught),
            render: |row| String::from(if row.caught { "[x]" } else { "[ ]" }),
            filter: Some(|row, value| match value {
                FilterValue::Flag(hide_caught) => !(*hide_caught && row.caught),
                _ => true,
            }),
            sort: Some(|a, b| a.caught.cmp(&b.caught)),
        },
        ColumnDescriptor {
            key: ColumnKey::Name,
            header: "Name",
            searchable: true,
            value: |row| CellValue::Text(row.record.name.clone()),
            render: |row| row.record.name.clone(),
            filter: None,
            sort: Some(|a, b| a.record.name.cmp(&b.record.name)),
        },
        ColumnDescriptor {
            key: ColumnKey::Species,
            header: "Type",
            searchable: true,
            value: |row| CellValue::Text(row.record.species.as_str().to_string()),
            render: |row| row.record.species.as_str().to_string(),
            filter: Some(|row, value| match value {
                FilterValue::Species(set) => set.is_empty() || set.contains(&row.record.species),
                _ => true,
            }),
            sort: Some(|a, b| a.record.species.cmp(&b.record.species)),
        },
        ColumnDescriptor {
            key: ColumnKey::Price,
            header: "Price",
            searchable: true,
            value: |row| CellValue::Number(row.record.price),
            render: |row| format_bells(row.record.price),
            filter: None,
            sort: Some(|a, b| {
                CellValue::Number(a.record.price).compare(&CellValue::Number(b.record.price))
            }),
        },
        ColumnDescriptor {
            key: ColumnKey::Location,
            header: "Location",
            searchable: true,
            value: |row| CellValue::Text(row.record.location.clone()),
            render: |row| row.record.location.clone(),
            filter: Some(|row, value| text_equals(Some(&row.record.location), value)),
            sort: Some(|a, b| a.record.location.cmp(&b.record.location)),
        },
        ColumnDescriptor {
            key: ColumnKey::ShadowSize,
            header: "Shadow",
            searchable: true,
            value: |row| match &row.record.shadow_size {
                Some(s) => CellValue::Text(s.clone()),
                None => CellValue::Empty,
            },
            render: |row| row.record.shadow_size.clone().unwrap_or_default(),
            filter: Some(|row, value| text_equals(row.record.shadow_size.as_deref(), value)),
            sort: Some(|a, b| {
                let cell = |r: &Row| match &r.record.shadow_size {
                    Some(s) => CellValue::Text(s.clone()),
                    None => CellValue::Empty,
                };
                cell(a).compare(&cell(b))
            }),
        },
        ColumnDescriptor {
            key: ColumnKey::Time,
            header: "Time",
            searchable: true,
            value: |row| CellValue::Text(row.record.time_range.clone()),
            render: |row| row.record.time_range.clone(),
            filter: Some(|row, value| text_equals(Some(&row.record.time_range), value)),
            sort: Some(|a, b| a.record.time_range.cmp(&b.record.time_range)),
        },
        ColumnDescriptor {
            key: ColumnKey::Months,
            header: "Months",
            searchable: false,
            value: |row| CellValue::Months(row.record.months_available),
            render: |row| {
                row.record
                    .months_available
                    .iter()
                    .map(|m| if *m { '#' } else { '.' })
                    .collect()
            },
            filter: Some(|row, value| match value {
                FilterValue::Month(m) => row.record.is_in_month(*m),
                _ => true,
            }),
            sort: Some(|a, b| {
                CellValue::Months(a.record.months_available)
                    .compare(&CellValue::Months(b.record.months_available))
            }),
        },
    ]
}

/// Exact string equality against a selected option
fn text_equals(cell: Option<&str>, value: &FilterValue) -> bool {
    match value {
        FilterValue::Text(wanted) => cell == Some(wanted.as_str()),
        _ => true,
    }
}

/// Format a price with thousands separators, `?` when unknown
pub fn format_bells(price: Option<u32>) -> String {
    let Some(price) = price else {
        return UNKNOWN_CELL.to_string();
    };

    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
