///! Global filter: free-text search plus the "available now" toggle.

use serde::{Deserialize, Serialize};

use super::availability::{is_available_at, GameTime};
use super::column::ColumnDescriptor;
use super::row::Row;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalFilterState {
    pub search_text: Option<String>,
    pub is_available_now: bool,
    pub is_southern_hemisphere: bool,
}

/// A change emitted by one control. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalFilterPatch {
    /// `Some(None)` clears the search
    pub search_text: Option<Option<String>>,
    pub is_available_now: Option<bool>,
    pub is_southern_hemisphere: Option<bool>,
}

impl GlobalFilterState {
    /// Shallow field-by-field merge
    pub fn merge(&mut self, patch: GlobalFilterPatch) {
        if let Some(text) = patch.search_text {
            self.search_text = text.filter(|t| !t.trim().is_empty());
        }
        if let Some(now) = patch.is_available_now {
            self.is_available_now = now;
        }
        if let Some(south) = patch.is_southern_hemisphere {
            self.is_southern_hemisphere = south;
        }
    }
}

/// Keep rows matching the search text and, when requested, the rows
/// catchable at `now`.
pub fn global_filter<'a>(
    rows: Vec<Row<'a>>,
    searchable: &[&ColumnDescriptor],
    state: &GlobalFilterState,
    now: GameTime,
) -> Vec<Row<'a>> {
    let needle = state
        .search_text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_lowercase);

    rows.into_iter()
        .filter(|row| match &needle {
            None => true,
            Some(needle) => searchable.iter().any(|column| {
                (column.value)(row)
                    .search_text()
                    .to_lowercase()
                    .contains(needle.as_str())
            }),
        })
        .filter(|row| {
            !state.is_available_now || is_available_at(row.record, now, state.is_southern_hemisphere)
        })
        .collect()
}
