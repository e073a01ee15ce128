///! Filtering, sorting and availability engine for the creature table.

pub mod availability;
pub mod column;
pub mod engine;
pub mod global;
pub mod row;
pub mod sort;

pub use availability::{effective_month, is_available_now, GameTime, Meridiem, TimeRange};
pub use column::{
    default_columns, format_bells, toggle_species, ColumnDescriptor, ColumnFilterState, ColumnKey, FilterValue,
};
pub use engine::{compute_visible_rows, ColumnDomains, FilterControl, TableEngine, TableView};
pub use global::{global_filter, GlobalFilterPatch, GlobalFilterState};
pub use row::{CellValue, Row};
pub use sort::{sort_rows, SortDirection, SortState};
