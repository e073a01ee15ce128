use super::column::{find_column, ColumnDescriptor, ColumnKey};
use super::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "up" => Ok(SortDirection::Ascending),
            "desc" | "descending" | "down" => Ok(SortDirection::Descending),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

/// At most one sorted column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<ColumnKey>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(column: ColumnKey, direction: SortDirection) -> Self {
        Self { column: Some(column), direction }
    }
}

/// Stable sort on the selected column.
///
/// Rows with equal keys keep their incoming order in both directions. With
/// no column selected, or a column that cannot be sorted, rows are returned
/// untouched.
pub fn sort_rows<'a>(mut rows: Vec<Row<'a>>, columns: &[ColumnDescriptor], sort: &SortState) -> Vec<Row<'a>> {
    let Some(key) = sort.column else {
        return rows;
    };
    let Some(compare) = find_column(columns, key).and_then(|c| c.sort) else {
        tracing::debug!("Column {} is not sortable, keeping store order", key);
        return rows;
    };

    match sort.direction {
        SortDirection::Ascending => rows.sort_by(|a, b| compare(a, b)),
        SortDirection::Descending => rows.sort_by(|a, b| compare(b, a)),
    }
    rows
}
