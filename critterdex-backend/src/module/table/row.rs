use std::cmp::Ordering;

use critterdex_common::{Record, MONTH_COUNT};

/// A record as seen by the table: the immutable data plus the caught flag
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub record: &'a Record,
    pub caught: bool,
}

impl<'a> Row<'a> {
    pub fn new(record: &'a Record, caught: bool) -> Self {
        Self { record, caught }
    }
}

/// Typed value of a single cell, used for searching and sorting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(Option<u32>),
    Flag(bool),
    Months([bool; MONTH_COUNT]),
    Empty,
}

impl CellValue {
    /// Text the free-text search is matched against
    pub fn search_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(Some(n)) => n.to_string(),
            CellValue::Number(None) | CellValue::Empty => String::new(),
            CellValue::Flag(b) => b.to_string(),
            CellValue::Months(months) => months
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Ascending order within one column. Unknown numbers sort after known ones.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => match (a, b) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Flag(a), CellValue::Flag(b)) => a.cmp(b),
            (CellValue::Months(a), CellValue::Months(b)) => first_month(a).cmp(&first_month(b)),
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            (CellValue::Empty, _) => Ordering::Greater,
            (_, CellValue::Empty) => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
}

/// Earliest month a record shows up; records never available sort last
fn first_month(months: &[bool; MONTH_COUNT]) -> usize {
    months.iter().position(|m| *m).unwrap_or(MONTH_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_price_sorts_last() {
        let known = CellValue::Number(Some(10));
        let unknown = CellValue::Number(None);
        assert_eq!(known.compare(&unknown), Ordering::Less);
        assert_eq!(unknown.compare(&known), Ordering::Greater);
        assert_eq!(CellValue::Number(Some(3)).compare(&CellValue::Number(Some(20))), Ordering::Less);
    }

    #[test]
    fn test_flag_false_before_true() {
        assert_eq!(CellValue::Flag(false).compare(&CellValue::Flag(true)), Ordering::Less);
    }

    #[test]
    fn test_search_text() {
        assert_eq!(CellValue::Number(Some(1500)).search_text(), "1500");
        assert_eq!(CellValue::Number(None).search_text(), "");
        assert_eq!(CellValue::Text("River".into()).search_text(), "River");
    }
}
