///! Plain-text table rendering.
///!
///! Stands in for the presentation layer: it only ever goes through each
///! column's `render` capability and the engine's control descriptors.

use super::table::{ColumnDescriptor, FilterControl, TableView};

/// Longest a single cell may be before it is cut
const MAX_CELL_WIDTH: usize = 28;

pub struct TextRenderer<'c> {
    columns: Vec<&'c ColumnDescriptor>,
}

impl<'c> TextRenderer<'c> {
    pub fn new(columns: &'c [ColumnDescriptor]) -> Self {
        Self {
            columns: columns.iter().collect(),
        }
    }

    pub fn render_table(&self, view: &TableView) -> String {
        let header: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        let body: Vec<Vec<String>> = view
            .rows
            .iter()
            .map(|row| self.columns.iter().map(|c| truncate((c.render)(row))).collect())
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        out.push_str(&format_line(&header, &widths));
        out.push_str(&format_line(
            &widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>(),
            &widths,
        ));
        for cells in &body {
            out.push_str(&format_line(cells, &widths));
        }
        out.push_str(&format!(
            "{} of {} creatures shown ({} after search)\n",
            view.visible_count(),
            view.pre_global_count,
            view.global_count
        ));
        out
    }

    pub fn render_controls(&self, controls: &[FilterControl]) -> String {
        let mut out = String::new();
        for control in controls {
            out.push_str(&format!(
                "{} [{}]: {}\n",
                control.label,
                control.current.as_deref().unwrap_or("All"),
                control.options.join(" | ")
            ));
        }
        out
    }
}

fn truncate(cell: String) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell;
    }
    let mut cut: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    format!("{}\n", padded.join(" | ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::caught::CaughtSet;
    use crate::module::table::{
        ColumnFilterState, GameTime, GlobalFilterState, SortState, TableEngine,
    };
    use critterdex_common::{Record, Species};

    #[test]
    fn test_render_table_uses_column_renderers() {
        let mut koi = Record::new("Koi", Species::Fish);
        koi.price = Some(4000);
        koi.location = "Pond".into();
        let engine = TableEngine::new(vec![koi]);
        let caught: CaughtSet = ["Koi".to_string()].into_iter().collect();
        let view = engine.visible_rows_at(
            &GlobalFilterState::default(),
            &ColumnFilterState::new(),
            &SortState::default(),
            &caught,
            GameTime::new(0, 0),
        );

        let text = TextRenderer::new(engine.columns()).render_table(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Caught | Name"));
        assert!(lines[2].contains("[x]"));
        assert!(lines[2].contains("4,000"));
        assert!(lines[2].contains("############"));
        assert_eq!(lines[3], "1 of 1 creatures shown (1 after search)");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short".into()), "short");
        let long = "x".repeat(40);
        let cut = truncate(long);
        assert_eq!(cut.chars().count(), MAX_CELL_WIDTH);
        assert!(cut.ends_with('…'));
    }
}
