// Tabular preview of the loaded data

use crate::data::Table;
use prettytable::{format, Cell, Row};

/// Build a printable grid of the headers and the first `max_rows` rows.
///
/// Short rows are padded with empty cells; extra cells past the headers are kept.
pub fn preview_table(table: &Table, max_rows: usize) -> prettytable::Table {
    let mut grid = prettytable::Table::new();
    grid.set_format(*format::consts::FORMAT_BOX_CHARS);

    grid.set_titles(Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::new(h).style_spec("b"))
            .collect(),
    ));

    for row in table.rows.iter().take(max_rows) {
        let width = row.len().max(table.headers.len());
        let cells = (0..width)
            .map(|col| {
                let value = row.get(col).map(String::as_str).unwrap_or("");
                if crate::infer::is_numeric_cell(value) {
                    Cell::new(value).style_spec("r")
                } else {
                    Cell::new(value)
                }
            })
            .collect();
        grid.add_row(Row::new(cells));
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["name".into(), "age".into()],
            vec![
                vec!["Alice".into(), "30".into()],
                vec!["Bob".into()],
                vec!["Cara".into(), "25".into()],
            ],
        )
    }

    #[test]
    fn test_preview_limits_rows() {
        let grid = preview_table(&sample(), 2);
        assert_eq!(grid.len(), 2);
        let text = grid.to_string();
        assert!(text.contains("name"));
        assert!(text.contains("Alice"));
        assert!(!text.contains("Cara"));
    }

    #[test]
    fn test_preview_pads_short_rows() {
        let grid = preview_table(&sample(), 10);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.get_row(1).map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_preview_headers_only() {
        let t = Table::new(vec!["only".into()], vec![]);
        let grid = preview_table(&t, 5);
        assert!(grid.is_empty());
        assert!(grid.to_string().contains("only"));
    }
}
