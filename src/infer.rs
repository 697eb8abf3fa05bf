// Column type inference over raw text cells

use crate::config::Policy;
use serde::Serialize;

/// How the Y column is charted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YClass {
    Numeric,
    Categorical,
}

/// Parse a cell as a number: trimmed, non-empty, not NaN.
///
/// Infinities are accepted here (they are numbers) but never plotted.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

pub fn is_numeric_cell(cell: &str) -> bool {
    parse_number(cell).is_some()
}

/// Fraction of cells that parse as numbers; 0 for an empty sample.
///
/// `None` entries stand for cells missing from short rows and count as non-numeric.
pub fn numeric_ratio<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut total = 0usize;
    let mut numeric = 0usize;
    for value in values {
        total += 1;
        if value.is_some_and(is_numeric_cell) {
            numeric += 1;
        }
    }

    if total == 0 {
        0.0
    } else {
        numeric as f64 / total as f64
    }
}

/// Numeric ratio of a plain list of cells
pub fn classify_numeric<S: AsRef<str>>(values: &[S]) -> f64 {
    numeric_ratio(values.iter().map(|v| Some(v.as_ref())))
}

/// Numeric ratio of column `col` over the first `sample_rows` rows
pub fn column_ratio(rows: &[Vec<String>], col: usize, sample_rows: usize) -> f64 {
    numeric_ratio(
        rows.iter()
            .take(sample_rows)
            .map(|row| row.get(col).map(String::as_str)),
    )
}

/// Classify column `col` using the policy's classification sample and threshold
pub fn classify_column(rows: &[Vec<String>], col: usize, policy: &Policy) -> YClass {
    if column_ratio(rows, col, policy.classify_sample_rows) >= policy.numeric_threshold {
        YClass::Numeric
    } else {
        YClass::Categorical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(cells: &[&str]) -> Vec<Vec<String>> {
        cells.iter().map(|c| vec![c.to_string()]).collect()
    }

    #[test]
    fn test_empty_input_is_zero() {
        let empty: [&str; 0] = [];
        assert_eq!(classify_numeric(&empty), 0.0);
    }

    #[test]
    fn test_number_formats() {
        for s in ["1", "-2", "3.5", " 42 ", "1e3", "-2.5E-4", ".5", "+7"] {
            assert!(is_numeric_cell(s), "{s} should be numeric");
        }
        for s in ["", "   ", "abc", "1,000", "NaN", "12abc"] {
            assert!(!is_numeric_cell(s), "{s} should not be numeric");
        }
    }

    #[test]
    fn test_ratio() {
        assert!((classify_numeric(&["1", "x", "2"]) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(classify_numeric(&["1", "2"]), 1.0);
        assert_eq!(classify_numeric(&["", ""]), 0.0);
    }

    #[test]
    fn test_missing_cells_count_as_non_numeric() {
        let r = vec![vec!["1".to_string()], vec![]];
        assert_eq!(column_ratio(&r, 0, 100), 0.5);
        assert_eq!(column_ratio(&r, 5, 100), 0.0);
    }

    #[test]
    fn test_sample_limits_rows() {
        let mut cells = vec!["1"; 100];
        cells.extend(vec!["x"; 300]);
        let r = rows(&cells);
        assert_eq!(column_ratio(&r, 0, 100), 1.0);
        assert_eq!(classify_column(&r, 0, &Policy::default()), YClass::Categorical);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut cells = vec!["1"; 7];
        cells.extend(vec!["x"; 3]);
        assert_eq!(classify_column(&rows(&cells), 0, &Policy::default()), YClass::Numeric);

        let cells = ["1", "2", "x"];
        assert_eq!(classify_column(&rows(&cells), 0, &Policy::default()), YClass::Categorical);
    }
}
