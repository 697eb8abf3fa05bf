// Chart data derivation: numeric series and categorical value counts

use crate::config::Policy;
use crate::infer::parse_number;
use serde::Serialize;
use std::collections::HashMap;

/// Label used for empty or missing cells in value counts
pub const BLANK_LABEL: &str = "(blank)";
/// Label of the synthetic bucket collecting categories past the top-N
pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSeriesPoint {
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Build (x, y) points from rows whose Y cell is a finite number.
///
/// Other rows are skipped, not zeroed. The result holds at most
/// `policy.max_series_points` points, taken in row order.
pub fn build_numeric_series(
    rows: &[Vec<String>],
    x_index: Option<usize>,
    y_index: Option<usize>,
    policy: &Policy,
) -> Vec<NumericSeriesPoint> {
    let (Some(xi), Some(yi)) = (x_index, y_index) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let y = row.get(yi).and_then(|c| parse_number(c))?;
            if !y.is_finite() {
                return None;
            }
            let x = row.get(xi).cloned().unwrap_or_default();
            Some(NumericSeriesPoint { x, y })
        })
        .take(policy.max_series_points)
        .collect()
}

/// Count occurrences of each Y value across all rows.
///
/// Entries are ordered by descending count; equal counts keep the order in
/// which the value first appeared. The top `policy.max_categories` entries are
/// returned verbatim, followed by an "Other" entry summing the rest if any.
pub fn build_category_counts(
    rows: &[Vec<String>],
    y_index: Option<usize>,
    policy: &Policy,
) -> Vec<CategoryCount> {
    let Some(yi) = y_index else {
        return Vec::new();
    };

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for row in rows {
        let label = match row.get(yi).map(String::as_str) {
            Some(cell) if !cell.is_empty() => cell,
            _ => BLANK_LABEL,
        };
        match positions.get(label) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(label, counts.len());
                counts.push(CategoryCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort: ties stay in first-appearance order
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    if counts.len() > policy.max_categories {
        let other: usize = counts
            .drain(policy.max_categories..)
            .map(|c| c.count)
            .sum();
        if other > 0 {
            counts.push(CategoryCount {
                label: OTHER_LABEL.to_string(),
                count: other,
            });
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cells: &[(&str, &str)]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|(x, y)| vec![x.to_string(), y.to_string()])
            .collect()
    }

    #[test]
    fn test_numeric_series_skips_unparsable() {
        let rows = table(&[("a", "1"), ("b", "two"), ("c", ""), ("d", "inf"), ("e", "2.5")]);
        let s = build_numeric_series(&rows, Some(0), Some(1), &Policy::default());
        assert_eq!(
            s,
            vec![
                NumericSeriesPoint { x: "a".into(), y: 1.0 },
                NumericSeriesPoint { x: "e".into(), y: 2.5 },
            ]
        );
    }

    #[test]
    fn test_numeric_series_invalid_index() {
        let rows = table(&[("a", "1")]);
        assert!(build_numeric_series(&rows, None, Some(1), &Policy::default()).is_empty());
        assert!(build_numeric_series(&rows, Some(0), None, &Policy::default()).is_empty());
    }

    #[test]
    fn test_numeric_series_ragged_rows() {
        let rows = vec![
            vec!["5".to_string()],
            vec![],
            vec!["x".to_string(), "3".to_string(), "extra".to_string()],
        ];
        let s = build_numeric_series(&rows, Some(1), Some(0), &Policy::default());
        assert_eq!(s, vec![NumericSeriesPoint { x: "".into(), y: 5.0 }]);
    }

    #[test]
    fn test_numeric_series_cap() {
        let rows: Vec<Vec<String>> = (0..1500)
            .map(|i| vec![i.to_string(), i.to_string()])
            .collect();
        let s = build_numeric_series(&rows, Some(0), Some(1), &Policy::default());
        assert_eq!(s.len(), 1000);
        assert_eq!(s[0].x, "0");
        assert_eq!(s[999].y, 999.0);
    }

    #[test]
    fn test_category_counts_order_and_blank() {
        let rows = table(&[("1", "b"), ("2", ""), ("3", "a"), ("4", "a"), ("5", "b"), ("6", "a")]);
        let c = build_category_counts(&rows, Some(1), &Policy::default());
        assert_eq!(c[0], CategoryCount { label: "a".into(), count: 3 });
        assert_eq!(c[1], CategoryCount { label: "b".into(), count: 2 });
        assert_eq!(c[2], CategoryCount { label: BLANK_LABEL.into(), count: 1 });
    }

    #[test]
    fn test_category_counts_missing_cell_is_blank() {
        let rows = vec![vec!["only".to_string()]];
        let c = build_category_counts(&rows, Some(1), &Policy::default());
        assert_eq!(c, vec![CategoryCount { label: BLANK_LABEL.into(), count: 1 }]);
    }

    #[test]
    fn test_category_counts_other_bucket() {
        let mut rows: Vec<Vec<String>> = (0..30).map(|i| vec![format!("c{i}")]).collect();
        rows.push(vec!["c0".to_string()]);
        let c = build_category_counts(&rows, Some(0), &Policy::default());
        assert_eq!(c.len(), 26);
        assert_eq!(c[0], CategoryCount { label: "c0".into(), count: 2 });
        assert_eq!(c[25], CategoryCount { label: OTHER_LABEL.into(), count: 5 });
        assert_eq!(c.iter().map(|e| e.count).sum::<usize>(), 31);
    }

    #[test]
    fn test_category_counts_invalid_index() {
        let rows = table(&[("a", "b")]);
        assert!(build_category_counts(&rows, None, &Policy::default()).is_empty());
    }

    #[test]
    fn test_category_counts_custom_policy() {
        let rows: Vec<Vec<String>> = ["a", "b", "c", "a"].iter().map(|s| vec![s.to_string()]).collect();
        let policy = Policy { max_categories: 1, ..Policy::default() };
        let c = build_category_counts(&rows, Some(0), &policy);
        assert_eq!(
            c,
            vec![
                CategoryCount { label: "a".into(), count: 2 },
                CategoryCount { label: OTHER_LABEL.into(), count: 2 },
            ]
        );
    }
}
