// Table + axis selection -> chart view

use crate::config::Policy;
use crate::data::Table;
use crate::infer::{classify_column, YClass};
use crate::selection::AxisSelection;
use crate::series::{build_category_counts, build_numeric_series, CategoryCount, NumericSeriesPoint};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Display choice for a numeric series. Both kinds draw the same points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

/// What the caller should render for the current table and selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ChartView {
    /// No rows have arrived yet
    Loading,
    /// Y is not in the headers, or a numeric Y has no valid X to pair with
    NoColumn,
    Numeric {
        kind: ChartKind,
        points: Vec<NumericSeriesPoint>,
    },
    /// Y was classified numeric but no row yields a finite number
    NoNumericRows { y: String },
    Categorical { counts: Vec<CategoryCount> },
    NoCategories { y: String },
}

impl ChartView {
    /// User-facing message for empty states
    pub fn message(&self) -> Option<String> {
        match self {
            ChartView::Loading => Some("Loading data…".to_string()),
            ChartView::NoColumn => Some("No valid column selected.".to_string()),
            ChartView::NoNumericRows { y } => Some(format!(
                "No plottable numeric rows for Y = “{}”. Try another column.",
                y
            )),
            ChartView::NoCategories { y } => {
                Some(format!("No categorical values found for Y = “{}”.", y))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartView::Numeric { kind, points } => {
                write!(f, "{:?} chart with {} points", kind, points.len())
            }
            ChartView::Categorical { counts } => {
                write!(f, "frequency chart with {} categories", counts.len())
            }
            other => write!(f, "{}", other.message().unwrap_or_default()),
        }
    }
}

/// Owns the loaded table, the axis selection and the numeric chart kind.
///
/// All derived data is recomputed from the current state on every call.
#[derive(Debug, Clone, Default)]
pub struct TabularVisualizer {
    table: Table,
    selection: AxisSelection,
    kind: ChartKind,
    policy: Policy,
}

impl TabularVisualizer {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Replace the table and fill any unset axis from the computed defaults
    pub fn load(&mut self, table: Table) {
        debug!(
            columns = table.headers.len(),
            rows = table.rows.len(),
            "loading table"
        );
        self.table = table;
        self.selection
            .apply_defaults(&self.table.headers, &self.table.rows, &self.policy);
        if let (Some(x), Some(y)) = (&self.selection.x, &self.selection.y) {
            info!(x = %x, y = %y, "axis selection");
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn selection(&self) -> &AxisSelection {
        &self.selection
    }

    pub fn x_column(&self) -> Option<&str> {
        self.selection.x.as_deref()
    }

    pub fn y_column(&self) -> Option<&str> {
        self.selection.y.as_deref()
    }

    pub fn set_x(&mut self, column: impl Into<String>) {
        self.selection.x = Some(column.into());
    }

    pub fn set_y(&mut self, column: impl Into<String>) {
        self.selection.y = Some(column.into());
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.kind
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.kind = kind;
    }

    fn x_index(&self) -> Option<usize> {
        self.table.column_index(self.x_column()?)
    }

    fn y_index(&self) -> Option<usize> {
        self.table.column_index(self.y_column()?)
    }

    /// Classification of the selected Y column; `None` if Y is not a known column
    pub fn y_class(&self) -> Option<YClass> {
        let yi = self.y_index()?;
        Some(classify_column(&self.table.rows, yi, &self.policy))
    }

    pub fn numeric_series(&self) -> Vec<NumericSeriesPoint> {
        build_numeric_series(&self.table.rows, self.x_index(), self.y_index(), &self.policy)
    }

    pub fn category_counts(&self) -> Vec<CategoryCount> {
        build_category_counts(&self.table.rows, self.y_index(), &self.policy)
    }

    /// Pick the chart for the current state
    pub fn view(&self) -> ChartView {
        if self.table.rows.is_empty() {
            return ChartView::Loading;
        }
        let Some(class) = self.y_class() else {
            return ChartView::NoColumn;
        };
        let y = self.y_column().unwrap_or_default().to_string();

        let view = match class {
            YClass::Numeric if self.x_index().is_none() => ChartView::NoColumn,
            YClass::Numeric => {
                let points = self.numeric_series();
                if points.is_empty() {
                    ChartView::NoNumericRows { y }
                } else {
                    ChartView::Numeric {
                        kind: self.kind,
                        points,
                    }
                }
            }
            YClass::Categorical => {
                let counts = self.category_counts();
                if counts.is_empty() {
                    ChartView::NoCategories { y }
                } else {
                    ChartView::Categorical { counts }
                }
            }
        };
        debug!(class = ?class, "{}", view);
        view
    }
}
