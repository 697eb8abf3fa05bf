// Axis selection with first-wins defaults

use crate::config::Policy;
use crate::infer::column_ratio;
use serde::Serialize;
use tracing::debug;

/// The X/Y column pair bound to the caller's controls. `None` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AxisSelection {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl AxisSelection {
    pub fn new(x: Option<String>, y: Option<String>) -> Self {
        Self { x, y }
    }

    /// Fill unset axes from the computed defaults. Existing picks are never overwritten.
    pub fn apply_defaults(&mut self, headers: &[String], rows: &[Vec<String>], policy: &Policy) {
        if self.x.is_some() && self.y.is_some() {
            return;
        }
        let Some((x, y)) = choose_defaults(headers, rows, policy) else {
            return;
        };
        if self.x.is_none() {
            debug!(x = %x, "default x column");
            self.x = Some(x);
        }
        if self.y.is_none() {
            debug!(y = %y, "default y column");
            self.y = Some(y);
        }
    }
}

/// Compute default (x, y) columns, or `None` while headers or rows are missing.
///
/// X is the first header. Y is the first header whose sampled numeric ratio
/// reaches the threshold, else the second header, else the first.
pub fn choose_defaults(
    headers: &[String],
    rows: &[Vec<String>],
    policy: &Policy,
) -> Option<(String, String)> {
    let first = headers.first()?;
    if rows.is_empty() {
        return None;
    }

    let y = headers
        .iter()
        .enumerate()
        .find(|(idx, _)| {
            column_ratio(rows, *idx, policy.default_sample_rows) >= policy.numeric_threshold
        })
        .map(|(_, h)| h)
        .or_else(|| headers.get(1))
        .unwrap_or(first);

    Some((first.clone(), y.clone()))
}
