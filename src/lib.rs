// Library exports for csvdash

pub mod config;
pub mod csv_reader;
pub mod data;
pub mod graph;
pub mod infer;
pub mod preview;
pub mod selection;
pub mod series;
pub mod visualizer;

pub use config::Policy;
pub use data::Table;
pub use infer::{classify_numeric, YClass};
pub use selection::{choose_defaults, AxisSelection};
pub use series::{build_category_counts, build_numeric_series, CategoryCount, NumericSeriesPoint};
pub use visualizer::{ChartKind, ChartView, TabularVisualizer};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
    #[serde(default)]
    pub title: Option<String>,
    /// Named color ("red", "green", ...) or "#rrggbb"
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_max_x_labels")]
    pub max_x_labels: usize,
    /// Stroke width of line charts, in pixels
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    /// Bar width as a fraction of its slot
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_max_x_labels() -> usize { 20 }
fn default_line_width() -> u32 { 1 }
fn default_bar_width() -> f64 { 0.8 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: OutputFormat::Png,
            title: None,
            color: None,
            max_x_labels: 20,
            line_width: 1,
            bar_width: 0.8,
        }
    }
}
