// Chart rendering to PNG/SVG

use crate::visualizer::{ChartKind, ChartView};
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// Largest canvas side accepted, in pixels
pub const MAX_DIMENSION: u32 = 16_384;

/// Axis descriptions drawn next to the mesh
#[derive(Debug, Clone, Default)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

/// Positional series: one slot per category, drawn left to right
struct Slots {
    labels: Vec<String>,
    values: Vec<f64>,
    as_line: bool,
}

impl Slots {
    fn from_view(view: &ChartView) -> Result<Self> {
        match view {
            ChartView::Numeric { kind, points } if !points.is_empty() => Ok(Slots {
                labels: points.iter().map(|p| p.x.clone()).collect(),
                values: points.iter().map(|p| p.y).collect(),
                as_line: *kind == ChartKind::Line,
            }),
            ChartView::Categorical { counts } if !counts.is_empty() => Ok(Slots {
                labels: counts.iter().map(|c| c.label.clone()).collect(),
                values: counts.iter().map(|c| c.count as f64).collect(),
                as_line: false,
            }),
            other => anyhow::bail!(
                "Nothing to render: {}",
                other.message().unwrap_or_else(|| "empty chart".to_string())
            ),
        }
    }

    /// Padded y range. Errors when the values span more than an f64 can hold.
    fn y_range(&self) -> Result<Range<f64>> {
        let mut y_min = self.values.iter().cloned().fold(f64::INFINITY, f64::min);
        let mut y_max = self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        // Bars grow from zero
        if !self.as_line {
            y_min = y_min.min(0.0);
            y_max = y_max.max(0.0);
        }

        // Halves keep the span finite for any pair of finite values
        let half_span = y_max * 0.5 - y_min * 0.5;
        let padding = if half_span == 0.0 {
            (y_max.abs() * 0.05).max(1.0)
        } else {
            half_span * 0.1
        };

        let low = if !self.as_line && y_min == 0.0 && y_max > 0.0 {
            0.0
        } else {
            (y_min - padding).max(f64::MIN)
        };
        let high = (y_max + padding).min(f64::MAX);

        if !(high - low).is_finite() || low >= high {
            anyhow::bail!(
                "Y values from {} to {} span too wide a range to plot",
                y_min,
                y_max
            );
        }
        Ok(low..high)
    }
}

/// Render a chart view to PNG or SVG bytes
pub fn render_view(view: &ChartView, labels: &AxisLabels, options: &RenderOptions) -> Result<Vec<u8>> {
    check_dimensions(options.width, options.height)?;
    let slots = Slots::from_view(view)?;
    let y_range = slots.y_range()?;

    match options.format {
        OutputFormat::Png => {
            let len = (options.width as usize)
                .checked_mul(options.height as usize)
                .and_then(|px| px.checked_mul(3))
                .context("Canvas size overflows")?;
            let mut buffer = vec![0u8; len];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (options.width, options.height))
                    .into_drawing_area();
                draw(&root, &slots, y_range.clone(), labels, options)?;
            }
            encode_png(&buffer, options.width, options.height)
        }
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
                    .into_drawing_area();
                draw(&root, &slots, y_range.clone(), labels, options)?;
            }
            Ok(svg.into_bytes())
        }
    }
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    slots: &Slots,
    y_range: Range<f64>,
    labels: &AxisLabels,
    options: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let num_slots = slots.labels.len();
    let x_range = 0.0..(num_slots as f64);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(options.title.as_deref().unwrap_or(""), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    let slot_labels = &slots.labels;
    chart
        .configure_mesh()
        .x_labels(num_slots.min(options.max_x_labels))
        .x_label_formatter(&|x| {
            let idx = *x as usize;
            if *x >= 0.0 && idx < slot_labels.len() {
                slot_labels[idx].clone()
            } else {
                String::new()
            }
        })
        .x_desc(labels.x.as_str())
        .y_desc(labels.y.as_str())
        .draw()
        .context("Failed to draw mesh")?;

    if slots.as_line {
        let color = parse_color(&options.color);
        let points = slots
            .values
            .iter()
            .enumerate()
            .map(|(idx, &y)| (idx as f64 + 0.5, y));

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(options.line_width)))
            .context("Failed to draw line series")?;
    } else {
        let color = parse_color(&options.color);
        let bar_width = options.bar_width.clamp(0.05, 1.0);

        chart
            .draw_series(slots.values.iter().enumerate().map(|(idx, &y)| {
                let x_center = idx as f64 + 0.5;
                Rectangle::new(
                    [(x_center - bar_width / 2.0, 0.0), (x_center + bar_width / 2.0, y)],
                    color.filled(),
                )
            }))
            .context("Failed to draw bars")?;
    }

    root.present().context("Failed to present drawing")?;
    Ok(())
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        anyhow::bail!(
            "Canvas size {}x{} must be within 1..={} pixels per side",
            width,
            height,
            MAX_DIMENSION
        );
    }
    Ok(())
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}

/// Parse color string to RGBColor
fn parse_color(color_str: &Option<String>) -> RGBColor {
    match color_str.as_deref() {
        Some("red") => RED,
        Some("green") => GREEN,
        Some("blue") => BLUE,
        Some("black") => BLACK,
        Some("yellow") => YELLOW,
        Some("cyan") => CYAN,
        Some("magenta") => MAGENTA,
        Some(hex) if hex.starts_with('#') && hex.len() == 7 => parse_hex(&hex[1..]).unwrap_or(BLUE),
        _ => BLUE,
    }
}

fn parse_hex(digits: &str) -> Option<RGBColor> {
    let channel = |range: Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
