//! Figure export to PNG and SVG (plotters) and JSON (serde_json).

use color_eyre::eyre::eyre;
use color_eyre::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::Color as _;
use ratatui::style::Color;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{AppConfig, ColorParser};
use crate::figure::{Figure, Histogram, LineChart, PieChart};

/// Slice colors for pie charts, cycled.
const PIE_COLORS: [RGBColor; 6] = [
    RGBColor(99, 110, 250),
    RGBColor(239, 85, 59),
    RGBColor(0, 204, 150),
    RGBColor(171, 99, 250),
    RGBColor(255, 161, 90),
    RGBColor(25, 211, 243),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
    Json,
}

impl ExportFormat {
    pub const ALL: [Self; 3] = [Self::Png, Self::Svg, Self::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Json => "json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Svg => "SVG",
            Self::Json => "JSON",
        }
    }
}

/// Image size and colors for exported charts.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub directory: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bar: RGBColor,
    pub line: RGBColor,
    pub mean_line: RGBColor,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            width: 1024,
            height: 768,
            bar: PIE_COLORS[0],
            line: PIE_COLORS[0],
            mean_line: RED,
        }
    }
}

impl ExportSettings {
    /// Export settings from config. Hex theme colors are kept exact.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let parser = ColorParser::true_color();
        let colors = &config.theme.colors;
        let defaults = Self::default();
        Ok(Self {
            directory: config.export.directory(),
            width: config.export.width,
            height: config.export.height,
            bar: to_rgb(parser.parse(&colors.chart_bar)?, defaults.bar),
            line: to_rgb(parser.parse(&colors.chart_line)?, defaults.line),
            mean_line: to_rgb(parser.parse(&colors.mean_line)?, defaults.mean_line),
        })
    }
}

/// Map a terminal color onto an RGB color, or `fallback` when it has no fixed value.
pub fn to_rgb(color: Color, fallback: RGBColor) -> RGBColor {
    match color {
        Color::Rgb(r, g, b) => RGBColor(r, g, b),
        Color::Black => BLACK,
        Color::Red | Color::LightRed => RED,
        Color::Green | Color::LightGreen => GREEN,
        Color::Yellow | Color::LightYellow => RGBColor(230, 180, 0),
        Color::Blue | Color::LightBlue => BLUE,
        Color::Magenta | Color::LightMagenta => MAGENTA,
        Color::Cyan | Color::LightCyan => RGBColor(0, 170, 200),
        Color::White => RGBColor(90, 90, 90),
        Color::Gray | Color::DarkGray => RGBColor(128, 128, 128),
        _ => fallback,
    }
}

/// File name for an exported figure, e.g. `airdash-histogram-accommodates.png`.
pub fn export_file_name(figure: &Figure, format: ExportFormat) -> String {
    let subject = match figure {
        Figure::Empty => "empty",
        Figure::Histogram(h) => h.x.as_str(),
        Figure::Line(l) => l.y.as_str(),
        Figure::Pie(p) => p.names.as_str(),
    };
    let subject: String = subject
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
        .collect();
    format!(
        "airdash-{}-{}.{}",
        figure.kind_name(),
        subject,
        format.extension()
    )
}

/// Write `figure` into the export directory. Returns the written path.
pub fn export_figure(figure: &Figure, format: ExportFormat, settings: &ExportSettings) -> Result<PathBuf> {
    if figure.is_empty() {
        return Err(eyre!("No chart to export. Select a chart first."));
    }
    std::fs::create_dir_all(&settings.directory)?;
    let path = settings.directory.join(export_file_name(figure, format));
    match format {
        ExportFormat::Png => write_figure_png(&path, figure, settings)?,
        ExportFormat::Svg => write_figure_svg(&path, figure, settings)?,
        ExportFormat::Json => write_figure_json(&path, figure)?,
    }
    info!(path = %path.display(), format = format.as_str(), "figure exported");
    Ok(path)
}

pub fn write_figure_json(path: &Path, figure: &Figure) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, figure)?;
    Ok(())
}

/// Write figure to PNG using plotters bitmap backend.
pub fn write_figure_png(path: &Path, figure: &Figure, settings: &ExportSettings) -> Result<()> {
    let root = BitMapBackend::new(path, (settings.width, settings.height)).into_drawing_area();
    draw_figure(&root, figure, settings)?;
    root.present()?;
    Ok(())
}

pub fn write_figure_svg(path: &Path, figure: &Figure, settings: &ExportSettings) -> Result<()> {
    let root = SVGBackend::new(path, (settings.width, settings.height)).into_drawing_area();
    draw_figure(&root, figure, settings)?;
    root.present()?;
    Ok(())
}

fn draw_figure<DB>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    settings: &ExportSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    match figure {
        Figure::Empty => Err(eyre!("No chart to export")),
        Figure::Histogram(h) => draw_histogram(root, &figure.title(), h, settings),
        Figure::Line(l) => draw_line(root, &figure.title(), l, settings),
        Figure::Pie(p) => draw_pie(root, &figure.title(), p),
    }
}

fn draw_histogram<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    histogram: &Histogram,
    settings: &ExportSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_min, x_max) = histogram
        .x_bounds()
        .ok_or_else(|| eyre!("No data to export: '{}' has no values", histogram.x))?;
    let y_top = match histogram.max_value() {
        v if v > 0.0 => v * 1.1,
        _ => 1.0,
    };
    let y_desc = match &histogram.aggregate {
        Some(agg) => format!("avg of {}", agg.y),
        None => "count".to_string(),
    };

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(30)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(histogram.x.as_str())
        .y_desc(y_desc.as_str())
        .draw()?;

    let bar = settings.bar;
    chart.draw_series(histogram.bins.iter().filter_map(|bin| {
        bin.value
            .map(|v| Rectangle::new([(bin.start, 0.0), (bin.end, v)], bar.filled()))
    }))?;

    if let Some(mean) = histogram.mean_line {
        let mean_color = settings.mean_line;
        chart
            .draw_series(LineSeries::new(
                vec![(mean.x, 0.0), (mean.x, y_top)],
                mean_color.stroke_width(2),
            ))?
            .label(format!("mean = {:.2}", mean.x))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], mean_color));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_line<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    line: &LineChart,
    settings: &ExportSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (y_min, y_max) = line
        .y_bounds()
        .ok_or_else(|| eyre!("No data to export: '{}' has no values", line.y))?;
    let pad = if y_max > y_min { (y_max - y_min) * 0.05 } else { 1.0 };
    let x_max = line.x.len().saturating_sub(1).max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(30)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .x_desc("row")
        .y_desc(line.y.as_str())
        .draw()?;

    let color = settings.line;
    for segment in line.segments() {
        chart.draw_series(LineSeries::new(segment, color.stroke_width(2)))?;
    }
    Ok(())
}

fn draw_pie<DB>(root: &DrawingArea<DB, Shift>, title: &str, pie: &PieChart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if pie.total() == 0 {
        return Err(eyre!("No data to export: '{}' has no values", pie.names));
    }

    let root = root.titled(title, ("sans-serif", 24))?;
    let (width, height) = root.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = (width.min(height) as f64 * 0.4).max(1.0);

    let mut angle = -std::f64::consts::FRAC_PI_2;
    for (i, slice) in pie.slices.iter().enumerate() {
        let sweep = pie.share(i) * std::f64::consts::TAU;
        let color = PIE_COLORS[i % PIE_COLORS.len()];
        let steps = ((sweep / std::f64::consts::TAU) * 180.0).ceil().max(2.0) as usize;
        let mut points = vec![center];
        for step in 0..=steps {
            let a = angle + sweep * step as f64 / steps as f64;
            points.push(polar(center, radius, a));
        }
        root.draw(&Polygon::new(points, color.filled()))?;

        let mid = angle + sweep / 2.0;
        let label = format!("{} ({:.1}%)", slice.label, pie.share(i) * 100.0);
        root.draw(&Text::new(
            label,
            polar(center, radius * 1.1, mid),
            ("sans-serif", 16).into_font().color(&BLACK),
        ))?;
        angle += sweep;
    }
    Ok(())
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 + (radius * angle.sin()).round() as i32,
    )
}
