//! Chart area: draws a [`Figure`] with ratatui's chart widgets.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType,
        Paragraph, Widget,
    },
};

use crate::config::Theme;
use crate::figure::{Figure, Histogram, LineChart, PieChart};

/// Vertical strokes drawn per histogram bin.
const STROKES_PER_BIN: usize = 4;

pub struct FigureView<'a> {
    figure: &'a Figure,
    theme: &'a Theme,
}

impl<'a> FigureView<'a> {
    pub fn new(figure: &'a Figure, theme: &'a Theme) -> Self {
        Self { figure, theme }
    }

    fn axis_style(&self) -> Style {
        Style::default().fg(self.theme.get("dimmed"))
    }

    fn placeholder(&self, text: &str, area: Rect, buf: &mut Buffer) {
        Paragraph::new(text.to_string())
            .style(Style::default().fg(self.theme.get("dimmed")))
            .centered()
            .render(area, buf);
    }

    fn render_histogram(&self, histogram: &Histogram, area: Rect, buf: &mut Buffer) {
        let Some((x_min, x_max)) = histogram.x_bounds() else {
            self.placeholder("No values to plot", area, buf);
            return;
        };
        let y_top = match histogram.max_value() {
            v if v > 0.0 => v * 1.1,
            _ => 1.0,
        };

        let bars: Vec<(f64, f64)> = histogram
            .bins
            .iter()
            .filter_map(|bin| bin.value.map(|v| (bin, v)))
            .flat_map(|(bin, v)| {
                let step = (bin.end - bin.start) / STROKES_PER_BIN as f64;
                (0..STROKES_PER_BIN).map(move |k| (bin.start + step * (k as f64 + 0.5), v))
            })
            .collect();
        let mean: Vec<(f64, f64)> = histogram
            .mean_line
            .map(|m| vec![(m.x, 0.0), (m.x, y_top)])
            .unwrap_or_default();

        let mut datasets = vec![Dataset::default()
            .name(histogram.x.as_str())
            .marker(symbols::Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(self.theme.get("chart_bar")))
            .data(&bars)];
        if let Some(m) = histogram.mean_line {
            datasets.push(
                Dataset::default()
                    .name(format!("mean {}", format_value(m.x)))
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.theme.get("mean_line")))
                    .data(&mean),
            );
        }

        let y_title = match &histogram.aggregate {
            Some(agg) => format!("avg of {}", agg.y),
            None => "count".to_string(),
        };
        Chart::new(datasets)
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
            .x_axis(self.axis(histogram.x.clone(), x_min, x_max))
            .y_axis(self.axis(y_title, 0.0, y_top))
            .render(area, buf);
    }

    fn render_line(&self, line: &LineChart, area: Rect, buf: &mut Buffer) {
        let Some((y_min, y_max)) = line.y_bounds() else {
            self.placeholder("No values to plot", area, buf);
            return;
        };
        let (y_min, y_max) = if y_max > y_min {
            (y_min, y_max)
        } else {
            (y_min - 1.0, y_max + 1.0)
        };
        let x_max = line.x.len().saturating_sub(1).max(1) as f64;
        let segments = line.segments();
        let style = Style::default().fg(self.theme.get("chart_line"));
        let datasets: Vec<Dataset> = segments
            .iter()
            .map(|points| {
                // A lone point between gaps has no line to draw
                let graph_type = if points.len() == 1 {
                    GraphType::Scatter
                } else {
                    GraphType::Line
                };
                Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(graph_type)
                    .style(style)
                    .data(points)
            })
            .collect();

        Chart::new(datasets)
            .x_axis(self.axis("row".to_string(), 0.0, x_max))
            .y_axis(self.axis(line.y.clone(), y_min, y_max))
            .render(area, buf);
    }

    fn render_pie(&self, pie: &PieChart, area: Rect, buf: &mut Buffer) {
        if pie.total() == 0 {
            self.placeholder("No values to plot", area, buf);
            return;
        }
        let bars: Vec<Bar> = pie
            .slices
            .iter()
            .enumerate()
            .map(|(i, slice)| {
                Bar::default()
                    .label(Line::from(slice.label.clone()))
                    .value(slice.count as u64)
                    .text_value(format!("{} ({:.1}%)", slice.count, pie.share(i) * 100.0))
                    .style(Style::default().fg(slice_color(i)))
            })
            .collect();
        BarChart::default()
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(1)
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }

    fn axis(&self, title: String, min: f64, max: f64) -> Axis<'static> {
        let style = self.axis_style();
        Axis::default()
            .title(Span::styled(title, style))
            .bounds([min, max])
            .style(style)
            .labels(vec![
                Span::styled(format_value(min), style),
                Span::styled(format_value((min + max) / 2.0), style),
                Span::styled(format_value(max), style),
            ])
    }
}

impl Widget for FigureView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" {} ", self.figure.title()))
            .border_style(Style::default().fg(self.theme.get("modal_border")));
        let inner = block.inner(area);
        block.render(area, buf);

        match self.figure {
            Figure::Empty => self.placeholder("No chart selected", inner, buf),
            Figure::Histogram(h) => self.render_histogram(h, inner, buf),
            Figure::Line(l) => self.render_line(l, inner, buf),
            Figure::Pie(p) => self.render_pie(p, inner, buf),
        }
    }
}

fn slice_color(i: usize) -> Color {
    const COLORS: [Color; 6] = [
        Color::Blue,
        Color::Red,
        Color::Green,
        Color::Magenta,
        Color::Yellow,
        Color::Cyan,
    ];
    COLORS[i % COLORS.len()]
}

/// Compact axis label: integer when whole, else up to two decimals.
pub fn format_value(v: f64) -> String {
    let abs = v.abs();
    if v == 0.0 {
        "0".to_string()
    } else if abs >= 100_000.0 || abs < 0.01 {
        format!("{:.2e}", v)
    } else if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else if abs >= 10.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.2}", v)
    }
}
