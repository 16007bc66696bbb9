//! Engine-independent chart descriptors.
//!
//! A [`Figure`] carries everything a renderer needs: the terminal chart
//! widget and the plotters exporter both draw from the same bins, points and
//! slices, so what is exported matches what is on screen.

use serde::Serialize;

/// Largest bin count automatic binning produces.
pub const MAX_AUTO_BINS: usize = 50;
/// Integral data spanning at most this many units gets one bin per integer.
pub const UNIT_BIN_SPAN: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Figure {
    /// Nothing to draw.
    Empty,
    Histogram(Histogram),
    Line(LineChart),
    Pie(PieChart),
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        matches!(self, Figure::Empty)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Figure::Empty => "empty",
            Figure::Histogram(_) => "histogram",
            Figure::Line(_) => "line",
            Figure::Pie(_) => "pie",
        }
    }

    pub fn title(&self) -> String {
        match self {
            Figure::Empty => "No chart selected".to_string(),
            Figure::Histogram(h) => match &h.aggregate {
                Some(agg) => format!("avg of {} by {}", agg.y, h.x),
                None => format!("Histogram of {}", h.x),
            },
            Figure::Line(l) => format!("{} by row", l.y),
            Figure::Pie(p) => format!("Share of {}", p.names),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFn {
    Avg,
}

/// Per-bin aggregation of a second column instead of counting rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub y: String,
    pub func: AggregateFn,
}

/// Vertical reference line spanning the full plot height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanLine {
    pub x: f64,
}

/// One histogram bar covering `[start, end)`; the last bar also includes `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    /// Row count, or the bucket average for aggregated histograms.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub x: String,
    pub aggregate: Option<Aggregate>,
    pub bins: Vec<HistogramBin>,
    pub mean_line: Option<MeanLine>,
    /// Non-null x values that were binned.
    pub observations: usize,
}

impl Histogram {
    /// Count histogram of `values`. Nulls are ignored.
    pub fn count(x: impl Into<String>, values: &[Option<f64>], requested_bins: usize) -> Self {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let bins = match Binning::for_values(&present, requested_bins) {
            Some(binning) => {
                let mut counts = vec![0usize; binning.count];
                for v in &present {
                    counts[binning.index(*v)] += 1;
                }
                counts
                    .into_iter()
                    .enumerate()
                    .map(|(i, n)| binning.bin(i, Some(n as f64)))
                    .collect()
            }
            None => Vec::new(),
        };
        Self {
            x: x.into(),
            aggregate: None,
            bins,
            mean_line: None,
            observations: present.len(),
        }
    }

    /// Histogram of `x_values` whose bars are the average of the paired
    /// `y_values`. Rows with a null x are ignored; null y values do not count
    /// toward the average.
    pub fn average(
        x: impl Into<String>,
        x_values: &[Option<f64>],
        y: impl Into<String>,
        y_values: &[Option<f64>],
        requested_bins: usize,
    ) -> Self {
        let present: Vec<f64> = x_values.iter().flatten().copied().collect();
        let bins = match Binning::for_values(&present, requested_bins) {
            Some(binning) => {
                let mut sums = vec![0.0f64; binning.count];
                let mut counts = vec![0usize; binning.count];
                for (xv, yv) in x_values.iter().zip(y_values) {
                    if let (Some(xv), Some(yv)) = (xv, yv) {
                        let i = binning.index(*xv);
                        sums[i] += yv;
                        counts[i] += 1;
                    }
                }
                (0..binning.count)
                    .map(|i| {
                        let avg = (counts[i] > 0).then(|| sums[i] / counts[i] as f64);
                        binning.bin(i, avg)
                    })
                    .collect()
            }
            None => Vec::new(),
        };
        Self {
            x: x.into(),
            aggregate: Some(Aggregate {
                y: y.into(),
                func: AggregateFn::Avg,
            }),
            bins,
            mean_line: None,
            observations: present.len(),
        }
    }

    pub fn with_mean_line(mut self, mean: Option<f64>) -> Self {
        self.mean_line = mean.map(|x| MeanLine { x });
        self
    }

    /// `(min start, max end)` over all bins.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        let first = self.bins.first()?;
        let last = self.bins.last()?;
        Some((first.start, last.end))
    }

    pub fn max_value(&self) -> f64 {
        self.bins
            .iter()
            .filter_map(|b| b.value)
            .fold(0.0, f64::max)
    }
}

/// Equal-width bins over the observed range.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Binning {
    start: f64,
    width: f64,
    count: usize,
}

impl Binning {
    fn for_values(values: &[f64], requested: usize) -> Option<Self> {
        let (min, max) = values
            .iter()
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        let span = max - min;

        if span == 0.0 {
            return Some(Self {
                start: min,
                width: 1.0,
                count: 1,
            });
        }

        if requested > 0 {
            return Some(Self {
                start: min,
                width: span / requested as f64,
                count: requested,
            });
        }

        let integral = values.iter().all(|v| v.fract() == 0.0);
        if integral && span <= UNIT_BIN_SPAN {
            return Some(Self {
                start: min,
                width: 1.0,
                count: span as usize + 1,
            });
        }

        let count = sturges(values.len());
        Some(Self {
            start: min,
            width: span / count as f64,
            count,
        })
    }

    fn index(&self, v: f64) -> usize {
        let i = ((v - self.start) / self.width).floor().max(0.0) as usize;
        i.min(self.count - 1)
    }

    fn bin(&self, i: usize, value: Option<f64>) -> HistogramBin {
        let start = self.start + self.width * i as f64;
        HistogramBin {
            start,
            end: start + self.width,
            value,
        }
    }
}

/// Sturges' rule, clamped to `1..=MAX_AUTO_BINS`.
fn sturges(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    let bins = (n as f64).log2().ceil() as usize + 1;
    bins.clamp(1, MAX_AUTO_BINS)
}

/// Column values against row index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub y: String,
    pub x: Vec<usize>,
    /// Nulls are gaps in the line.
    pub y_values: Vec<Option<f64>>,
}

impl LineChart {
    pub fn new(y: impl Into<String>, y_values: Vec<Option<f64>>) -> Self {
        Self {
            y: y.into(),
            x: (0..y_values.len()).collect(),
            y_values,
        }
    }

    /// Runs of consecutive non-null points, as `(x, y)` pairs.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (x, y) in self.x.iter().zip(&self.y_values) {
            match y {
                Some(y) => current.push((*x as f64, *y)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        self.y_values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
}

/// One slice per distinct value, sized by occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub names: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Slices in order of first appearance. Nulls are not a slice.
    pub fn from_labels(names: impl Into<String>, labels: &[Option<String>]) -> Self {
        let mut slices: Vec<PieSlice> = Vec::new();
        for label in labels.iter().flatten() {
            match slices.iter_mut().find(|s| s.label == *label) {
                Some(slice) => slice.count += 1,
                None => slices.push(PieSlice {
                    label: label.clone(),
                    count: 1,
                }),
            }
        }
        Self {
            names: names.into(),
            slices,
        }
    }

    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }

    /// Fraction of the whole taken by slice `i`.
    pub fn share(&self, i: usize) -> f64 {
        let total = self.total();
        match self.slices.get(i) {
            Some(slice) if total > 0 => slice.count as f64 / total as f64,
            _ => 0.0,
        }
    }
}
