//! Listings dataset: CSV load, the two load-time column rewrites, and per-column descriptors.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::OpenOptions;

/// Percentage column rewritten to a fraction at load ("80%" becomes 0.8).
pub const HOST_RESPONSE_RATE: &str = "host_response_rate";
/// Rating column coerced to numbers at load; unparseable values become null.
pub const REVIEW_SCORES_RATING: &str = "review_scores_rating";

/// Inferred column type, used to filter option lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Categorical => "categorical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
}

/// The loaded listings table. Immutable after construction.
#[derive(Debug)]
pub struct Dataset {
    df: DataFrame,
    columns: Vec<ColumnDescriptor>,
}

impl Dataset {
    /// Read a delimited file with a header row, then normalize it.
    pub fn from_csv(path: &Path, options: &OpenOptions) -> Result<Self> {
        let mut read_options = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(options.infer_schema_length);
        if let Some(delimiter) = options.delimiter {
            read_options = read_options.map_parse_options(|opts| opts.with_separator(delimiter));
        }

        let df = read_options
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            compressed = airdash_cli::is_compressed(path),
            "listings file read"
        );

        Self::from_frame(df)
    }

    /// Normalize an already-read frame and derive column descriptors.
    pub fn from_frame(mut df: DataFrame) -> Result<Self> {
        normalize_listings(&mut df)?;
        let columns: Vec<ColumnDescriptor> = df
            .get_columns()
            .iter()
            .map(|column| ColumnDescriptor {
                name: column.name().to_string(),
                kind: infer_kind(column),
            })
            .collect();
        for descriptor in &columns {
            debug!(column = %descriptor.name, kind = descriptor.kind.as_str(), "column kind");
        }
        Ok(Self { df, columns })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn descriptor(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.descriptor(name).is_some()
    }

    fn require(&self, name: &str) -> Result<&ColumnDescriptor> {
        self.descriptor(name)
            .ok_or_else(|| eyre!("column '{}' not found in dataset", name))
    }

    /// Values of a numeric column as f64 in row order. Nulls and non-finite values are `None`.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let descriptor = self.require(name)?;
        if descriptor.kind != ColumnKind::Numeric {
            return Err(eyre!(
                "column '{}' is {}, not numeric",
                name,
                descriptor.kind.as_str()
            ));
        }
        let values = self.df.column(name)?.cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect())
    }

    /// Arithmetic mean over the non-null values of a numeric column.
    pub fn mean(&self, name: &str) -> Result<Option<f64>> {
        let values: Vec<f64> = self.numeric_values(name)?.into_iter().flatten().collect();
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
    }

    /// Values of any column rendered as text in row order. Nulls are `None`.
    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>> {
        self.require(name)?;
        let text = self.df.column(name)?.cast(&DataType::String)?;
        Ok(text
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }

    /// One page of rows for the table view.
    pub fn page(&self, page: usize, page_size: usize) -> DataFrame {
        self.df
            .slice((page.saturating_mul(page_size)) as i64, page_size)
    }
}

/// Rewrite the percentage and rating columns in place. A malformed percentage is an error.
pub fn normalize_listings(df: &mut DataFrame) -> Result<()> {
    if df.get_column_index(HOST_RESPONSE_RATE).is_some() {
        let fractions = percent_to_fraction(df.column(HOST_RESPONSE_RATE)?)?;
        df.with_column(fractions)?;
    } else {
        warn!(column = HOST_RESPONSE_RATE, "column missing, normalization skipped");
    }

    if df.get_column_index(REVIEW_SCORES_RATING).is_some() {
        let column = df.column(REVIEW_SCORES_RATING)?;
        let before = column.null_count();
        let ratings = coerce_numeric(column)?;
        let nulled = ratings.null_count().saturating_sub(before);
        if nulled > 0 {
            info!(column = REVIEW_SCORES_RATING, nulled, "unparseable ratings set to null");
        }
        df.with_column(ratings)?;
    } else {
        warn!(column = REVIEW_SCORES_RATING, "column missing, normalization skipped");
    }

    Ok(())
}

/// Parse "80%", " 80 %" or "80" as 0.8. `None` when the text is not a number.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let number = raw.trim().trim_end_matches('%').trim_end();
    number.parse::<f64>().ok().map(|v| v / 100.0)
}

/// Parse a number, treating anything unparseable or non-finite as missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn percent_to_fraction(column: &Column) -> Result<Series> {
    let text = column.cast(&DataType::String)?;
    let values = text
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(raw) => match parse_percentage(raw) {
                Some(v) if v.is_finite() => Ok(Some(v)),
                Some(_) => Ok(None),
                None => Err(eyre!(
                    "{}: row {} holds {:?}, which is not a percentage",
                    column.name(),
                    row + 1,
                    raw
                )),
            },
        })
        .collect::<Result<Vec<Option<f64>>>>()?;
    Ok(Series::new(column.name().clone(), values))
}

fn coerce_numeric(column: &Column) -> Result<Series> {
    let values: Vec<Option<f64>> = if is_numeric_type(column.dtype()) {
        column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect()
    } else {
        column
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_number))
            .collect()
    };
    Ok(Series::new(column.name().clone(), values))
}

fn is_numeric_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn infer_kind(column: &Column) -> ColumnKind {
    match column.dtype() {
        DataType::Boolean => ColumnKind::Boolean,
        dtype if is_numeric_type(dtype) => ColumnKind::Numeric,
        DataType::String if is_flag_column(column) => ColumnKind::Boolean,
        _ => ColumnKind::Categorical,
    }
}

// Listing flags are stored as t/f text.
fn is_flag_column(column: &Column) -> bool {
    let Ok(values) = column.str() else {
        return false;
    };
    let mut seen = false;
    for value in values.into_iter().flatten() {
        if !matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "t" | "f" | "true" | "false"
        ) {
            return false;
        }
        seen = true;
    }
    seen
}
