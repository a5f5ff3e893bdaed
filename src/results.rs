//! Tabulated outcome fractions, one row per simulated scale value.
//!
//! ```text
//! L  absorbed  absorbed_std  reflected  reflected_std  transmitted  transmitted_std
//! 1  0.10      0.01          0.05       0.004          0.85         0.012
//! ```
//!
//! Older engine builds wrote the four-column form without std columns.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::outcome::Outcome;

const FULL_COLUMNS: usize = 7;
const LEGACY_COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub fraction: f64,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRow {
    pub scale: f64,
    pub absorbed: Estimate,
    pub reflected: Estimate,
    pub transmitted: Estimate,
}

impl ResultRow {
    pub fn estimate(&self, outcome: Outcome) -> Estimate {
        match outcome {
            Outcome::Absorbed => self.absorbed,
            Outcome::Reflected => self.reflected,
            Outcome::Transmitted => self.transmitted,
        }
    }

    fn from_fields(values: &[f64]) -> Self {
        let est = |fraction: f64, std_dev: Option<f64>| Estimate { fraction, std_dev };
        if values.len() == FULL_COLUMNS {
            Self {
                scale: values[0],
                absorbed: est(values[1], Some(values[2])),
                reflected: est(values[3], Some(values[4])),
                transmitted: est(values[5], Some(values[6])),
            }
        } else {
            Self {
                scale: values[0],
                absorbed: est(values[1], None),
                reflected: est(values[2], None),
                transmitted: est(values[3], None),
            }
        }
    }
}

/// Rows share one scale column, so every outcome series has the same
/// length and indexing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSeries {
    pub rows: Vec<ResultRow>,
}

impl ResultSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_std_dev(&self) -> bool {
        self.rows
            .first()
            .is_some_and(|r| r.absorbed.std_dev.is_some())
    }

    pub fn scales(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.scale).collect()
    }

    /// `(scale, fraction, std_dev)` triples for one outcome.
    pub fn series(&self, outcome: Outcome) -> Vec<(f64, f64, Option<f64>)> {
        self.rows
            .iter()
            .map(|r| {
                let e = r.estimate(outcome);
                (r.scale, e.fraction, e.std_dev)
            })
            .collect()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        Self::parse(&text).map_err(|(line, message)| Error::MalformedTable {
            path: path.to_path_buf(),
            line,
            message,
        })
    }

    /// Skips the header line and blank lines. Any other line must be a full
    /// numeric row with the same width as the first one.
    pub fn parse(text: &str) -> std::result::Result<Self, (usize, String)> {
        let mut rows = Vec::new();
        let mut width: Option<usize> = None;

        for (idx, line) in text.lines().enumerate().skip(1) {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let values = line
                .split_whitespace()
                .map(|field| {
                    field
                        .parse::<f64>()
                        .map_err(|_| (line_no, format!("`{field}` is not a number")))
                })
                .collect::<std::result::Result<Vec<f64>, _>>()?;

            if values.len() != FULL_COLUMNS && values.len() != LEGACY_COLUMNS {
                return Err((
                    line_no,
                    format!(
                        "expected {FULL_COLUMNS} or {LEGACY_COLUMNS} columns, found {}",
                        values.len()
                    ),
                ));
            }
            match width {
                Some(w) if w != values.len() => {
                    return Err((
                        line_no,
                        format!("row has {} columns, previous rows have {w}", values.len()),
                    ));
                }
                _ => width = Some(values.len()),
            }
            rows.push(ResultRow::from_fields(&values));
        }

        Ok(Self { rows })
    }
}
