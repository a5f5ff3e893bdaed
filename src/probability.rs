use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use crate::artifact::write_staged;
use crate::config::PlotSettings;
use crate::geometry::Geometry;
use crate::outcome::Outcome;
use crate::results::ResultSeries;

const Y_LABEL: &str = "Fraction of particles";
const MARKER_RADIUS: u32 = 4;
const ERROR_BAR_WIDTH: u32 = 10;

/// What ended up on a probability chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub path: PathBuf,
    pub series: Vec<Outcome>,
    pub x_label: &'static str,
    pub error_bars: bool,
}

/// Scale-vs-fraction curves for every outcome that applies to `geometry`.
/// An empty table still produces a (blank) chart.
pub fn plot_probabilities(
    results: &ResultSeries,
    geometry: &Geometry,
    settings: &PlotSettings,
    out_path: &Path,
) -> crate::Result<RenderedChart> {
    let outcomes = settings.series.reflection.outcomes(geometry);
    let x_label = geometry.axis_label();
    let error_bars = results.has_std_dev();
    let size = (
        settings.figure.probability_width,
        settings.figure.probability_height,
    );

    write_staged(out_path, |staging| {
        render_probabilities(staging, size, results, &outcomes, x_label)
    })?;
    info!("Saved plot: {}", out_path.display());

    Ok(RenderedChart {
        path: out_path.to_path_buf(),
        series: outcomes,
        x_label,
        error_bars,
    })
}

fn render_probabilities(
    out_path: &Path,
    size: (u32, u32),
    results: &ResultSeries,
    outcomes: &[Outcome],
    x_label: &str,
) -> Result<(), Box<dyn Error>> {
    let (x_lo, x_hi) = x_range(results);
    let (y_lo, y_hi) = y_range(results, outcomes);

    let root = BitMapBackend::new(out_path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Probabilities", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(Y_LABEL)
        .light_line_style(BLACK.mix(0.08))
        .draw()?;

    for &outcome in outcomes {
        let color = outcome.color();
        let points = results.series(outcome);

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|&(x, y, _)| (x, y)),
                color.stroke_width(2),
            ))?
            .label(outcome.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart.draw_series(
            points
                .iter()
                .map(|&(x, y, _)| Circle::new((x, y), MARKER_RADIUS, color.filled())),
        )?;

        chart.draw_series(points.iter().filter_map(|&(x, y, std_dev)| {
            std_dev.map(|s| ErrorBar::new_vertical(x, y - s, y, y + s, color, ERROR_BAR_WIDTH))
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn x_range(results: &ResultSeries) -> (f64, f64) {
    let scales = results.scales();
    let lo = scales.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = scales.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo <= f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Fractions live in [0, 1]; widen only if error bars poke outside.
fn y_range(results: &ResultSeries, outcomes: &[Outcome]) -> (f64, f64) {
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    for &outcome in outcomes {
        for (_, y, std_dev) in results.series(outcome) {
            let s = std_dev.unwrap_or(0.0);
            if (y - s).is_finite() {
                lo = lo.min(y - s);
            }
            if (y + s).is_finite() {
                hi = hi.max(y + s);
            }
        }
    }
    (lo, hi * 1.05)
}
