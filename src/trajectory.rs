use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info};

use crate::artifact::write_staged;
use crate::config::{PlotSettings, ViewSettings};
use crate::coords::{load_coords, Point3};
use crate::geometry::{overlay_elements, Extent, Geometry, Overlay, SceneBounds};
use crate::naming::RunPaths;
use crate::outcome::Outcome;

/// Where each outcome's trajectory lives. Entries may point at files that do
/// not exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryFiles {
    entries: Vec<(Outcome, PathBuf)>,
}

impl TrajectoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_run(paths: &RunPaths) -> Self {
        Outcome::ALL
            .iter()
            .fold(Self::new(), |files, &outcome| {
                files.with(outcome, paths.history(outcome))
            })
    }

    pub fn with(mut self, outcome: Outcome, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match self.entries.iter_mut().find(|(o, _)| *o == outcome) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((outcome, path)),
        }
        self
    }

    pub fn path(&self, outcome: Outcome) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(o, _)| *o == outcome)
            .map(|(_, p)| p.as_path())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub outcome: Outcome,
    pub points: Vec<Point3>,
}

/// Non-empty trajectories, in the order they were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectorySet {
    pub trajectories: Vec<Trajectory>,
}

impl TrajectorySet {
    /// Categories without a file, or with nothing parseable in it, are left
    /// out.
    pub fn load(files: &TrajectoryFiles, outcomes: &[Outcome]) -> Self {
        let trajectories = outcomes
            .iter()
            .filter_map(|&outcome| {
                let points = load_coords(files.path(outcome)?);
                if points.is_empty() {
                    debug!(outcome = outcome.label(), "no trajectory to draw");
                    return None;
                }
                Some(Trajectory { outcome, points })
            })
            .collect();
        Self { trajectories }
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.trajectories.iter().map(|t| t.outcome).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    pub fn extent(&self) -> Option<Extent> {
        Extent::from_points(
            self.trajectories
                .iter()
                .flat_map(|t| t.points.iter().copied()),
        )
    }
}

/// What ended up in a trajectory scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedScene {
    pub path: PathBuf,
    pub drawn: Vec<Outcome>,
    pub overlay_surfaces: usize,
    pub bounds: SceneBounds,
}

/// One 3D scene: each available trajectory as a path in its outcome colour,
/// over the translucent geometry boundary.
pub fn plot_trajectories(
    files: &TrajectoryFiles,
    geometry: &Geometry,
    settings: &PlotSettings,
    out_path: &Path,
) -> crate::Result<RenderedScene> {
    let outcomes = settings.series.reflection.outcomes(geometry);
    let set = TrajectorySet::load(files, &outcomes);
    let overlay = geometry.overlay();

    let extent = match (overlay.extent(), set.extent()) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (a, b) => a.or(b),
    };
    let bounds = SceneBounds::resolve(&overlay.limits, extent.as_ref());
    let size = (
        settings.figure.trajectory_width,
        settings.figure.trajectory_height,
    );

    write_staged(out_path, |staging| {
        render_scene(staging, size, &settings.view, &set, &overlay, &bounds)
    })?;
    info!("Saved 3D trajectory plot: {}", out_path.display());

    Ok(RenderedScene {
        path: out_path.to_path_buf(),
        drawn: set.outcomes(),
        overlay_surfaces: overlay.surfaces.len(),
        bounds,
    })
}

fn render_scene(
    out_path: &Path,
    size: (u32, u32),
    view: &ViewSettings,
    set: &TrajectorySet,
    overlay: &Overlay,
    bounds: &SceneBounds,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(out_path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Particle trajectories", ("sans-serif", 28))
        .margin(20)
        .build_cartesian_3d(
            bounds.x.0..bounds.x.1,
            bounds.y.0..bounds.y.1,
            bounds.z.0..bounds.z.1,
        )?;

    chart.with_projection(|mut pb| {
        pb.yaw = view.yaw;
        pb.pitch = view.pitch;
        pb.scale = view.scale;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .draw()?;

    let (faces, edges) = overlay_elements(overlay);
    chart.draw_series(faces)?;
    chart.draw_series(edges)?;

    for trajectory in &set.trajectories {
        let color = trajectory.outcome.color();
        chart
            .draw_series(LineSeries::new(
                trajectory.points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(trajectory.outcome.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if !set.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
