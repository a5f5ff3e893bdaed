//! One invocation: read the run descriptor, then draw every figure the run
//! asks for.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::PlotSettings;
use crate::descriptor::RunDescriptor;
use crate::error::{Error, Result};
use crate::naming::{run_dir, OutputNamer, RunPaths};
use crate::probability::{plot_probabilities, RenderedChart};
use crate::results::ResultSeries;
use crate::trajectory::{plot_trajectories, RenderedScene, TrajectoryFiles};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub descriptor: PathBuf,
    /// False for single-geometry runs, which produce no results table.
    pub plot_probabilities: bool,
    pub settings: PlotSettings,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub output_dir: PathBuf,
    pub probabilities: Option<RenderedChart>,
    pub trajectories: Option<RenderedScene>,
}

pub fn run(options: &PipelineOptions) -> Result<PipelineReport> {
    let descriptor = RunDescriptor::load(&options.descriptor)?;
    let settings = &options.settings;
    let root = Path::new(&settings.output.root);

    info!(
        run = %descriptor.run.run_name,
        shape = descriptor.geometry.shape_name(),
        "rendering figures"
    );

    let namer = OutputNamer::from_descriptor(root, settings.output.naming, &descriptor);
    let run_path = run_dir(root, &descriptor.run.run_name);
    for dir in [namer.dir(), run_path.as_path()] {
        fs::create_dir_all(dir).map_err(|e| Error::write(dir, e))?;
    }
    // The run directory is per run even when figures share a material directory.
    copy_descriptor(&options.descriptor, &run_path)?;

    let inputs = RunPaths::new(root, &descriptor.run.run_name);

    let probabilities = if options.plot_probabilities {
        let results = ResultSeries::load(&inputs.results_table())?;
        Some(plot_probabilities(
            &results,
            &descriptor.geometry,
            settings,
            &namer.probabilities(),
        )?)
    } else {
        None
    };

    let trajectories = if descriptor.run.save_trajectories {
        let files = TrajectoryFiles::from_run(&inputs);
        Some(plot_trajectories(
            &files,
            &descriptor.geometry,
            settings,
            &namer.trajectories(),
        )?)
    } else {
        None
    };

    Ok(PipelineReport {
        output_dir: namer.dir().to_path_buf(),
        probabilities,
        trajectories,
    })
}

/// Keep the descriptor next to the figures it produced.
fn copy_descriptor(descriptor: &Path, dir: &Path) -> Result<()> {
    let Some(name) = descriptor.file_name() else {
        warn!("descriptor path {} has no file name; not copied", descriptor.display());
        return Ok(());
    };
    let target = dir.join(name);
    if let (Ok(a), Ok(b)) = (descriptor.canonicalize(), target.canonicalize()) {
        if a == b {
            return Ok(());
        }
    }
    fs::copy(descriptor, &target).map_err(|e| Error::write(&target, e))?;
    Ok(())
}
