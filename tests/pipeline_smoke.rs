use std::fs;
use std::path::Path;

use transport_plots::config::PlotSettings;
use transport_plots::naming::NamingScheme;
use transport_plots::outcome::Outcome;
use transport_plots::pipeline::{run, PipelineOptions};
use transport_plots::Error;

const TABLE: &str = "L abs abs_std refl refl_std trans trans_std\n\
                     1 0.1 0.01 0.05 0.005 0.85 0.01\n\
                     2 0.2 0.01 0.05 0.005 0.75 0.01\n\
                     3 0.3 0.01 0.05 0.005 0.65 0.01\n";

fn settings_at(root: &Path) -> PlotSettings {
    let mut settings = PlotSettings::default();
    settings.output.root = root.to_string_lossy().into_owned();
    settings.figure.probability_width = 400;
    settings.figure.probability_height = 300;
    settings.figure.trajectory_width = 400;
    settings.figure.trajectory_height = 300;
    settings
}

fn write_descriptor(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn slab_run_produces_both_figures_and_keeps_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    let data = root.join("slab_run").join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("simulations_output.txt"), TABLE).unwrap();
    fs::write(data.join("hist_absorbed.txt"), "0 0 0\n1 0 0\n").unwrap();
    fs::write(data.join("hist_transmitted.txt"), "0 0 0\n11 0 0\n").unwrap();

    let descriptor = write_descriptor(
        dir.path(),
        r#"{ "run": { "run_name": "slab_run", "save_hist": true },
             "material": { "mean_free_path": 1.0, "pabs": 0.1, "k": 1.0 },
             "geometry": { "shape": "regular_slab", "x_init": 0.0, "max_scale": 10.0 } }"#,
    );

    let report = run(&PipelineOptions {
        descriptor: descriptor.clone(),
        plot_probabilities: true,
        settings: settings_at(&root),
    })
    .unwrap();

    let out_dir = root.join("slab_run");
    assert_eq!(report.output_dir, out_dir);
    assert!(out_dir.join("probabilities.png").exists());
    assert!(out_dir.join("trajectories.png").exists());
    assert_eq!(
        fs::read_to_string(out_dir.join("config.json")).unwrap(),
        fs::read_to_string(&descriptor).unwrap()
    );

    let chart = report.probabilities.unwrap();
    assert_eq!(chart.x_label, "Slab length");
    assert!(chart.series.contains(&Outcome::Reflected));

    let scene = report.trajectories.unwrap();
    assert_eq!(scene.drawn, vec![Outcome::Absorbed, Outcome::Transmitted]);
}

#[test]
fn single_geometry_run_without_history_writes_nothing_but_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    let descriptor = write_descriptor(
        dir.path(),
        r#"{ "run": { "run_name": "ball" }, "geometry": { "shape": "sphere", "scale": 2 } }"#,
    );

    let report = run(&PipelineOptions {
        descriptor,
        plot_probabilities: false,
        settings: settings_at(&root),
    })
    .unwrap();

    assert!(report.probabilities.is_none());
    assert!(report.trajectories.is_none());
    let entries: Vec<_> = fs::read_dir(root.join("ball"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("config.json")]);
}

#[test]
fn missing_results_table_is_fatal_and_leaves_no_image() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    let descriptor = write_descriptor(
        dir.path(),
        r#"{ "run": { "run_name": "nothing_here" }, "geometry": { "shape": "finite_slab" } }"#,
    );

    let err = run(&PipelineOptions {
        descriptor,
        plot_probabilities: true,
        settings: settings_at(&root),
    })
    .unwrap_err();

    assert!(matches!(err, Error::Read { .. }), "{err}");
    let pngs = fs::read_dir(root.join("nothing_here"))
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .path()
                .extension()
                .is_some_and(|x| x == "png")
        })
        .count();
    assert_eq!(pngs, 0);
}

#[test]
fn malformed_descriptor_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor = write_descriptor(dir.path(), "{ not json");
    let err = run(&PipelineOptions {
        descriptor,
        plot_probabilities: true,
        settings: settings_at(&dir.path().join("out")),
    })
    .unwrap_err();
    assert!(matches!(err, Error::Descriptor { .. }), "{err}");
}

#[test]
fn material_naming_puts_figures_in_shared_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    let data = root.join("sweep").join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("simulations_output.txt"), TABLE).unwrap();

    let descriptor = write_descriptor(
        dir.path(),
        r#"{ "run": { "run_name": "sweep" },
             "material": { "mean_free_path": 0.5, "pabs": 0.25, "k": 1.0 },
             "geometry": { "shape": "sphere", "max_scale": 3.0 } }"#,
    );
    let mut settings = settings_at(&root);
    settings.output.naming = NamingScheme::Material;

    let report = run(&PipelineOptions {
        descriptor,
        plot_probabilities: true,
        settings,
    })
    .unwrap();

    let expected = root
        .join("figures")
        .join("probabilities_lambda_0p5_pabs_0p25_k_1.png");
    assert_eq!(report.probabilities.unwrap().path, expected);
    assert!(expected.exists());
}

#[test]
fn dotted_run_name_keeps_figures_next_to_engine_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    let data = root.join("sweep.v2").join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("simulations_output.txt"), TABLE).unwrap();
    fs::write(data.join("hist_absorbed.txt"), "0 0 0\n1 0 0\n").unwrap();

    let descriptor = write_descriptor(
        dir.path(),
        r#"{ "run": { "run_name": "sweep.v2", "save_hist": true },
             "geometry": { "shape": "regular_slab", "max_scale": 3.0 } }"#,
    );

    let report = run(&PipelineOptions {
        descriptor,
        plot_probabilities: true,
        settings: settings_at(&root),
    })
    .unwrap();

    let run_dir = root.join("sweep.v2");
    assert_eq!(report.output_dir, run_dir);
    assert!(run_dir.join("probabilities.png").exists());
    assert!(run_dir.join("trajectories.png").exists());
    assert!(run_dir.join("config.json").exists());
    assert!(!root.join("sweeppv2").exists());
    assert_eq!(
        report.trajectories.unwrap().drawn,
        vec![Outcome::Absorbed]
    );
}

#[test]
fn material_naming_keeps_each_descriptor_in_its_run_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    let mut settings = settings_at(&root);
    settings.output.naming = NamingScheme::Material;

    for (run_name, pabs) in [("first", 0.1), ("second", 0.2)] {
        let data = root.join(run_name).join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("simulations_output.txt"), TABLE).unwrap();

        let source = dir.path().join(run_name);
        fs::create_dir_all(&source).unwrap();
        let descriptor = write_descriptor(
            &source,
            &format!(
                r#"{{ "run": {{ "run_name": "{run_name}" }},
                     "material": {{ "mean_free_path": 1.0, "pabs": {pabs}, "k": 1.0 }},
                     "geometry": {{ "shape": "sphere", "max_scale": 2.0 }} }}"#
            ),
        );
        run(&PipelineOptions {
            descriptor,
            plot_probabilities: true,
            settings: settings.clone(),
        })
        .unwrap();
    }

    assert!(!root.join("figures").join("config.json").exists());
    let first = fs::read_to_string(root.join("first").join("config.json")).unwrap();
    let second = fs::read_to_string(root.join("second").join("config.json")).unwrap();
    assert!(first.contains("\"first\""));
    assert!(second.contains("\"second\""));
    assert!(root
        .join("figures")
        .join("probabilities_lambda_1_pabs_0p1_k_1.png")
        .exists());
    assert!(root
        .join("figures")
        .join("probabilities_lambda_1_pabs_0p2_k_1.png")
        .exists());
}
