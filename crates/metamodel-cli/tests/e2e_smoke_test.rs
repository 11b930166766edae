use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use metamodel::MetamodelError;
use metamodel_cli::{Args, run};
use metamodel_parser::error::ErrorCode;

/// Collects all .mm files from a directory
fn collect_mm_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("mm")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demos are at workspace root, relative to workspace not the crate
fn demos_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_mm_files(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!(
            "{}.txt",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        match run(&args_for(demo_path, &output_path)) {
            Ok(()) => {
                let outline = fs::read_to_string(&output_path).expect("Outline was not written");
                assert!(
                    outline.contains("class "),
                    "{} produced no classes",
                    demo_path.display()
                );
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }
}

/// Expected leading error code for each file in demos/errors/
fn expected_error_code(file_stem: &str) -> Option<ErrorCode> {
    match file_stem {
        "unterminated_string" => Some(ErrorCode::E001),
        "missing_colon" => Some(ErrorCode::E100),
        "unclosed_class" => Some(ErrorCode::E101),
        "unknown_declaration" => Some(ErrorCode::E102),
        _ => None,
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_mm_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut mismatched = Vec::new();

    for demo_path in &error_demos {
        let file_stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();
        let expected = expected_error_code(&file_stem)
            .unwrap_or_else(|| panic!("No expected error code for {}", demo_path.display()));
        let output_path = temp_dir.path().join(format!("error_{file_stem}.txt"));

        let actual = match run(&args_for(demo_path, &output_path)) {
            Err(MetamodelError::Parse { err, .. }) => {
                err.diagnostics().first().and_then(|diag| diag.code())
            }
            Err(other) => {
                mismatched.push(format!("{}: not a parse error: {other}", demo_path.display()));
                continue;
            }
            Ok(()) => {
                mismatched.push(format!("{}: succeeded unexpectedly", demo_path.display()));
                continue;
            }
        };

        if actual != Some(expected) {
            mismatched.push(format!(
                "{}: expected {expected}, got {actual:?}",
                demo_path.display()
            ));
        }
    }

    if !mismatched.is_empty() {
        eprintln!("\nError demos with unexpected results:");
        for line in &mismatched {
            eprintln!("  - {line}");
        }
        panic!("{} error demo(s) misbehaved", mismatched.len());
    }
}

#[test]
fn e2e_fleet_outline() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("fleet.txt");

    run(&args_for(&demos_path().join("fleet.mm"), &output_path)).expect("fleet.mm should load");
    let outline = fs::read_to_string(&output_path).expect("Outline was not written");

    assert!(outline.starts_with("enum paint.Color\n  RED\n  GREEN\n  BLUE\n"));
    assert!(outline.contains("class fleet.Car extends fleet.Vehicle, base.Asset\n"));
    assert!(outline.contains("  @learned att speed: Double\n"));
    assert!(outline.contains("    from \"sensors/gps\"\n    from \"sensors/wheel\"\n"));
    assert!(outline.contains("    with smoothing = 0.25\n"));
    assert!(outline.contains("  @global ref owner: people.Person\n"));
    assert!(outline.contains("  @derived att value: Double\n"));
}

#[test]
fn e2e_redeclaration_outline() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("redeclaration.txt");

    run(&args_for(&demos_path().join("redeclaration.mm"), &output_path))
        .expect("redeclaration.mm should load");
    let outline = fs::read_to_string(&output_path).expect("Outline was not written");

    assert!(outline.contains("class Sensor extends Device\n  @learned att reading: Double\n"));
    assert!(outline.contains("    with unit = \"kelvin\"\n"));
    assert!(!outline.contains("celsius"));
}

#[test]
fn e2e_custom_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[display]\norder = \"alphabetical\"\nmetadata = false\n",
    )
    .expect("Failed to write config");
    let output_path = temp_dir.path().join("fleet.txt");

    let mut args = args_for(&demos_path().join("fleet.mm"), &output_path);
    args.config = Some(config_path.to_string_lossy().to_string());
    run(&args).expect("fleet.mm should load");

    let outline = fs::read_to_string(&output_path).expect("Outline was not written");
    assert!(outline.starts_with("class base.Asset\n"));
    assert!(!outline.contains("kalman"));
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args_for(
        &temp_dir.path().join("absent.mm"),
        &temp_dir.path().join("out.txt"),
    );

    assert!(run(&args).is_err());
}
