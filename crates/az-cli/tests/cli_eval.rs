use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_azpost"))
}

fn repo_root() -> PathBuf {
    // crates/az-cli -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").canonicalize().unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    repo_root().join("tests/fixtures").join(name)
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("azpost_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn stdout_json(out: &Output) -> serde_json::Value {
    assert!(
        out.status.success(),
        "azpost failed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("stdout should be valid JSON")
}

#[test]
fn describe_reports_layout() {
    let config = fixture_path("two_level_config.json");
    let v = stdout_json(&run(&["describe", "--config", config.to_string_lossy().as_ref()]));

    let names: Vec<&str> = v["parameter_names"]
        .as_array()
        .expect("parameter_names should be an array")
        .iter()
        .map(|x| x.as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 8);
    assert_eq!(names[0], "level0_energy");
    assert_eq!(&names[6..], &["norm_low", "norm_high"]);

    assert_eq!(v["n_physics"].as_u64(), Some(6));
    assert_eq!(v["n_norms"].as_u64(), Some(2));
    assert_eq!(v["kinds"][7].as_str(), Some("norm"));
    assert_eq!(v["n_points"].as_u64(), Some(14));
    assert_eq!(v["initial"].as_array().unwrap().len(), 8);
    assert_eq!(v["priors"][3]["dist"].as_str(), Some("normal"));
}

#[test]
fn eval_defaults_to_initial_point() {
    let config = fixture_path("two_level_config.json");
    let v = stdout_json(&run(&["eval", "--config", config.to_string_lossy().as_ref()]));

    let evals = v["evaluations"].as_array().expect("evaluations should be an array");
    assert_eq!(evals.len(), 1);
    let e = &evals[0];
    assert_eq!(e["accepted"].as_bool(), Some(true));
    let lp = e["log_prior"].as_f64().unwrap();
    let ll = e["log_likelihood"].as_f64().unwrap();
    let post = e["log_posterior"].as_f64().unwrap();
    assert!((post - (lp + ll)).abs() < 1e-9);
}

#[test]
fn eval_params_file_mixed_entries() {
    let config = fixture_path("two_level_config.json");
    let params = fixture_path("two_level_params.json");
    let out_path = tmp_path("eval.json");

    let out = run(&[
        "eval",
        "--config",
        config.to_string_lossy().as_ref(),
        "--params",
        params.to_string_lossy().as_ref(),
        "--threads",
        "2",
        "--output",
        out_path.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "eval failed, stderr={}", String::from_utf8_lossy(&out.stderr));

    let bytes = std::fs::read(&out_path).expect("output file should exist");
    let _ = std::fs::remove_file(&out_path);
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let evals = v["evaluations"].as_array().unwrap();
    assert_eq!(evals.len(), 4);

    // Truth scores finitely.
    assert!(evals[0]["log_posterior"].as_f64().unwrap().is_finite());

    // Negative width is outside the uniform prior: rejected without a likelihood.
    assert_eq!(evals[1]["accepted"].as_bool(), Some(false));
    assert!(evals[1]["log_likelihood"].is_null());
    assert!(evals[1]["log_posterior"].is_null());

    // Named entry maps onto the same layout.
    assert_eq!(evals[2]["parameters"][7].as_f64(), Some(0.97));
    assert!(evals[2]["log_posterior"].as_f64().unwrap().is_finite());

    // Wrong length only fails its own entry.
    let err = evals[3]["error"].as_str().expect("short vector should report an error");
    assert!(err.contains("expected 8"), "unexpected error: {}", err);
}

#[test]
fn missing_config_fails() {
    let out = run(&["eval", "--config", "/nonexistent/azpost_config.json"]);
    assert!(!out.status.success());
}

#[test]
fn version_prints_crate_version() {
    let out = run(&["version"]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.starts_with("azpost "), "unexpected output: {}", text);
}
