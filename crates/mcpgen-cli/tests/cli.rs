use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

const PETSTORE_V2: &str = include_str!("../../mcpgen-core/tests/fixtures/petstore-2.0.yaml");
const THINGS_V31: &str = include_str!("../../mcpgen-core/tests/fixtures/things-3.1.json");
const BROKEN_REQUIRED: &str = include_str!("../../mcpgen-core/tests/fixtures/broken-required.yaml");

fn mcpgen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mcpgen"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run mcpgen")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn parse_writes_ir_file() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("petstore.yaml"), PETSTORE_V2).unwrap();

    let output = mcpgen(dir, &["parse", "--in", "petstore.yaml", "--out", "build/ir.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("warning: paths./pets/{petId}.delete"));

    let written = fs::read_to_string(dir.join("build/ir.json")).unwrap();
    assert!(written.ends_with("}\n"));
    let ir: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(ir["service"]["id"], "swaggerPetstore");
    assert_eq!(ir["operations"].as_array().unwrap().len(), 4);
    assert_eq!(ir["meta"]["source"], "petstore.yaml");
}

#[test]
fn parse_to_stdout_compact_without_meta() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("things.json"), THINGS_V31).unwrap();

    let output = mcpgen(dir, &["parse", "-i", "things.json", "--compact", "--no-meta"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    let ir: Value = serde_json::from_str(&stdout).unwrap();
    assert!(ir.get("meta").is_none());
    assert_eq!(ir["operations"][0]["name"], "listNotes");
}

#[test]
fn parse_is_byte_identical_across_runs() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("petstore.yaml"), PETSTORE_V2).unwrap();

    let first = mcpgen(dir, &["parse", "--in", "petstore.yaml"]);
    let second = mcpgen(dir, &["parse", "--in", "petstore.yaml"]);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn parse_fails_on_findings_unless_lenient() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("broken.yaml"), BROKEN_REQUIRED).unwrap();

    let strict = mcpgen(dir, &["parse", "--in", "broken.yaml"]);
    assert!(!strict.status.success());
    assert!(stderr(&strict).contains("referential integrity violated"));

    let lenient = mcpgen(dir, &["parse", "--in", "broken.yaml", "--lenient"]);
    assert!(lenient.status.success(), "stderr: {}", stderr(&lenient));
    assert!(stderr(&lenient).contains("requires `balance`"));
}

#[test]
fn parse_reads_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("broken.yaml"), BROKEN_REQUIRED).unwrap();
    fs::write(
        dir.join(".mcpgen.yaml"),
        "input: broken.yaml\noutput: out/ir.json\nstrict: false\n",
    )
    .unwrap();

    let output = mcpgen(dir, &["parse"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.join("out/ir.json").exists());
}

#[test]
fn parse_missing_input_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let output = mcpgen(tmp.path(), &["parse", "--in", "nope.yaml"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read nope.yaml"));
}

#[test]
fn validate_reports_summary() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("petstore.yaml"), PETSTORE_V2).unwrap();
    fs::write(dir.join("broken.yaml"), BROKEN_REQUIRED).unwrap();

    let ok = mcpgen(dir, &["validate", "--in", "petstore.yaml"]);
    assert!(ok.status.success(), "stderr: {}", stderr(&ok));
    let err = stderr(&ok);
    assert!(err.contains("Valid OpenAPI 2.x document: Swagger Petstore"));
    assert!(err.contains("Operations: 4"));

    let broken = mcpgen(dir, &["validate", "--in", "broken.yaml"]);
    assert!(!broken.status.success());
    assert!(stderr(&broken).contains("1 integrity finding(s)"));

    let lenient = mcpgen(dir, &["validate", "--in", "broken.yaml", "--lenient"]);
    assert!(lenient.status.success());
}

#[test]
fn inspect_prints_json_summary() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("petstore.yaml"), PETSTORE_V2).unwrap();

    let output = mcpgen(dir, &["inspect", "--in", "petstore.yaml", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["service"]["title"], "Swagger Petstore");
    assert_eq!(summary["operations"][0]["paginated"], "offset");
    assert_eq!(summary["securitySchemes"][1], "petstore_auth");
}

#[test]
fn init_creates_config_once() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    let first = mcpgen(dir, &["init"]);
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    let content = fs::read_to_string(dir.join(".mcpgen.yaml")).unwrap();
    assert!(content.contains("input: openapi.yaml"));

    let again = mcpgen(dir, &["init"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("already exists"));

    let forced = mcpgen(dir, &["init", "--force"]);
    assert!(forced.status.success());
}
