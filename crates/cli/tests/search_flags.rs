use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn uxguide(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("uxguide").expect("binary");
    cmd.env("UXGUIDE_DATA_DIR", data_dir)
        .env("UXGUIDE_EMBEDDING_MODE", "stub")
        .env_remove("RUST_LOG");
    cmd
}

fn run_json(data_dir: &Path, args: &[&str]) -> (bool, Value) {
    let output = uxguide(data_dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command run");
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}

fn setup_data() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(
        root.join("styles.csv"),
        "Style Category,Type,Keywords,Best For,Complexity\n\
         Minimalism,General,\"clean, whitespace, simple\",SaaS dashboards,Low\n\
         Glassmorphism,Modern,\"frosted, blur, translucent\",Landing pages,Medium\n\
         Brutalism,Experimental,\"raw, bold, stark\",Portfolios,Low\n",
    )
    .unwrap();
    fs::write(
        root.join("charts.csv"),
        "Data Type,Keywords,Best Chart Type,Accessibility Notes\n\
         Time series,\"trend, over time\",Line chart,Label axes\n\
         Part to whole,\"share, composition\",Pie chart,Avoid many slices\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("stacks")).unwrap();
    fs::write(
        root.join("stacks/react.csv"),
        "Category,Guideline,Description,Do,Don't,Severity\n\
         State,Lift state up,Share state between siblings,Use a parent,Duplicate state,High\n\
         Effects,Clean up effects,Return a cleanup function,Unsubscribe,Leak listeners,Medium\n",
    )
    .unwrap();
    temp
}

#[test]
fn markdown_report_for_resolved_domain() {
    let temp = setup_data();
    uxguide(temp.path())
        .arg("frosted glassmorphism")
        .assert()
        .success()
        .stdout(predicate::str::contains("## UI/UX Builder Search Results"))
        .stdout(predicate::str::contains(
            "**Domain:** style | **Query:** frosted glassmorphism | **Mode:** lexical",
        ))
        .stdout(predicate::str::contains("**Source:** styles.csv | **Found:** 1 results"))
        .stdout(predicate::str::contains("- **Style Category:** Glassmorphism"));
}

#[test]
fn json_report_respects_domain_and_limit() {
    let temp = setup_data();
    let (ok, body) = run_json(
        temp.path(),
        &["pie chart share", "--domain", "chart", "-n", "1", "--mode", "bm25"],
    );
    assert!(ok, "body: {body}");
    assert_eq!(body["domain"], "chart");
    assert_eq!(body["file"], "charts.csv");
    assert_eq!(body["mode"], "lexical");
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["Data Type"], "Part to whole");
    assert!(body.get("stack").is_none());
}

#[test]
fn stack_search_takes_priority_over_domain() {
    let temp = setup_data();
    let (ok, body) = run_json(
        temp.path(),
        &["cleanup listeners", "--stack", "react", "--domain", "style"],
    );
    assert!(ok, "body: {body}");
    assert_eq!(body["domain"], "stack");
    assert_eq!(body["stack"], "react");
    assert_eq!(body["file"], "stacks/react.csv");
    assert_eq!(body["results"][0]["Guideline"], "Clean up effects");
}

#[test]
fn hybrid_mode_runs_with_stub_embeddings() {
    let temp = setup_data();
    let (ok, body) = run_json(temp.path(), &["frosted blur", "--mode", "hybrid"]);
    assert!(ok, "body: {body}");
    assert_eq!(body["mode"], "fused");
    assert_eq!(body["results"][0]["Style Category"], "Glassmorphism");
}

#[test]
fn semantic_mode_falls_back_when_embeddings_are_off() {
    let temp = setup_data();
    let (ok, body) = run_json(
        temp.path(),
        &["frosted blur", "--mode", "vector", "--embed-mode", "off"],
    );
    assert!(ok, "body: {body}");
    assert_eq!(body["mode"], "lexical");
    assert_eq!(body["count"], 1);
}

#[test]
fn unknown_mode_is_lexical() {
    let temp = setup_data();
    let (ok, body) = run_json(temp.path(), &["raw bold", "--mode", "quantum"]);
    assert!(ok, "body: {body}");
    assert_eq!(body["mode"], "lexical");
    assert_eq!(body["results"][0]["Style Category"], "Brutalism");
}

#[test]
fn unknown_stack_fails_with_message() {
    let temp = setup_data();
    uxguide(temp.path())
        .args(["state", "--stack", "angular"])
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("Error: Unknown stack: angular. Available:"));

    let (ok, body) = run_json(temp.path(), &["state", "--stack", "angular"]);
    assert!(!ok);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("html-tailwind, nextjs"));
}

#[test]
fn missing_table_is_fatal() {
    let temp = setup_data();
    uxguide(temp.path())
        .args(["font pairing", "--domain", "typography"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("File not found"))
        .stdout(predicate::str::contains("typography.csv"));
}

#[test]
fn custom_catalog_replaces_builtin_topics() {
    let temp = setup_data();
    let root = temp.path();
    fs::write(
        root.join("tokens.csv"),
        "Name,Keywords,Value\nspacing-4,\"gap, padding\",1rem\nradius-md,\"corner, rounded\",8px\n",
    )
    .unwrap();
    let catalog = root.join("catalog.toml");
    fs::write(
        &catalog,
        r#"
default_topic = "tokens"

[topics.tokens]
file = "tokens.csv"
search_fields = ["Name", "Keywords"]
output_fields = ["Name", "Value"]
"#,
    )
    .unwrap();

    let (ok, body) = run_json(
        root,
        &["rounded corner", "--catalog", catalog.to_str().unwrap()],
    );
    assert!(ok, "body: {body}");
    assert_eq!(body["domain"], "tokens");
    assert_eq!(body["results"][0]["Value"], "8px");
}

#[test]
fn data_dir_flag_overrides_environment() {
    let temp = setup_data();
    let empty = tempdir().unwrap();
    let output = uxguide(empty.path())
        .args(["raw bold", "--json", "--data-dir"])
        .arg(temp.path())
        .output()
        .expect("command run");
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["count"], 1);
}

#[test]
fn embed_mode_flag_overrides_invalid_environment() {
    let temp = setup_data();
    let output = uxguide(temp.path())
        .env("UXGUIDE_EMBEDDING_MODE", "gpu")
        .args(["frosted blur", "--json", "--mode", "hybrid", "--embed-mode", "stub"])
        .output()
        .expect("command run");
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["mode"], "fused");

    uxguide(temp.path())
        .env("UXGUIDE_EMBEDDING_MODE", "gpu")
        .args(["frosted blur", "--mode", "hybrid"])
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("Error: Invalid embedding mode"));
}
