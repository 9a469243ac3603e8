use assert_cmd::Command;
use predicates::str::contains;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCRIPT_VAR: &str = "BUSINESS_FORM_CLI_SCRIPT";
const CATEGORIES_VAR: &str = "BUSINESS_FORM_CATEGORIES_URL";

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("business_form_cli").unwrap();
    cmd.env(SCRIPT_VAR, "1")
        .env_remove(CATEGORIES_VAR)
        .env("RUST_LOG", "off")
        .arg("--config")
        .arg(dir.join("config.json"));
    cmd
}

fn read_json(path: &Path) -> Value {
    let data = fs::read_to_string(path).expect("read submission");
    serde_json::from_str(&data).expect("parse submission")
}

#[test]
fn script_mode_submits_complete_business() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("submission.json");
    let input = "\
name Acme
description \"Pipes and wires\"
add-branch Main \"1 High St\"
add-contact 1 phone 555-0100
add-social 1 linkedin acme-co
show
submit
exit
";

    cli(dir.path())
        .arg("--offline")
        .arg("--output")
        .arg(&output)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Name: Acme"))
        .stdout(contains("1. Main – 1 High St"))
        .stdout(contains("Submitted `Acme` with 1 branch(es)."));

    assert_eq!(
        read_json(&output),
        json!({
            "name": "Acme",
            "description": "Pipes and wires",
            "categories": [],
            "branches": [{
                "name": "Main",
                "address": "1 High St",
                "contacts": [{ "type": "phone", "info": "555-0100" }],
                "socialLinks": [{ "platform": "linkedin", "info": "acme-co" }]
            }]
        })
    );
}

#[test]
fn incomplete_form_is_not_submitted() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("submission.json");
    let input = "name Acme\nadd-branch\nsubmit\nexit\n";

    cli(dir.path())
        .arg("--offline")
        .arg("--output")
        .arg(&output)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("required fields are missing"))
        .stdout(contains("- description"))
        .stdout(contains("- branches[1].name"));

    assert!(!output.exists());
}

#[test]
fn repeated_submit_keeps_output_valid_json() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("submission.json");
    let input = "\
name Acme
description desc
add-branch Main \"1 High St\"
submit
name \"Acme Two\"
submit
exit
";

    cli(dir.path())
        .arg("--offline")
        .arg("--output")
        .arg(&output)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Submitted `Acme Two` with 1 branch(es)."));

    let payload = read_json(&output);
    assert_eq!(payload["name"], "Acme Two");
    assert_eq!(payload["branches"][0]["name"], "Main");
}

#[test]
fn unknown_command_suggests_closest_match() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--offline")
        .write_stdin("shwo\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `shwo`"))
        .stdout(contains("Suggestion: `show`?"));
}

#[test]
fn categories_come_from_the_taxonomy_service() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/categories")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"DirectorySubcategories":[{"subcategory":"Plumbing"},{"subcategory":"Pest Control"}]},
                {"DirectorySubcategories":[{"subcategory":"Electrical"}]}]"#,
        )
        .expect(1)
        .create();

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("submission.json");
    let input = "\
name Acme
description desc
suggest p
category pl
category el
add-branch Main \"1 High St\"
submit
exit
";

    cli(dir.path())
        .arg("--categories-url")
        .arg(format!("{}/categories", server.url()))
        .arg("--wait-for-categories")
        .arg("--output")
        .arg(&output)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Pest Control"))
        .stdout(contains("Added category `Plumbing`."))
        .stdout(contains("Added category `Electrical`."));

    mock.assert();
    let payload = read_json(&output);
    assert_eq!(payload["categories"], json!(["Plumbing", "Electrical"]));
}

#[test]
fn failed_taxonomy_keeps_the_form_usable() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/categories")
        .with_status(500)
        .create();

    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--categories-url")
        .arg(format!("{}/categories", server.url()))
        .arg("--wait-for-categories")
        .write_stdin("suggest\nname Acme\nshow\nexit\n")
        .assert()
        .success()
        .stdout(contains("No suggestions."))
        .stdout(contains("could not be loaded"))
        .stdout(contains("Name: Acme"));
}

#[test]
fn build_info_prints_metadata() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--build-info")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}
