//! End-to-end tests driving the `ragtime` binary and the library's
//! persistence/pipeline surface together.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use ragtime_rs::persistence;
use tempfile::TempDir;

fn ragtime() -> Command {
    Command::cargo_bin("ragtime").expect("binary should build")
}

#[test]
fn init_scaffolds_a_working_pipeline_directory() {
    let dir = TempDir::new().expect("tempdir");

    ragtime()
        .args(["init", dir.path().to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("questions.json"));

    assert!(dir.path().join("questions.json").exists());
    assert!(dir.path().join("pipeline.toml").exists());
}

#[test]
fn init_without_force_refuses_to_clobber_existing_files() {
    let dir = TempDir::new().expect("tempdir");

    ragtime()
        .args(["init", dir.path().to_str().expect("utf8 path")])
        .assert()
        .success();

    ragtime()
        .args(["init", dir.path().to_str().expect("utf8 path")])
        .assert()
        .failure();

    ragtime()
        .args(["init", "--force", dir.path().to_str().expect("utf8 path")])
        .assert()
        .success();
}

#[test]
fn stats_reports_question_count_for_a_saved_expe() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("questions.json");
    std::fs::write(
        &path,
        r#"[{"question":{"text":"what is rust"}}, {"question":{"text":"what is ownership"}}]"#,
    )
    .expect("write questions");

    ragtime()
        .args(["stats", path.to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("questions:    2"));
}

#[test]
fn stats_folder_mode_tabulates_every_json_file() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("a.json"),
        r#"[{"question":{"text":"q1"}}]"#,
    )
    .expect("write a.json");
    std::fs::write(
        dir.path().join("b.json"),
        r#"[{"question":{"text":"q1"}}, {"question":{"text":"q2"}}]"#,
    )
    .expect("write b.json");

    ragtime()
        .args(["stats", "--folder", dir.path().to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.json"))
        .stdout(predicate::str::contains("b.json"));
}

#[test]
fn stats_json_format_emits_parseable_output() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("questions.json");
    std::fs::write(&path, r#"[{"question":{"text":"q"}}]"#).expect("write questions");

    let output = ragtime()
        .args(["--format", "json", "stats", path.to_str().expect("utf8 path")])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json output");
    assert_eq!(value["nb_questions"], 1);
}

#[test]
fn run_rejects_a_config_naming_no_stages() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("questions.json"),
        r#"[{"question":{"text":"q"}}]"#,
    )
    .expect("write questions");
    let config_path = dir.path().join("pipeline.toml");
    std::fs::write(
        &config_path,
        format!(
            "input_file = \"questions.json\"\nstarting_folder = \"{}\"\n\n[generate]\n",
            dir.path().display()
        ),
    )
    .expect("write config");

    ragtime()
        .args(["run", config_path.to_str().expect("utf8 path")])
        .env("OPENAI_API_KEY", "test-key")
        .assert()
        .failure();
}

#[test]
fn import_evals_applies_csv_rows_and_saves() {
    let dir = TempDir::new().expect("tempdir");
    let expe_path = dir.path().join("questions.json");
    std::fs::write(
        &expe_path,
        r#"[{"question":{"text":"what is rust"},"answers":{"items":[{"text":"a"}]}}]"#,
    )
    .expect("write questions");
    let csv_path = dir.path().join("evals.csv");
    std::fs::write(&csv_path, "question,human_eval,facts\nwhat is rust,1.0,Rust is a language\n")
        .expect("write csv");

    ragtime()
        .args([
            "import-evals",
            expe_path.to_str().expect("utf8 path"),
            csv_path.to_str().expect("utf8 path"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 applied"));
}

#[test]
fn persistence_round_trips_through_the_library_api() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("questions.json");
    std::fs::write(&path, r#"[{"question":{"text":"what is rust"}}]"#)
        .expect("write questions");

    let expe = persistence::load(&path).expect("load");
    assert_eq!(expe.len(), 1);

    let saved = persistence::save(&expe, &path, false).expect("save");
    assert!(saved.file_name().unwrap().to_str().unwrap().contains("1Q_0C_0F_0M_0A_0HE_0AE"));

    let reloaded = persistence::load(&saved).expect("reload");
    assert_eq!(reloaded.len(), 1);
}
