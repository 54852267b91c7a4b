#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn store_file(dir: &TempDir) -> PathBuf {
    dir.path().join("config/slots.yaml")
}

fn slot(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("slot").unwrap();
    cmd.current_dir(dir.path())
        .env("SLOT_FILE", store_file(dir))
        .env_remove("RUST_LOG");
    cmd
}

fn save(dir: &TempDir, name: &str, command: &str, tags: &[&str]) {
    let mut cmd = slot(dir);
    cmd.args(["save", name, command]);
    for tag in tags {
        cmd.args(["--tags", tag]);
    }
    cmd.assert().success();
}

fn stored_names(dir: &TempDir) -> Vec<String> {
    let data = std::fs::read_to_string(store_file(dir)).unwrap();
    let records: Vec<serde_yaml::Value> = serde_yaml::from_str(&data).unwrap();
    records
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// slot save
// ---------------------------------------------------------------------------

#[test]
fn save_creates_store_and_lists() {
    let dir = TempDir::new().unwrap();
    slot(&dir)
        .args(["save", "hello", "echo \"Hello World!\""])
        .assert()
        .success()
        .stdout("saved hello\n");

    assert!(store_file(&dir).exists());

    slot(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"))
        .stdout(predicate::str::contains("echo \"Hello World!\""));
}

#[test]
fn save_existing_fails_without_force() {
    let dir = TempDir::new().unwrap();
    save(&dir, "deploy", "kubectl apply -f {{.file}}", &[]);

    slot(&dir)
        .args(["save", "deploy", "something else"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slot \"deploy\" exists (use --force)"));

    let data = std::fs::read_to_string(store_file(&dir)).unwrap();
    assert!(data.contains("kubectl apply"));
    assert!(!data.contains("something else"));
}

#[test]
fn save_force_replaces_without_growing() {
    let dir = TempDir::new().unwrap();
    save(&dir, "a", "echo a", &[]);
    save(&dir, "deploy", "kubectl apply -f {{.file}}", &[]);
    save(&dir, "z", "echo z", &[]);

    slot(&dir)
        .args(["save", "deploy", "kubectl apply -f {{.file}} -n {{.ns}}", "--force"])
        .assert()
        .success();

    assert_eq!(stored_names(&dir), vec!["a", "deploy", "z"]);
    let data = std::fs::read_to_string(store_file(&dir)).unwrap();
    assert!(data.contains("-n {{.ns}}"));
}

#[test]
fn save_fresh_name_grows_by_one() {
    let dir = TempDir::new().unwrap();
    save(&dir, "a", "echo a", &[]);
    save(&dir, "b", "echo b", &[]);
    assert_eq!(stored_names(&dir).len(), 2);
}

#[test]
fn save_rejects_name_with_whitespace() {
    let dir = TempDir::new().unwrap();
    slot(&dir)
        .args(["save", "bad name", "echo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid slot name"));
}

#[test]
fn save_accepts_comma_separated_tags_and_description() {
    let dir = TempDir::new().unwrap();
    slot(&dir)
        .args([
            "save",
            "deploy",
            "kubectl apply",
            "--tags",
            "k8s,prod",
            "--tags",
            "k8s",
            "--description",
            "roll out",
        ])
        .assert()
        .success();

    slot(&dir)
        .args(["--json", "show", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"k8s\",\n    \"prod\""))
        .stdout(predicate::str::contains("\"description\": \"roll out\""));
}

// ---------------------------------------------------------------------------
// slot list
// ---------------------------------------------------------------------------

#[test]
fn list_filters_by_all_tags() {
    let dir = TempDir::new().unwrap();
    save(&dir, "deploy", "kubectl apply", &["k8s", "prod"]);
    save(&dir, "logs", "kubectl logs", &["k8s"]);
    save(&dir, "hello", "echo hello", &[]);

    slot(&dir)
        .args(["ls", "--tsv", "--tag", "k8s", "--tag", "prod"])
        .assert()
        .success()
        .stdout("NAME\tTAGS\tCMD\tDESCRIPTION\ndeploy\tk8s,prod\tkubectl apply\t\n");

    let out = slot(&dir)
        .args(["ls", "--tsv", "--tag", "k8s"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 3);
    assert!(!stdout.contains("hello"));
}

#[test]
fn list_without_filter_shows_everything_sorted() {
    let dir = TempDir::new().unwrap();
    save(&dir, "zeta", "echo z", &[]);
    save(&dir, "alpha", "echo a", &["x"]);

    let out = slot(&dir).args(["list", "--tsv"]).output().unwrap();
    let stdout = String::from_utf8(out.stdout).unwrap();
    let names: Vec<&str> = stdout
        .lines()
        .skip(1)
        .map(|l| l.split('\t').next().unwrap())
        .collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn list_tsv_keeps_one_line_per_slot() {
    let dir = TempDir::new().unwrap();
    save(&dir, "script", "cd /tmp\nls -la\nexit", &[]);
    save(&dir, "plain", "echo hi", &[]);

    let out = slot(&dir).args(["ls", "--tsv"]).output().unwrap();
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.contains("cd /tmp\\nls -la\\nexit"));
}

#[test]
fn list_table_marks_newlines() {
    let dir = TempDir::new().unwrap();
    save(&dir, "script", "cd /tmp\nls", &[]);

    slot(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("cd /tmp^Jls"))
        .stdout(predicate::str::starts_with("NAME"));
}

#[test]
fn list_table_ends_with_store_path() {
    let dir = TempDir::new().unwrap();
    save(&dir, "hello", "echo hello", &[]);
    let path = store_file(&dir).to_string_lossy().replace('\\', "/");

    let out = slot(&dir).arg("ls").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.ends_with(&format!("\n\n{path}\n")), "got: {stdout:?}");

    let out = slot(&dir).args(["ls", "--tsv"]).output().unwrap();
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(!stdout.contains(&path));
}

#[test]
fn list_on_first_run_is_header_only() {
    let dir = TempDir::new().unwrap();
    slot(&dir)
        .args(["ls", "--tsv"])
        .assert()
        .success()
        .stdout("NAME\tTAGS\tCMD\tDESCRIPTION\n");
    assert!(!store_file(&dir).exists());
}

#[test]
fn list_json_outputs_array() {
    let dir = TempDir::new().unwrap();
    save(&dir, "deploy", "kubectl apply", &["k8s"]);

    let out = slot(&dir).args(["ls", "--json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"].as_str(), Some("deploy"));
    assert_eq!(items[0]["cmd"].as_str(), Some("kubectl apply"));
}

// ---------------------------------------------------------------------------
// slot remove
// ---------------------------------------------------------------------------

#[test]
fn remove_deletes_slot() {
    let dir = TempDir::new().unwrap();
    save(&dir, "a", "echo a", &[]);
    save(&dir, "b", "echo b", &[]);

    slot(&dir)
        .args(["rm", "a"])
        .assert()
        .success()
        .stdout("removed a\n");
    assert_eq!(stored_names(&dir), vec!["b"]);
}

#[test]
fn remove_absent_fails_and_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    save(&dir, "deploy", "kubectl apply -f {{.file}}", &["k8s"]);
    let before = std::fs::read(store_file(&dir)).unwrap();

    slot(&dir)
        .args(["remove", "deplyo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no such slot \"deplyo\": did you mean \"deploy\"?",
        ));

    let after = std::fs::read(store_file(&dir)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn delete_alias_works() {
    let dir = TempDir::new().unwrap();
    save(&dir, "a", "echo a", &[]);
    slot(&dir).args(["delete", "a"]).assert().success();
}

// ---------------------------------------------------------------------------
// slot render
// ---------------------------------------------------------------------------

#[test]
fn render_substitutes_positional_bindings() {
    let dir = TempDir::new().unwrap();
    save(&dir, "deploy", "kubectl apply -f {{.file}} -n {{.ns}}", &[]);

    slot(&dir)
        .args(["render", "deploy", "file=k8s.yml", "ns=production"])
        .assert()
        .success()
        .stdout("kubectl apply -f k8s.yml -n production\n");
}

#[test]
fn run_accepts_with_flags() {
    let dir = TempDir::new().unwrap();
    save(&dir, "deploy", "kubectl apply -f {{.file}}", &[]);

    slot(&dir)
        .args(["run", "deploy", "--with", "file=k8s.yml"])
        .assert()
        .success()
        .stdout("kubectl apply -f k8s.yml\n");
}

#[test]
fn render_missing_variable_fails() {
    let dir = TempDir::new().unwrap();
    save(&dir, "deploy", "kubectl apply -f {{.file}} -n {{.ns}}", &[]);

    slot(&dir)
        .args(["run", "deploy", "file=a.yml"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("missing template variables: ns"));
}

#[test]
fn render_malformed_binding_fails() {
    let dir = TempDir::new().unwrap();
    save(&dir, "deploy", "kubectl apply -f {{.file}}", &[]);

    slot(&dir)
        .args(["run", "deploy", "file"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing value: \"file\""));
}

#[test]
fn render_unknown_slot_fails() {
    let dir = TempDir::new().unwrap();
    slot(&dir)
        .args(["run", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such slot \"nope\""));
}

#[test]
fn render_exposes_args_after_dash() {
    let dir = TempDir::new().unwrap();
    save(&dir, "ls", "ls {{.CLI_ARGS}}", &[]);

    slot(&dir)
        .args(["run", "ls", "--", "-la", "/tmp"])
        .assert()
        .success()
        .stdout("ls -la /tmp\n");
}

#[test]
fn render_exposes_store_file() {
    let dir = TempDir::new().unwrap();
    save(&dir, "edit", "$EDITOR {{.SLOTS_FILE}}", &[]);

    let expected = format!("$EDITOR {}\n", store_file(&dir).display());
    slot(&dir)
        .args(["run", "edit"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn render_passes_bash_length_expansion_through() {
    let dir = TempDir::new().unwrap();
    save(&dir, "count", "a=({{.items}}); echo ${#a[@]}", &[]);
    slot(&dir)
        .args(["run", "count", "items=x y z"])
        .assert()
        .success()
        .stdout("a=(x y z); echo ${#a[@]}\n");
}

#[test]
fn render_preserves_multiline_commands() {
    let dir = TempDir::new().unwrap();
    save(&dir, "script", "cd {{.dir}}\nmake", &[]);

    slot(&dir)
        .args(["run", "script", "dir=/src"])
        .assert()
        .success()
        .stdout("cd /src\nmake\n");
}

// ---------------------------------------------------------------------------
// slot show / path
// ---------------------------------------------------------------------------

#[test]
fn show_lists_placeholders() {
    let dir = TempDir::new().unwrap();
    save(&dir, "deploy", "kubectl apply -f {{.file}} -n {{.ns}}", &["k8s"]);

    slot(&dir)
        .args(["show", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("placeholders: file, ns"))
        .stdout(predicate::str::contains("tags:         k8s"));
}

#[test]
fn path_prints_store_file() {
    let dir = TempDir::new().unwrap();
    slot(&dir)
        .arg("path")
        .assert()
        .success()
        .stdout(format!("{}\n", store_file(&dir).display()));
}

#[test]
fn file_flag_overrides_environment() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("other.yaml");
    slot(&dir)
        .args(["--file", other.to_str().unwrap(), "path"])
        .assert()
        .success()
        .stdout(format!("{}\n", other.display()));
}

// ---------------------------------------------------------------------------
// slot init / completions
// ---------------------------------------------------------------------------

#[test]
fn init_prints_integration() {
    let dir = TempDir::new().unwrap();
    slot(&dir)
        .args(["init", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("print -rz"));

    slot(&dir)
        .args(["init", "bash", "--fzf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("history -s"))
        .stdout(predicate::str::contains("fzf"));
}

#[test]
fn init_unsupported_shell_fails() {
    let dir = TempDir::new().unwrap();
    slot(&dir)
        .args(["init", "fish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported shell \"fish\""));
}

#[test]
fn completions_print_script() {
    let dir = TempDir::new().unwrap();
    slot(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete -F _slot slot"));
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[test]
fn corrupt_store_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(store_file(&dir).parent().unwrap()).unwrap();
    std::fs::write(store_file(&dir), "- name: [unclosed\n").unwrap();

    slot(&dir)
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}
