use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const NOTE: &str = "\
#!refnote
BIBREF: Dean04
ABOUT: MapReduce paper
REFERENCES: Ghemawat03
TAGS: distributed

TAG: scheduling
AT: p. 3
The master assigns tasks to idle workers.

TAG: storage
Compare the shuffle format with [[Ref:Ghemawat03]].
";

fn run_cmd(db_path: &Path, args: &[&str]) -> String {
    let output = cargo_bin_cmd!("refnote")
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(db_path: &Path, args: &[&str]) -> Value {
    let output = cargo_bin_cmd!("refnote")
        .args(["--db-path", db_path.to_str().expect("db path"), "--json"])
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn seeded_db(temp: &TempDir) -> std::path::PathBuf {
    let notes = temp.path().join("notes");
    fs::create_dir(&notes).expect("mkdir");
    fs::write(notes.join("dean04"), NOTE).expect("write note");

    let db_path = temp.path().join("refnote.sqlite3");
    run_cmd(&db_path, &["import", notes.to_str().expect("path")]);
    db_path
}

#[test]
fn cli_import_filter_flow() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = seeded_db(&temp);

    let all = run_cmd_json(&db_path, &["entries", "ls"]);
    assert_eq!(all.as_array().expect("array").len(), 2);

    let filtered = run_cmd_json(&db_path, &["entries", "ls", "--filter", "scheduling"]);
    let items = filtered.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["at"], "p. 3");

    let negated = run_cmd_json(&db_path, &["entries", "ls", "--filter", "/scheduling"]);
    assert_eq!(negated.as_array().expect("array").len(), 1);

    let sources = run_cmd_json(&db_path, &["sources", "ls"]);
    let sources = sources.as_array().expect("array");
    // Dean04 plus the bare Ghemawat03 citation key.
    assert_eq!(sources.len(), 2);

    let shown = run_cmd_json(&db_path, &["sources", "show", "Dean04"]);
    assert_eq!(shown["about"], "MapReduce paper");
    assert_eq!(shown["references"][0], "Ghemawat03");
}

#[test]
fn cli_tag_maintenance_flow() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = seeded_db(&temp);

    run_cmd(&db_path, &["tags", "mv", "scheduling", "sched"]);
    let tags = run_cmd_json(&db_path, &["tags", "ls"]);
    let names: Vec<&str> = tags
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["name"].as_str().expect("name"))
        .collect();
    assert!(names.contains(&"sched"));
    assert!(!names.contains(&"scheduling"));

    let removed = run_cmd_json(&db_path, &["tags", "rm", "--filter", "storage"]);
    assert_eq!(removed["removed"], 1);

    let report = run_cmd_json(&db_path, &["check", "--min-uses", "3"]);
    assert!(report["low_use"].as_array().expect("array").len() >= 1);
}

#[test]
fn cli_export_and_dump_round_trip() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = seeded_db(&temp);

    let out = temp.path().join("export.txt");
    run_cmd(
        &db_path,
        &[
            "export",
            "--format",
            "plain",
            "--out",
            out.to_str().expect("path"),
        ],
    );
    let exported = fs::read_to_string(&out).expect("read export");
    assert!(exported.starts_with("#!refnote"));
    assert!(exported.contains("BIBREF: Dean04"));

    let dump_dir = temp.path().join("dump");
    run_cmd(&db_path, &["dump", "--out", dump_dir.to_str().expect("path")]);
    assert!(dump_dir.join("Dean04").exists());
    assert!(dump_dir.join("Ghemawat03").exists());

    // Dumped files import cleanly into a fresh database.
    let second_db = temp.path().join("second.sqlite3");
    run_cmd(&second_db, &["import", dump_dir.to_str().expect("path")]);
    let entries = run_cmd_json(&second_db, &["entries", "ls"]);
    assert_eq!(entries.as_array().expect("array").len(), 2);
}

#[test]
fn cli_invalid_filter_maps_to_exit_code() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("refnote.sqlite3");

    let output = cargo_bin_cmd!("refnote")
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(["entries", "ls", "--filter", "(fpga"])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));
}
