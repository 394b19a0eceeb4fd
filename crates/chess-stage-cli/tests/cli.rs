use std::fs;
use std::path::Path;

use assert_cmd::Command;
use nalgebra::Point3;
use predicates::prelude::*;

use chess_stage::{BoardGeometry, SceneObject, SnapshotScene};

/// Snapshot with the reference volumes and a handful of pieces on their
/// starting squares.
fn write_scene(path: &Path) {
    let geometry =
        BoardGeometry::from_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(8.0, 8.0, 0.2))
            .unwrap();
    let mut scene = SnapshotScene::new(vec![
        SceneObject::with_bounds(
            "Black & white",
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(8.0, 8.0, 0.2),
        ),
        SceneObject::with_bounds(
            "Outer frame",
            Point3::new(-0.5, -0.5, 0.0),
            Point3::new(8.5, 8.5, 0.3),
        ),
    ]);
    for (name, square) in [
        ("white king", "e1"),
        ("king", "e8"),
        ("white queen", "d1"),
        ("E", "e2"),
    ] {
        scene.push(SceneObject::at(
            name,
            geometry.square_center(square.parse().unwrap(), 0.9),
        ));
    }
    scene.write_json(path).unwrap();
}

fn bin() -> Command {
    Command::cargo_bin("chess-stage").unwrap()
}

#[test]
fn place_renders_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let scene = dir.path().join("scene.json");
    write_scene(&scene);
    let output = dir.path().join("kings");

    bin()
        .args(["place", "--scene"])
        .arg(&scene)
        .args(["--fen", "4k3/8/8/8/8/8/8/4K3 w - - 0 1", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("placed 2, hidden 2"));

    assert!(dir.path().join("kings.png").exists());
}

#[test]
fn place_reports_unfulfilled_targets() {
    let dir = tempfile::tempdir().unwrap();
    let scene = dir.path().join("scene.json");
    write_scene(&scene);

    bin()
        .args(["place", "--scene"])
        .arg(&scene)
        .args(["--fen", "3q4/8/8/8/8/8/8/8", "--output"])
        .arg(dir.path().join("missing"))
        .assert()
        .success()
        .stdout(predicate::str::contains("unfulfilled: q on d8"));
}

#[test]
fn place_can_save_the_mutated_scene() {
    let dir = tempfile::tempdir().unwrap();
    let scene = dir.path().join("scene.json");
    write_scene(&scene);
    let saved = dir.path().join("after.json");

    bin()
        .args(["place", "--scene"])
        .arg(&scene)
        .args(["--fen", "8/8/8/8/8/8/8/4K3", "--output"])
        .arg(dir.path().join("king"))
        .arg("--save-scene")
        .arg(&saved)
        .assert()
        .success();

    let after = SnapshotScene::load_json(&saved).unwrap();
    let queen = after.object("white queen").unwrap();
    assert!(queen.hide_render, "unused piece stays hidden in saved scene");
}

#[test]
fn malformed_fen_fails_with_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let scene = dir.path().join("scene.json");
    write_scene(&scene);

    bin()
        .args(["place", "--scene"])
        .arg(&scene)
        .args(["--fen", "totally/not/a/fen", "--output"])
        .arg(dir.path().join("bad"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn batch_reads_csv_column_and_renders_frames() {
    let dir = tempfile::tempdir().unwrap();
    let scene = dir.path().join("scene.json");
    write_scene(&scene);
    let input = dir.path().join("games.csv");
    fs::write(
        &input,
        "move,fen\n1,4k3/8/8/8/8/8/8/4K3\n2,4k3/8/8/8/8/8/8/4K3\n3,8/8/8/8/8/8/8/4K3\n",
    )
    .unwrap();
    let out_dir = dir.path().join("renders");

    bin()
        .args(["batch", "--scene"])
        .arg(&scene)
        .arg("--input")
        .arg(&input)
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("rendered 2 frames (1 duplicates"));

    assert!(out_dir.join("synthetic_0000.png").exists());
    assert!(out_dir.join("synthetic_0001.png").exists());
}

#[test]
fn batch_accepts_plain_line_input() {
    let dir = tempfile::tempdir().unwrap();
    let scene = dir.path().join("scene.json");
    write_scene(&scene);
    let input = dir.path().join("fens.txt");
    fs::write(&input, "8/8/8/8/8/8/8/4K3\n4k3/8/8/8/8/8/8/8\n").unwrap();
    let out_dir = dir.path().join("renders");

    bin()
        .args(["batch", "--scene"])
        .arg(&scene)
        .arg("--input")
        .arg(&input)
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rendered 1 frames"));

    assert!(out_dir.join("synthetic_0000.png").exists());
    assert!(!out_dir.join("synthetic_0001.png").exists());
}

#[test]
fn diagnose_prints_board_measurements() {
    let dir = tempfile::tempdir().unwrap();
    let scene = dir.path().join("scene.json");
    write_scene(&scene);

    bin()
        .args(["diagnose", "--scene"])
        .arg(&scene)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"square_size\": 1.0"))
        .stdout(predicate::str::contains("\"pieces\": 4"));
}
