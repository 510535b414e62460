use std::path::Path;

use assert_cmd::{cargo::cargo_bin_cmd, Command};

/// Get a Command for tally
pub fn tally() -> Command {
    cargo_bin_cmd!("tally")
}

/// Get a Command for tally running inside `dir`
pub fn tally_in(dir: &Path) -> Command {
    let mut cmd = tally();
    cmd.current_dir(dir);
    cmd
}

/// Init a store with one competition ("vocal-solo"), judges Ada and Grace,
/// contestants Alice and Bob, and criteria Pitch (max 10, 60%) and
/// Stage (max 5, 40%)
pub fn seed_store(dir: &Path) {
    tally_in(dir).arg("init").assert().success();
    tally_in(dir)
        .args(["competition", "add", "Vocal Solo"])
        .assert()
        .success();
    for judge in ["Ada", "Grace"] {
        tally_in(dir)
            .args(["judge", "add", judge, "-c", "vocal-solo"])
            .assert()
            .success();
    }
    for contestant in ["Alice", "Bob"] {
        tally_in(dir)
            .args(["contestant", "add", contestant, "-c", "vocal-solo"])
            .assert()
            .success();
    }
    tally_in(dir)
        .args([
            "criterion", "add", "Pitch", "-c", "vocal-solo", "--max", "10", "--weight", "60",
        ])
        .assert()
        .success();
    tally_in(dir)
        .args([
            "criterion", "add", "Stage", "-c", "vocal-solo", "--max", "5", "--weight", "40",
        ])
        .assert()
        .success();
}

/// Submit a full ballot for one judge and contestant
pub fn ballot(dir: &Path, judge: &str, contestant: &str, pitch: &str, stage: &str) {
    tally_in(dir)
        .args([
            "ballot",
            "-c",
            "vocal-solo",
            "-j",
            judge,
            "-n",
            contestant,
            "-s",
            &format!("Pitch={}", pitch),
            "-s",
            &format!("Stage={}", stage),
        ])
        .assert()
        .success();
}
