// Dweve ParScale - Parallel Scaling Analysis
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for the parscale binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const BREAKDOWN_CSV: &str = "\
n,threads,find_furthest_ms,build_linklist_ms,scan_linklist_ms,extract_valid_ms,total_ms
10000000,1,40.0,30.0,20.0,10.0,100.0
10000000,2,20.0,16.0,10.0,5.0,52.0
10000000,4,10.0,9.0,5.0,3.0,30.0
";

const SCALING_CSV: &str = "\
algorithm,n,threads,time_ms,num_selected,throughput_M_per_sec
serial,1000000,1,10.0,100,100.0
parallel,1000000,1,12.0,100,83.33
parallel,1000000,4,4.0,100,250.0
";

/// Create a parscale command builder
fn parscale_cmd() -> Command {
    Command::cargo_bin("parscale").expect("Failed to find parscale binary")
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write input");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_breakdown_missing_default_input() {
    let dir = TempDir::new().unwrap();
    parscale_cmd()
        .current_dir(dir.path())
        .arg("breakdown")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Error: results/parallel_breakdown.csv not found",
        ))
        .stderr(predicate::str::contains(
            "Please run: tools/run_parallel_breakdown.sh",
        ));
}

#[test]
fn test_scaling_missing_input_custom_regen() {
    let dir = TempDir::new().unwrap();
    parscale_cmd()
        .current_dir(dir.path())
        .args(["scaling", "nope.csv", "--regen-command", "make bench"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: nope.csv not found"))
        .stderr(predicate::str::contains("Please run: make bench"));
}

#[test]
fn test_breakdown_prints_summary_and_writes_series() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "breakdown.csv", BREAKDOWN_CSV);
    let series = dir.path().join("series.json");

    parscale_cmd()
        .args(["breakdown", &input, "--series-out"])
        .arg(&series)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "BREAKDOWN ANALYSIS SUMMARY (n=10,000,000)",
        ))
        .stdout(predicate::str::contains("1. Best Configuration: 4 threads"))
        .stdout(predicate::str::contains("Primary Bottleneck: Find Furthest"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&series).unwrap()).unwrap();
    let names: Vec<&str> = json["series"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert!(names.contains(&"phase_time/find_furthest"));
    assert!(names.contains(&"phase_percentage/extract_valid"));
    assert!(names.contains(&"phase_speedup/build_linklist"));
    assert!(names.contains(&"reference/ideal_linear"));
}

#[test]
fn test_scaling_prints_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "scaling.csv", SCALING_CSV);

    parscale_cmd()
        .args(["scaling", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("PERFORMANCE SUMMARY"))
        .stdout(predicate::str::contains("Serial: 10.00 ms (100.0 M/s)"))
        .stdout(predicate::str::contains("4 threads:    4.00 ms (250.0 M/s) - 2.50x speedup"))
        .stdout(predicate::str::contains("slower"));
}

#[test]
fn test_missing_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "bad.csv", "n,total_ms\n10,1.0\n");

    parscale_cmd()
        .args(["scaling", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Missing required column: threads"));
}

#[test]
fn test_malformed_row_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "bad.csv", "n,threads,total_ms\n10,1,1.0\n10,-2,1.0\n");

    parscale_cmd()
        .args(["breakdown", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"))
        .stderr(predicate::str::contains("'threads'"));
}

#[test]
fn test_phase_tolerance_flag() {
    let dir = TempDir::new().unwrap();
    let over = "n,threads,find_furthest_ms,total_ms\n100,1,10.4,10.0\n";
    let input = write_input(&dir, "over.csv", over);

    parscale_cmd()
        .args(["breakdown", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("phases"));

    parscale_cmd()
        .args(["breakdown", &input, "--phase-tolerance", "0.05"])
        .assert()
        .success();

    parscale_cmd()
        .args(["breakdown", &input, "--phase-tolerance=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument '--phase-tolerance'"));
}

#[test]
fn test_missing_baseline_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "no_baseline.csv",
        "n,threads,total_ms\n100,2,5.0\n100,4,3.0\n",
    );

    parscale_cmd()
        .args(["breakdown", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("OMITTED (1):"))
        .stdout(predicate::str::contains("No baseline for group [n=100]"));
}

#[test]
fn test_focus_size_flag() {
    let dir = TempDir::new().unwrap();
    let csv = format!("{}1000,1,4.0,3.0,2.0,1.0,10.0\n1000,2,2.0,2.0,1.0,1.0,6.0\n", BREAKDOWN_CSV);
    let input = write_input(&dir, "sizes.csv", &csv);

    parscale_cmd()
        .args(["breakdown", &input, "-n", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BREAKDOWN ANALYSIS SUMMARY (n=1,000)"))
        .stdout(predicate::str::contains("1. Best Configuration: 2 threads"));
}
