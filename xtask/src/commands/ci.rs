// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::helpers::*;
use anyhow::Result;
use std::time::Instant;

/// One cargo invocation of the CI pipeline.
struct Task {
    title: &'static str,
    name: &'static str,
    symbol: &'static str,
    tone: Tone,
    info: &'static str,
    args: &'static [&'static str],
}

const BUILD: Task = Task {
    title: "Building All Crates",
    name: "Build",
    symbol: "🔨",
    tone: Tone::Blue,
    info: "Compiling core, io, infra and their tests in debug mode",
    args: &["build", "--workspace", "--all-targets"],
};

const TEST: Task = Task {
    title: "Running All Tests",
    name: "Tests",
    symbol: "🧪",
    tone: Tone::Green,
    info: "Running unit tests, integration tests and doc tests",
    args: &["test", "--workspace"],
};

const CHECK_TASK: Task = Task {
    title: "Checking All Crates",
    name: "Check",
    symbol: "🔍",
    tone: Tone::Cyan,
    info: "Checking code for errors without building executables",
    args: &["check", "--workspace", "--all-targets"],
};

const FORMAT: Task = Task {
    title: "Formatting Code",
    name: "Format",
    symbol: "🎨",
    tone: Tone::Magenta,
    info: "Formatting code using rustfmt with default settings",
    // `fmt` takes `--all`, not `--workspace`
    args: &["fmt", "--all"],
};

const CLIPPY_TASK: Task = Task {
    title: "Running Clippy",
    name: "Clippy",
    symbol: "📎",
    tone: Tone::Yellow,
    info: "Running Clippy linter with warnings as errors",
    args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
};

const PIPELINE: [&Task; 5] = [&BUILD, &TEST, &CHECK_TASK, &FORMAT, &CLIPPY_TASK];

fn run(task: &Task) -> Result<()> {
    print_heading(task.title, task.symbol, task.tone);
    print_note("Info", task.info);
    run_cargo(task.args, task.name)
}

pub fn build() -> Result<()> {
    run(&BUILD)
}

pub fn test() -> Result<()> {
    run(&TEST)
}

pub fn check() -> Result<()> {
    run(&CHECK_TASK)
}

pub fn format() -> Result<()> {
    run(&FORMAT)
}

pub fn clippy() -> Result<()> {
    run(&CLIPPY_TASK)
}

/// Runs every task, even after a failure, then reports.
pub fn all() -> Result<()> {
    print_banner();
    let phases: Vec<&str> = PIPELINE.iter().map(|task| task.name).collect();
    print_note("Pipeline", &phases.join(" → "));

    let start_time = Instant::now();
    let failed: Vec<&str> = PIPELINE
        .iter()
        .enumerate()
        .filter_map(|(i, task)| {
            let phase = format!("[{}/{}] {} phase", i + 1, PIPELINE.len(), task.name);
            println!("\n{}", task.tone.paint(phase));
            run(task).err().map(|_| task.name)
        })
        .collect();

    let summary = format!("Pipeline summary ({:.2}s)", start_time.elapsed().as_secs_f64());
    print_heading(&summary, "📋", Tone::Cyan);
    if failed.is_empty() {
        print_success(&format!("All {} tasks completed", PIPELINE.len()));
        Ok(())
    } else {
        print_error(&format!("Failed: {}", failed.join(", ")));
        anyhow::bail!(
            "Pipeline failed with {}/{} successful tasks.",
            PIPELINE.len() - failed.len(),
            PIPELINE.len()
        );
    }
}
