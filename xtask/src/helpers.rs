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

//! Terminal output shared by the xtask commands.

use anyhow::Result;
use std::fmt::Display;
use std::process::Command;
use std::time::Instant;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Accent colour of a block of output.
#[derive(Debug, Clone, Copy)]
pub enum Tone {
    Blue,
    Green,
    Cyan,
    Magenta,
    Yellow,
    Red,
}

impl Tone {
    fn code(self) -> &'static str {
        match self {
            Tone::Blue => "\x1b[34m",
            Tone::Green => "\x1b[32m",
            Tone::Cyan => "\x1b[36m",
            Tone::Magenta => "\x1b[35m",
            Tone::Yellow => "\x1b[33m",
            Tone::Red => "\x1b[31m",
        }
    }

    /// `text` in bold, in this colour.
    pub fn paint(self, text: impl Display) -> String {
        format!("{BOLD}{}{text}{RESET}", self.code())
    }
}

/// `text` in bold.
pub fn bold(text: impl Display) -> String {
    format!("{BOLD}{text}{RESET}")
}

pub fn print_banner() {
    let rule = "═".repeat(44);
    println!("{}", Tone::Cyan.paint(format!("╔{rule}╗")));
    println!("{}", Tone::Cyan.paint(format!("║{:^44}║", "KHORA RENDER")));
    println!("{}", Tone::Cyan.paint(format!("║{:^44}║", "build and resource automation")));
    println!("{}", Tone::Cyan.paint(format!("╚{rule}╝")));
}

pub fn print_heading(title: &str, symbol: &str, tone: Tone) {
    println!("\n{}", tone.paint(format!("━━━ {symbol} {title} ━━━")));
}

pub fn print_success(message: &str) {
    println!("{}", Tone::Green.paint(format!("✓ {message}")));
}

pub fn print_error(message: &str) {
    println!("{}", Tone::Red.paint(format!("✗ {message}")));
}

pub fn print_note(label: &str, message: &str) {
    println!("{} {message}", bold(format!("{label}:")));
}

/// Runs `cargo` with `args` and reports how long `task` took.
pub fn run_cargo(args: &[&str], task: &str) -> Result<()> {
    print_note("Command", &format!("cargo {}", args.join(" ")));
    let start = Instant::now();
    let status = Command::new("cargo").args(args).status()?;
    let seconds = start.elapsed().as_secs_f64();

    if status.success() {
        print_success(&format!("{task} completed in {seconds:.2}s"));
        Ok(())
    } else {
        print_error(&format!("{task} failed after {seconds:.2}s"));
        anyhow::bail!("{task} failed with status: {status}");
    }
}
