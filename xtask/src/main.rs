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

// Build automation and resource tooling for the Khora rendering layer
// Run with: cargo xtask <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ci, resources};
use helpers::print_error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Khora build automation tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build all crates in the workspace.
    Build,
    /// Run all tests in the workspace.
    Test,
    /// Run `cargo check` on all crates.
    Check,
    /// Format all code in the workspace.
    Format,
    /// Run clippy on all crates with warnings as errors.
    Clippy,
    /// Run all CI tasks (build, test, check, format, clippy).
    All,
    /// Resource source and compiled store management.
    Resources {
        #[command(subcommand)]
        command: ResourcesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ResourcesCommand {
    /// Records the shaders and programs of a manifest into the source repository.
    Import {
        /// Manifest describing the resources.
        #[arg(long, default_value = resources::MANIFEST_FILE_NAME)]
        manifest: PathBuf,
        /// Root of the source repository.
        #[arg(long, default_value = resources::SOURCE_ROOT)]
        sources: PathBuf,
    },
    /// Prints the recorded source and compiled streams of one resource.
    Inspect {
        /// The resource to inspect.
        uuid: String,
        /// Root of the source repository.
        #[arg(long, default_value = resources::SOURCE_ROOT)]
        sources: PathBuf,
        /// Root of the compiled resource store.
        #[arg(long, default_value = resources::STORE_ROOT)]
        store: PathBuf,
    },
    /// Lists every compiled stream in the store.
    List {
        /// Root of the compiled resource store.
        #[arg(long, default_value = resources::STORE_ROOT)]
        store: PathBuf,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build => ci::build(),
        Command::Test => ci::test(),
        Command::Check => ci::check(),
        Command::Format => ci::format(),
        Command::Clippy => ci::clippy(),
        Command::All => ci::all(),
        Command::Resources { command } => match command {
            ResourcesCommand::Import { manifest, sources } => {
                resources::import(&manifest, &sources)
            }
            ResourcesCommand::Inspect {
                uuid,
                sources,
                store,
            } => resources::inspect(&uuid, &sources, &store),
            ResourcesCommand::List { store } => resources::list(&store),
        },
    }
}

fn main() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    if let Err(e) = run(Cli::parse()) {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
