// Copyright 2026 Sweep Authors
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

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(
    name = "sweep",
    version,
    about = "Exhaustive, resumable article sweeps over a capped news archive"
)]
pub struct Cli {
    /// Config file (defaults to the global sweep.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a config template
    Init(InitArgs),

    /// Print the queries a sweep would submit
    Plan(PlanArgs),

    /// Sweep the dataset, or one topic window
    Run(RunArgs),

    /// Show ledger coverage per record
    Status(StatusArgs),

    /// Extract a publication date from a citation string
    ParseDate(ParseDateArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Event type (overrides config)
    #[arg(long)]
    pub event: Option<String>,

    /// Only these record indices
    #[arg(long = "record")]
    pub records: Vec<u64>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Event type (overrides config)
    #[arg(long)]
    pub event: Option<String>,

    /// Only these record indices
    #[arg(long = "record")]
    pub records: Vec<u64>,

    /// JSON-lines capture to serve archive responses from
    #[arg(long)]
    pub replay: PathBuf,

    /// Search one phrase instead of the dataset
    #[arg(long, requires = "from")]
    pub topic: Option<String>,

    /// Window start for --topic
    #[arg(long)]
    pub from: Option<String>,

    /// Window length for --topic, in days
    #[arg(long, default_value_t = 1)]
    pub days: i64,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Event type or topic (overrides config)
    #[arg(long)]
    pub event: Option<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ParseDateArgs {
    /// Citation text
    pub text: String,

    /// Earliest plausible date
    #[arg(long)]
    pub anchor: String,

    /// Plausible window length in days
    #[arg(long, default_value_t = 51)]
    pub max_offset: i64,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}
