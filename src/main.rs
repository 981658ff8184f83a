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

mod cli;
mod config;
mod constraint;
mod dataset;
mod dates;
mod error;
mod fetch;
mod keywords;
mod ledger;
mod model;
mod orchestrator;
mod output;
mod reconcile;
mod synth;

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use anyhow::Context as _;
use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::cli::InitArgs;
use crate::cli::ParseDateArgs;
use crate::cli::PlanArgs;
use crate::cli::RunArgs;
use crate::cli::StatusArgs;
use crate::config::Config;
use crate::dates::DateExtractor;
use crate::dates::parse_full_date;
use crate::fetch::Authenticator;
use crate::fetch::CookieAuthenticator;
use crate::fetch::ReplayFetcher;
use crate::ledger::JsonlLedger;
use crate::model::PersistedArticle;
use crate::model::StructuredRecord;
use crate::orchestrator::Orchestrator;
use crate::output::JsonResponse;
use crate::output::StatsOut;
use crate::output::print_json;
use crate::synth::QuerySynthesizer;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init(args) => {
            let json = args.json;
            handle_result(cmd_init(config_path, args), json)
        }
        Commands::Plan(args) => {
            let json = args.json;
            handle_result(cmd_plan(config_path, args), json)
        }
        Commands::Run(args) => {
            let json = args.json;
            handle_result(cmd_run(config_path, args), json)
        }
        Commands::Status(args) => {
            let json = args.json;
            handle_result(cmd_status(config_path, args), json)
        }
        Commands::ParseDate(args) => {
            let json = args.json;
            handle_result(cmd_parse_date(args), json)
        }
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_result(result: Result<()>, json: bool) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            if json {
                let resp = JsonResponse::error("error", &format!("{err:#}"));
                print_json(&resp)?;
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}

fn cmd_init(config_path: Option<&Path>, args: InitArgs) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => config::global_config_path()
            .ok_or_else(|| anyhow::anyhow!("no config directory; pass --config <path>"))?,
    };
    if path.exists() && !args.force {
        anyhow::bail!(
            "config already exists at {}; pass --force to overwrite",
            path.display()
        );
    }
    config::write_config(&path, &Config::default())?;

    if args.json {
        let resp = JsonResponse::ok()
            .with_results(vec![json!({ "path": path.display().to_string() })])
            .with_actions(vec![
                "place the dataset at <data_dir>/<event>/data/<event>s.csv".to_string(),
            ]);
        print_json(&resp)?;
    } else {
        println!("Wrote config template to {}", path.display());
    }
    Ok(())
}

fn load_records(config: &Config, only: &[u64]) -> Result<Vec<StructuredRecord>> {
    let records = dataset::read_records(&config.dataset_path())?;
    Ok(dataset::select(records, only))
}

fn cmd_plan(config_path: Option<&Path>, args: PlanArgs) -> Result<()> {
    let mut config = config::load_config(config_path)?;
    if let Some(event) = args.event {
        config.event = event;
    }
    let synth = QuerySynthesizer::for_event(&config.event, &config)?;
    let records = load_records(&config, &args.records)?;

    let mut results = Vec::new();
    let mut warnings = Vec::new();
    for record in &records {
        match synth.synthesize(record, None) {
            Ok(planned) => {
                if !args.json {
                    println!(
                        "{}\t{}\t{}\t{}",
                        record.index, planned.start, planned.end, planned.query
                    );
                }
                results.push(json!({
                    "record": record.index,
                    "start": planned.start.to_string(),
                    "end": planned.end.to_string(),
                    "query": planned.query,
                }));
            }
            Err(err) => warnings.push(err.to_string()),
        }
    }

    if args.json {
        let resp = JsonResponse::ok()
            .with_event(&config.event)
            .with_results(results)
            .with_warnings(warnings);
        print_json(&resp)?;
    } else {
        for warn in warnings {
            eprintln!("warning: {warn}");
        }
    }
    Ok(())
}

fn cmd_run(config_path: Option<&Path>, args: RunArgs) -> Result<()> {
    let mut config = config::load_config(config_path)?;
    if let Some(event) = &args.event {
        config.event = event.clone();
    }

    let (name, synth, records) = match &args.topic {
        Some(topic) => {
            let raw = args.from.as_deref().unwrap_or_default();
            let start = parse_full_date(raw)
                .ok_or_else(|| anyhow::anyhow!("--from {raw:?} is not a full date"))?;
            let synth = QuerySynthesizer::topic(vec![topic.clone()], start, args.days);
            (topic.clone(), synth, vec![StructuredRecord::new(1, Vec::new())])
        }
        None => {
            let synth = QuerySynthesizer::for_event(&config.event, &config)?;
            let records = load_records(&config, &args.records)?;
            (config.event.clone(), synth, records)
        }
    };

    let run_config = config.run_config();
    let fetcher = ReplayFetcher::open(&args.replay)?;
    let ledger_path = config.ledger_path(&name);
    let ledger = JsonlLedger::open(&ledger_path)
        .with_context(|| format!("open ledger {}", ledger_path.display()))?;

    let started = Instant::now();
    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let report = runtime.block_on(async {
        let session = CookieAuthenticator::new(config.session_cookie.clone())
            .authenticate()
            .await?;
        let orchestrator = Orchestrator::new(&run_config, &synth, &fetcher, &ledger, session);
        orchestrator
            .run(&records)
            .await
            .with_context(|| format!("write ledger {}", ledger.path().display()))
    })?;
    let stats = StatsOut::from_report(&report, started.elapsed().as_millis() as i64);

    if args.json {
        let results = report
            .lineages
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let resp = JsonResponse::ok()
            .with_event(&name)
            .with_results(results)
            .with_stats(stats);
        print_json(&resp)?;
    } else {
        println!(
            "Swept {} records: {} articles captured, {} complete, {} partial, {} abandoned, {} skipped",
            stats.records,
            stats.captured,
            stats.complete.unwrap_or(0),
            stats.partial.unwrap_or(0),
            stats.abandoned.unwrap_or(0),
            stats.skipped.unwrap_or(0),
        );
    }
    Ok(())
}

#[derive(Debug, serde::Serialize)]
struct Coverage {
    record: u64,
    expected: u64,
    captured: usize,
    missing: usize,
    generations: u32,
    complete: bool,
}

fn coverage(record: u64, articles: &[PersistedArticle]) -> Coverage {
    let expected = articles
        .iter()
        .filter(|a| a.generation == 0)
        .map(|a| a.result_count)
        .min()
        .unwrap_or(0);
    let captured: BTreeSet<u64> = articles.iter().map(|a| a.global_index).collect();
    let missing = reconcile::seed_missing(articles);
    Coverage {
        record,
        expected,
        captured: captured.len(),
        missing: missing.as_ref().and_then(|m| m.len()).unwrap_or(0),
        generations: articles.iter().map(|a| a.generation + 1).max().unwrap_or(0),
        complete: missing.is_none(),
    }
}

fn cmd_status(config_path: Option<&Path>, args: StatusArgs) -> Result<()> {
    let config = config::load_config(config_path)?;
    let name = args.event.unwrap_or_else(|| config.event.clone());
    let path = config.ledger_path(&name);
    let articles = ledger::read_articles(&path)
        .with_context(|| format!("read ledger {}", path.display()))?;

    let mut by_record: BTreeMap<u64, Vec<PersistedArticle>> = BTreeMap::new();
    for article in articles {
        by_record.entry(article.record_index).or_default().push(article);
    }
    let rows: Vec<Coverage> = by_record
        .iter()
        .map(|(record, articles)| coverage(*record, articles))
        .collect();

    if args.json {
        let results = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let resp = JsonResponse::ok().with_event(&name).with_results(results);
        print_json(&resp)?;
    } else if rows.is_empty() {
        println!("No articles in {}", path.display());
    } else {
        println!("record\texpected\tcaptured\tmissing\tgenerations");
        for row in &rows {
            println!(
                "{}\t{}\t{}\t{}\t{}",
                row.record, row.expected, row.captured, row.missing, row.generations
            );
        }
        let complete = rows.iter().filter(|r| r.complete).count();
        println!("{complete}/{} records complete", rows.len());
    }
    Ok(())
}

fn cmd_parse_date(args: ParseDateArgs) -> Result<()> {
    let anchor = parse_full_date(&args.anchor)
        .ok_or_else(|| anyhow::anyhow!("--anchor {:?} is not a full date", args.anchor))?;
    let extractor = DateExtractor::new(anchor, args.max_offset);
    let found = extractor.extract_explained(&args.text);

    if args.json {
        let result = match found {
            Some((date, strategy)) => json!({ "date": date.to_string(), "strategy": strategy }),
            None => json!({ "date": null, "strategy": null }),
        };
        print_json(&JsonResponse::ok().with_results(vec![result]))?;
    } else {
        match found {
            Some((date, strategy)) => println!("{date}\t{strategy}"),
            None => println!("no plausible date"),
        }
    }
    Ok(())
}
