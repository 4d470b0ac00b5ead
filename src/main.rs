use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod diagnostics;
mod loader;
mod manifest;
mod normalize;
mod paths;
mod pipeline;
mod record;
mod staging;
mod util;
mod validate;

use cli::{Command, RepoArgs, RootArgs};
use diagnostics::PublishReport;
use paths::RepoPaths;
use pipeline::RunMode;

const EXIT_RECORD_ERRORS: u8 = 1;
const EXIT_OPERATIONAL: u8 = 2;

fn main() -> ExitCode {
    let args = RootArgs::parse();
    let (repo, out, mode) = match args.command {
        Command::Publish(publish) => (publish.repo, publish.out, RunMode::Publish),
        Command::Check(check) => (check.repo, None, RunMode::Check),
    };
    init_tracing(repo.verbose);

    match run(&repo, out, mode) {
        Ok(report) => emit_report(&report, repo.json, mode),
        Err(err) => {
            tracing::debug!(error = %format!("{err:#}"), "publish aborted");
            eprintln!("ERROR: {err:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run(repo: &RepoArgs, out: Option<PathBuf>, mode: RunMode) -> Result<PublishReport> {
    let config = match repo.config.as_deref() {
        Some(path) => config::load_config(path),
        None => config::load_config_or_default(&RepoPaths::default_config_path(&repo.root)),
    }
    .context("load publish config")?;

    let mut paths = RepoPaths::new(repo.root.clone(), &config);
    if let Some(dir) = repo.liveries_dir.clone() {
        paths = paths.with_liveries_dir(dir);
    }
    if let Some(out) = out {
        paths = paths.with_manifest_path(out);
    }
    tracing::info!(mode = ?mode, root = %paths.root().display(), "starting run");
    pipeline::run(&paths, &config.meta_suffix, mode)
}

fn emit_report(report: &PublishReport, json: bool, mode: RunMode) -> ExitCode {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("ERROR: serialize report: {err}");
                return ExitCode::from(EXIT_OPERATIONAL);
            }
        }
    } else {
        for error in &report.errors {
            eprintln!("{error}");
        }
        if !report.ok {
            eprintln!("Publish failed due to validation errors.");
        } else if let Some(path) = report.manifest_path.as_deref() {
            println!("Wrote {path} with {} item(s).", report.item_count);
        } else if mode == RunMode::Check {
            println!("All {} item(s) valid.", report.item_count);
        }
    }
    if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_RECORD_ERRORS)
    }
}
