use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gix_pre_receive::snapshot::Snapshot;
use gix_pre_receive::{Actor, AdmissionConfig, Collaborators, PreReceiveBuilder};
use tracing_subscriber::EnvFilter;

/// Judge the ref updates of a push read from stdin, like a git `pre-receive` hook.
///
/// Denied updates are explained on stdout and make the process exit with status 1.
#[derive(Debug, Parser)]
#[command(name = "gix-pre-receive", version)]
struct Args {
    /// Git config file describing the project, its branches and pull requests.
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,
    /// The repository being pushed to.
    #[arg(long)]
    repository: String,
    /// The authenticated user performing the push.
    #[arg(long)]
    actor: Option<String>,
    /// Git config file with `gatekeeper.*` settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // stdout carries the report, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AdmissionConfig::from_path(path)?,
        None => AdmissionConfig::default(),
    };
    let snapshot = Arc::new(
        Snapshot::from_path(&args.snapshot)
            .with_context(|| format!("failed to load snapshot '{}'", args.snapshot.display()))?,
    );
    let engine = PreReceiveBuilder::new()
        .with_config(config)
        .collaborators(Collaborators::from_shared(snapshot))
        .build();

    let mut payload = String::new();
    io::stdin()
        .read_to_string(&mut payload)
        .context("failed to read ref updates from stdin")?;

    let actor = args.actor.map(Actor::new);
    let report = engine.run(&args.repository, actor.as_ref(), &payload)?;
    report.write_to(io::stdout().lock())?;

    if report.is_failed() {
        std::process::exit(1);
    }
    Ok(())
}
