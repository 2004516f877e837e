//! acl-plan: show what it would take to converge a default network ACL.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use vpc_acl_plan::{exit_code, init_logging, load_config, load_desired, load_snapshot, render};
use vpc_acl_reconcile::DefaultAclReconciler;

#[derive(Parser, Debug)]
#[command(name = "acl-plan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Declaration of the default ACL (.json, .yaml or .yml)
    #[arg(short = 'd', long)]
    desired: PathBuf,

    /// Recorded live state of the ACL (.json, .yaml or .yml)
    #[arg(short = 's', long)]
    snapshot: PathBuf,

    /// Reconciler settings (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,

    /// Exit with 2 when the plan requires action
    #[arg(long)]
    detailed_exitcode: bool,
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let desired = load_desired(&args.desired)?;
    let snapshot = load_snapshot(&args.snapshot)?;

    let plan = DefaultAclReconciler::new(config)?.plan(&desired, &snapshot)?;
    println!("{}", render(&plan, args.json)?);
    info!(requires_action = plan.requires_action(), "acl-plan: done");

    Ok(ExitCode::from(exit_code(&plan, args.detailed_exitcode)))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "acl-plan: planning failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
