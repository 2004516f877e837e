//! Offline planning for default network ACLs.
//!
//! Reads a declaration and a recorded snapshot of the live ACL, runs the
//! reconciler and renders the resulting plan for an operator or a pipeline.

use anyhow::{bail, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use vpc_acl_reconcile::{
    AclOperation, AclSnapshot, ChangeSet, DefaultAclConfig, DesiredState, Plan, PlanSummary,
    ReconcilerConfig,
};
use vpc_acl_types::AclId;

/// Exit code for a plan that requires action under `--detailed-exitcode`.
pub const EXIT_CHANGES_PRESENT: u8 = 2;

/// Document formats accepted for input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(InputFormat::Json),
            Some("yaml") | Some("yml") => Ok(InputFormat::Yaml),
            _ => bail!(
                "cannot tell the format of {} (expected .json, .yaml or .yml)",
                path.display()
            ),
        }
    }

    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        let value = match self {
            InputFormat::Json => serde_json::from_str(content)?,
            InputFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(value)
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = InputFormat::from_path(path)?;
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    format
        .parse(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Loads and validates a declaration.
pub fn load_desired(path: &Path) -> Result<DesiredState> {
    let config: DefaultAclConfig = read_document(path)?;
    let desired = DesiredState::try_from(config)
        .with_context(|| format!("invalid declaration in {}", path.display()))?;
    debug!(
        acl_id = %desired.acl_id,
        subnets = desired.subnet_ids.len(),
        "Loaded declaration"
    );
    Ok(desired)
}

/// Loads a recorded snapshot of the live ACL.
pub fn load_snapshot(path: &Path) -> Result<AclSnapshot> {
    let snapshot: AclSnapshot = read_document(path)?;
    debug!(
        acl_id = %snapshot.id,
        rules = snapshot.rule_count(),
        associations = snapshot.association_count(),
        "Loaded snapshot"
    );
    Ok(snapshot)
}

/// Loads reconciler settings; without a path the defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<ReconcilerConfig> {
    let config = match path {
        Some(path) => ReconcilerConfig::load_or_default(path)?,
        None => ReconcilerConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Machine-readable plan output.
#[derive(Debug, Serialize)]
pub struct PlanReport<'a> {
    pub acl_id: &'a AclId,
    pub requires_action: bool,
    pub summary: PlanSummary,
    pub changes: &'a ChangeSet,
    pub operations: Vec<AclOperation>,
}

impl<'a> PlanReport<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self {
            acl_id: &plan.acl_id,
            requires_action: plan.requires_action(),
            summary: plan.summary(),
            changes: &plan.changes,
            operations: plan.operations(),
        }
    }
}

/// Renders a plan as operator text or pretty JSON.
pub fn render(plan: &Plan, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(&PlanReport::new(plan))?)
    } else {
        Ok(plan.to_string())
    }
}

/// Process exit code for a computed plan.
pub fn exit_code(plan: &Plan, detailed: bool) -> u8 {
    if detailed && plan.requires_action() {
        EXIT_CHANGES_PRESENT
    } else {
        0
    }
}

/// Initialize logging on stderr, filtered by `RUST_LOG` or `log_level`.
pub fn init_logging(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
