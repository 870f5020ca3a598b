//! One edit session: submit, route, and optionally resolve the approval

use std::sync::Arc;

use clap::Args;
use sentinel_client::{HttpScoringClient, LocalKeySigner};
use sentinel_gate::{EditWorkflow, RevisionChange, SubmissionOutcome};
use sentinel_types::{
    ApprovalId, ApprovalRecord, ElementId, HistoryEntry, ParameterOverrides, RevisionRef,
};
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::config::SentinelConfig;
use crate::error::CliResult;
use crate::output::{
    colorize_score, print_info, print_json, print_output, print_success, print_warning,
    OutputFormat,
};

/// Arguments of `sentinel edit`
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Element to edit
    pub element: String,

    /// Display name of the element
    #[arg(long)]
    pub name: Option<String>,

    /// Model revision currently loaded (GLB URL)
    #[arg(long)]
    pub model: Option<String>,

    /// Edit type
    #[arg(long = "type")]
    pub edit_type: Option<String>,

    /// Span length in metres
    #[arg(long)]
    pub span: Option<f64>,

    /// Cost impact
    #[arg(long)]
    pub cost: Option<f64>,

    /// Schedule delay in days
    #[arg(long)]
    pub delay: Option<u32>,

    /// A mitigation action accompanies the edit
    #[arg(long)]
    pub mitigation: bool,

    /// Sign the approval with the local key if the edit escalates
    #[arg(long, conflicts_with = "cancel")]
    pub approve: bool,

    /// Dismiss the approval if the edit escalates
    #[arg(long)]
    pub cancel: bool,
}

impl EditArgs {
    fn overrides(&self) -> ParameterOverrides {
        ParameterOverrides {
            span_length: self.span,
            cost_impact: self.cost,
            delay_days: self.delay,
            mitigation: self.mitigation.then_some(true),
        }
    }
}

#[derive(Serialize)]
struct EditReport {
    outcome: SubmissionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    approval: Option<ApprovalRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancelled: Option<ApprovalId>,
    active_revision: Option<RevisionRef>,
    history: Vec<HistoryEntry>,
}

#[derive(Serialize, Tabled)]
struct HistoryRow {
    #[tabled(rename = "Edit")]
    label: String,
    #[tabled(rename = "Risk")]
    score: f64,
}

impl From<HistoryEntry> for HistoryRow {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            label: entry.label,
            score: entry.score,
        }
    }
}

fn signer(config: &SentinelConfig) -> CliResult<LocalKeySigner> {
    Ok(match config.signer.seed_hex.as_deref() {
        Some(seed) => LocalKeySigner::from_hex_seed(seed)?,
        None => {
            debug!("no signer seed configured, generating a session key");
            LocalKeySigner::generate()
        }
    })
}

/// Run one edit session
pub async fn execute(args: EditArgs, config: &SentinelConfig, format: OutputFormat) -> CliResult<()> {
    let scoring = HttpScoringClient::new(
        &config.service.base_url,
        config.service.endpoint,
        config.service.request_timeout(),
    )?;
    let signer = signer(config)?;
    let signer_address = signer.address();

    let mut workflow = EditWorkflow::new(Arc::new(scoring), Arc::new(signer), config.gate.clone());
    if let Some(model) = args.model.as_deref() {
        workflow = workflow.with_initial_model(RevisionRef::new(model));
    }

    let element = ElementId::new(args.element.as_str());
    workflow
        .select(element.clone(), args.name.as_deref().unwrap_or(&args.element))
        .await;
    let outcome = workflow
        .submit_selected(args.edit_type.as_deref(), args.overrides())
        .await?;

    let mut approval = None;
    let mut cancelled = None;
    if let SubmissionOutcome::Escalated { .. } = outcome {
        if args.approve {
            approval = Some(workflow.approve(&element).await?);
        } else if args.cancel {
            cancelled = Some(workflow.cancel(&element).await?);
        }
    }

    let report = EditReport {
        outcome,
        approval,
        cancelled,
        active_revision: workflow.active_revision(),
        history: workflow.chart().await,
    };

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => print_report(report, &signer_address),
    }
}

fn print_report(report: EditReport, signer_address: &str) -> CliResult<()> {
    let result = report.outcome.result();
    let entry = report.outcome.entry();

    match &report.outcome {
        SubmissionOutcome::Committed { revision, .. } => {
            print_success(&format!(
                "{} auto-committed, risk {} ({})",
                entry.label,
                colorize_score(entry.score, false),
                result.category
            ));
            match revision {
                RevisionChange::Replaced { current, .. } => {
                    print_info(&format!("Model revision swapped to {}", current.file_name()))
                }
                RevisionChange::Unchanged => print_info("Model revision unchanged"),
            }
        }
        SubmissionOutcome::Escalated { approval_id, .. } => {
            print_warning(&format!(
                "{} escalated, risk {} ({}), approval {}",
                entry.label,
                colorize_score(entry.score, true),
                result.category,
                approval_id
            ));
        }
    }

    if let Some(warning) = &result.warning {
        print_warning(warning);
    }

    if let Some(record) = &report.approval {
        print_success(&format!("Approved by {signer_address}"));
        println!("  Message:   {}", record.message);
        println!("  Signature: {}", record.signature);
        if let Some(decision) = &record.decision_id {
            println!("  Decision:  {decision}");
        }
    } else if let Some(id) = &report.cancelled {
        print_info(&format!("Approval {id} cancelled"));
    } else if matches!(report.outcome, SubmissionOutcome::Escalated { .. }) {
        print_warning("Approval pending; rerun with --approve or --cancel to resolve it");
    }

    println!();
    print_output(
        report.history.into_iter().map(HistoryRow::from).collect(),
        OutputFormat::Text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> EditArgs {
        use clap::Parser;

        #[derive(Parser)]
        struct Harness {
            #[command(flatten)]
            edit: EditArgs,
        }

        let argv = std::iter::once("edit").chain(extra.iter().copied());
        Harness::parse_from(argv).edit
    }

    #[test]
    fn test_unset_flags_leave_defaults() {
        let overrides = args(&["wall_1"]).overrides();
        assert_eq!(overrides, ParameterOverrides::default());
        assert_eq!(overrides.resolve().cost_impact, 65_000.0);
    }

    #[test]
    fn test_flags_become_overrides() {
        let parsed = args(&["beam_2", "--span", "20", "--delay", "3", "--mitigation"]);
        let params = parsed.overrides().resolve();
        assert_eq!(params.span_length, 20.0);
        assert_eq!(params.delay_days, 3);
        assert!(params.mitigation);
    }

    #[test]
    fn test_approve_conflicts_with_cancel() {
        use clap::Parser;

        #[derive(Parser)]
        struct Harness {
            #[command(flatten)]
            edit: EditArgs,
        }

        assert!(Harness::try_parse_from(["edit", "beam_2", "--approve", "--cancel"]).is_err());
    }

    #[test]
    fn test_signer_from_seed() {
        let mut config = SentinelConfig::default();
        config.signer.seed_hex = Some("11".repeat(32));
        let a = signer(&config).unwrap().address();
        let b = signer(&config).unwrap().address();
        assert_eq!(a, b);

        config.signer.seed_hex = Some("zz".into());
        assert!(signer(&config).is_err());
    }
}
