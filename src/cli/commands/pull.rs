//! Pull command.

use std::collections::BTreeMap;

use clap::Args;
use serde::Serialize;

use crate::app::App;
use crate::cli::{GlobalArgs, OutputSink, Result};

/// Arguments for the pull command.
#[derive(Args, Debug)]
pub struct PullArgs {
    #[command(flatten)]
    pub output: OutputSink,
}

#[derive(Serialize)]
struct PullOutput {
    documents_seen: usize,
    imported: BTreeMap<String, usize>,
    unknown_contexts: usize,
    failed: usize,
    failures: Vec<PullFailureOutput>,
}

#[derive(Serialize)]
struct PullFailureOutput {
    document: String,
    error: String,
}

impl PullArgs {
    pub async fn run(self, app: &App, global: &GlobalArgs) -> Result<()> {
        let engine = app.create_engine().await?;
        let report = engine.pull().await?;

        if global.json {
            self.output
                .write_json(&PullOutput {
                    documents_seen: report.documents_seen,
                    imported: report.imported.iter().map(|(k, v)| (k.clone(), *v)).collect(),
                    unknown_contexts: report.unknown_contexts,
                    failed: report.failures.len(),
                    failures: report
                        .failures
                        .iter()
                        .map(|f| PullFailureOutput {
                            document: f.name.clone(),
                            error: f.error.to_string(),
                        })
                        .collect(),
                })
                .await?;
        } else {
            self.output
                .write_str(&format!(
                    "Pulled {} of {} documents ({} skipped, {} failed)",
                    report.total_imported(),
                    report.documents_seen,
                    report.unknown_contexts,
                    report.failures.len()
                ))
                .await?;

            // Report any per-document failures
            for failure in &report.failures {
                eprintln!("  {}: {}", failure.name, failure.error);
            }
        }

        Ok(())
    }
}
