//! Push command.

use clap::Args;
use serde::Serialize;

use crate::app::App;
use crate::cli::{CliError, GlobalArgs, OutputSink, Result};

/// Arguments for the push command.
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Context tag of the catalog holding the item.
    pub context: String,

    /// Local id of the item to publish.
    pub item: String,

    /// Interpret ITEM as a display name instead of a local id.
    #[arg(long)]
    pub by_name: bool,

    #[command(flatten)]
    pub output: OutputSink,
}

#[derive(Serialize)]
struct PushOutput {
    status: String,
    context: String,
    item_id: String,
    document_id: String,
}

impl PushArgs {
    pub async fn run(self, app: &App, global: &GlobalArgs) -> Result<()> {
        let engine = app.create_engine().await?;

        let item_id = if self.by_name {
            let catalog = engine
                .registry()
                .get(&self.context)
                .ok_or_else(|| CliError::Other(format!("unknown context '{}'", self.context)))?;
            catalog
                .items()
                .await?
                .into_iter()
                .find(|i| i.name == self.item)
                .map(|i| i.id)
                .ok_or_else(|| {
                    CliError::Other(format!(
                        "no item named '{}' in catalog '{}'",
                        self.item, self.context
                    ))
                })?
        } else {
            self.item.clone()
        };

        let document_id = engine.push(&self.context, &item_id).await?;

        if global.json {
            self.output
                .write_json(&PushOutput {
                    status: "ok".to_string(),
                    context: self.context.clone(),
                    item_id,
                    document_id,
                })
                .await?;
        } else {
            self.output
                .write_str(&format!("Pushed '{}' as document {}", self.item, document_id))
                .await?;
        }

        Ok(())
    }
}
