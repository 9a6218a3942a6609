//! Catalogs listing command.

use clap::Args;
use serde::Serialize;

use crate::app::App;
use crate::cli::{GlobalArgs, OutputSink, Result};

/// Arguments for the catalogs command.
#[derive(Args, Debug)]
pub struct CatalogsArgs {
    #[command(flatten)]
    pub output: OutputSink,
}

#[derive(Serialize)]
struct CatalogOutput {
    context: String,
    items: usize,
}

impl CatalogsArgs {
    pub async fn run(self, app: &App, global: &GlobalArgs) -> Result<()> {
        let registry = app.create_registry().await?;

        let mut catalogs = Vec::new();
        for context in registry.contexts() {
            if let Some(catalog) = registry.get(context) {
                catalogs.push(CatalogOutput {
                    context: context.to_string(),
                    items: catalog.items().await?.len(),
                });
            }
        }

        if global.json {
            self.output.write_json(&catalogs).await?;
        } else {
            let lines: Vec<String> = catalogs
                .iter()
                .map(|c| format!("{}: {} items", c.context, c.items))
                .collect();
            self.output.write_str(&lines.join("\n")).await?;
        }

        Ok(())
    }
}
