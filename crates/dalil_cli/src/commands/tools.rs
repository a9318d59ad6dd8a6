//! Tools command implementation

use dalil_dataset::{ToolPage, ToolQuery};
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use tracing::info;

use crate::cli::OutputFormat;
use crate::commands::load_dataset;
use crate::config::DalilConfig;

pub fn run_tools(config: &DalilConfig, query: &ToolQuery, format: OutputFormat) -> Result<()> {
    let dataset = load_dataset(config)?;
    info!("Loaded {} tools", dataset.len());

    let page = query.run(&dataset);
    match format {
        OutputFormat::Text => print_text(&page, query.offset),
        OutputFormat::Json => {
            let output = json!({
                "total": page.total,
                "next_offset": page.next_offset,
                "records": page.records,
            });
            println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        }
    }
    Ok(())
}

fn print_text(page: &ToolPage<'_>, offset: usize) {
    if page.records.is_empty() {
        println!("No tools found");
        return;
    }

    for record in &page.records {
        let featured = if record.is_featured { " *" } else { "" };
        println!("{}{} [{}]", record.title, featured, record.category);
        if !record.url.is_empty() {
            println!("    {}", record.url);
        }
    }

    println!(
        "\nShowing {}-{} of {}",
        offset + 1,
        offset + page.records.len(),
        page.total
    );
    if let Some(next) = page.next_offset {
        println!("More: --offset {}", next);
    }
}
