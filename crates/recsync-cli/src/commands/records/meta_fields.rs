//! Meta fields command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::Session;
use crate::output;

#[derive(Args, Debug)]
pub struct MetaFieldsArgs {
    /// Print the schema as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: MetaFieldsArgs, session: &Session) -> Result<()> {
    let schema = session.client.meta_schema(&session.opts).await?;

    if args.json {
        return output::json_pretty(&schema);
    }

    if schema.is_empty() {
        eprintln!("{}", "No meta fields configured.".dimmed());
        return Ok(());
    }

    for (id, field) in schema.ordered() {
        let kind = if field.multiple { "multi" } else { "single" };
        println!(
            "{} {} [{}]: {}",
            field.name.bold(),
            format!("({})", id).dimmed(),
            kind,
            field.options.join(", ")
        );
    }
    Ok(())
}
