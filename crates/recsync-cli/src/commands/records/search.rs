//! Search records command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use recsync_core::ListFilter;
use recsync_core::time;

use super::{Session, print_records, print_scope_required};
use crate::output;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for; empty or '*' matches everything
    #[arg(default_value = "")]
    pub query: String,

    /// Include records of every owner
    #[arg(long)]
    pub all: bool,

    /// Timezone offset for displayed times
    #[arg(long, default_value = "UTC")]
    pub tz: String,

    /// Print the results as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SearchArgs, session: &Session) -> Result<()> {
    let offset = time::parse_offset(&args.tz).map_err(recsync_core::Error::from)?;
    let filter = ListFilter {
        scope: session.scope.clone(),
        include_all_scopes: args.all,
    };

    if filter.scope.is_empty() {
        print_scope_required();
        return Ok(());
    }

    let records = session
        .client
        .search(&args.query, &filter, &session.opts)
        .await?;

    if args.json {
        return output::json_pretty(&records);
    }

    if records.is_empty() {
        eprintln!("{}", "No matching records.".dimmed());
    } else {
        print_records(&records, session, offset);
    }

    Ok(())
}
