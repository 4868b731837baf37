//! List records command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use recsync_core::ListFilter;
use recsync_core::time;

use super::{Session, print_records, print_scope_required};
use crate::output;

/// Pages shown on each side of the current one.
const PAGER_DELTA: u32 = 2;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Include records of every owner
    #[arg(long)]
    pub all: bool,

    /// Timezone offset for displayed times
    #[arg(long, default_value = "UTC")]
    pub tz: String,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, session: &Session) -> Result<()> {
    let offset = time::parse_offset(&args.tz).map_err(recsync_core::Error::from)?;
    let filter = ListFilter {
        scope: session.scope.clone(),
        include_all_scopes: args.all,
    };

    if filter.scope.is_empty() {
        print_scope_required();
        return Ok(());
    }

    let page = session.client.list(args.page, &filter, &session.opts).await?;

    if args.json {
        return output::json_pretty(&page.records);
    }

    if page.is_empty() {
        eprintln!("{}", "No records found.".dimmed());
    } else {
        print_records(&page.records, session, offset);
    }

    if page.total_pages > 1 {
        eprintln!();
        eprintln!(
            "{} {}",
            "Pages:".dimmed(),
            output::pager(&page.window(PAGER_DELTA), page.page)
        );
    }

    Ok(())
}
