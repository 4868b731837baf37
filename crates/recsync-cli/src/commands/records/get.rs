//! Get record command implementation.

use anyhow::Result;
use clap::Args;

use recsync_core::RecordId;
use recsync_core::time;

use super::{Session, print_record};
use crate::output;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Record id
    pub id: String,

    /// Timezone offset for displayed times
    #[arg(long, default_value = "UTC")]
    pub tz: String,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: GetArgs, session: &Session) -> Result<()> {
    let id = RecordId::new(args.id)?;
    let offset = time::parse_offset(&args.tz).map_err(recsync_core::Error::from)?;

    let record = session.client.fetch_one(&id, &session.opts).await?;

    if args.json {
        output::json_pretty(&record)
    } else {
        print_record(&record, session, offset);
        Ok(())
    }
}
