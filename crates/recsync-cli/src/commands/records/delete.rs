//! Delete record command implementation.

use anyhow::Result;
use clap::Args;

use recsync_core::RecordId;

use super::Session;
use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Record id
    pub id: String,
}

pub async fn run(args: DeleteArgs, session: &Session) -> Result<()> {
    let id = RecordId::new(args.id)?;

    session.client.delete_one(&id, &session.opts).await?;

    output::success(&format!("Deleted record {}", id));
    Ok(())
}
