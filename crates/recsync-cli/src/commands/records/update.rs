//! Update record command implementation.

use anyhow::{Result, bail};
use clap::Args;

use recsync_core::{PendingEdit, RecordId, can_edit};

use super::{EditArgs, Session, print_record};
use crate::output;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Record id
    pub id: String,

    #[command(flatten)]
    pub edit: EditArgs,
}

pub async fn run(args: UpdateArgs, session: &Session) -> Result<()> {
    session.require_scope()?;
    let offset = args.edit.offset()?;
    let id = RecordId::new(args.id)?;

    let record = session.client.fetch_one(&id, &session.opts).await?;
    if !can_edit(&record, &session.scope) {
        bail!(
            "Record {} belongs to {}; only its owner can edit it",
            record.id,
            record.creator_id
        );
    }

    let schema = session.meta_schema().await?;
    let mut draft = PendingEdit::from_record(&record);
    args.edit.apply(&mut draft, &schema)?;

    let record = session.client.submit(&draft, &session.opts).await?;

    output::success(&format!("Updated record {}", record.id));
    print_record(&record, session, offset);
    Ok(())
}
