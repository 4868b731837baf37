//! Create record command implementation.

use anyhow::Result;
use clap::Args;

use super::{EditArgs, Session, print_record};
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub edit: EditArgs,
}

pub async fn run(args: CreateArgs, session: &Session) -> Result<()> {
    session.require_scope()?;
    let offset = args.edit.offset()?;

    let schema = session.meta_schema().await?;
    let mut draft = session
        .client
        .new_pending_edit(&session.scope, &session.opts)
        .await?;
    draft.reset_meta(&schema);
    args.edit.apply(&mut draft, &schema)?;

    let record = session.client.submit(&draft, &session.opts).await?;

    output::success(&format!("Created record {}", record.id));
    print_record(&record, session, offset);
    Ok(())
}
