//! New id command implementation.

use anyhow::Result;
use clap::Args;

use super::Session;

#[derive(Args, Debug)]
pub struct NewIdArgs {}

pub async fn run(_args: NewIdArgs, session: &Session) -> Result<()> {
    let id = session.client.allocate_id(&session.opts).await?;
    println!("{}", id);
    Ok(())
}
