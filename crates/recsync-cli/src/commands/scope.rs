//! Scope subcommands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use recsync_core::{ApiUrl, ScopeKey};

use crate::cli::GlobalArgs;
use crate::output;
use crate::profile::{self, storage};

#[derive(Args, Debug)]
pub struct ScopeCommand {
    #[command(subcommand)]
    pub command: ScopeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ScopeSubcommand {
    /// Set the e-mail address records are scoped to
    Set(SetArgs),

    /// Display the stored scope and API
    Show,

    /// Forget the stored scope and API
    Clear,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// E-mail address
    pub email: String,
}

pub async fn handle(cmd: ScopeCommand, global: &GlobalArgs) -> Result<()> {
    match cmd.command {
        ScopeSubcommand::Set(args) => set(args, global),
        ScopeSubcommand::Show => show(),
        ScopeSubcommand::Clear => clear(),
    }
}

fn set(args: SetArgs, global: &GlobalArgs) -> Result<()> {
    let email = args.email.trim();
    if !profile::is_valid_email(email) {
        bail!("'{}' is not a valid e-mail address", email);
    }

    let mut profile = storage::load_profile()?;
    profile.scope = ScopeKey::new(email);
    if let Some(api) = &global.api {
        let api = ApiUrl::new(api).context("Invalid API URL")?;
        profile.api = Some(api.to_string());
    }

    storage::save_profile(&profile).context("Failed to save profile")?;

    output::success(&format!("Scope set to {}", profile.scope));
    if let Some(api) = &profile.api {
        output::field("API", api);
    }
    Ok(())
}

fn show() -> Result<()> {
    let profile = storage::load_profile()?;

    if profile.scope.is_empty() {
        eprintln!("{}", "No scope set. Run 'recsync scope set <email>' first.".dimmed());
    } else {
        output::field("Scope", profile.scope.as_str());
    }
    if let Some(api) = &profile.api {
        output::field("API", api);
    }
    Ok(())
}

fn clear() -> Result<()> {
    if storage::clear_profile()? {
        output::success("Profile cleared");
    } else {
        eprintln!("{}", "No profile stored.".dimmed());
    }
    Ok(())
}
