//! Record subcommand implementations.

mod create;
mod delete;
mod get;
mod list;
mod meta_fields;
mod new_id;
mod search;
mod update;

use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::FixedOffset;
use clap::{Args, Subcommand};
use colored::Colorize;
use tracing::debug;

use recsync_core::time::{self, TimeRangePolicy};
use recsync_core::{
    ApiUrl, CallOptions, CancellationToken, Error, MetaSchema, MetaValue, PendingEdit, Record,
    RecordSyncClient, ScopeKey, can_edit,
};
use recsync_http::{HttpRecordStore, HttpStoreConfig};

use crate::cli::GlobalArgs;
use crate::output;
use crate::profile::storage;

#[derive(Args, Debug)]
pub struct RecordsCommand {
    #[command(subcommand)]
    pub command: RecordsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordsSubcommand {
    /// Reserve a fresh record id
    NewId(new_id::NewIdArgs),

    /// List one page of records
    List(list::ListArgs),

    /// Search records by title and description
    Search(search::SearchArgs),

    /// Fetch a single record
    Get(get::GetArgs),

    /// Create a record
    Create(create::CreateArgs),

    /// Update a record you own
    Update(update::UpdateArgs),

    /// Delete a record
    Delete(delete::DeleteArgs),

    /// Show the deployment's meta fields
    MetaFields(meta_fields::MetaFieldsArgs),
}

pub async fn handle(cmd: RecordsCommand, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;

    match cmd.command {
        RecordsSubcommand::NewId(args) => new_id::run(args, &session).await,
        RecordsSubcommand::List(args) => list::run(args, &session).await,
        RecordsSubcommand::Search(args) => search::run(args, &session).await,
        RecordsSubcommand::Get(args) => get::run(args, &session).await,
        RecordsSubcommand::Create(args) => create::run(args, &session).await,
        RecordsSubcommand::Update(args) => update::run(args, &session).await,
        RecordsSubcommand::Delete(args) => delete::run(args, &session).await,
        RecordsSubcommand::MetaFields(args) => meta_fields::run(args, &session).await,
    }
}

/// Everything a record command needs: the client, the scope and the
/// per-call options.
pub struct Session {
    pub client: RecordSyncClient<HttpRecordStore>,
    pub scope: ScopeKey,
    pub opts: CallOptions,
}

impl Session {
    fn open(global: &GlobalArgs) -> Result<Self> {
        let profile = storage::load_profile().context("Failed to load profile")?;

        let Some(api) = global.api.clone().or(profile.api) else {
            bail!("No API URL configured. Pass --api or set RECSYNC_API.");
        };
        let api = ApiUrl::new(&api).context("Invalid API URL")?;

        let mut config = HttpStoreConfig::new(api).user_agent(concat!(
            "recsync-cli/",
            env!("RECSYNC_VERSION")
        ));
        if let Some(secs) = global.timeout {
            config = config.timeout(Duration::from_secs(secs));
        }
        debug!(api = %config.base, scope = %profile.scope, "Opening session");

        let client = RecordSyncClient::new(HttpRecordStore::new(config)?);

        // Ctrl-C cancels the in-flight call instead of killing the process.
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });

        Ok(Self {
            client,
            scope: profile.scope,
            opts: CallOptions::new().cancel_on(cancel),
        })
    }

    /// The deployment's meta-field schema.
    ///
    /// APIs without a meta-fields endpoint have no meta fields.
    pub async fn meta_schema(&self) -> Result<MetaSchema> {
        match self.client.meta_schema(&self.opts).await {
            Ok(schema) => Ok(schema),
            Err(Error::Domain(e)) if e.status == 404 => {
                debug!("API has no meta fields");
                Ok(MetaSchema::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fail unless a scope has been chosen.
    pub fn require_scope(&self) -> Result<()> {
        if self.scope.is_empty() {
            bail!("No scope set. Run 'recsync scope set <email>' first.");
        }
        Ok(())
    }
}

/// Print the state shown when no scope has been chosen.
pub fn print_scope_required() {
    output::notice("No scope set. Run 'recsync scope set <email>' to see your records.");
}

/// Draft fields shared by create and update.
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Record title
    #[arg(long)]
    pub title: Option<String>,

    /// Record description (empty clears it)
    #[arg(long)]
    pub description: Option<String>,

    /// Start, as local date/time (YYYY-MM-DDTHH:MM or YYYY-MM-DD; empty clears it)
    #[arg(long)]
    pub start: Option<String>,

    /// End, as local date/time (YYYY-MM-DDTHH:MM or YYYY-MM-DD; empty clears it)
    #[arg(long)]
    pub end: Option<String>,

    /// Timezone offset of --start and --end (UTC, +02:00, -0530)
    #[arg(long, default_value = "UTC")]
    pub tz: String,

    /// Snap start to the beginning and end to the end of their days
    #[arg(long)]
    pub whole_days: bool,

    /// Mark the record inactive
    #[arg(long, conflicts_with = "active")]
    pub inactive: bool,

    /// Mark the record active
    #[arg(long)]
    pub active: bool,

    /// Meta value as key=value; multi-select values are comma separated
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    pub meta: Vec<String>,
}

impl EditArgs {
    pub fn offset(&self) -> Result<FixedOffset> {
        time::parse_offset(&self.tz).map_err(|e| Error::from(e).into())
    }

    fn policy(&self) -> TimeRangePolicy {
        if self.whole_days {
            TimeRangePolicy::WholeDays
        } else {
            TimeRangePolicy::Strict
        }
    }

    /// Apply the given flags to a draft, leaving unspecified fields alone.
    pub fn apply(&self, edit: &mut PendingEdit, schema: &MetaSchema) -> Result<()> {
        if let Some(title) = &self.title {
            edit.title = title.clone();
        }
        if let Some(description) = &self.description {
            edit.set_description(description.clone());
        }

        if self.start.is_some() || self.end.is_some() {
            let offset = self.offset()?;
            let keep = |instant: Option<chrono::DateTime<chrono::Utc>>| {
                instant.map(|i| time::localize_instant(i, offset))
            };
            let start = self.start.clone().or_else(|| keep(edit.time_start));
            let end = self.end.clone().or_else(|| keep(edit.time_end));
            edit.set_time_range(start.as_deref(), end.as_deref(), offset, self.policy())
                .map_err(Error::from)?;
        }

        if self.inactive {
            edit.active = false;
        } else if self.active {
            edit.active = true;
        }

        for pair in &self.meta {
            let (key, value) = parse_meta(pair, schema)?;
            edit.meta.insert(key, value);
        }
        Ok(())
    }
}

/// Parse `key=value` against the schema.
fn parse_meta(pair: &str, schema: &MetaSchema) -> Result<(String, MetaValue)> {
    let Some((key, value)) = pair.split_once('=') else {
        bail!("Invalid --meta '{}': expected KEY=VALUE", pair);
    };
    let key = key.trim().to_string();
    let value = value.trim();

    let multiple = schema.get(&key).is_some_and(|f| f.multiple);
    let value = if multiple {
        MetaValue::List(
            value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect(),
        )
    } else {
        MetaValue::Text(value.to_string())
    };
    Ok((key, value))
}

/// Print one line per record.
pub fn print_records(records: &[Record], session: &Session, offset: FixedOffset) {
    for record in records {
        let status = if record.active {
            "active".green()
        } else {
            "inactive".dimmed()
        };
        let when = match (record.time_start, record.time_end) {
            (None, None) => String::new(),
            (start, end) => format!(
                "  {} → {}",
                start.map(|s| time::localize_instant(s, offset)).unwrap_or_default(),
                end.map(|e| time::localize_instant(e, offset)).unwrap_or_default()
            ),
        };
        let owner = if can_edit(record, &session.scope) {
            String::new()
        } else {
            format!("  ({})", record.creator_id).dimmed().to_string()
        };
        println!(
            "{}  {}  [{}]{}{}",
            record.id.as_str().bold(),
            record.title,
            status,
            when,
            owner
        );
    }
}

/// Print every field of a record.
pub fn print_record(record: &Record, session: &Session, offset: FixedOffset) {
    output::field("ID", record.id.as_str());
    output::field("Title", &record.title);
    if let Some(description) = &record.description {
        output::field("Description", description);
    }
    if let Some(start) = record.time_start {
        output::field("Start", &time::localize_instant(start, offset));
    }
    if let Some(end) = record.time_end {
        output::field("End", &time::localize_instant(end, offset));
    }
    output::field("Active", if record.active { "yes" } else { "no" });
    output::field("Owner", record.creator_id.as_str());
    for (key, value) in record.filled_meta() {
        output::field(key, &value.to_string());
    }
    if let Some(touched) = record.last_touched() {
        output::field("Last changed", &time::localize_instant(touched, offset));
    }
    output::field(
        "Editable",
        if can_edit(record, &session.scope) {
            "yes"
        } else {
            "no"
        },
    );
}
