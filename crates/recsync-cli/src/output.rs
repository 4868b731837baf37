//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use recsync_core::Error;
use recsync_core::pagination::PageSlot;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a notice on stderr.
pub fn notice(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Render pager slots, highlighting the current page.
pub fn pager(slots: &[PageSlot], current: u32) -> String {
    slots
        .iter()
        .map(|slot| match slot {
            PageSlot::Page(page) if *page == current => format!("[{}]", page).bold().to_string(),
            PageSlot::Page(page) => page.to_string(),
            PageSlot::Gap => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print a failed command's error according to its kind.
pub fn report(err: &anyhow::Error) {
    let Some(sync_err) = err.downcast_ref::<Error>() else {
        error(&format!("{:#}", err));
        return;
    };

    match sync_err {
        Error::Validation(e) => error(&e.to_string()),
        Error::Domain(e) => error(&e.message),
        Error::NotFound { id } => error(&format!("Record {} not found", id)),
        Error::Canceled => error("Canceled"),
        Error::Network(_) | Error::Timeout { .. } => {
            error(&sync_err.to_string());
            notice("The record API could not be reached. Check the connection and try again.");
        }
    }
}
