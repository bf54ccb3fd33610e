//! Menu option 1: activate another identity folder.
//!
//! Lists the `_<name>` folders with 1-based numbers, reads a selection and
//! replaces the active key files with the chosen folder's files.

use std::io::{BufRead, Write};

use anyhow::Result;
use keyswap_core::{identity_folders, parse_selection, switch_to, KeyswapError};
use tracing::debug;

use super::Flow;
use crate::app::App;
use crate::console::Console;

/// Prompt for a folder and switch to it.
pub fn run<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<Flow> {
    let folders = identity_folders(&app.store, app.lister.as_ref());

    console.say("\nAvailable SSH key-pair folders:\n")?;
    if folders.is_empty() {
        console.say("No key-pair folders found.")?;
        return Ok(Flow::Continue);
    }
    for (i, folder) in folders.iter().enumerate() {
        console.say(format!("{}) {}", i + 1, folder.to_string_lossy()))?;
    }

    let Some(answer) = console.read_input("\nEnter the number of the folder to switch to: ")?
    else {
        return Ok(Flow::Quit);
    };

    let index = match parse_selection(&answer, folders.len()) {
        Ok(index) => index,
        Err(e) => {
            debug!("{e}");
            console.say("Invalid choice.")?;
            return Ok(Flow::Continue);
        }
    };
    let folder = &folders[index];

    let report = match switch_to(&app.store, app.lister.as_ref(), folder) {
        Ok(report) => report,
        Err(KeyswapError::MissingFolder(_)) => {
            console.say("\nFolder does not exist.\n")?;
            return Ok(Flow::Continue);
        }
        Err(e) => {
            console.say(format!("Failed to switch: {e}"))?;
            return Ok(Flow::Continue);
        }
    };

    console.say("\nRemoving SSH key-pair files...\n")?;
    for path in &report.removed {
        console.say(format!("Removed: {}", path.display()))?;
    }

    if let Some(e) = &report.unreadable {
        console.say(format!("Failed to read folder: {e}"))?;
        return Ok(Flow::Continue);
    }

    console.say("\nCopying SSH key-pair files...\n")?;
    for file in &report.copied {
        console.say(format!(
            "Copied {} to {}",
            file.src.display(),
            file.dst.display()
        ))?;
    }
    for (src, err) in &report.failed {
        console.say(format!("Failed to copy {}: {err}", src.display()))?;
    }

    if !report.is_clean() {
        console.say(format!(
            "\n{} of {} file(s) could not be copied.",
            report.failed.len(),
            report.failed.len() + report.copied.len()
        ))?;
    }

    console.say(format!("\nSwitched to {}", report.folder.to_string_lossy()))?;
    Ok(Flow::Continue)
}
