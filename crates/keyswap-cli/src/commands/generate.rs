//! Menu option 2: generate a new key pair into an identity folder.
//!
//! Asks for the folder, cipher, key name and comment (all but the folder
//! have defaults), creates the folder if needed and runs the configured
//! key generation program.

use std::io::{BufRead, Write};

use anyhow::Result;
use keyswap_core::{default_key_name, ensure_identity_dir, identity_folder_name, KeygenRequest};

use super::Flow;
use crate::app::App;
use crate::console::Console;

/// Prompt for key parameters and generate the pair.
pub fn run<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<Flow> {
    let Some(raw_folder) =
        console.read_input("\nEnter the subfolder name for the new key-pair (required): ")?
    else {
        return Ok(Flow::Quit);
    };
    let folder = identity_folder_name(&raw_folder);

    let dir = match ensure_identity_dir(&app.store, &folder) {
        Ok((dir, created)) => {
            if created {
                console.say(format!("\nCreated folder: {}", dir.display()))?;
            }
            dir
        }
        Err(e) => {
            console.say(format!("\nFailed to create folder {folder}: {e}"))?;
            return Ok(Flow::Continue);
        }
    };

    let defaults = &app.defaults;
    let Some(raw_cipher) = console.read_input(&format!(
        "\nEnter the cipher (e.g., ed25519, rsa) [default: {}]: ",
        defaults.cipher
    ))?
    else {
        return Ok(Flow::Quit);
    };
    let cipher = defaults.cipher_or(&raw_cipher);

    let Some(raw_key_name) = console.read_input(&format!(
        "Enter the key name [default: {}]: ",
        default_key_name(&cipher)
    ))?
    else {
        return Ok(Flow::Quit);
    };

    let Some(raw_comment) = console.read_input(&format!(
        "Enter a comment for the key [default: {}]: ",
        defaults.comment
    ))?
    else {
        return Ok(Flow::Quit);
    };

    let request = KeygenRequest::resolve(&dir, &cipher, &raw_key_name, &raw_comment, defaults);

    console.say("\nGenerating new key pair...\n")?;
    match app.keygen.generate(&request) {
        Ok(()) => console.say(format!("\nGenerated new key pair in {}", dir.display()))?,
        Err(e) => console.say(format!("\nFailed to generate key: {e}"))?,
    }

    Ok(Flow::Continue)
}
