//! The interactive menu loop.

use std::io::{BufRead, Write};

use anyhow::Result;
use keyswap_core::{detect_active, ActiveIdentity, DirLister, Keygen, KeygenDefaults, Store};
use tracing::info;

use crate::commands::{self, Flow};
use crate::console::Console;

/// Everything a menu option needs. Filesystem state is re-read by each
/// option; nothing is cached here.
pub struct App {
    pub store: Store,
    pub lister: Box<dyn DirLister>,
    pub keygen: Keygen,
    pub defaults: KeygenDefaults,
}

impl App {
    /// Show the active identity, then serve the menu until the user quits
    /// or input runs out.
    pub fn run<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> Result<()> {
        console.say("\nSSH Key-Pair Manager CLI")?;
        console.say("------------------------\n")?;

        match detect_active(&self.store, self.lister.as_ref()) {
            ActiveIdentity::Folder(name) => {
                console.say(format!("Current active key-pair: {}", name.to_string_lossy()))?
            }
            ActiveIdentity::Unknown => {
                console.say("No matching key-pair is currently active.")?
            }
        }

        loop {
            console.say("\n1) Switch SSH key-pair for another system")?;
            console.say("2) Generate new SSH key-pair")?;
            console.say("3) Quit")?;

            let Some(choice) = console.read_input("\nChoose an option: ")? else {
                break;
            };

            let flow = match choice.as_str() {
                "1" => commands::switch::run(self, console)?,
                "2" => commands::generate::run(self, console)?,
                "3" => break,
                _ => {
                    console.say("Invalid option. Try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                break;
            }
        }

        info!(root = %self.store.root().display(), "exiting");
        console.say("Exiting...")?;
        Ok(())
    }
}
