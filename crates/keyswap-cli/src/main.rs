//! keyswap: switch between SSH key-pairs.
//!
//! Identities live in `~/.ssh/_<name>` folders. The interactive menu shows
//! which identity is active, copies another identity's keys into `~/.ssh`,
//! or generates a new key pair with `ssh-keygen`.

mod app;
mod commands;
mod config;
mod console;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use keyswap_core::{
    default_comment, local_hostname, FsLister, Keygen, KeygenDefaults, Store, SystemRunner,
};
use tracing::{debug, error};

use crate::app::App;
use crate::console::Console;

/// keyswap: SSH key-pair manager
#[derive(Parser)]
#[command(name = "keyswap", version, about = "Switch between SSH key-pairs stored in ~/.ssh/_<name> folders")]
struct Cli {
    /// Identity store root (defaults to ~/.ssh)
    #[arg(long = "ssh-dir")]
    ssh_dir: Option<PathBuf>,

    /// Config file path (defaults to ~/.keyswap/config.toml)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so the menu on stdout stays readable.
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("keyswap=debug,keyswap_core=debug")
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("keyswap=warn,keyswap_core=warn")
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("keyswap: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let home = dirs::home_dir().context("cannot determine home directory")?;

    let config_path = cli
        .config
        .unwrap_or_else(|| home.join(".keyswap").join("config.toml"));
    let cfg = config::Config::load(&config_path)?;

    // CLI overrides config.
    let root = match cli.ssh_dir.or(cfg.store.ssh_dir) {
        Some(root) => root,
        None => Store::default_location()?.root().to_path_buf(),
    };
    let store = Store::with_stems(root, cfg.store.stems);
    debug!(root = %store.root().display(), stems = ?store.stems(), "identity store");

    let app = App {
        store,
        lister: Box::new(FsLister),
        keygen: Keygen::new(cfg.keygen.program, Box::new(SystemRunner)),
        defaults: KeygenDefaults {
            cipher: cfg.keygen.default_cipher,
            comment: default_comment(&home, &local_hostname()),
        },
    };

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    app.run(&mut console)
}
