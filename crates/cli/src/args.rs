//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Read location and password defaults from the `KRAUSENING_*` variables.
//! - Build the `Locations` every command loads from.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use krausening_core::constants::{
    BASE_LOCATION_VAR, EXTENSIONS_LOCATION_VAR, MASTER_PASSWORD_VAR,
    OVERRIDE_EXTENSIONS_LOCATION_VAR,
};
use krausening_core::{Locations, MergePolicy};
use secrecy::{ExposeSecret, SecretString};

#[derive(Parser)]
#[command(name = "krausening")]
#[command(about = "Inspect layered, encrypted .properties configuration", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  krausening --base ./config list\n  krausening --base ./config --extensions ./ext get app.properties\n  krausening --base ./config merge app.properties db.properties --policy last-wins\n  KRAUSENING_PASSWORD=... krausening encrypt 'db-password'\n"
)]
pub struct Cli {
    /// Directory holding the base .properties files
    #[arg(long, global = true, env = BASE_LOCATION_VAR, value_name = "DIR")]
    pub base: Option<PathBuf>,

    /// Directory whose .properties files overlay the base
    #[arg(long, global = true, env = EXTENSIONS_LOCATION_VAR, value_name = "DIR")]
    pub extensions: Option<PathBuf>,

    /// Root directory holding override subfolders
    #[arg(long, global = true, env = OVERRIDE_EXTENSIONS_LOCATION_VAR, value_name = "DIR")]
    pub override_root: Option<PathBuf>,

    /// Override subfolder (under the override root) to layer last
    #[arg(long, global = true, value_name = "NAME")]
    pub subfolder: Option<String>,

    /// Master password for ENC(...) values
    #[arg(
        long,
        global = true,
        env = MASTER_PASSWORD_VAR,
        hide_env_values = true,
        value_parser = parse_secret
    )]
    pub password: Option<SecretString>,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Locations from the flags (or their environment variables).
    /// Blank values are treated as unset.
    pub fn locations(&self) -> Locations {
        let mut locations = Locations::new();
        if let Some(base) = non_blank_path(self.base.as_ref()) {
            locations = locations.with_base(base);
        }
        if let Some(extensions) = non_blank_path(self.extensions.as_ref()) {
            locations = locations.with_extensions(extensions);
        }
        if let Some(root) = non_blank_path(self.override_root.as_ref()) {
            locations = locations.with_override_root(root);
        }
        if let Some(password) = self
            .password
            .as_ref()
            .filter(|p| !p.expose_secret().trim().is_empty())
        {
            locations.master_password = Some(password.clone());
        }
        locations
    }
}

fn non_blank_path(path: Option<&PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.to_string_lossy().trim().is_empty())
        .cloned()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a value into the ENC(...) form for a property file
    Encrypt {
        /// The plaintext to encrypt
        value: String,
    },

    /// Decrypt an ENC(...) value
    Decrypt {
        /// The ENC(...) value or bare payload to decrypt
        value: String,
    },

    /// List the logical property files the layered locations produce
    List,

    /// Print one property file, or one key from it
    Get {
        /// Logical file name (e.g., app.properties)
        file: String,

        /// Key to print; all keys when omitted
        key: Option<String>,
    },

    /// Merge several property files into one view
    Merge {
        /// Logical file names, in precedence order
        #[arg(required = true)]
        files: Vec<String>,

        /// How keys defined by more than one file are resolved
        #[arg(long, default_value = "fail-on-duplicate-key", value_parser = parse_policy)]
        policy: MergePolicy,

        /// Fail when a named file was not loaded from any location
        #[arg(long)]
        strict: bool,
    },
}

fn parse_secret(value: &str) -> Result<SecretString, String> {
    Ok(SecretString::new(value.into()))
}

fn parse_policy(value: &str) -> Result<MergePolicy, String> {
    value.parse().map_err(|e: krausening_core::KrauseningError| e.to_string())
}
