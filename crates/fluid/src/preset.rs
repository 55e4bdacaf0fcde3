use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use fluid_core::PresetMatch;
use fluid_core::preset::{Catalog, CatalogProvider, ValueDisplay, describe, lookup_async};

use crate::output::{OutputFormat, print_json};

#[derive(Args, Debug)]
#[command(about = "Describe a stored value using the preset catalog")]
pub struct PresetArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// JSON preset catalog (object of groups, in priority order)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Stored control value: a preset reference, clamp formula or plain size
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Catalog read from a JSON file. Read or parse failures resolve to no catalog.
struct FileCatalog {
    path: PathBuf,
}

impl CatalogProvider for FileCatalog {
    async fn fetch_catalog(&self) -> Option<Catalog> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read catalog {}: {e}", self.path.display());
                return None;
            }
        };
        Catalog::from_json(&content)
            .inspect_err(|e| log::warn!("Failed to parse catalog {}: {e}", self.path.display()))
            .ok()
    }
}

pub fn execute(args: PresetArgs) -> Result<()> {
    let found = match &args.catalog {
        Some(path) => {
            let provider = FileCatalog { path: path.clone() };
            futures::executor::block_on(lookup_async(&args.value, &provider))
        }
        None => None,
    };

    // Unmatched values fall back to inline formula or raw display
    let display = match found {
        Some(preset) => ValueDisplay::Preset(preset),
        None => describe(&args.value, None),
    };

    match args.format {
        OutputFormat::Human => {
            let kind = match &display {
                ValueDisplay::Preset(PresetMatch::Complex(_)) => "complex preset",
                ValueDisplay::Preset(PresetMatch::Simple(_)) => "simple preset",
                ValueDisplay::Inline(_) => "inline formula",
                ValueDisplay::Raw { .. } => "unrecognized value",
            };
            println!("{} ({kind})", display.label());
        }
        OutputFormat::Json => print_json(&display)?,
    }
    Ok(())
}
