use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use fluid_core::breakpoint::{dimensions_is_empty, size_is_empty};
use fluid_core::{FluidToml, InheritedValue, ValueObject, clamp};

use crate::output::{OutputFormat, print_json};

#[derive(Args, Debug)]
#[command(about = "Resolve the value a responsive control inherits")]
pub struct ResolveArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// JSON file mapping control names to their value objects
    #[arg(short = 's', long, value_name = "FILE")]
    pub settings: PathBuf,

    /// Which fields decide whether a breakpoint has a value of its own
    #[arg(short = 'k', long, value_enum, default_value = "size")]
    pub kind: ControlKind,

    /// Unit the control itself uses, to flag inherited values in another unit
    #[arg(short = 'u', long)]
    pub unit: Option<String>,

    /// Control name, e.g. `font_size_mobile`
    pub control: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ControlKind {
    /// Single value controls (`size`)
    Size,
    /// Box controls (`top`, `right`, `bottom`, `left`)
    Dimensions,
}

impl ControlKind {
    fn is_empty(self, value: &ValueObject) -> bool {
        match self {
            ControlKind::Size => size_is_empty(value),
            ControlKind::Dimensions => dimensions_is_empty(value),
        }
    }
}

fn load_settings(path: &Path) -> Result<HashMap<String, ValueObject>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn execute(args: ResolveArgs, config: &FluidToml) -> Result<()> {
    let settings = load_settings(&args.settings)?;
    let order = config.breakpoint_order();

    let inherited = order.resolve(
        &args.control,
        |name| settings.get(name).cloned(),
        |value| args.kind.is_empty(value),
    );

    match args.format {
        OutputFormat::Human => print_human(&args, inherited.as_ref()),
        OutputFormat::Json => print_json(&inherited)?,
    }
    Ok(())
}

fn print_human(args: &ResolveArgs, inherited: Option<&InheritedValue>) {
    let Some(inherited) = inherited else {
        println!("{} does not inherit a value", args.control);
        return;
    };

    println!("Inherited from: {}", inherited.inherited_from);
    println!("Direct parent: {}", inherited.direct_parent);
    println!("Path: {}", inherited.inherit_path.join(" > "));
    println!("Value: {}", serde_json::Value::Object(inherited.value.clone()));

    if let Some(size) = inherited.value.get("size").and_then(|s| s.as_str()) {
        if let Some(fluid) = clamp::decode(size) {
            println!("Fluid: {} ~ {}", fluid.min(), fluid.max());
        }
    }

    if let (Some(own), Some(source)) = (&args.unit, &inherited.source_unit) {
        if inherited.has_mixed_units(own) {
            println!(
                "{}",
                format!("Mixed units: inherited {source}, control uses {own}").yellow()
            );
        }
    }
}
