use anyhow::Result;
use clap::Args;
use fluid_core::clamp;

use crate::output::{OutputFormat, print_json};

#[derive(Args, Debug)]
#[command(about = "Decode a clamp formula into its min/max pair")]
pub struct DecodeArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Formula produced by `fluid encode`
    pub formula: String,
}

pub fn execute(args: DecodeArgs) -> Result<()> {
    let Some(values) = clamp::decode(&args.formula) else {
        anyhow::bail!("Not a clamp formula: '{}'", args.formula);
    };

    match args.format {
        OutputFormat::Human => {
            println!("min: {}", values.min());
            println!("max: {}", values.max());
        }
        OutputFormat::Json => print_json(&values)?,
    }
    Ok(())
}
