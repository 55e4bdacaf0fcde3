use anyhow::Result;
use clap::Args;
use fluid_core::unit::validate_pair;
use fluid_core::{ClampValues, FluidToml};
use rust_decimal::Decimal;

#[derive(Args, Debug)]
#[command(about = "Evaluate a fluid value at given viewport widths")]
pub struct PreviewArgs {
    /// Viewport width in px (repeatable)
    #[arg(short = 'w', long = "width", required = true)]
    pub widths: Vec<u32>,

    /// Value at the minimum screen width
    #[arg(allow_hyphen_values = true)]
    pub min: String,

    /// Value at the maximum screen width
    #[arg(allow_hyphen_values = true)]
    pub max: String,
}

pub fn execute(args: PreviewArgs, config: &FluidToml) -> Result<()> {
    let (min, max) = validate_pair(&args.min, &args.max)?;
    let values = ClampValues {
        min_size: min.size,
        min_unit: min.unit,
        max_size: max.size,
        max_unit: max.unit,
    };

    let min_width = Decimal::from(config.viewport.min_width);
    let max_width = Decimal::from(config.viewport.max_width);

    for width in args.widths {
        let size = values.evaluate(Decimal::from(width), min_width, max_width)?;
        println!(
            "{width}px: {}{}",
            size.round_dp(4).normalize(),
            values.min_unit
        );
    }
    Ok(())
}
