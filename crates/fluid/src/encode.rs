use anyhow::Result;
use clap::Args;
use fluid_core::FluidToml;
use fluid_core::unit::validate_pair;

#[derive(Args, Debug)]
#[command(about = "Encode a min/max pair as a clamp formula")]
pub struct EncodeArgs {
    /// Value at the minimum screen width (e.g. 16px, 1rem)
    #[arg(allow_hyphen_values = true)]
    pub min: String,

    /// Value at the maximum screen width
    #[arg(allow_hyphen_values = true)]
    pub max: String,
}

pub fn execute(args: EncodeArgs, config: &FluidToml) -> Result<()> {
    let (min, max) = validate_pair(&args.min, &args.max)?;
    log::debug!("Encoding {min} ~ {max}");
    println!("{}", config.codec().encode_pair(&min, &max));
    Ok(())
}
