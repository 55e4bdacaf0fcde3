use anyhow::Result;
use clap::Args;
use fluid_core::unit;

#[derive(Args, Debug)]
#[command(about = "Validate a size value, or a min/max pair")]
pub struct ValidateArgs {
    /// One value to check as it is typed, or a min and max to check as a pair
    #[arg(num_args = 1..=2, required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    match args.values.as_slice() {
        [input] => match unit::parse(input) {
            Some(_) if input.trim().is_empty() => println!("valid (empty)"),
            Some(parsed) => println!("valid: {parsed}"),
            None => anyhow::bail!("Invalid value format: '{input}'"),
        },
        [min, max] => {
            let (min, max) = unit::validate_pair(min, max)?;
            println!("valid: {min} ~ {max}");
        }
        _ => unreachable!("clap limits values to one or two"),
    }
    Ok(())
}
