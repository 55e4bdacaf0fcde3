use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use fluid_core::FluidToml;
use std::path::PathBuf;

mod decode;
mod encode;
mod output;
mod preset;
mod preview;
mod resolve;
mod validate;

#[derive(Parser)]
#[command(name = "fluid")]
#[command(about = "Fluid responsive values: clamp formulas, breakpoint inheritance and presets", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    /// Path to fluid.toml (defaults to ./fluid.toml when present)
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a min/max pair as a clamp formula
    #[command(alias = "e")]
    Encode(encode::EncodeArgs),

    /// Decode a clamp formula into its min/max pair
    #[command(alias = "d")]
    Decode(decode::DecodeArgs),

    /// Validate a size value, or a min/max pair
    Validate(validate::ValidateArgs),

    /// Resolve the value a responsive control inherits
    #[command(alias = "r")]
    Resolve(resolve::ResolveArgs),

    /// Describe a stored value using the preset catalog
    #[command(alias = "p")]
    Preset(preset::PresetArgs),

    /// Evaluate a fluid value at given viewport widths
    Preview(preview::PreviewArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug, RUST_LOG still overrides
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let config = FluidToml::discover(cli.config.as_deref(), &std::env::current_dir()?)?;

    match cli.command {
        Commands::Encode(args) => encode::execute(args, &config),
        Commands::Decode(args) => decode::execute(args),
        Commands::Validate(args) => validate::execute(args),
        Commands::Resolve(args) => resolve::execute(args, &config),
        Commands::Preset(args) => preset::execute(args),
        Commands::Preview(args) => preview::execute(args, &config),
    }
}
