#![deny(unsafe_code)]
//! CLI binary for the duotone generative print system.
//!
//! Subcommands:
//! - `generate`: mint random token data (hash + token id)
//! - `traits`: derive and print the traits for a hash
//! - `render`: render both ink layers and write the PNG stages
//! - `inks`: list the ink palette

mod error;

use clap::{Args, Parser, Subcommand};
use duotone_core::{InkPalette, RenderConfig, TokenData, TraitGenerator, Traits};
use duotone_render::PngDirectorySink;
use error::CliError;
use rand::Rng;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Project number used when none is given.
const DEFAULT_PROJECT: u64 = 123;

/// Serials are drawn from `0..MAX_SERIAL`.
const MAX_SERIAL: u64 = 1000;

#[derive(Parser)]
#[command(name = "duotone", about = "Deterministic two-ink generative prints")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Which token to work on. A random one is minted when `--hash` is absent.
#[derive(Args)]
struct TokenArgs {
    /// Seed hash, normally `0x` followed by 64 hex digits.
    #[arg(long)]
    hash: Option<String>,

    /// Project number the token id is namespaced under.
    #[arg(long, default_value_t = DEFAULT_PROJECT)]
    project: u64,

    /// Per-project serial; random when omitted.
    #[arg(long)]
    serial: Option<u64>,

    /// JSON ink palette file (`[{"name", "r", "g", "b"}]`); built-in Riso inks by default.
    #[arg(long)]
    inks: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Mint random token data.
    Generate {
        /// Project number the token id is namespaced under.
        #[arg(long, default_value_t = DEFAULT_PROJECT)]
        project: u64,
    },
    /// Print the traits derived from a hash.
    Traits {
        #[command(flatten)]
        token: TokenArgs,
    },
    /// Render the artwork and write every stage as a PNG.
    Render {
        #[command(flatten)]
        token: TokenArgs,

        /// Output directory, created if missing.
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// JSON render config (`width_inches`, `height_inches`, `dpi`).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Page width in inches (overrides the config).
        #[arg(long)]
        width_inches: Option<f64>,

        /// Page height in inches (overrides the config).
        #[arg(long)]
        height_inches: Option<f64>,

        /// Resolution in dots per inch (overrides the config).
        #[arg(long)]
        dpi: Option<f64>,

        /// Also write the traits as `traits.json` next to the images.
        #[arg(long)]
        save_traits: bool,
    },
    /// List the inks in the palette.
    Inks {
        /// JSON ink palette file; built-in Riso inks by default.
        #[arg(long)]
        inks: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Io(format!("{}: {e}", path.display())))
}

fn load_palette(path: Option<&Path>) -> Result<InkPalette, CliError> {
    match path {
        Some(path) => Ok(InkPalette::from_json(&read_file(path)?)?),
        None => Ok(InkPalette::riso()),
    }
}

fn random_token(project: u64, rng: &mut impl Rng) -> TokenData {
    let bytes: [u8; 32] = rng.random();
    let serial = rng.random_range(0..MAX_SERIAL);
    TokenData::new(TokenData::hash_from_bytes(&bytes), project, serial)
}

fn resolve_token(args: &TokenArgs) -> TokenData {
    let mut rng = rand::rng();
    let token = match &args.hash {
        Some(hash) => {
            let serial = args
                .serial
                .unwrap_or_else(|| rng.random_range(0..MAX_SERIAL));
            TokenData::new(hash.clone(), args.project, serial)
        }
        None => {
            let mut token = random_token(args.project, &mut rng);
            if let Some(serial) = args.serial {
                token.token_id = TokenData::token_id_for(args.project, serial);
            }
            token
        }
    };
    if !token.is_canonical() {
        warn!(hash = %token.hash, "hash is not 0x followed by 64 hex digits");
    }
    token
}

fn generate_traits(args: &TokenArgs) -> Result<Traits, CliError> {
    let palette = load_palette(args.inks.as_deref())?;
    let token = resolve_token(args);
    Ok(TraitGenerator::new(&palette).generate(&token)?)
}

/// Loads the config file if given, then applies command-line overrides.
fn build_config(
    path: Option<&Path>,
    width_inches: Option<f64>,
    height_inches: Option<f64>,
    dpi: Option<f64>,
) -> Result<RenderConfig, CliError> {
    let mut config = match path {
        Some(path) => serde_json::from_str(&read_file(path)?)
            .map_err(|e| CliError::Input(format!("invalid config {}: {e}", path.display())))?,
        None => RenderConfig::default(),
    };
    if let Some(w) = width_inches {
        config.width_inches = w;
    }
    if let Some(h) = height_inches {
        config.height_inches = h;
    }
    if let Some(d) = dpi {
        config.dpi = d;
    }
    Ok(config)
}

fn print_traits(traits: &Traits) {
    let d = &traits.decisions;
    println!("hash:       {}", traits.token.hash);
    println!("token id:   {}", traits.token.token_id);
    println!(
        "inks:       {} / {}",
        traits.first_colour.name, traits.second_colour.name
    );
    println!(
        "background: {:?}{} / {:?}{}{}",
        traits.background.first_colour.kind,
        if traits.background.first_colour.dark { " (dark)" } else { "" },
        traits.background.second_colour.kind,
        if traits.background.second_colour.dark { " (dark)" } else { "" },
        if traits.background.flipped { ", flipped" } else { "" },
    );
    println!(
        "grid:       {}x{}, {} shapes of {:?}",
        d.max_dot_x,
        d.max_dot_y,
        traits.grid.len(),
        d.shape_kinds
    );
    println!(
        "overlay:    opacity {} / {}",
        traits.grid_first_colour_opacity, traits.grid_second_colour_opacity
    );
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Generate { project } => {
            let token = random_token(project, &mut rand::rng());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&token)?);
            } else {
                println!("{}", token.hash);
                println!("{}", token.token_id);
            }
        }
        Command::Traits { token } => {
            let traits = generate_traits(&token)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&traits)?);
            } else {
                print_traits(&traits);
            }
        }
        Command::Render {
            token,
            output,
            config,
            width_inches,
            height_inches,
            dpi,
            save_traits,
        } => {
            let config = build_config(config.as_deref(), width_inches, height_inches, dpi)?;
            let page = config.page()?;
            let traits = generate_traits(&token)?;
            let mut sink = PngDirectorySink::create(&output)?;

            if save_traits {
                let path = output.join("traits.json");
                std::fs::write(&path, serde_json::to_string_pretty(&traits)?)
                    .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            }

            duotone_render::render_artwork(&traits, page, &mut sink)?;
            let final_path = sink.path_for(duotone_core::Stage::Final);
            info!(path = %final_path.display(), "artwork complete");

            if cli.json {
                let info = serde_json::json!({
                    "hash": traits.token.hash,
                    "token_id": traits.token.token_id,
                    "width": page.width(),
                    "height": page.height(),
                    "dpi": page.dpi(),
                    "output": final_path.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", final_path.display());
            }
        }
        Command::Inks { inks } => {
            let palette = load_palette(inks.as_deref())?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(palette.inks())?);
            } else {
                for ink in palette.inks() {
                    println!("{:<20} {}", ink.name, ink.to_srgb().to_hex());
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
