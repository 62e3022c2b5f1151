#![deny(unsafe_code)]
//! CLI binary for driftfield, the animated portfolio background.
//!
//! Subcommands:
//! - `render <particles|waves|page>`: run effects N frames, write a PNG
//! - `list`: print available effects and themes

mod error;

use clap::{Parser, Subcommand};
use driftfield_core::{DVec2, Surface, Theme};
use driftfield_effects::{EffectKind, Page};
use error::CliError;
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "driftfield", about = "Particle field and wave background renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an effect (or the whole page) for N frames and write a PNG snapshot.
    Render {
        /// What to render: "particles", "waves", or "page".
        target: String,

        /// Viewport width in pixels.
        #[arg(short = 'W', long, default_value_t = 1280)]
        width: u32,

        /// Viewport height in pixels.
        #[arg(short = 'H', long, default_value_t = 720)]
        height: u32,

        /// Number of animation frames.
        #[arg(short, long, default_value_t = 120)]
        frames: u64,

        /// PRNG seed for deterministic particles.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Theme name (dark, light).
        #[arg(short, long, default_value = "dark")]
        theme: String,

        /// Pointer position held for the whole run, as "x,y".
        #[arg(long)]
        pointer: Option<String>,

        /// Leave the particle layer out of the page.
        #[arg(long)]
        no_particles: bool,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Effect parameters as a JSON string. For "page", one object per
        /// effect: {"particles": {...}, "waves": {...}}.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available effects and themes.
    List,
}

/// Parses a pointer position given as `"x,y"`.
fn parse_pointer(s: &str) -> Result<DVec2, CliError> {
    let bad = || CliError::Input(format!("invalid --pointer '{s}': expected \"x,y\""));
    let (x, y) = s.split_once(',').ok_or_else(bad)?;
    let x: f64 = x.trim().parse().map_err(|_| bad())?;
    let y: f64 = y.trim().parse().map_err(|_| bad())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(bad());
    }
    Ok(DVec2::new(x, y))
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let effects = EffectKind::list_effects();
            let themes = Theme::list_names();
            if cli.json {
                let info = serde_json::json!({
                    "effects": effects,
                    "targets": ["particles", "waves", "page"],
                    "themes": themes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Effects:");
                for name in effects {
                    println!("  {name}");
                }
                println!("Themes:");
                println!("  {}", themes.join(", "));
            }
        }
        Command::Render {
            target,
            width,
            height,
            frames,
            seed,
            theme,
            pointer,
            no_particles,
            output,
            params,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let theme_colors = Theme::from_name(&theme)?;
            let pointer = pointer.as_deref().map(parse_pointer).transpose()?;
            let size = Surface::new(width, height);

            let mut page = if target == "page" {
                Page::portfolio(size, theme_colors, seed, !no_particles, &params)?
            } else {
                Page::single(&target, size, theme_colors, seed, &params)?
            };
            if let Some(p) = pointer {
                page.set_pointer(p);
            }

            page.run_for(frames);
            page.teardown();

            driftfield_effects::snapshot::write_png(&page, &output)?;
            info!("wrote {}", output.display());

            let particles = page
                .effect("particles")
                .ok()
                .and_then(EffectKind::particle_count);

            if cli.json {
                let info = serde_json::json!({
                    "target": target,
                    "width": width,
                    "height": height,
                    "frames": frames,
                    "seed": seed,
                    "theme": theme,
                    "particles": particles,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {target} ({width}x{height}, {frames} frames, seed {seed}, {theme}) -> {}",
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level(cli.verbose).as_str()),
    )
    .init();

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
