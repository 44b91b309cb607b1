#![deny(unsafe_code)]
//! CLI binary for the chroma-plane color picker engine.
//!
//! Subcommands:
//! - `render` renders the active plane and writes a PNG
//! - `sample` evaluates one `(u, v)` point of the active plane
//! - `contrast` computes APCA `Lc` between two hex colors
//! - `max-chroma` finds the gamut boundary at a lightness and hue
//! - `list` prints planes, modes, gamuts and the state schema

mod error;

use chroma_plane_core::apca::{relative_luminance, signed_contrast};
use chroma_plane_core::{
    display_css, max_chroma, to_hex, Gamut, Mode, OkLch, PickerState, Plane,
};
use chroma_plane_raster::{render, sample_with_lc};
use clap::{Args, Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chroma-plane", about = "OKLCH color plane and APCA contrast CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of render threads (0 = auto).
    #[arg(short = 'j', long, global = true, default_value_t = 0)]
    threads: usize,

    #[command(subcommand)]
    command: Command,
}

/// Picker state: a JSON document plus per-field overrides.
#[derive(Args, Default)]
struct StateArgs {
    /// Picker state as a JSON string (see `list --json` for the schema).
    #[arg(long, default_value = "{}")]
    state: String,

    /// Plane name (e.g. "HC_at_L", "AH_at_C").
    #[arg(short, long)]
    plane: Option<String>,

    /// Display mode (shape, max-chroma, apca).
    #[arg(short, long)]
    mode: Option<String>,

    /// Target gamut (srgb, display-p3).
    #[arg(short, long)]
    gamut: Option<String>,

    /// Requested resolution; snapped to 256, 512 or 1024.
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Fixed lightness in [0, 1].
    #[arg(long)]
    l: Option<f64>,

    /// Fixed chroma in [0, 0.4].
    #[arg(long)]
    c: Option<f64>,

    /// Fixed hue in degrees.
    #[arg(long)]
    h: Option<f64>,

    /// APCA background as a hex color.
    #[arg(long)]
    bg: Option<String>,

    /// APCA threshold targets, comma separated.
    #[arg(long, value_delimiter = ',')]
    targets: Option<Vec<f64>>,

    /// Fixed Lc target for the HC_at_APCA plane.
    #[arg(long)]
    fixed: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the active plane and write a PNG snapshot.
    Render {
        #[command(flatten)]
        state: StateArgs,

        /// Output file path.
        #[arg(short, long, default_value = "plane.png")]
        output: PathBuf,
    },
    /// Sample one point of the active plane.
    Sample {
        #[command(flatten)]
        state: StateArgs,

        /// Horizontal plane coordinate in [0, 1].
        #[arg(long)]
        u: f64,

        /// Vertical plane coordinate in [0, 1].
        #[arg(long)]
        v: f64,
    },
    /// APCA contrast of a foreground color on a background color.
    Contrast {
        /// Foreground hex color.
        fg: String,

        /// Background hex color.
        bg: String,

        /// Gamut the colors are displayed in.
        #[arg(short, long, default_value = "srgb")]
        gamut: String,
    },
    /// Largest in-gamut chroma at a lightness and hue.
    MaxChroma {
        /// Lightness in [0, 1].
        #[arg(long)]
        l: f64,

        /// Hue in degrees.
        #[arg(long)]
        h: f64,

        /// Target gamut.
        #[arg(short, long, default_value = "srgb")]
        gamut: String,
    },
    /// List planes, modes, gamuts and state parameters.
    List,
}

/// Applies `args` on top of the JSON state document.
fn build_state(args: &StateArgs) -> Result<PickerState, CliError> {
    let params: serde_json::Value = serde_json::from_str(&args.state)
        .map_err(CliError::StateJson)?;
    let mut state = PickerState::from_json(&params)?;

    if let Some(name) = &args.plane {
        state.set_plane(name.parse()?);
    }
    if let Some(name) = &args.mode {
        state.set_mode(name.parse()?);
    }
    if let Some(name) = &args.gamut {
        state.set_gamut(name.parse()?);
    }
    if let Some(res) = args.resolution {
        state.set_resolution(res);
    }
    if let Some(l) = args.l {
        state.set_l(l);
    }
    if let Some(c) = args.c {
        state.set_c(c);
    }
    if let Some(h) = args.h {
        state.set_h(h);
    }
    if let Some(hex) = &args.bg {
        state.set_apca_bg(OkLch::from_hex(hex)?);
    }
    if let Some(targets) = &args.targets {
        state.set_apca_targets(targets.iter().copied());
    }
    if let Some(lc) = args.fixed {
        state.set_apca_fixed(lc);
    }
    Ok(state)
}

fn color_json(color: OkLch, gamut: Gamut) -> serde_json::Value {
    let (css, in_gamut) = display_css(color, gamut);
    serde_json::json!({
        "l": color.l,
        "c": color.c,
        "h": color.h,
        "css": css,
        "hex": to_hex(color),
        "in_gamut": in_gamut,
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()?;
    }

    match cli.command {
        Command::List => {
            let planes: Vec<&str> = Plane::ALL.iter().map(|p| p.name()).collect();
            let modes: Vec<&str> = Mode::ALL.iter().map(|m| m.name()).collect();
            let gamuts: Vec<&str> = Gamut::ALL.iter().map(|g| g.name()).collect();
            if cli.json {
                let info = serde_json::json!({
                    "planes": planes,
                    "modes": modes,
                    "gamuts": gamuts,
                    "params": PickerState::param_schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Planes:");
                for plane in Plane::ALL {
                    let kind = if plane.is_standard() { "standard" } else { "apca" };
                    println!("  {:<12} {kind}", plane.name());
                }
                println!("Modes:");
                println!("  {}", modes.join(", "));
                println!("Gamuts:");
                println!("  {}", gamuts.join(", "));
            }
        }
        Command::Render { state, output } => {
            let state = build_state(&state)?;
            debug!(state = %state.to_json(), "render requested");
            let raster = render(&state);
            chroma_plane_raster::snapshot::write_png(&raster, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "state": state.to_json(),
                    "effective_resolution": raster.effective_resolution,
                    "apca_pass_ratio": raster.apca_pass_ratio,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let size = raster.effective_resolution;
                eprintln!(
                    "rendered {} ({size}x{size}, {}) -> {}",
                    state.plane(),
                    state.mode().name(),
                    output.display()
                );
                if let Some(ratio) = raster.apca_pass_ratio {
                    eprintln!("apca pass ratio: {:.1}%", ratio * 100.0);
                }
            }
        }
        Command::Sample { state, u, v } => {
            let state = build_state(&state)?;
            let s = sample_with_lc(u, v, &state);
            if cli.json {
                let info = serde_json::json!({
                    "u": s.u,
                    "v": s.v,
                    "color": s.color.map(|c| color_json(c, state.gamut())),
                    "in_gamut": s.in_gamut,
                    "lc": s.lc,
                    "apca_value": s.apca_value,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                match s.color {
                    Some(color) => {
                        let (css, _) = display_css(color, state.gamut());
                        println!(
                            "oklch({:.4} {:.4} {:.2})  {css}  {}",
                            color.l,
                            color.c,
                            color.h,
                            to_hex(color)
                        );
                    }
                    None => println!("no color"),
                }
                println!("in gamut: {}", s.in_gamut);
                if let Some(lc) = s.lc {
                    println!("Lc: {lc:.1}");
                }
                if let Some(target) = s.apca_value {
                    println!("target Lc: {target:.1}");
                }
            }
        }
        Command::Contrast { fg, bg, gamut } => {
            let gamut: Gamut = gamut.parse()?;
            let fg = OkLch::from_hex(&fg)?;
            let bg = OkLch::from_hex(&bg)?;
            let lc = chroma_plane_core::contrast(fg, bg, gamut);
            let signed = signed_contrast(
                relative_luminance(fg, gamut),
                relative_luminance(bg, gamut),
            );
            if cli.json {
                let info = serde_json::json!({
                    "lc": lc,
                    "signed_lc": signed,
                    "gamut": gamut.name(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let polarity = if signed < 0.0 { "light on dark" } else { "dark on light" };
                println!("Lc {lc:.1} ({polarity})");
            }
        }
        Command::MaxChroma { l, h, gamut } => {
            let gamut: Gamut = gamut.parse()?;
            let edge = OkLch::new(l, 0.0, h).normalized();
            let c = max_chroma(edge.l, edge.h, gamut);
            let color = OkLch { c, ..edge };
            if cli.json {
                let info = serde_json::json!({
                    "max_chroma": c,
                    "gamut": gamut.name(),
                    "color": color_json(color, gamut),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let (css, _) = display_css(color, gamut);
                println!("C max {c:.4} at L {:.3} h {:.1} ({gamut})  {css}", edge.l, edge.h);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({
                "error": e.to_string(),
                "kind": e.kind(),
                "exit_code": e.exit_code(),
            });
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
