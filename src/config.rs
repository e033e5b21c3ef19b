// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;

use crate::runtime::Variant;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  inkdrift --variant ink-drip --fps 60 --density 1 --speed 1 --scale 1";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        format!("\x1b[1;36mDEFAULT PARAMS USAGE:\x1b[0m\n  \x1b[1;34minkdrift\x1b[0m --variant ink-drip --fps 60 --density 1 --speed 1 --scale 1")
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

pub fn print_list_variants() {
    println!("VARIANTS:");
    for v in Variant::ALL {
        let blurb = match v {
            Variant::InkDrip => "dense gold drips with a ghostly trail fade and rare shimmer",
            Variant::WoodGrain => "sparse, faint grain lines; hard clear, no afterglow",
            Variant::NeonFlicker => "additive green/yellow tubes that flicker, break and surge",
        };
        println!("  {:<11} {}", v.name(), blurb);
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "inkdrift", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'v',
        long = "variant",
        default_value = "ink-drip",
        help_heading = "APPEARANCE",
        help = "Animation variant (see --list-variants)"
    )]
    pub variant: String,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color depth: 8 (256-color) or 24 (truecolor)"
    )]
    pub colormode: Option<u8>,

    #[arg(
        short = 'd',
        long = "density",
        default_value_t = 1.0,
        help_heading = "PERFORMANCE",
        help = "Strand density multiplier (min 0.1 max 4.0)"
    )]
    pub density: f32,

    #[arg(
        short = 'S',
        long = "speed",
        default_value_t = 1.0,
        help_heading = "PERFORMANCE",
        help = "Drift speed multiplier (min 0.1 max 10.0)"
    )]
    pub speed: f32,

    #[arg(
        long = "fade",
        help_heading = "APPEARANCE",
        help = "Trail fade strength override (min 0.01 max 1.0; 1 = hard clear)"
    )]
    pub fade: Option<f32>,

    #[arg(
        long = "scale",
        default_value_t = 1,
        help_heading = "PERFORMANCE",
        help = "Backing buffer scale (min 1 max 2)"
    )]
    pub scale: u8,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "RNG seed (fixed default; set for a different arrangement)"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "list-variants",
        help_heading = "HELP",
        help = "List animation variants and exit"
    )]
    pub list_variants: bool,

    #[arg(
        long = "version",
        short = 'V',
        help_heading = "HELP",
        help = "Print version"
    )]
    pub version: bool,

    #[arg(
        long = "info",
        help_heading = "HELP",
        help = "Print build information"
    )]
    pub info: bool,
}
