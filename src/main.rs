// Copyright (c) 2026 rezky_nightky

mod cell;
mod config;
mod driver;
mod field;
mod frame;
mod palette;
mod render;
mod runtime;
mod screen;
mod strand;
mod surface;
mod terminal;
mod variant;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_list_variants, Args,
};
use crate::driver::Driver;
use crate::runtime::{ColorMode, Variant};
use crate::terminal::{restore_terminal_best_effort, Terminal};
use crate::variant::VariantParams;

const DEFAULT_SEED: u64 = 0xD21F7;

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("INKDRIFT_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_f32_range(name: &str, v: f32, min: f32, max: f32) -> f32 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_u8_range(name: &str, v: u8, min: u8, max: u8) -> u8 {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    if let Some(m) = args.colormode {
        return match m {
            8 => ColorMode::Color256,
            24 => ColorMode::TrueColor,
            _ => {
                eprintln!("invalid --colormode: {} (allowed: 8,24)", m);
                std::process::exit(1);
            }
        };
    }
    detect_color_mode_auto()
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "ink-drip" | "ink_drip" | "inkdrip" | "ink" => Ok(Variant::InkDrip),
        "wood-grain" | "wood_grain" | "woodgrain" | "grain" => Ok(Variant::WoodGrain),
        "neon" | "neon-flicker" | "neon_flicker" | "neonflicker" => Ok(Variant::NeonFlicker),
        _ => Err(format!("invalid variant: {} (see --list-variants)", s)),
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_variants {
        print_list_variants();
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let mut variant = match parse_variant(&args.variant) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let color_mode = detect_color_mode(&args);
    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let density = require_f32_range("--density", args.density, 0.1, 4.0);
    let speed = require_f32_range("--speed", args.speed, 0.1, 10.0);
    let fade = args.fade.map(|f| require_f32_range("--fade", f, 0.01, 1.0));
    let scale = require_u8_range("--scale", args.scale, 1, 2) as u32;
    let seed_base = args.seed.unwrap_or(DEFAULT_SEED);

    let duration_s = args.duration.map(|s| {
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        if s > 0.0 {
            return require_f64_range("--duration", s, 0.1, 86400.0);
        }
        s
    });

    let make_params = |variant: Variant| {
        let mut params = VariantParams::for_variant(variant);
        params.apply_overrides(density, speed, fade);
        params
    };

    let mut term = Terminal::new()?;
    let (mut cols, mut rows) = term.size()?;

    let mut restarts: u64 = 0;
    let mut driver = Driver::new(
        make_params(variant),
        cols,
        rows,
        scale,
        seed_base,
        color_mode,
    );

    let start_time = Instant::now();
    let end_time = duration_s.and_then(|s| {
        if s <= 0.0 {
            return None;
        }
        Some(start_time + Duration::from_secs_f64(s))
    });

    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = Instant::now();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;
        let mut switch_to: Option<Variant> = None;
        let mut restart = false;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                let ev = Terminal::read_event()?;
                match ev {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver {
                            running = false;
                            break;
                        }
                        match k.code {
                            KeyCode::Esc | KeyCode::Char('q') => running = false,
                            KeyCode::Char(' ') => restart = true,
                            KeyCode::Tab => switch_to = Some(variant.next()),
                            KeyCode::Char('1') => switch_to = Some(Variant::InkDrip),
                            KeyCode::Char('2') => switch_to = Some(Variant::WoodGrain),
                            KeyCode::Char('3') => switch_to = Some(Variant::NeonFlicker),
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() || switch_to.is_some() || restart {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            cols = nw;
            rows = nh;
            driver.resize(cols, rows);
        }

        // Variant switches and restarts tear the driver down and build a
        // fresh one; a stopped driver never comes back.
        if switch_to.is_some() || restart {
            if let Some(v) = switch_to {
                variant = v;
            }
            driver.stop();
            restarts += 1;
            driver = Driver::new(
                make_params(variant),
                cols,
                rows,
                scale,
                seed_base.wrapping_add(restarts),
                color_mode,
            );
        }

        if let Some(frame) = driver.frame() {
            term.draw(frame)?;
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    driver.stop();
    drop(term);

    Ok(())
}
