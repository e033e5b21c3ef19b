// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::{ColorMode, Variant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
        }
    }
}

// Warm near-black behind every variant.
pub const VOID: Rgb = Rgb::new(12, 10, 8);

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

// h in degrees, s and l in percent.
pub fn hsl(h: f32, s: f32, l: f32) -> Rgb {
    let h = h.rem_euclid(360.0);
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    Rgb {
        r: ((r1 + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        g: ((g1 + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        b: ((b1 + m) * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}

// Colors sampled along a trail: tail body, peak near the head, head taper.
#[derive(Clone, Copy, Debug)]
pub struct PaletteEntry {
    pub weight: f32,
    pub ramp: [Rgb; 3],
}

#[derive(Clone, Debug)]
pub struct Palette {
    pub entries: Vec<PaletteEntry>,
    pub bg: Rgb,
}

fn gold_entry(hue: f32, weight: f32) -> PaletteEntry {
    PaletteEntry {
        weight,
        ramp: [
            hsl(hue, 55.0, 55.0),
            hsl(hue, 60.0, 50.0),
            hsl(hue, 50.0, 45.0),
        ],
    }
}

fn flat_entry(color: Rgb, weight: f32) -> PaletteEntry {
    PaletteEntry {
        weight,
        ramp: [color, color, color],
    }
}

pub fn build_palette(variant: Variant) -> Palette {
    let entries = match variant {
        // Antique gold through black, one brighter accent strand in ~7.
        Variant::InkDrip | Variant::WoodGrain => vec![
            gold_entry(44.0, 1.0),
            gold_entry(48.0, 1.0),
            gold_entry(52.0, 1.0),
            gold_entry(56.0, 1.0),
            PaletteEntry {
                weight: 0.7,
                ramp: [
                    hsl(50.0, 70.0, 65.0),
                    hsl(50.0, 75.0, 60.0),
                    hsl(50.0, 60.0, 50.0),
                ],
            },
        ],
        Variant::NeonFlicker => vec![
            flat_entry(hsl(120.0, 100.0, 55.0), 2.0),
            flat_entry(hsl(58.0, 100.0, 55.0), 1.0),
        ],
    };

    Palette { entries, bg: VOID }
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cr = CUBE_LEVELS[r6 as usize];
    let cg = CUBE_LEVELS[g6 as usize];
    let cb = CUBE_LEVELS[b6 as usize];
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(r, g, b, cr, cg, cb);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_idx = if avg < 8 {
        16
    } else if avg > 238 {
        231
    } else {
        232 + ((avg - 8) / 10)
    };
    let (gr, gg, gb) = if gray_idx == 16 {
        (0, 0, 0)
    } else if gray_idx == 231 {
        (255, 255, 255)
    } else {
        let v = 8 + 10 * (gray_idx - 232);
        (v, v, v)
    };
    let gray_dist = dist2(r, g, b, gr, gg, gb);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

pub fn to_term_color(c: Rgb, mode: ColorMode) -> Color {
    match mode {
        ColorMode::TrueColor => Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        },
        ColorMode::Color256 => Color::AnsiValue(rgb_to_ansi256(c.r, c.g, c.b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl(0.0, 100.0, 50.0), Rgb::new(255, 0, 0));
        assert_eq!(hsl(120.0, 100.0, 50.0), Rgb::new(0, 255, 0));
        assert_eq!(hsl(240.0, 100.0, 50.0), Rgb::new(0, 0, 255));
        assert_eq!(hsl(0.0, 0.0, 50.0), Rgb::new(128, 128, 128));
    }

    #[test]
    fn ansi256_corners() {
        assert_eq!(rgb_to_ansi256(0, 0, 0), 16);
        assert_eq!(rgb_to_ansi256(255, 255, 255), 231);
        assert_eq!(rgb_to_ansi256(255, 0, 0), 196);
    }

    #[test]
    fn palettes_are_weighted_and_nonempty() {
        for v in Variant::ALL {
            let p = build_palette(v);
            assert!(!p.entries.is_empty());
            assert!(p.entries.iter().all(|e| e.weight > 0.0));
            assert_eq!(p.bg, VOID);
        }
    }
}
