// Copyright (c) 2026 rezky_nightky

use crate::palette::{build_palette, Palette};
use crate::runtime::{BlendMode, Variant};

#[derive(Clone, Copy, Debug)]
pub struct Range {
    pub low: f32,
    pub high: f32,
}

impl Range {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }
}

// Per-tick opacity dynamics; the floor/ceiling band is enforced every tick.
#[derive(Clone, Copy, Debug)]
pub struct OpacityRules {
    pub floor: f32,
    pub ceiling: f32,
    pub rest: f32,
    pub relax: f32,
    pub jitter: f32,
    pub decay_above: f32,
    pub decay: f32,
}

#[derive(Clone, Copy, Debug)]
pub enum SurgeRule {
    None,
    // One random strand briefly brightens.
    Shimmer { every: u64, boost: f32, cap: f32 },
    // The whole population is forced near the ceiling for a few ticks.
    Flash {
        every: u64,
        gate: f32,
        ticks: Range,
        level: Range,
    },
}

// Extra stroke passes for glow-style variants; empty means a single pass
// at the strand's own width.
#[derive(Clone, Copy, Debug)]
pub struct StrokePass {
    pub width: f32,
    pub alpha: f32,
}

#[derive(Clone, Debug)]
pub struct VariantParams {
    pub pixels_per_strand: f32,
    pub speed: Range,
    pub max_length: Range,
    pub opacity: Range,
    pub width: Range,
    pub wobble_amp: Range,
    pub wobble_freq: Range,
    pub growth_factor: f32,
    pub time_scale: f32,
    pub segments: u32,
    pub fade: f32,
    pub blend: BlendMode,
    pub stop_alphas: [f32; 4],
    pub passes: Vec<StrokePass>,
    pub opacity_rules: OpacityRules,
    pub surge: SurgeRule,
    pub flicker: bool,
    pub palette: Palette,
}

impl VariantParams {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::InkDrip => Self::ink_drip(),
            Variant::WoodGrain => Self::wood_grain(),
            Variant::NeonFlicker => Self::neon_flicker(),
        }
    }

    // Full-screen hero look: long drips, ghostly trail fade, occasional shimmer.
    pub fn ink_drip() -> Self {
        Self {
            pixels_per_strand: 8.0,
            speed: Range::new(0.15, 0.55),
            max_length: Range::new(40.0, 200.0),
            opacity: Range::new(0.03, 0.21),
            width: Range::new(0.5, 2.0),
            wobble_amp: Range::new(1.0, 5.0),
            wobble_freq: Range::new(0.003, 0.011),
            growth_factor: 0.8,
            time_scale: 0.005,
            segments: 6,
            fade: 0.06,
            blend: BlendMode::Alpha,
            stop_alphas: [0.0, 0.6, 1.0, 0.3],
            passes: Vec::new(),
            opacity_rules: OpacityRules {
                floor: 0.0,
                ceiling: 0.35,
                rest: 0.0,
                relax: 0.0,
                jitter: 0.002,
                decay_above: 0.2,
                decay: 0.001,
            },
            surge: SurgeRule::Shimmer {
                every: 120,
                boost: 0.1,
                cap: 0.35,
            },
            flicker: false,
            palette: build_palette(Variant::InkDrip),
        }
    }

    // Contained-section accent: sparser, slower, hard clear each frame.
    pub fn wood_grain() -> Self {
        Self {
            pixels_per_strand: 18.0,
            speed: Range::new(0.06, 0.21),
            max_length: Range::new(20.0, 100.0),
            opacity: Range::new(0.02, 0.09),
            width: Range::new(0.3, 1.1),
            wobble_amp: Range::new(1.0, 4.0),
            wobble_freq: Range::new(0.002, 0.008),
            growth_factor: 0.4,
            time_scale: 0.003,
            segments: 5,
            fade: 1.0,
            blend: BlendMode::Alpha,
            stop_alphas: [0.0, 0.5, 1.0, 0.2],
            passes: Vec::new(),
            opacity_rules: OpacityRules {
                floor: 0.0,
                ceiling: 0.12,
                rest: 0.0,
                relax: 0.0,
                jitter: 0.0,
                decay_above: 1.0,
                decay: 0.0,
            },
            surge: SurgeRule::None,
            flicker: false,
            palette: build_palette(Variant::WoodGrain),
        }
    }

    // Additive tube glow with flicker, broken-tube dropouts and surges.
    pub fn neon_flicker() -> Self {
        Self {
            pixels_per_strand: 24.0,
            speed: Range::new(0.10, 0.30),
            max_length: Range::new(30.0, 120.0),
            opacity: Range::new(0.7, 1.0),
            width: Range::new(2.5, 2.5),
            wobble_amp: Range::new(1.0, 3.0),
            wobble_freq: Range::new(0.003, 0.008),
            growth_factor: 0.6,
            time_scale: 0.004,
            segments: 6,
            fade: 1.0,
            blend: BlendMode::Additive,
            stop_alphas: [0.0, 0.6, 1.0, 0.3],
            passes: vec![
                StrokePass {
                    width: 16.0,
                    alpha: 0.08,
                },
                StrokePass {
                    width: 8.0,
                    alpha: 0.2,
                },
                StrokePass {
                    width: 2.5,
                    alpha: 0.9,
                },
            ],
            opacity_rules: OpacityRules {
                floor: 0.05,
                ceiling: 1.0,
                rest: 0.85,
                relax: 0.05,
                jitter: 0.01,
                decay_above: 1.0,
                decay: 0.0,
            },
            surge: SurgeRule::Flash {
                every: 180,
                gate: 0.6,
                ticks: Range::new(4.0, 10.0),
                level: Range::new(0.95, 1.0),
            },
            flicker: true,
            palette: build_palette(Variant::NeonFlicker),
        }
    }

    // CLI multipliers; density scales the population, speed the drift.
    pub fn apply_overrides(&mut self, density: f32, speed: f32, fade: Option<f32>) {
        if density > 0.0 {
            self.pixels_per_strand /= density;
        }
        if speed > 0.0 {
            self.speed.low *= speed;
            self.speed.high *= speed;
        }
        if let Some(f) = fade {
            self.fade = f.clamp(0.01, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_sane() {
        for v in Variant::ALL {
            let p = VariantParams::for_variant(v);
            assert!(p.pixels_per_strand > 0.0);
            assert!(p.speed.low > 0.0 && p.speed.low <= p.speed.high);
            assert!(p.max_length.low > 0.0 && p.max_length.low <= p.max_length.high);
            assert!(p.opacity.low >= p.opacity_rules.floor);
            assert!(p.opacity.high <= p.opacity_rules.ceiling);
            assert!(p.fade > 0.0 && p.fade <= 1.0);
            assert!(p.segments >= 2);
            assert!(!p.palette.entries.is_empty());
        }
    }

    #[test]
    fn overrides_scale_density_and_speed() {
        let mut p = VariantParams::ink_drip();
        let base_pps = p.pixels_per_strand;
        let base_speed = p.speed.high;
        p.apply_overrides(2.0, 0.5, Some(0.2));
        assert_eq!(p.pixels_per_strand, base_pps / 2.0);
        assert_eq!(p.speed.high, base_speed * 0.5);
        assert_eq!(p.fade, 0.2);
    }
}
