// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    SeedableRng,
};

use crate::variant::VariantParams;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flicker {
    Normal { next: u32 },
    Flickering { left: u32, target: f32 },
    Broken { left: u32 },
}

#[derive(Clone, Copy, Debug)]
pub struct Strand {
    pub x: f32,
    pub y: f32,
    pub base_x: f32,
    pub speed: f32,
    pub length: f32,
    pub max_length: f32,
    pub opacity: f32,
    pub width: f32,
    pub wobble_amp: f32,
    pub wobble_freq: f32,
    pub phase: f32,
    pub color: usize,
    pub flicker: Flicker,
}

// Pure; the simulation head and every stroke sample go through this so the
// whole trail wobbles coherently.
pub fn wobble_x(
    base_x: f32,
    y: f32,
    freq: f32,
    phase: f32,
    tick: u64,
    time_scale: f32,
    amp: f32,
) -> f32 {
    base_x + (y * freq + phase + tick as f32 * time_scale).sin() * amp
}

pub struct StrandFactory {
    mt: StdRng,
    width: f32,
    height: f32,
    flicker: bool,

    rand_chance: Uniform<f32>,
    rand_x: Uniform<f32>,
    rand_y: Uniform<f32>,
    rand_speed: Uniform<f32>,
    rand_len: Uniform<f32>,
    rand_opacity: Uniform<f32>,
    rand_width: Uniform<f32>,
    rand_amp: Uniform<f32>,
    rand_freq: Uniform<f32>,
    rand_phase: Uniform<f32>,

    color_weights: Vec<f32>,
    color_total: f32,
}

impl StrandFactory {
    pub fn new(params: &VariantParams, seed: u64) -> Self {
        let color_weights: Vec<f32> = params.palette.entries.iter().map(|e| e.weight).collect();
        let color_total: f32 = color_weights.iter().sum();

        Self {
            mt: StdRng::seed_from_u64(seed),
            width: 1.0,
            height: 1.0,
            flicker: params.flicker,
            rand_chance: Uniform::new(0.0, 1.0).expect("valid range"),
            rand_x: Uniform::new(0.0, 1.0).expect("valid range"),
            rand_y: Uniform::new(0.0, 1.0).expect("valid range"),
            rand_speed: Uniform::new_inclusive(params.speed.low, params.speed.high)
                .expect("valid range"),
            rand_len: Uniform::new_inclusive(params.max_length.low, params.max_length.high)
                .expect("valid range"),
            rand_opacity: Uniform::new_inclusive(params.opacity.low, params.opacity.high)
                .expect("valid range"),
            rand_width: Uniform::new_inclusive(params.width.low, params.width.high)
                .expect("valid range"),
            rand_amp: Uniform::new_inclusive(params.wobble_amp.low, params.wobble_amp.high)
                .expect("valid range"),
            rand_freq: Uniform::new_inclusive(params.wobble_freq.low, params.wobble_freq.high)
                .expect("valid range"),
            rand_phase: Uniform::new(0.0, TAU).expect("valid range"),
            color_weights,
            color_total: color_total.max(f32::MIN_POSITIVE),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.rand_x = Uniform::new(0.0, self.width).expect("valid range");
        self.rand_y = Uniform::new(0.0, self.height).expect("valid range");
    }

    pub fn chance(&mut self) -> f32 {
        self.rand_chance.sample(&mut self.mt)
    }

    pub fn range_f32(&mut self, low: f32, high: f32) -> f32 {
        low + self.chance() * (high - low)
    }

    pub fn range_u32(&mut self, low: u32, high: u32) -> u32 {
        let span = (high - low + 1) as f32;
        (low + (self.chance() * span) as u32).min(high)
    }

    fn pick_color(&mut self) -> usize {
        let mut target = self.chance() * self.color_total;
        for (i, w) in self.color_weights.iter().enumerate() {
            if target < *w {
                return i;
            }
            target -= *w;
        }
        self.color_weights.len().saturating_sub(1)
    }

    pub fn create(&mut self, from_top: bool) -> Strand {
        let x = self.rand_x.sample(&mut self.mt);
        let y = if from_top {
            // Staggered re-entry above the surface so recycled strands do not
            // arrive as one visible wave.
            -self.chance() * self.height * 0.3
        } else {
            self.rand_y.sample(&mut self.mt)
        };

        let flicker = if self.flicker {
            Flicker::Normal {
                next: self.range_u32(30, 149),
            }
        } else {
            Flicker::Normal { next: 0 }
        };

        Strand {
            x,
            y,
            base_x: x,
            speed: self.rand_speed.sample(&mut self.mt),
            length: 0.0,
            max_length: self.rand_len.sample(&mut self.mt),
            opacity: self.rand_opacity.sample(&mut self.mt),
            width: self.rand_width.sample(&mut self.mt),
            wobble_amp: self.rand_amp.sample(&mut self.mt),
            wobble_freq: self.rand_freq.sample(&mut self.mt),
            phase: self.rand_phase.sample(&mut self.mt),
            color: self.pick_color(),
            flicker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::VariantParams;

    fn make_factory() -> StrandFactory {
        let params = VariantParams::ink_drip();
        let mut f = StrandFactory::new(&params, 7);
        f.resize(120.0, 80.0);
        f
    }

    #[test]
    fn wobble_is_deterministic() {
        let a = wobble_x(10.0, 33.5, 0.007, 1.3, 42, 0.005, 3.0);
        let b = wobble_x(10.0, 33.5, 0.007, 1.3, 42, 0.005, 3.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn wobble_stays_within_amplitude() {
        for tick in 0..500u64 {
            let x = wobble_x(50.0, tick as f32 * 0.37, 0.006, 0.9, tick, 0.005, 4.0);
            assert!((x - 50.0).abs() <= 4.0 + 1e-4);
        }
    }

    #[test]
    fn created_strands_respect_ranges() {
        let params = VariantParams::ink_drip();
        let mut f = make_factory();
        for _ in 0..200 {
            let s = f.create(false);
            assert!(s.x >= 0.0 && s.x < 120.0);
            assert_eq!(s.x, s.base_x);
            assert!(s.y >= 0.0 && s.y < 80.0);
            assert_eq!(s.length, 0.0);
            assert!(s.speed >= params.speed.low && s.speed <= params.speed.high);
            assert!(s.max_length >= params.max_length.low && s.max_length <= params.max_length.high);
            assert!(s.opacity >= params.opacity.low && s.opacity <= params.opacity.high);
            assert!(s.width >= params.width.low && s.width <= params.width.high);
            assert!(s.color < params.palette.entries.len());
        }
    }

    #[test]
    fn from_top_spawns_above_the_surface() {
        let mut f = make_factory();
        for _ in 0..200 {
            let s = f.create(true);
            assert!(s.y <= 0.0 && s.y > -0.3 * 80.0);
        }
    }

    #[test]
    fn seeded_factories_agree() {
        let params = VariantParams::neon_flicker();
        let mut a = StrandFactory::new(&params, 99);
        let mut b = StrandFactory::new(&params, 99);
        a.resize(60.0, 40.0);
        b.resize(60.0, 40.0);
        for _ in 0..32 {
            let sa = a.create(false);
            let sb = b.create(false);
            assert_eq!(sa.x.to_bits(), sb.x.to_bits());
            assert_eq!(sa.speed.to_bits(), sb.speed.to_bits());
            assert_eq!(sa.color, sb.color);
        }
    }
}
