// Copyright (c) 2026 rezky_nightky

use crate::strand::{wobble_x, Flicker, Strand, StrandFactory};
use crate::variant::{SurgeRule, VariantParams};

pub struct Field {
    pub params: VariantParams,
    factory: StrandFactory,
    strands: Vec<Strand>,
    width: f32,
    height: f32,
    surge_left: u32,
}

impl Field {
    pub fn new(params: VariantParams, seed: u64) -> Self {
        let factory = StrandFactory::new(&params, seed);
        Self {
            params,
            factory,
            strands: Vec::new(),
            width: 0.0,
            height: 0.0,
            surge_left: 0,
        }
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    // One strand per pixels_per_strand of width; the population is rebuilt
    // wholesale on every resize and stays fixed in between.
    pub fn reseed(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.factory.resize(width, height);

        let count = (self.width / self.params.pixels_per_strand)
            .floor()
            .max(0.0) as usize;
        self.strands.clear();
        self.strands.reserve(count);
        for _ in 0..count {
            self.strands.push(self.factory.create(false));
        }
        self.surge_left = 0;
    }

    pub fn advance(&mut self, tick: u64) {
        if self.strands.is_empty() {
            return;
        }
        let gf = self.params.growth_factor;
        let ts = self.params.time_scale;
        let rules = self.params.opacity_rules;

        for i in 0..self.strands.len() {
            {
                let s = &mut self.strands[i];
                if s.length < s.max_length {
                    s.length = (s.length + s.speed * gf).min(s.max_length);
                }
                s.y += s.speed;
                s.x = wobble_x(s.base_x, s.y, s.wobble_freq, s.phase, tick, ts, s.wobble_amp);
            }

            let mut o = self.strands[i].opacity;
            if rules.relax > 0.0 {
                o += (rules.rest - o) * rules.relax;
            }
            if rules.jitter > 0.0 {
                o += self.factory.range_f32(-rules.jitter, rules.jitter);
            }
            if rules.decay > 0.0 && o > rules.decay_above {
                o -= rules.decay;
            }
            self.strands[i].opacity = o.clamp(rules.floor, rules.ceiling);

            // Retirement last, so it sees the fully advanced position.
            if self.strands[i].y - self.strands[i].length >= self.height {
                self.strands[i] = self.factory.create(true);
            }
        }

        if self.params.flicker {
            for i in 0..self.strands.len() {
                self.step_flicker(i);
            }
        }

        self.step_surge(tick);
    }

    fn step_flicker(&mut self, i: usize) {
        let floor = self.params.opacity_rules.floor;
        let ceiling = self.params.opacity_rules.ceiling;

        let state = self.strands[i].flicker;
        match state {
            Flicker::Normal { next } => {
                if next <= 1 {
                    if self.factory.chance() < 0.08 {
                        self.strands[i].flicker = Flicker::Broken {
                            left: self.factory.range_u32(60, 259),
                        };
                    } else {
                        self.strands[i].flicker = Flicker::Flickering {
                            left: self.factory.range_u32(3, 14),
                            target: self.factory.range_f32(0.1, 0.4),
                        };
                    }
                } else {
                    self.strands[i].flicker = Flicker::Normal { next: next - 1 };
                }
            }
            Flicker::Flickering { left, target } => {
                if left <= 1 {
                    let o = self.factory.range_f32(0.8, 1.0);
                    self.strands[i].opacity = o.clamp(floor, ceiling);
                    self.strands[i].flicker = Flicker::Normal {
                        next: self.factory.range_u32(30, 179),
                    };
                } else {
                    let o = target + self.factory.range_f32(-0.05, 0.05);
                    self.strands[i].opacity = o.clamp(floor, ceiling);
                    self.strands[i].flicker = Flicker::Flickering {
                        left: left - 1,
                        target,
                    };
                }
            }
            Flicker::Broken { left } => {
                if left <= 1 {
                    self.strands[i].opacity = 0.9_f32.clamp(floor, ceiling);
                    self.strands[i].flicker = Flicker::Normal {
                        next: self.factory.range_u32(30, 179),
                    };
                } else {
                    let o = self.factory.range_f32(0.05, 0.13);
                    self.strands[i].opacity = o.clamp(floor, ceiling);
                    self.strands[i].flicker = Flicker::Broken { left: left - 1 };
                }
            }
        }
    }

    fn step_surge(&mut self, tick: u64) {
        match self.params.surge {
            SurgeRule::None => {}
            SurgeRule::Shimmer { every, boost, cap } => {
                if every > 0 && tick % every == 0 {
                    let last = (self.strands.len() - 1) as u32;
                    let i = self.factory.range_u32(0, last) as usize;
                    let s = &mut self.strands[i];
                    s.opacity = (s.opacity + boost).min(cap);
                }
            }
            SurgeRule::Flash {
                every,
                gate,
                ticks,
                level,
            } => {
                if self.surge_left > 0 {
                    self.surge_left -= 1;
                    let ceiling = self.params.opacity_rules.ceiling;
                    for i in 0..self.strands.len() {
                        let o = self.factory.range_f32(level.low, level.high);
                        self.strands[i].opacity = o.min(ceiling);
                    }
                }
                if every > 0 && tick % every == 0 && self.factory.chance() < gate {
                    self.surge_left = self.factory.range_u32(ticks.low as u32, ticks.high as u32);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Variant;

    fn seeded(variant: Variant, w: f32, h: f32) -> Field {
        let mut field = Field::new(VariantParams::for_variant(variant), 0x5eed);
        field.reseed(w, h);
        field
    }

    fn plain_strand(speed: f32, max_length: f32) -> Strand {
        Strand {
            x: 10.0,
            y: 0.0,
            base_x: 10.0,
            speed,
            length: 0.0,
            max_length,
            opacity: 0.1,
            width: 1.0,
            wobble_amp: 2.0,
            wobble_freq: 0.005,
            phase: 0.0,
            color: 0,
            flicker: Flicker::Normal { next: 0 },
        }
    }

    #[test]
    fn population_tracks_width() {
        let mut field = seeded(Variant::InkDrip, 160.0, 100.0);
        assert_eq!(field.strands().len(), 20);

        for tick in 1..=200 {
            field.advance(tick);
        }
        assert_eq!(field.strands().len(), 20);

        field.reseed(80.0, 100.0);
        assert_eq!(field.strands().len(), 10);
    }

    #[test]
    fn length_and_opacity_bands_hold() {
        for variant in Variant::ALL {
            let mut field = seeded(variant, 120.0, 90.0);
            let rules = field.params.opacity_rules;
            for tick in 1..=300 {
                field.advance(tick);
                for s in field.strands() {
                    assert!(s.length >= 0.0 && s.length <= s.max_length);
                    assert!(
                        s.opacity >= rules.floor - 1e-6 && s.opacity <= rules.ceiling + 1e-6,
                        "{} opacity {} outside [{}, {}]",
                        variant.name(),
                        s.opacity,
                        rules.floor,
                        rules.ceiling
                    );
                }
            }
        }
    }

    #[test]
    fn y_is_monotonic_between_recycles() {
        let mut field = seeded(Variant::InkDrip, 64.0, 48.0);
        let mut prev: Vec<f32> = field.strands().iter().map(|s| s.y).collect();

        for tick in 1..=400 {
            field.advance(tick);
            for (i, s) in field.strands().iter().enumerate() {
                if s.y < prev[i] {
                    // Only a recycle moves a strand back up, and it re-enters
                    // above or inside the surface.
                    assert_eq!(s.length, 0.0);
                    assert!(s.y < 48.0);
                } else {
                    assert!(s.y >= prev[i]);
                }
                prev[i] = s.y;
            }
        }
    }

    #[test]
    fn drip_runs_its_course_and_recycles() {
        let mut params = VariantParams::ink_drip();
        params.growth_factor = 1.0;
        let mut field = Field::new(params, 3);
        field.reseed(100.0, 100.0);
        field.strands[0] = plain_strand(1.0, 50.0);

        for tick in 1..=50 {
            field.advance(tick);
        }
        assert_eq!(field.strands[0].length, 50.0);
        assert_eq!(field.strands[0].y, 50.0);

        for tick in 51..=150 {
            field.advance(tick);
        }
        // Trailing edge reached the bottom boundary by now.
        assert!(field.strands[0].y <= 0.0);
        assert_eq!(field.strands[0].length, 0.0);
    }

    #[test]
    fn flash_surge_brightens_everyone() {
        let mut field = seeded(Variant::NeonFlicker, 120.0, 80.0);
        field.surge_left = 3;
        field.advance(1);
        assert_eq!(field.surge_left, 2);
        for s in field.strands() {
            assert!(s.opacity >= 0.95);
        }
    }

    #[test]
    fn flicker_leaves_normal_state_on_expiry() {
        let mut field = seeded(Variant::NeonFlicker, 120.0, 80.0);
        let mut s = plain_strand(0.1, 60.0);
        s.flicker = Flicker::Normal { next: 1 };
        field.strands[0] = s;
        field.advance(1);
        assert!(matches!(
            field.strands[0].flicker,
            Flicker::Flickering { .. } | Flicker::Broken { .. }
        ));
    }

    #[test]
    fn broken_tube_recovers() {
        let mut field = seeded(Variant::NeonFlicker, 120.0, 80.0);
        let mut s = plain_strand(0.1, 60.0);
        s.flicker = Flicker::Broken { left: 2 };
        field.strands[0] = s;
        field.advance(1);
        assert!(field.strands[0].opacity <= 0.13 + 1e-6);
        field.advance(2);
        assert!(matches!(field.strands[0].flicker, Flicker::Normal { .. }));
        assert!(field.strands[0].opacity >= 0.85);
    }
}
