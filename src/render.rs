// Copyright (c) 2026 rezky_nightky

use crate::field::Field;
use crate::palette::Rgb;
use crate::strand::{wobble_x, Strand};
use crate::surface::Surface;
use crate::variant::VariantParams;

// Trail gradient: transparent tail, body building to a peak near 70% of the
// length, tapered head. Stop fractions are part of the look.
const STOP_POS: [f32; 4] = [0.0, 0.3, 0.7, 1.0];

fn stop_colors(params: &VariantParams, s: &Strand) -> [Rgb; 4] {
    let ramp = params.palette.entries[s.color].ramp;
    [ramp[0], ramp[0], ramp[1], ramp[2]]
}

fn eval_gradient(colors: &[Rgb; 4], alphas: &[f32; 4], t: f32) -> (Rgb, f32) {
    let t = t.clamp(0.0, 1.0);
    let mut seg = STOP_POS.len() - 2;
    for i in 0..STOP_POS.len() - 1 {
        if t <= STOP_POS[i + 1] {
            seg = i;
            break;
        }
    }
    let span = STOP_POS[seg + 1] - STOP_POS[seg];
    let lt = if span <= f32::EPSILON {
        0.0
    } else {
        (t - STOP_POS[seg]) / span
    };
    (
        colors[seg].lerp(colors[seg + 1], lt),
        alphas[seg] + (alphas[seg + 1] - alphas[seg]) * lt,
    )
}

pub fn render(surface: &mut Surface, field: &Field, tick: u64, scale: f32) {
    let params = &field.params;

    if params.fade >= 1.0 {
        surface.clear(params.palette.bg);
    } else {
        surface.fade(params.palette.bg, params.fade);
    }

    let segments = params.segments.max(1);
    for s in field.strands() {
        if s.length <= f32::EPSILON {
            continue;
        }

        let colors = stop_colors(params, s);
        let alphas = [
            params.stop_alphas[0] * s.opacity,
            params.stop_alphas[1] * s.opacity,
            params.stop_alphas[2] * s.opacity,
            params.stop_alphas[3] * s.opacity,
        ];

        // The path is sampled from the same wobble the head follows, so the
        // stroke bends along its whole length; the last point is the head
        // itself.
        let tail_y = s.y - s.length;
        let mut points = Vec::with_capacity(segments as usize + 1);
        for k in 0..segments {
            let sy = tail_y + s.length * (k as f32 / segments as f32);
            let sx = wobble_x(
                s.base_x,
                sy,
                s.wobble_freq,
                s.phase,
                tick,
                params.time_scale,
                s.wobble_amp,
            );
            points.push((sx, sy));
        }
        points.push((s.x, s.y));

        for k in 0..segments as usize {
            let (ax, ay) = points[k];
            let (bx, by) = points[k + 1];
            let f0 = k as f32 / segments as f32;
            let f1 = (k + 1) as f32 / segments as f32;
            let (c0, a0) = eval_gradient(&colors, &alphas, f0);
            let (c1, a1) = eval_gradient(&colors, &alphas, f1);

            if params.passes.is_empty() {
                surface.stroke_segment(
                    ax * scale,
                    ay * scale,
                    bx * scale,
                    by * scale,
                    s.width * 0.5 * scale,
                    c0,
                    a0,
                    c1,
                    a1,
                    params.blend,
                );
            } else {
                for pass in &params.passes {
                    surface.stroke_segment(
                        ax * scale,
                        ay * scale,
                        bx * scale,
                        by * scale,
                        pass.width * 0.5 * scale,
                        c0,
                        a0 * pass.alpha,
                        c1,
                        a1 * pass.alpha,
                        params.blend,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::palette::VOID;
    use crate::variant::VariantParams;

    #[test]
    fn gradient_matches_its_stops() {
        let colors = [
            Rgb::new(10, 10, 10),
            Rgb::new(10, 10, 10),
            Rgb::new(200, 200, 200),
            Rgb::new(90, 90, 90),
        ];
        let alphas = [0.0, 0.6, 1.0, 0.3];

        let (_, a) = eval_gradient(&colors, &alphas, 0.0);
        assert_eq!(a, 0.0);
        let (c, a) = eval_gradient(&colors, &alphas, 0.7);
        assert_eq!(a, 1.0);
        assert_eq!(c, Rgb::new(200, 200, 200));
        let (c, a) = eval_gradient(&colors, &alphas, 1.0);
        assert_eq!(a, 0.3);
        assert_eq!(c, Rgb::new(90, 90, 90));
    }

    #[test]
    fn gradient_peaks_near_the_head() {
        let colors = [Rgb::new(255, 255, 255); 4];
        let alphas = [0.0, 0.6, 1.0, 0.3];
        let (_, mid) = eval_gradient(&colors, &alphas, 0.5);
        let (_, peak) = eval_gradient(&colors, &alphas, 0.7);
        let (_, head) = eval_gradient(&colors, &alphas, 1.0);
        assert!(mid < peak);
        assert!(head < peak);
    }

    #[test]
    fn render_leaves_marks_on_the_surface() {
        let mut params = VariantParams::ink_drip();
        params.opacity.low = params.opacity_rules.ceiling;
        params.opacity.high = params.opacity_rules.ceiling;
        let mut field = Field::new(params, 12);
        field.reseed(64.0, 64.0);
        for tick in 1..=30 {
            field.advance(tick);
        }

        let mut surface = Surface::new(64, 64);
        surface.clear(VOID);
        render(&mut surface, &field, 30, 1.0);

        let mut touched = 0usize;
        for y in 0..64 {
            for x in 0..64 {
                if surface.pixel(x, y) != VOID {
                    touched += 1;
                }
            }
        }
        assert!(touched > 0);
    }

    #[test]
    fn empty_field_only_fades() {
        let params = VariantParams::wood_grain();
        let field = Field::new(params, 1);
        let mut surface = Surface::new(8, 8);
        surface.clear(Rgb::new(255, 0, 0));
        render(&mut surface, &field, 1, 1.0);
        // Hard-clear variant: the wash repaints the background.
        assert_eq!(surface.pixel(4, 4), VOID);
    }
}
