// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::frame::Frame;
use crate::palette::{to_term_color, Rgb};
use crate::runtime::ColorMode;
use crate::surface::Surface;

// Owns the drawing surface lifecycle: one logical pixel per terminal column,
// two per row (half blocks), with an optional 2x backing buffer. The scale
// cap bounds fill cost the same way a device-pixel-ratio clamp would.
pub struct Screen {
    cols: u16,
    rows: u16,
    scale: u32,
    surface: Surface,
}

impl Screen {
    pub fn new(cols: u16, rows: u16, scale: u32) -> Self {
        let scale = scale.clamp(1, 2);
        Self {
            cols,
            rows,
            scale,
            surface: Surface::new(cols as u32 * scale, rows as u32 * 2 * scale),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale as f32
    }

    pub fn is_zero(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    pub fn logical_size(&self) -> (f32, f32) {
        (self.cols as f32, self.rows as f32 * 2.0)
    }

    #[allow(dead_code)]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    // Reallocates the backing buffer; the caller re-seeds its strands when
    // this reports a change.
    pub fn resize(&mut self, cols: u16, rows: u16) -> bool {
        if cols == self.cols && rows == self.rows {
            return false;
        }
        self.cols = cols;
        self.rows = rows;
        self.surface = Surface::new(cols as u32 * self.scale, rows as u32 * 2 * self.scale);
        true
    }

    fn block_average(&self, px: u32, py: u32) -> Rgb {
        if self.scale == 1 {
            return self.surface.pixel(px, py);
        }
        let mut r = 0u32;
        let mut g = 0u32;
        let mut b = 0u32;
        for dy in 0..self.scale {
            for dx in 0..self.scale {
                let c = self.surface.pixel(px + dx, py + dy);
                r += c.r as u32;
                g += c.g as u32;
                b += c.b as u32;
            }
        }
        let n = self.scale * self.scale;
        Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
    }

    pub fn present(&self, frame: &mut Frame, mode: ColorMode) {
        for cy in 0..self.rows.min(frame.height) {
            for cx in 0..self.cols.min(frame.width) {
                let top = self.block_average(cx as u32 * self.scale, cy as u32 * 2 * self.scale);
                let bottom = self.block_average(
                    cx as u32 * self.scale,
                    (cy as u32 * 2 + 1) * self.scale,
                );
                frame.set(
                    cx,
                    cy,
                    Cell {
                        fg: to_term_color(top, mode),
                        bg: to_term_color(bottom, mode),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color;

    #[test]
    fn scale_is_capped_at_two() {
        let s = Screen::new(10, 10, 5);
        assert_eq!(s.scale(), 2.0);
        assert_eq!(s.surface().width(), 20);
        assert_eq!(s.surface().height(), 40);
    }

    #[test]
    fn zero_sized_terminal_is_tolerated() {
        let mut s = Screen::new(0, 0, 1);
        assert!(s.is_zero());
        assert!(s.resize(40, 12));
        assert!(!s.is_zero());
        assert_eq!(s.logical_size(), (40.0, 24.0));
    }

    #[test]
    fn resize_reports_change_only_when_size_differs() {
        let mut s = Screen::new(20, 10, 1);
        assert!(!s.resize(20, 10));
        assert!(s.resize(21, 10));
    }

    #[test]
    fn present_splits_cells_into_half_blocks() {
        let mut s = Screen::new(2, 1, 1);
        s.surface_mut().clear(Rgb::new(0, 0, 0));
        s.surface_mut()
            .blend_pixel(0, 0, Rgb::new(255, 0, 0), 1.0, crate::runtime::BlendMode::Alpha);
        s.surface_mut()
            .blend_pixel(0, 1, Rgb::new(0, 0, 255), 1.0, crate::runtime::BlendMode::Alpha);

        let mut frame = Frame::new(2, 1);
        s.present(&mut frame, ColorMode::TrueColor);

        let cell = frame.cell_at_index(0);
        assert_eq!(cell.fg, Color::Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(cell.bg, Color::Rgb { r: 0, g: 0, b: 255 });
    }

    #[test]
    fn downsampling_averages_the_backing_block() {
        let mut s = Screen::new(1, 1, 2);
        s.surface_mut().clear(Rgb::new(100, 100, 100));
        let mut frame = Frame::new(1, 1);
        s.present(&mut frame, ColorMode::TrueColor);
        let cell = frame.cell_at_index(0);
        assert_eq!(
            cell.fg,
            Color::Rgb {
                r: 100,
                g: 100,
                b: 100
            }
        );
    }
}
