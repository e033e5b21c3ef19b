// Copyright (c) 2026 rezky_nightky

use crate::field::Field;
use crate::frame::Frame;
use crate::render::render;
use crate::runtime::ColorMode;
use crate::screen::Screen;
use crate::variant::VariantParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Created,
    Running,
    Stopped,
}

// One animation instance: tick counter, simulation, renderer, presentation.
// Stopped is terminal; restarting means constructing a fresh driver, which
// resets the tick counter and re-seeds the strands.
pub struct Driver {
    state: DriverState,
    tick: u64,
    frames_rendered: u64,
    field: Field,
    screen: Screen,
    frame: Frame,
    color_mode: ColorMode,
}

impl Driver {
    pub fn new(
        params: VariantParams,
        cols: u16,
        rows: u16,
        scale: u32,
        seed: u64,
        color_mode: ColorMode,
    ) -> Self {
        let bg = params.palette.bg;
        let screen = Screen::new(cols, rows, scale);
        let mut field = Field::new(params, seed);
        if !screen.is_zero() {
            let (w, h) = screen.logical_size();
            field.reseed(w, h);
        }
        let mut driver = Self {
            state: DriverState::Created,
            tick: 0,
            frames_rendered: 0,
            field,
            screen,
            frame: Frame::new(cols, rows),
            color_mode,
        };
        driver.screen.surface_mut().clear(bg);
        driver
    }

    #[allow(dead_code)]
    pub fn state(&self) -> DriverState {
        self.state
    }

    #[allow(dead_code)]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[allow(dead_code)]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    // Idempotent; no frame renders after this returns.
    pub fn stop(&mut self) {
        self.state = DriverState::Stopped;
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if self.state == DriverState::Stopped {
            return;
        }
        if !self.screen.resize(cols, rows) {
            return;
        }
        let bg = self.field.params.palette.bg;
        if !self.screen.is_zero() {
            let (w, h) = self.screen.logical_size();
            self.field.reseed(w, h);
        }
        self.screen.surface_mut().clear(bg);
        self.frame = Frame::new(cols, rows);
    }

    // One tick: simulate, render, present. Returns None without doing any
    // work when stopped, and skips ticks while the surface has no area.
    pub fn frame(&mut self) -> Option<&mut Frame> {
        if self.state == DriverState::Stopped {
            return None;
        }
        if self.screen.is_zero() {
            return None;
        }
        self.state = DriverState::Running;

        self.tick += 1;
        self.field.advance(self.tick);
        let scale = self.screen.scale();
        render(self.screen.surface_mut(), &self.field, self.tick, scale);
        self.screen.present(&mut self.frame, self.color_mode);
        self.frames_rendered += 1;
        Some(&mut self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Variant;

    fn make_driver(cols: u16, rows: u16) -> Driver {
        Driver::new(
            VariantParams::for_variant(Variant::InkDrip),
            cols,
            rows,
            1,
            42,
            ColorMode::TrueColor,
        )
    }

    #[test]
    fn lifecycle_runs_then_stops_for_good() {
        let mut d = make_driver(40, 20);
        assert_eq!(d.state(), DriverState::Created);

        assert!(d.frame().is_some());
        assert_eq!(d.state(), DriverState::Running);
        assert!(d.frame().is_some());
        assert_eq!(d.frames_rendered(), 2);

        d.stop();
        assert_eq!(d.state(), DriverState::Stopped);
        d.stop();
        assert_eq!(d.state(), DriverState::Stopped);
    }

    #[test]
    fn no_renders_after_stop() {
        let mut d = make_driver(40, 20);
        for _ in 0..3 {
            d.frame();
        }
        let rendered = d.frames_rendered();
        let ticks = d.tick();
        assert_eq!(rendered, 3);

        d.stop();
        for _ in 0..5 {
            assert!(d.frame().is_none());
        }
        assert_eq!(d.frames_rendered(), rendered);
        assert_eq!(d.tick(), ticks);
    }

    #[test]
    fn zero_sized_surface_skips_ticks() {
        let mut d = make_driver(0, 0);
        assert!(d.frame().is_none());
        assert_eq!(d.tick(), 0);
        assert_eq!(d.frames_rendered(), 0);

        d.resize(30, 12);
        assert!(d.frame().is_some());
        assert_eq!(d.tick(), 1);
    }

    #[test]
    fn resize_reseeds_and_resets_the_frame() {
        let mut d = make_driver(40, 20);
        d.frame();
        d.resize(80, 20);
        assert_eq!(d.frame.width, 80);
        let expected = (80.0 / d.field.params.pixels_per_strand) as usize;
        assert_eq!(d.field.strands().len(), expected);
    }

    #[test]
    fn fresh_driver_starts_from_tick_zero() {
        let mut d = make_driver(40, 20);
        for _ in 0..10 {
            d.frame();
        }
        d.stop();

        let d2 = make_driver(40, 20);
        assert_eq!(d2.tick(), 0);
        assert_eq!(d2.state(), DriverState::Created);
    }
}
