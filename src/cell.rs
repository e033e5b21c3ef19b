// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

// One half-block cell: fg paints the upper pixel, bg the lower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub fn filled(color: Color) -> Self {
        Self {
            fg: color,
            bg: color,
        }
    }
}
