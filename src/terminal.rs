// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::Frame;

// Upper half block; fg is the top pixel of the cell, bg the bottom.
const HALF_BLOCK: char = '\u{2580}';

pub struct Terminal {
    stdout: Stdout,
    last_size: Option<(u16, u16)>,
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last_size: None,
            run_buf: String::with_capacity(256),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size = (frame.width, frame.height);
        let size_changed = self.last_size != Some(size);
        if size_changed {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last_size = Some(size);
        }

        let total = frame.width as usize * frame.height as usize;
        let dirty_is_large = total > 0 && frame.dirty_indices().len() >= total / 3;

        if size_changed || frame.is_dirty_all() || dirty_is_large {
            self.draw_everything(frame)?;
        } else {
            self.draw_dirty_runs(frame)?;
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    fn draw_everything(&mut self, frame: &Frame) -> Result<()> {
        let mut cur_fg: Option<Color> = None;
        let mut cur_bg: Option<Color> = None;

        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let idx = y as usize * frame.width as usize + x as usize;
                let cell = frame.cell_at_index(idx);

                if Some(cell.fg) != cur_fg {
                    self.stdout.queue(SetForegroundColor(cell.fg))?;
                    cur_fg = Some(cell.fg);
                }
                if Some(cell.bg) != cur_bg {
                    self.stdout.queue(SetBackgroundColor(cell.bg))?;
                    cur_bg = Some(cell.bg);
                }
                self.stdout.queue(Print(HALF_BLOCK))?;
            }
        }
        Ok(())
    }

    // Batches consecutive dirty cells that share colors into one Print.
    fn draw_dirty_runs(&mut self, frame: &mut Frame) -> Result<()> {
        let mut cur_fg: Option<Color> = None;
        let mut cur_bg: Option<Color> = None;
        let mut cur_pos: Option<(u16, u16)> = None;

        let width = frame.width as usize;
        let mut dirty: Vec<usize> = frame.dirty_indices().to_vec();
        dirty.sort_unstable();

        let mut i = 0usize;
        while i < dirty.len() {
            let idx0 = dirty[i];
            let cell0 = frame.cell_at_index(idx0);
            let x0 = (idx0 % width) as u16;
            let y0 = (idx0 / width) as u16;

            self.run_buf.clear();
            self.run_buf.push(HALF_BLOCK);
            let mut run_len: u16 = 1;
            let mut last_idx = idx0;
            let mut j = i + 1;

            while j < dirty.len() {
                let idx1 = dirty[j];
                if idx1 != last_idx + 1 || idx1 / width != idx0 / width {
                    break;
                }
                let cell1 = frame.cell_at_index(idx1);
                if cell1 != cell0 {
                    break;
                }
                self.run_buf.push(HALF_BLOCK);
                run_len = run_len.saturating_add(1);
                last_idx = idx1;
                j += 1;
            }

            if cur_pos != Some((x0, y0)) {
                self.stdout.queue(cursor::MoveTo(x0, y0))?;
            }
            if Some(cell0.fg) != cur_fg {
                self.stdout.queue(SetForegroundColor(cell0.fg))?;
                cur_fg = Some(cell0.fg);
            }
            if Some(cell0.bg) != cur_bg {
                self.stdout.queue(SetBackgroundColor(cell0.bg))?;
                cur_bg = Some(cell0.bg);
            }
            self.stdout.queue(Print(self.run_buf.as_str()))?;

            let next_x = x0.saturating_add(run_len);
            cur_pos = if next_x < frame.width {
                Some((next_x, y0))
            } else {
                None
            };
            i = j;
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
