//! Crossterm terminal surface
//!
//! Draws the game in the alternate screen and turns left clicks into taps.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::style::{self, Attribute, Color};
use crossterm::{cursor, execute, queue, terminal};

use super::Surface;
use super::shapes::CellGrid;
use crate::sim::{Snapshot, TargetKind, TickInput};
use crate::{Settings, Viewport};

const TARGET_GLYPH: char = '█';

/// What the player asked for during one frame
#[derive(Debug, Default)]
pub struct FrameInput {
    pub tick: TickInput,
    pub quit: bool,
}

pub struct TerminalSurface<W: Write = Stdout> {
    out: W,
    grid: CellGrid,
    target_radius: f32,
    /// Whether dropping this surface must leave raw mode
    raw_mode: bool,
}

impl TerminalSurface {
    /// Enter raw mode and the alternate screen on stdout
    pub fn open(settings: &Settings) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;
        Self::attach(io::stdout(), true, CellGrid::from_settings(cols, rows, settings), settings)
    }
}

impl<W: Write> TerminalSurface<W> {
    /// Take over `out`. The value exists before anything is written, so its
    /// `Drop` restores the terminal even when entering the screen fails.
    fn attach(out: W, raw_mode: bool, grid: CellGrid, settings: &Settings) -> io::Result<Self> {
        let mut surface = Self {
            out,
            grid,
            target_radius: settings.target_radius,
            raw_mode,
        };
        execute!(
            surface.out,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        log::debug!("Terminal opened at {}x{} cells", grid.cols, grid.rows);
        Ok(surface)
    }

    /// Restore the terminal
    fn close(&mut self) -> io::Result<()> {
        let screen = execute!(
            self.out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        if self.raw_mode {
            terminal::disable_raw_mode()?;
        }
        screen
    }

    /// Collect input until `budget` has elapsed
    pub fn poll(&mut self, budget: Duration) -> io::Result<FrameInput> {
        let deadline = Instant::now() + budget;
        let mut input = FrameInput::default();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        input.quit = true;
                        break;
                    }
                    KeyCode::Char('r') | KeyCode::Enter => input.tick.restart = true,
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                        let point = self.grid.cell_center(mouse.column, mouse.row);
                        input.tick.taps.push(point);
                    }
                }
                Event::Resize(cols, rows) => {
                    self.grid.cols = cols;
                    self.grid.rows = rows;
                    input.tick.resize = Some(self.grid.viewport());
                }
                _ => {}
            }
        }

        Ok(input)
    }

    fn draw_centered(&mut self, row: u16, text: &str, color: Color) -> io::Result<()> {
        let width = text.chars().count() as u16;
        let col = self.grid.cols.saturating_sub(width) / 2;
        queue!(
            self.out,
            cursor::MoveTo(col, row),
            style::SetForegroundColor(color),
            style::Print(text),
        )
    }

    fn draw_target(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let cells = self.grid.disc(snapshot.target_pos, self.target_radius);
        let (top, bottom) = match (cells.first(), cells.last()) {
            (Some(first), Some(last)) => (first.1, last.1),
            _ => return Ok(()),
        };
        let span = (bottom - top).max(1) as f32;

        for (col, row) in cells {
            let color = match snapshot.target_kind {
                TargetKind::Bomb => Color::DarkGrey,
                TargetKind::Fruit => fruit_shade((row - top) as f32 / span),
            };
            queue!(
                self.out,
                cursor::MoveTo(col, row),
                style::SetForegroundColor(color),
                style::Print(TARGET_GLYPH),
            )?;
        }
        Ok(())
    }
}

/// Red at the top through orange to yellow at the bottom
fn fruit_shade(t: f32) -> Color {
    if t < 0.34 {
        Color::Red
    } else if t < 0.67 {
        Color::DarkYellow
    } else {
        Color::Yellow
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn viewport(&self) -> Viewport {
        self.grid.viewport()
    }

    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        queue!(
            self.out,
            style::ResetColor,
            terminal::Clear(terminal::ClearType::All)
        )?;

        let middle = self.grid.rows / 2;
        if snapshot.game_over {
            queue!(self.out, style::SetAttribute(Attribute::Bold))?;
            self.draw_centered(middle.saturating_sub(2), "Game Over", Color::White)?;
            queue!(self.out, style::SetAttribute(Attribute::Reset))?;
            let line = format!("Final Score: {}", snapshot.score);
            self.draw_centered(middle, &line, Color::White)?;
            self.draw_centered(middle + 2, "[r] Restart   [q] Quit", Color::Cyan)?;
        } else {
            let line = format!("Score: {}", snapshot.score);
            self.draw_centered(1, &line, Color::White)?;
            if snapshot.target_visible {
                self.draw_target(snapshot)?;
            }
            let hint = "click the fruit, avoid the bomb   [q] quit";
            self.draw_centered(self.grid.rows.saturating_sub(1), hint, Color::DarkGrey)?;
        }

        queue!(self.out, style::ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalSurface<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to restore terminal: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Fails the first write, records everything after it
    struct FlakyTerminal {
        failed: bool,
        written: Rc<RefCell<Vec<u8>>>,
    }

    impl Write for FlakyTerminal {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"));
            }
            self.written.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_attach_still_restores_screen() {
        let written = Rc::new(RefCell::new(Vec::new()));
        let out = FlakyTerminal {
            failed: false,
            written: written.clone(),
        };
        let settings = Settings::default();
        let grid = CellGrid::from_settings(40, 40, &settings);

        let result = TerminalSurface::attach(out, false, grid, &settings);
        assert!(result.is_err());

        let written = String::from_utf8_lossy(&written.borrow()).into_owned();
        assert!(written.contains("\x1b[?1049l"), "no leave sequence in {:?}", written);
        assert!(written.contains("\x1b[?25h"), "cursor not shown in {:?}", written);
    }

    #[test]
    fn test_fruit_shade_gradient() {
        assert_eq!(fruit_shade(0.0), Color::Red);
        assert_eq!(fruit_shade(0.5), Color::DarkYellow);
        assert_eq!(fruit_shade(1.0), Color::Yellow);
    }
}
