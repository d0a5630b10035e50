// Terminal screen - crossterm-backed surface and input pump
use crate::application::session_service::SessionEvent;
use crate::domain::zone::Rgb;
use crate::presentation::board_view::ViewState;
use crate::presentation::surface::{RenderSurface, TextAlign};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Color;
use crossterm::{cursor, execute, queue, style, terminal};
use futures::StreamExt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Rows under the canvas kept for user/status/summary/notice lines.
const FOOTER_ROWS: u16 = 10;
const FALLBACK_SIZE: (u16, u16) = (100, 30);

#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    color: Option<Rgb>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            color: None,
        }
    }
}

/// Character-cell canvas. The virtual coordinate space is projected onto the
/// current terminal size, re-measured at the start of every frame.
pub struct TermScreen {
    virtual_size: (f32, f32),
    notice_ttl: Duration,
    state: Arc<Mutex<ViewState>>,
    cols: u16,
    canvas_rows: u16,
    grid: Vec<Cell>,
}

impl TermScreen {
    pub fn new(
        virtual_size: (f32, f32),
        notice_ttl: Duration,
        state: Arc<Mutex<ViewState>>,
    ) -> Self {
        Self {
            virtual_size,
            notice_ttl,
            state,
            cols: 0,
            canvas_rows: 0,
            grid: Vec::new(),
        }
    }

    fn project(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if self.cols == 0 || self.canvas_rows == 0 {
            return None;
        }
        let col = (x / self.virtual_size.0 * self.cols as f32).round();
        let row = (y / self.virtual_size.1 * self.canvas_rows as f32).round();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.canvas_rows as f32 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    fn plot(&mut self, x: f32, y: f32, ch: char, color: Option<Rgb>) {
        if let Some((col, row)) = self.project(x, y) {
            self.grid[row as usize * self.cols as usize + col as usize] = Cell { ch, color };
        }
    }

    fn plot_text(&mut self, x: f32, y: f32, text: &str, color: Option<Rgb>, align: TextAlign) {
        let Some((col, row)) = self.project(x, y) else {
            return;
        };
        let chars: Vec<char> = text.chars().collect();
        let start = match align {
            TextAlign::Left => col as i32,
            TextAlign::Center => col as i32 - chars.len() as i32 / 2,
        };
        for (i, ch) in chars.into_iter().enumerate() {
            let at = start + i as i32;
            if at < 0 || at >= self.cols as i32 {
                continue;
            }
            self.grid[row as usize * self.cols as usize + at as usize] = Cell { ch, color };
        }
    }

    fn flush_frame(&mut self) -> io::Result<()> {
        let mut out = io::stdout();
        queue!(out, cursor::MoveTo(0, 0))?;

        for row in 0..self.canvas_rows {
            queue!(out, cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let cell = self.grid[row as usize * self.cols as usize + col as usize];
                match cell.color {
                    Some(Rgb(r, g, b)) => {
                        queue!(out, style::SetForegroundColor(Color::Rgb { r, g, b }))?
                    }
                    None => queue!(out, style::SetForegroundColor(Color::Reset))?,
                }
                queue!(out, style::Print(cell.ch))?;
            }
        }

        queue!(out, style::SetForegroundColor(Color::Reset))?;
        let mut row = self.canvas_rows;
        let footer_line =
            |out: &mut io::Stdout, row: u16, line: &str, color: Option<Rgb>| -> io::Result<()> {
                queue!(
                    out,
                    cursor::MoveTo(0, row),
                    terminal::Clear(terminal::ClearType::CurrentLine)
                )?;
                match color {
                    Some(Rgb(r, g, b)) => {
                        queue!(out, style::SetForegroundColor(Color::Rgb { r, g, b }))?
                    }
                    None => queue!(out, style::SetForegroundColor(Color::Reset))?,
                }
                queue!(out, style::Print(line))
            };

        footer_line(&mut out, row, &"─".repeat(self.cols as usize), None)?;
        row += 1;

        let lines = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(_) => return Ok(()),
            };
            state.prune_notices(self.notice_ttl);

            let mut lines: Vec<(String, Option<Rgb>)> = Vec::new();
            if let Some(user) = &state.user_line {
                lines.push((user.clone(), None));
            }
            if let Some(status) = &state.status_line {
                lines.push((status.clone(), None));
            }
            lines.extend(state.summary_lines.iter().map(|l| (l.clone(), None)));
            // Standing alerts above the comings-and-goings chatter.
            lines.extend(
                state
                    .alert_lines
                    .iter()
                    .map(|(l, color)| (l.clone(), Some(*color))),
            );
            lines.extend(state.notices.iter().map(|n| (n.message.clone(), None)));
            lines
        };

        for (line, color) in lines.iter().take(FOOTER_ROWS as usize - 1) {
            footer_line(&mut out, row, line, *color)?;
            row += 1;
        }
        for blank in row..self.canvas_rows + FOOTER_ROWS {
            footer_line(&mut out, blank, "", None)?;
        }

        out.flush()
    }
}

impl RenderSurface for TermScreen {
    fn size(&self) -> (f32, f32) {
        self.virtual_size
    }

    fn clear(&mut self) {
        let (cols, rows) = terminal::size().unwrap_or(FALLBACK_SIZE);
        self.cols = cols;
        self.canvas_rows = rows.saturating_sub(FOOTER_ROWS).max(1);
        self.grid = vec![Cell::default(); self.cols as usize * self.canvas_rows as usize];
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb) {
        let dx = x2 - x1;
        let dy = y2 - y1;
        let steps = (dx.abs().max(dy.abs()) / 4.0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.plot(x1 + dx * t, y1 + dy * t, '•', Some(color));
        }
    }

    fn circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, filled: bool) {
        let ch = if filled { '●' } else { '○' };
        let steps = 24;
        for i in 0..steps {
            let a = i as f32 / steps as f32 * std::f32::consts::TAU;
            self.plot(x + radius * a.cos(), y + radius * a.sin(), ch, Some(color));
        }
        if filled {
            self.plot(x, y, ch, Some(color));
        }
    }

    fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, color: Rgb) {
        let steps = 16;
        for i in 0..steps {
            let a = i as f32 / steps as f32 * std::f32::consts::TAU;
            self.plot(x + rx * a.cos(), y + ry * a.sin(), '░', Some(color));
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Option<Rgb>, align: TextAlign) {
        self.plot_text(x, y, text, color, align);
    }

    fn avatar(&mut self, x: f32, y: f32, glyph: &str) -> bool {
        let Some(ch) = glyph.chars().next() else {
            return false;
        };
        self.plot(x, y, ch, None);
        true
    }

    fn present(&mut self) {
        if let Err(e) = self.flush_frame() {
            // A broken terminal degrades the view, not the loop.
            tracing::warn!("failed to present frame: {e}");
        }
    }
}

/// Raw-mode / alternate-screen guard. Restores the terminal on drop.
pub struct TermGuard;

impl TermGuard {
    pub fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            crossterm::event::EnableFocusChange,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        Ok(Self)
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            crossterm::event::DisableFocusChange,
            terminal::LeaveAlternateScreen,
            cursor::Show
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Forward terminal input to the session: focus regain triggers the one-shot
/// snapshot refresh, `q` or ctrl-c ends the session.
pub async fn pump_input(events_tx: mpsc::Sender<SessionEvent>) {
    let mut input = EventStream::new();

    while let Some(event) = input.next().await {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("terminal input error: {e}");
                return;
            }
        };

        match event {
            Event::FocusGained => {
                if events_tx.send(SessionEvent::FocusRegained).await.is_err() {
                    return;
                }
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let quit = key.code == KeyCode::Char('q')
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL));
                if quit {
                    let _ = events_tx.send(SessionEvent::Shutdown).await;
                    return;
                }
            }
            _ => {}
        }
    }
}
