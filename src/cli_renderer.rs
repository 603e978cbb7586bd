use crate::config::{Color, BLACK, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entity::Rect;
use crate::game::Game;
use crate::renderer::{Input, Renderer, Surface};
use crate::scene;
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseButton, MouseEvent, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Surface pixels covered by one terminal cell
pub const CELL_WIDTH: f64 = 10.0;
pub const CELL_HEIGHT: f64 = 20.0;
pub const GRID_COLS: usize = (SCREEN_WIDTH / CELL_WIDTH) as usize;
pub const GRID_ROWS: usize = (SCREEN_HEIGHT / CELL_HEIGHT) as usize;

// Without release events a key counts as held until it stops repeating.
// The first repeat arrives after the terminal's repeat delay.
const FIRST_REPEAT_TIMEOUT: Duration = Duration::from_millis(550);
const REPEAT_TIMEOUT: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl GridCell {
    fn blank(bg: Color) -> Self {
        Self { ch: ' ', fg: bg, bg }
    }
}

/// The 800x600 scene rasterised onto terminal cells
#[derive(Debug, Clone)]
pub struct TextGrid {
    cells: Vec<Vec<GridCell>>,
}

impl Default for TextGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TextGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![vec![GridCell::blank(BLACK); GRID_COLS]; GRID_ROWS],
        }
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&GridCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Row contents as a string, for inspection
    pub fn row_text(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|r| r.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut GridCell> {
        if col < 0 || row < 0 {
            return None;
        }
        self.cells
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
    }

    fn col_of(x: f64) -> i64 {
        (x / CELL_WIDTH).floor() as i64
    }

    fn row_of(y: f64) -> i64 {
        (y / CELL_HEIGHT).floor() as i64
    }

    /// Columns and rows spanned by `rect`, inclusive
    fn span(rect: &Rect) -> (i64, i64, i64, i64) {
        (
            Self::col_of(rect.x),
            Self::col_of(rect.right() - 1.0),
            Self::row_of(rect.y),
            Self::row_of(rect.bottom() - 1.0),
        )
    }

    fn flush(&self, stdout: &mut impl Write) -> io::Result<()> {
        for (row, cells) in self.cells.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, row as u16))?;
            let mut colors: Option<(Color, Color)> = None;
            for cell in cells {
                if colors != Some((cell.fg, cell.bg)) {
                    queue!(
                        stdout,
                        SetForegroundColor(term_color(cell.fg)),
                        SetBackgroundColor(term_color(cell.bg))
                    )?;
                    colors = Some((cell.fg, cell.bg));
                }
                queue!(stdout, Print(cell.ch))?;
            }
        }
        queue!(stdout, ResetColor)?;
        Ok(())
    }
}

fn term_color(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn dim(color: Color, alpha: f64) -> Color {
    let scale = |c: u8| (c as f64 * alpha.clamp(0.0, 1.0)).round() as u8;
    Color::rgb(scale(color.r), scale(color.g), scale(color.b))
}

impl Surface for TextGrid {
    fn clear(&mut self, color: Color) {
        for row in &mut self.cells {
            row.fill(GridCell::blank(color));
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        // A cell is covered when its centre lies inside the rectangle
        for row in 0..GRID_ROWS {
            let cy = (row as f64 + 0.5) * CELL_HEIGHT;
            if cy < rect.y || cy >= rect.bottom() {
                continue;
            }
            for col in 0..GRID_COLS {
                let cx = (col as f64 + 0.5) * CELL_WIDTH;
                if cx >= rect.x && cx < rect.right() {
                    self.cells[row][col] = GridCell::blank(color);
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        let (left, right, top, bottom) = Self::span(&rect);
        for row in top..=bottom {
            for col in left..=right {
                let ch = match (row == top, row == bottom, col == left, col == right) {
                    (true, _, true, _) => '┌',
                    (true, _, _, true) => '┐',
                    (_, true, true, _) => '└',
                    (_, true, _, true) => '┘',
                    (true, _, _, _) | (_, true, _, _) => '─',
                    (_, _, true, _) | (_, _, _, true) => '│',
                    _ => continue,
                };
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = ch;
                    cell.fg = color;
                }
            }
        }
    }

    fn dashed_vline(&mut self, x: f64, y0: f64, y1: f64, dash: f64, gap: f64, color: Color) {
        // Dashes shorter than a cell are stretched to whole rows so gaps stay visible
        let stretch = if dash > 0.0 && dash < CELL_HEIGHT {
            CELL_HEIGHT / dash
        } else {
            1.0
        };
        let (dash, period) = (dash * stretch, (dash + gap) * stretch);
        let col = Self::col_of(x);
        for row in Self::row_of(y0)..=Self::row_of(y1 - 1.0) {
            let top = row as f64 * CELL_HEIGHT - y0;
            if period > 0.0 && top.rem_euclid(period) >= dash {
                continue;
            }
            if let Some(cell) = self.cell_mut(col, row) {
                cell.ch = '╎';
                cell.fg = color;
            }
        }
    }

    fn text_centered(&mut self, text: &str, x: f64, y: f64, size_px: f64, color: Color) {
        // Baseline to the middle of the glyphs
        let row = Self::row_of(y - size_px * 0.35);
        let len = text.chars().count() as i64;
        let start = (x / CELL_WIDTH).round() as i64 - len / 2;
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(start + i as i64, row) {
                cell.ch = ch;
                cell.fg = color;
            }
        }
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64) {
        if radius <= 0.0 {
            return;
        }
        let ch = if alpha >= 0.5 { '●' } else { '·' };
        if let Some(cell) = self.cell_mut(Self::col_of(x), Self::row_of(y)) {
            cell.ch = ch;
            cell.fg = dim(color, alpha);
        }
    }
}

/// Browser-style key name for a terminal key code
pub fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Up => Some("arrowup".to_string()),
        KeyCode::Down => Some("arrowdown".to_string()),
        KeyCode::Left => Some("arrowleft".to_string()),
        KeyCode::Right => Some("arrowright".to_string()),
        KeyCode::Char(c) => Some(c.to_lowercase().collect()),
        _ => None,
    }
}

/// Terminal cell under the mouse to the surface pixel at its centre
pub fn surface_coords(column: u16, row: u16) -> (f64, f64) {
    (
        (column as f64 + 0.5) * CELL_WIDTH,
        (row as f64 + 0.5) * CELL_HEIGHT,
    )
}

struct HeldKey {
    last_seen: Instant,
    repeated: bool,
}

pub struct CliRenderer {
    grid: TextGrid,
    last_render: Instant,
    target_frame_time: Duration,
    release_events: bool,
    held: HashMap<String, HeldKey>,
    pending: VecDeque<Input>,
    active: bool,
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            grid: TextGrid::new(),
            last_render: Instant::now(),
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
            release_events: false,
            held: HashMap::new(),
            pending: VecDeque::new(),
            active: false,
        }
    }

    /// Queue releases for keys that stopped repeating
    fn expire_held_keys(&mut self) {
        if self.release_events {
            return;
        }
        let now = Instant::now();
        let expired: Vec<String> = self
            .held
            .iter()
            .filter(|(_, key)| {
                let timeout = if key.repeated {
                    REPEAT_TIMEOUT
                } else {
                    FIRST_REPEAT_TIMEOUT
                };
                now.duration_since(key.last_seen) > timeout
            })
            .map(|(name, _)| name.clone())
            .collect();

        for name in expired {
            self.held.remove(&name);
            self.pending.push_back(Input::KeyUp(name));
        }
    }

    fn translate_key(&mut self, event: KeyEvent) -> Option<Input> {
        let ctrl_c = event.modifiers.contains(KeyModifiers::CONTROL)
            && event.code == KeyCode::Char('c');
        if event.code == KeyCode::Esc || ctrl_c {
            return Some(Input::Quit);
        }
        let name = key_name(event.code)?;
        if name == "q" {
            return Some(Input::Quit);
        }

        match event.kind {
            KeyEventKind::Release => {
                self.held.remove(&name);
                Some(Input::KeyUp(name))
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if !self.release_events {
                    let now = Instant::now();
                    self.held
                        .entry(name.clone())
                        .and_modify(|key| {
                            key.last_seen = now;
                            key.repeated = true;
                        })
                        .or_insert(HeldKey {
                            last_seen: now,
                            repeated: false,
                        });
                }
                Some(Input::KeyDown(name))
            }
        }
    }

    fn translate_mouse(event: MouseEvent) -> Option<Input> {
        let (x, y) = surface_coords(event.column, event.row);
        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Input::PointerMove { x, y }),
            MouseEventKind::Down(MouseButton::Left) => Some(Input::Click { x, y }),
            _ => None,
        }
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            EnableMouseCapture,
            EnableFocusChange
        )?;

        self.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        self.active = true;

        let (cols, rows) = terminal::size()?;
        if (cols as usize) < GRID_COLS || (rows as usize) < GRID_ROWS {
            log::warn!(
                "Terminal is {}x{}, the field needs {}x{}",
                cols,
                rows,
                GRID_COLS,
                GRID_ROWS
            );
        }
        log::info!(
            "Terminal renderer ready (key release events: {})",
            self.release_events
        );
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }

        self.last_render = Instant::now();

        scene::draw(game, &mut self.grid);

        let mut stdout = io::stdout();
        self.grid.flush(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let mut stdout = io::stdout();
        if self.release_events {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            stdout,
            DisableFocusChange,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        self.expire_held_keys();
        if let Some(input) = self.pending.pop_front() {
            return Ok(Some(input));
        }

        while event::poll(Duration::ZERO)? {
            let input = match event::read()? {
                Event::Key(key) => self.translate_key(key),
                Event::Mouse(mouse) => Self::translate_mouse(mouse),
                Event::FocusLost => {
                    self.held.clear();
                    Some(Input::FocusLost)
                }
                _ => None,
            };
            if input.is_some() {
                return Ok(input);
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
