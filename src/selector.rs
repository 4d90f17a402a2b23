//! Interactive profile selector.
//!
//! Draws a single-select list on stderr and blocks until the user confirms or
//! cancels. The pieces are split so they can be exercised without a terminal:
//! - [`ListCursor`] is the scrolling window over the list.
//! - [`Templates`] turns profiles into styled lines.
//! - [`Selector`] runs the key loop against any [`KeySource`] and writer.
//! - [`TerminalPrompt`] wires a selector to the real terminal in raw mode.

use anstyle::AnsiColor;
use crossterm::cursor::{Hide, MoveToColumn, MoveUp, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::ops::Range;

use crate::bell::{BELL, BellSkipper};
use crate::error::{AwsPsError, Result};
use crate::profiles::Profile;
use crate::ui::Ui;

pub const LABEL: &str = "AWS CLI profile";

/// Number of items visible at once
pub const PAGE_SIZE: usize = 5;

const POINTER: &str = "\u{27A1}";

/// What a key press asks the selector to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Prev,
    Next,
    PageUp,
    PageDown,
    First,
    Last,
    Confirm,
    Cancel,
}

impl Action {
    /// Map a key event to an action; releases and unbound keys map to `None`
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Some(Self::Cancel),
            KeyCode::Char('p') if ctrl => Some(Self::Prev),
            KeyCode::Char('n') if ctrl => Some(Self::Next),
            KeyCode::Esc => Some(Self::Cancel),
            KeyCode::Up | KeyCode::Char('k') => Some(Self::Prev),
            KeyCode::Down | KeyCode::Char('j') => Some(Self::Next),
            KeyCode::Left | KeyCode::PageUp => Some(Self::PageUp),
            KeyCode::Right | KeyCode::PageDown => Some(Self::PageDown),
            KeyCode::Home => Some(Self::First),
            KeyCode::End => Some(Self::Last),
            KeyCode::Enter => Some(Self::Confirm),
            _ => None,
        }
    }
}

/// Cursor plus scroll offset over a list of `len` items.
///
/// Movement methods return `false` when the cursor is already at the edge
/// they move towards. The list never wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCursor {
    len: usize,
    size: usize,
    cursor: usize,
    start: usize,
}

impl ListCursor {
    pub fn new(len: usize, size: usize) -> Self {
        Self {
            len,
            size: size.max(1),
            cursor: 0,
            start: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Range of item indices currently on screen
    pub fn visible(&self) -> Range<usize> {
        self.start..(self.start + self.size).min(self.len)
    }

    /// Jump to `index`, scrolling so it is the last visible row if needed
    pub fn select(&mut self, index: usize) -> bool {
        if self.len == 0 {
            return false;
        }
        let index = index.min(self.len - 1);
        if index == self.cursor {
            return false;
        }
        self.cursor = index;
        if self.cursor < self.start {
            self.start = self.cursor;
        } else if self.cursor >= self.start + self.size {
            self.start = self.cursor + 1 - self.size;
        }
        true
    }

    pub fn next(&mut self) -> bool {
        if self.cursor + 1 >= self.len {
            return false;
        }
        self.select(self.cursor + 1)
    }

    pub fn prev(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.select(self.cursor - 1)
    }

    pub fn page_down(&mut self) -> bool {
        if self.cursor + 1 >= self.len {
            return false;
        }
        let max_start = self.len.saturating_sub(self.size);
        let start = self.start + self.size;
        if self.len <= self.size || start > max_start {
            self.cursor = self.len - 1;
            self.start = max_start;
        } else {
            self.cursor = start;
            self.start = start;
        }
        true
    }

    pub fn page_up(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        if self.start < self.size {
            self.start = 0;
            self.cursor = 0;
        } else {
            self.start -= self.size;
            self.cursor = self.start;
        }
        true
    }

    pub fn first(&mut self) -> bool {
        self.select(0)
    }

    pub fn last(&mut self) -> bool {
        self.select(self.len.saturating_sub(1))
    }

    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Prev => self.prev(),
            Action::Next => self.next(),
            Action::PageUp => self.page_up(),
            Action::PageDown => self.page_down(),
            Action::First => self.first(),
            Action::Last => self.last(),
            Action::Confirm | Action::Cancel => false,
        }
    }
}

/// Line templates for the selector
#[derive(Debug, Clone, Copy)]
pub struct Templates<'a> {
    ui: &'a Ui,
}

impl<'a> Templates<'a> {
    pub fn new(ui: &'a Ui) -> Self {
        Self { ui }
    }

    pub fn label(&self) -> String {
        format!("{} {}?", self.ui.colored("?", AnsiColor::Blue), self.ui.bold(LABEL))
    }

    pub fn help(&self) -> String {
        self.ui
            .faint("Use the arrow keys to navigate: \u{2193} \u{2191} \u{2192} \u{2190}")
    }

    pub fn active(&self, profile: &Profile) -> String {
        format!(
            "{} {} ({})",
            POINTER,
            self.ui.colored(&profile.name, AnsiColor::Yellow),
            self.ui.colored(&profile.region, AnsiColor::Red)
        )
    }

    pub fn inactive(&self, profile: &Profile) -> String {
        format!(
            "  {} ({})",
            self.ui.colored(&profile.name, AnsiColor::Cyan),
            self.ui.colored(&profile.region, AnsiColor::Red)
        )
    }

    pub fn selected(&self, profile: &Profile) -> String {
        format!("{} {}", POINTER, self.ui.colored(&profile.name, AnsiColor::Cyan))
    }

    pub fn details(&self, profile: &Profile) -> Vec<String> {
        let mut table = self.ui.simple_table();
        table.add_row(vec![self.ui.faint("Name  :"), profile.name.clone()]);
        table.add_row(vec![self.ui.faint("Region:"), profile.region.clone()]);
        table.add_row(vec![self.ui.faint("Output:"), profile.output.clone()]);
        for column in table.column_iter_mut() {
            column.set_padding((0, 2));
        }

        let mut lines = vec![String::new(), "--------- Profile ----------".to_string()];
        lines.extend(table.to_string().lines().map(|l| l.trim_end().to_string()));
        lines
    }

    /// Every line of one frame, top to bottom
    pub fn frame(&self, profiles: &[Profile], list: &ListCursor) -> Vec<String> {
        let mut lines = vec![self.label(), self.help()];
        for i in list.visible() {
            if i == list.cursor() {
                lines.push(self.active(&profiles[i]));
            } else {
                lines.push(self.inactive(&profiles[i]));
            }
        }
        if let Some(profile) = profiles.get(list.cursor()) {
            lines.extend(self.details(profile));
        }
        lines
    }
}

/// Source of key presses
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<KeyEvent>;
}

/// Keys read from the terminal via crossterm
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(key) = event::read()? {
                return Ok(key);
            }
        }
    }
}

/// Anything that can ask the user to pick one of the profiles
pub trait ProfilePrompt {
    /// Return the index of the chosen profile, starting with `start` highlighted
    fn select(&mut self, profiles: &[Profile], start: usize) -> Result<usize>;
}

/// Key loop and renderer
pub struct Selector<'a, K, W> {
    templates: Templates<'a>,
    keys: K,
    out: W,
    width: Option<u16>,
    drawn: u16,
}

impl<'a, K: KeySource, W: Write> Selector<'a, K, W> {
    pub fn new(ui: &'a Ui, keys: K, out: W) -> Self {
        Self {
            templates: Templates::new(ui),
            keys,
            out,
            width: None,
            drawn: 0,
        }
    }

    /// Terminal width in columns, used to count rows taken by wrapped lines
    pub fn with_width(mut self, width: Option<u16>) -> Self {
        self.width = width;
        self
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Run until confirm or cancel.
    ///
    /// Moving past either end of the list rings the bell.
    pub fn run(&mut self, profiles: &[Profile], start: usize) -> Result<usize> {
        let mut list = ListCursor::new(profiles.len(), PAGE_SIZE);
        list.select(start);

        loop {
            let lines = self.templates.frame(profiles, &list);
            self.draw(&lines).map_err(AwsPsError::Prompt)?;

            let key = self.keys.next_key().map_err(AwsPsError::Prompt)?;
            let Some(action) = Action::from_key(key) else {
                continue;
            };

            match action {
                Action::Confirm => {
                    if let Some(profile) = profiles.get(list.cursor()) {
                        let line = self.templates.selected(profile);
                        self.finish(Some(line.as_str())).map_err(AwsPsError::Prompt)?;
                        return Ok(list.cursor());
                    }
                    self.ring().map_err(AwsPsError::Prompt)?;
                }
                Action::Cancel => {
                    self.finish(None).map_err(AwsPsError::Prompt)?;
                    return Err(AwsPsError::SelectionCancelled);
                }
                movement => {
                    if !list.apply(movement) {
                        self.ring().map_err(AwsPsError::Prompt)?;
                    }
                }
            }
        }
    }

    fn ring(&mut self) -> io::Result<()> {
        self.out.write_all(&[BELL])?;
        self.out.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        let drawn = self.drawn;
        if drawn > 0 {
            queue!(self.out, MoveUp(drawn))?;
        }
        queue!(self.out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        self.drawn = 0;
        Ok(())
    }

    // Raw mode does not translate \n, so lines end in \r\n.
    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        self.clear()?;
        for line in lines {
            queue!(self.out, Print(line), Print("\r\n"))?;
        }
        let width = self.width;
        self.drawn = lines
            .iter()
            .map(|line| screen_rows(line, width))
            .fold(0, u16::saturating_add);
        self.out.flush()
    }

    fn finish(&mut self, line: Option<&str>) -> io::Result<()> {
        self.clear()?;
        if let Some(line) = line {
            queue!(self.out, Print(line), Print("\r\n"))?;
        }
        self.out.flush()
    }
}

/// Rows a line occupies once the terminal wraps it
fn screen_rows(line: &str, width: Option<u16>) -> u16 {
    let cols = match width {
        Some(cols) if cols > 0 => usize::from(cols),
        _ => return 1,
    };
    let len = anstream::adapter::strip_str(line).to_string().chars().count();
    u16::try_from(len.div_ceil(cols).max(1)).unwrap_or(u16::MAX)
}

impl<K: KeySource, W: Write> ProfilePrompt for Selector<'_, K, W> {
    fn select(&mut self, profiles: &[Profile], start: usize) -> Result<usize> {
        self.run(profiles, start)
    }
}

/// The selector on the real terminal, drawing to stderr
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompt<'a> {
    ui: &'a Ui,
}

impl<'a> TerminalPrompt<'a> {
    pub fn new(ui: &'a Ui) -> Self {
        Self { ui }
    }
}

impl ProfilePrompt for TerminalPrompt<'_> {
    fn select(&mut self, profiles: &[Profile], start: usize) -> Result<usize> {
        let _raw = RawModeGuard::enter().map_err(AwsPsError::Prompt)?;
        let width = terminal::size().ok().map(|(cols, _)| cols);
        let mut selector = Selector::new(self.ui, TerminalKeys, BellSkipper::new(io::stderr()))
            .with_width(width);
        selector.run(profiles, start)
    }
}

/// Raw mode and a hidden cursor for as long as the guard lives
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(io::stderr(), Hide)?;
        Ok(guard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stderr(), Show);
        let _ = terminal::disable_raw_mode();
    }
}
