//! Editor — the single owned editor-state value.
//!
//! Owns the buffer, the viewport, the message line and any open prompt,
//! and turns logical key events into buffer edits. Implements
//! [`App`] so the terminal event loop can drive it directly.
//!
//! # Keys
//!
//! | Key                    | Action                                       |
//! |------------------------|----------------------------------------------|
//! | arrows, Home, End      | move the cursor                              |
//! | PageUp / PageDown      | jump a screen                                |
//! | Enter / Tab            | split the line / insert `\t`                 |
//! | Backspace, Ctrl-H      | delete left                                  |
//! | Delete                 | delete right                                 |
//! | Ctrl-S                 | save (asks for a name when there is none)    |
//! | Ctrl-F                 | incremental search                           |
//! | Ctrl-Q                 | quit, confirmed when there are unsaved edits |
//! | Escape, Ctrl-L         | ignored                                      |
//! | other Ctrl letters     | insert the control character                 |

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use kilo_term::event_loop::{Action, App};
use kilo_term::frame::Frame;
use kilo_term::input::{KeyCode, KeyEvent, Modifiers};
use kilo_term::terminal::Size;

use crate::buffer::Buffer;
use crate::config::EditorConfig;
use crate::cursor::{Cursor, Move};
use crate::file;
use crate::prompt::{Prompt, PromptEvent, PromptKind};
use crate::search::{Direction, Origin, Search};
use crate::view::View;

/// Message shown at startup.
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

/// A message-line text and when it was set.
#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    at: Instant,
}

/// The editor.
#[derive(Debug)]
pub struct Editor {
    buffer: Buffer,
    view: View,
    config: EditorConfig,
    message: Option<StatusMessage>,
    /// Confirming Ctrl-Q presses still needed to quit a dirty buffer.
    quit_times: usize,
    prompt: Option<Prompt>,
    search: Option<Search>,
    /// Whether the last painted frame had a message line.
    message_shown: bool,
}

impl Editor {
    /// An editor with an empty, unnamed buffer.
    #[must_use]
    pub fn new(config: EditorConfig, size: Size) -> Self {
        Self::with_buffer(Buffer::new(config.tab_stop), config, size)
    }

    /// An editor on an existing buffer.
    #[must_use]
    pub fn with_buffer(buffer: Buffer, config: EditorConfig, size: Size) -> Self {
        let mut editor = Self {
            buffer,
            view: View::for_terminal(size),
            config,
            message: None,
            quit_times: config.quit_times,
            prompt: None,
            search: None,
            message_shown: false,
        };
        editor.set_message(HELP_MESSAGE);
        editor
    }

    /// Open `path`. A file that does not exist yet gives an empty buffer
    /// carrying the name, to be created on the first save.
    ///
    /// # Errors
    ///
    /// The file exists but could not be read.
    pub fn open(path: impl Into<PathBuf>, config: EditorConfig, size: Size) -> io::Result<Self> {
        let path = path.into();
        let buffer = match file::read_text(&path)? {
            Some(text) => {
                let buffer = Buffer::from_text(&text, config.tab_stop);
                tracing::info!(path = %path.display(), rows = buffer.num_rows(), "loaded file");
                buffer
            }
            None => {
                tracing::info!(path = %path.display(), "new file");
                Buffer::new(config.tab_stop)
            }
        };

        let mut editor = Self::with_buffer(buffer, config, size);
        editor.buffer.set_filename(path);
        Ok(editor)
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn view(&self) -> &View {
        &self.view
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The open prompt, if any.
    #[inline]
    #[must_use]
    pub const fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// The last message set, regardless of age.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    /// Show `text` on the message line, starting now.
    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            at: Instant::now(),
        });
    }

    /// The message-line text to show at `now`: the open prompt, or the
    /// last message while it is younger than the timeout.
    fn visible_message(&self, now: Instant) -> Option<String> {
        if let Some(prompt) = &self.prompt {
            return Some(prompt.message());
        }
        self.message
            .as_ref()
            .filter(|m| now.saturating_duration_since(m.at) < self.config.message_timeout)
            .filter(|m| !m.text.is_empty())
            .map(|m| m.text.clone())
    }

    // -- Painting -----------------------------------------------------------

    /// Scroll so the cursor is visible and describe the screen at `now`.
    pub fn frame_at(&mut self, now: Instant) -> Frame {
        let rx = self.buffer.render_col();
        self.view.scroll(self.buffer.cursor().cy, rx);

        let message = self.visible_message(now);
        self.message_shown = message.is_some();
        self.view.render(&self.buffer, rx, message.as_deref())
    }

    // -- Keys ---------------------------------------------------------------

    /// Handle one key press.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Action {
        if self.prompt.is_some() {
            self.prompt_key(key);
            return Action::Continue;
        }

        if key.is_ctrl('q') {
            if self.buffer.is_dirty() && self.quit_times > 0 {
                self.set_message(format!(
                    "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                    self.quit_times
                ));
                self.quit_times -= 1;
                return Action::Continue;
            }
            return Action::Quit;
        }

        self.edit_key(key);
        self.quit_times = self.config.quit_times;
        Action::Continue
    }

    fn edit_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Enter => self.buffer.insert_newline(),
            KeyCode::Tab => self.buffer.insert_char('\t'),
            KeyCode::Backspace => self.buffer.delete_char(),
            KeyCode::Delete => {
                self.buffer.move_cursor(Move::Right);
                self.buffer.delete_char();
            }
            KeyCode::Up => self.buffer.move_cursor(Move::Up),
            KeyCode::Down => self.buffer.move_cursor(Move::Down),
            KeyCode::Left => self.buffer.move_cursor(Move::Left),
            KeyCode::Right => self.buffer.move_cursor(Move::Right),
            KeyCode::Home => self.buffer.move_cursor(Move::Home),
            KeyCode::End => self.buffer.move_cursor(Move::End),
            KeyCode::PageUp => self.page(Move::Up),
            KeyCode::PageDown => self.page(Move::Down),
            KeyCode::Escape => {}
            KeyCode::Char(c) if key.modifiers.contains(Modifiers::CTRL) => self.ctrl_key(c),
            KeyCode::Char(_) if key.modifiers.contains(Modifiers::ALT) => {}
            KeyCode::Char(c) => self.buffer.insert_char(c),
        }
    }

    fn ctrl_key(&mut self, c: char) {
        match c {
            'h' => self.buffer.delete_char(),
            'l' => {}
            's' => self.save(),
            'f' => self.start_search(),
            'a'..='z' => self.buffer.insert_char(char::from(c as u8 - b'a' + 1)),
            _ => {}
        }
    }

    /// Put the cursor on the top (or bottom) visible row, then move a
    /// full screen further.
    fn page(&mut self, dir: Move) {
        let cursor = self.buffer.cursor();
        let cy = if dir == Move::Up {
            self.view.row_off()
        } else {
            (self.view.row_off() + self.view.screen_rows())
                .saturating_sub(1)
                .min(self.buffer.num_rows())
        };
        self.buffer.set_cursor(Cursor::new(cursor.cx, cy));
        for _ in 0..self.view.screen_rows() {
            self.buffer.move_cursor(dir);
        }
    }

    // -- Save ---------------------------------------------------------------

    fn save(&mut self) {
        match self.buffer.filename().map(Path::to_path_buf) {
            Some(path) => self.write_to(&path),
            None => self.prompt = Some(Prompt::new(PromptKind::SaveAs)),
        }
    }

    fn write_to(&mut self, path: &Path) {
        let text = self.buffer.serialize();
        match file::write_atomic(path, text.as_bytes()) {
            Ok(n) => {
                self.buffer.mark_clean();
                tracing::info!(path = %path.display(), bytes = n, "saved");
                self.set_message(format!("{n} bytes written to disk"));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "save failed");
                self.set_message(format!("Can't save! I/O error: {e}"));
            }
        }
    }

    // -- Prompts ------------------------------------------------------------

    fn prompt_key(&mut self, key: &KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        let kind = prompt.kind();
        let event = prompt.handle(key);
        match kind {
            PromptKind::SaveAs => self.save_as_event(event),
            PromptKind::Search => self.search_event(key, event),
        }
    }

    fn save_as_event(&mut self, event: PromptEvent) {
        match event {
            PromptEvent::Submitted(name) => {
                self.prompt = None;
                self.buffer.set_filename(name);
                if let Some(path) = self.buffer.filename().map(Path::to_path_buf) {
                    self.write_to(&path);
                }
            }
            PromptEvent::Cancelled => {
                self.prompt = None;
                self.set_message("Save aborted");
            }
            PromptEvent::Edited | PromptEvent::Other => {}
        }
    }

    fn start_search(&mut self) {
        let origin = Origin {
            cursor: self.buffer.cursor(),
            row_off: self.view.row_off(),
            col_off: self.view.col_off(),
        };
        self.search = Some(Search::begin(origin));
        self.prompt = Some(Prompt::new(PromptKind::Search));
    }

    fn search_event(&mut self, key: &KeyEvent, event: PromptEvent) {
        let Some(search) = self.search.as_mut() else {
            self.prompt = None;
            return;
        };

        match event {
            PromptEvent::Submitted(_) => {
                search.restore(&mut self.buffer);
                self.end_search();
            }
            PromptEvent::Cancelled => {
                search.restore(&mut self.buffer);
                let origin = search.origin();
                self.buffer.set_cursor(origin.cursor);
                self.view.set_offsets(origin.row_off, origin.col_off);
                self.end_search();
            }
            // Enter on an empty query.
            PromptEvent::Other if key.code == KeyCode::Enter => {
                search.restore(&mut self.buffer);
                search.reset();
            }
            PromptEvent::Edited | PromptEvent::Other => {
                match key.code {
                    KeyCode::Right | KeyCode::Down => search.set_direction(Direction::Forward),
                    KeyCode::Left | KeyCode::Up => search.set_direction(Direction::Backward),
                    _ => search.reset(),
                }
                let query = self.prompt.as_ref().map_or("", Prompt::input);
                if search.find(&mut self.buffer, query).is_some() {
                    let col_off = self.view.col_off();
                    self.view.set_offsets(self.buffer.num_rows(), col_off);
                }
            }
        }
    }

    fn end_search(&mut self) {
        self.search = None;
        self.prompt = None;
        self.message = None;
    }
}

impl App for Editor {
    fn on_key(&mut self, key: &KeyEvent) -> Action {
        self.handle_key(key)
    }

    fn on_resize(&mut self, size: Size) {
        tracing::debug!(cols = size.cols, rows = size.rows, "resize");
        self.view.resize(size);
    }

    fn on_tick(&mut self) -> bool {
        self.visible_message(Instant::now()).is_some() != self.message_shown
    }

    fn paint(&mut self) -> Frame {
        self.frame_at(Instant::now())
    }
}
