//! [`Display`] over a terminal backend.

use std::time::Duration;

use cellscreen_core::{
    key_name_with, Attr, Budget, Deadline, Display, DisplayError, Key, Result, Session,
    TerminalConfig,
};
use crossterm::event::Event as CrosstermEvent;
use crossterm::style::Attributes;
use tracing::{debug, trace};

use crate::backend::{CrosstermBackend, TerminalBackend};
use crate::capability::Capabilities;
use crate::direct::{CellBuffer, DiffRenderer, TermCell};
use crate::input::InputDecoder;
use crate::translate::AttrTranslator;

/// What `start` managed to acquire, so `shutdown` releases exactly that.
#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::struct_excessive_bools)]
struct Acquired {
    raw_mode: bool,
    alternate_screen: bool,
    focus_reporting: bool,
}

/// Terminal display driven through a [`TerminalBackend`].
pub struct TerminalDisplay<B: TerminalBackend> {
    backend: B,
    config: TerminalConfig,
    buffer: CellBuffer,
    renderer: DiffRenderer,
    session: Session,
    translator: AttrTranslator,
    style: Attributes,
    decoder: InputDecoder,
    acquired: Acquired,
}

/// Convenience alias for the stdout-backed display.
pub type CrosstermDisplay = TerminalDisplay<CrosstermBackend>;

impl CrosstermDisplay {
    /// Display on the process's terminal.
    #[must_use]
    pub fn stdout(config: TerminalConfig) -> Self {
        Self::new(CrosstermBackend::new(), config)
    }
}

impl<B: TerminalBackend> TerminalDisplay<B> {
    /// Wrap a backend. Nothing touches the terminal until [`Display::start`].
    pub fn new(backend: B, config: TerminalConfig) -> Self {
        Self {
            backend,
            config,
            buffer: CellBuffer::new(0, 0),
            renderer: DiffRenderer::new(),
            session: Session::new(),
            translator: AttrTranslator::default(),
            style: Attributes::default(),
            decoder: InputDecoder::new(),
            acquired: Acquired::default(),
        }
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The cell buffer. After `sync` it matches what the terminal shows.
    pub fn buffer(&self) -> &CellBuffer {
        &self.buffer
    }

    /// The attribute translator chosen at start.
    pub fn translator(&self) -> AttrTranslator {
        self.translator
    }

    /// Current cursor position.
    pub fn cursor(&self) -> (i32, i32) {
        self.session.cursor()
    }

    fn try_start(&mut self) -> Result<()> {
        self.backend.enable_raw_mode()?;
        self.acquired.raw_mode = true;
        self.backend.enter_alternate_screen()?;
        self.acquired.alternate_screen = true;
        if self.config.report_focus {
            self.backend.enable_focus_reporting()?;
            self.acquired.focus_reporting = true;
        }

        let caps = Capabilities::detect(self.config.italic);
        self.translator = AttrTranslator::new(caps);
        self.style = self.translator.translate(self.session.attr());

        let (width, height) = self.backend.size()?;
        self.resize(width, height);
        debug!(width, height, italic = caps.italic, "terminal display started");
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.buffer.resize(width, height);
        self.renderer.reset();
        debug!(width, height, "terminal resized");
    }

    fn blank(&self) -> TermCell {
        TermCell::new(' ', self.session.attr(), self.style)
    }

    /// One backend event to at most one key; extra keys go onto the queue.
    fn decode(&mut self, event: CrosstermEvent) -> Option<Key> {
        match event {
            CrosstermEvent::Key(key) => self.decoder.decode_key(key, self.session.keys()),
            CrosstermEvent::Paste(text) => self.decoder.decode_paste(&text, self.session.keys()),
            CrosstermEvent::Resize(width, height) => {
                self.resize(width, height);
                Some(Key::RESIZE)
            }
            CrosstermEvent::FocusGained => {
                // The next sync repaints every cell, not just changed ones.
                self.buffer.mark_all_dirty();
                self.renderer.reset();
                Some(Key::REDRAW)
            }
            CrosstermEvent::FocusLost | CrosstermEvent::Mouse(_) => None,
        }
    }
}

impl<B: TerminalBackend> Display for TerminalDisplay<B> {
    fn start(&mut self) -> Result<()> {
        self.try_start().map_err(|e| {
            self.shutdown();
            match e {
                DisplayError::Startup(_) => e,
                other => DisplayError::Startup(other.to_string()),
            }
        })
    }

    fn shutdown(&mut self) {
        if self.acquired.focus_reporting {
            let _ = self.backend.disable_focus_reporting();
        }
        if self.acquired.alternate_screen {
            let _ = self.backend.show_cursor();
            let _ = self.backend.leave_alternate_screen();
        }
        if self.acquired.raw_mode {
            let _ = self.backend.disable_raw_mode();
            debug!("terminal display shut down");
        }
        self.acquired = Acquired::default();
    }

    fn screen_size(&self) -> (u16, u16) {
        (self.buffer.width(), self.buffer.height())
    }

    fn clear_screen(&mut self) {
        let blank = self.blank();
        self.buffer.fill_area(
            0,
            0,
            i32::from(self.buffer.width()) - 1,
            i32::from(self.buffer.height()) - 1,
            blank,
        );
    }

    fn clear_area(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let blank = self.blank();
        self.buffer.fill_area(x1, y1, x2, y2, blank);
    }

    fn write_char(&mut self, x: i32, y: i32, ch: char) {
        let cell = TermCell::new(ch, self.session.attr(), self.style);
        self.buffer.set(x, y, cell);
    }

    fn set_attributes(&mut self, and: Attr, or: Attr) {
        let attr = self.session.set_attributes(and, or);
        self.style = self.translator.translate(attr);
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.session.move_cursor(x, y);
    }

    fn sync(&mut self) -> Result<()> {
        if !self.acquired.raw_mode {
            return Err(DisplayError::NotStarted);
        }
        let caret = self.session.cursor();
        self.backend
            .write_flush(&mut self.buffer, &mut self.renderer, caret)
    }

    fn get_key(&mut self, timeout: Option<Duration>) -> Result<Key> {
        if !self.acquired.raw_mode {
            return Err(DisplayError::NotStarted);
        }
        let deadline = Deadline::new(timeout);

        loop {
            if let Some(key) = self.session.pop_key() {
                return Ok(key);
            }

            match deadline.budget() {
                Budget::Elapsed => return Ok(Key::TIMEOUT),
                Budget::Remaining(left) => {
                    if !self.backend.poll(left)? {
                        continue;
                    }
                }
                Budget::Infinite => {}
            }

            let event = self.backend.read_event()?;
            trace!(?event, "terminal event");
            if let Some(key) = self.decode(event) {
                return Ok(key);
            }
        }
    }

    fn key_name(&self, key: Key) -> String {
        key_name_with(key, self.decoder.extended())
    }
}

impl<B: TerminalBackend> Drop for TerminalDisplay<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
