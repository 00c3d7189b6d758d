//! Raw terminal operations behind a trait, so the display can run without a TTY.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::Duration;

use cellscreen_core::{DisplayError, Result};
use crossterm::event::{self, DisableFocusChange, EnableFocusChange, Event as CrosstermEvent};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::tty::IsTty;
use crossterm::{cursor, execute};

use crate::direct::{CellBuffer, DiffRenderer};

/// Every terminal side effect the display performs.
pub trait TerminalBackend {
    fn enable_raw_mode(&mut self) -> Result<()>;
    fn disable_raw_mode(&mut self) -> Result<()>;
    fn enter_alternate_screen(&mut self) -> Result<()>;
    fn leave_alternate_screen(&mut self) -> Result<()>;
    fn enable_focus_reporting(&mut self) -> Result<()>;
    fn disable_focus_reporting(&mut self) -> Result<()>;
    fn show_cursor(&mut self) -> Result<()>;
    fn size(&self) -> Result<(u16, u16)>;
    fn poll(&self, timeout: Duration) -> Result<bool>;
    fn read_event(&self) -> Result<CrosstermEvent>;
    fn write_flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
        caret: (i32, i32),
    ) -> Result<()>;
}

/// Real crossterm backend on stdout.
pub struct CrosstermBackend {
    stdout: Stdout,
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enable_raw_mode(&mut self) -> Result<()> {
        if !self.stdout.is_tty() {
            return Err(DisplayError::Startup("stdout is not a terminal".to_string()));
        }
        enable_raw_mode()?;
        Ok(())
    }
    fn disable_raw_mode(&mut self) -> Result<()> {
        let _ = disable_raw_mode();
        Ok(())
    }
    fn enter_alternate_screen(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, Clear(ClearType::All))?;
        Ok(())
    }
    fn leave_alternate_screen(&mut self) -> Result<()> {
        let _ = execute!(self.stdout, LeaveAlternateScreen);
        Ok(())
    }
    fn enable_focus_reporting(&mut self) -> Result<()> {
        execute!(self.stdout, EnableFocusChange)?;
        Ok(())
    }
    fn disable_focus_reporting(&mut self) -> Result<()> {
        let _ = execute!(self.stdout, DisableFocusChange);
        Ok(())
    }
    fn show_cursor(&mut self) -> Result<()> {
        let _ = execute!(self.stdout, cursor::Show);
        Ok(())
    }
    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }
    fn poll(&self, timeout: Duration) -> Result<bool> {
        Ok(event::poll(timeout)?)
    }
    fn read_event(&self) -> Result<CrosstermEvent> {
        Ok(event::read()?)
    }
    fn write_flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
        caret: (i32, i32),
    ) -> Result<()> {
        renderer.flush(buffer, &mut self.stdout, caret)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Records mode switches and writes escape sequences into `W`; input is
/// replayed from a script. No TTY required.
///
/// `poll` behaves like a quiet terminal when no events are queued: it sleeps
/// for the whole timeout and reports nothing.
#[allow(clippy::struct_excessive_bools)]
pub struct TestableBackend<W: Write> {
    writer: W,
    size: (u16, u16),
    raw_mode: bool,
    alternate_screen: bool,
    focus_reporting: bool,
    fail_alternate_screen: bool,
    events: RefCell<VecDeque<CrosstermEvent>>,
}

impl<W: Write> TestableBackend<W> {
    /// Backend reporting a `width` by `height` terminal.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        Self {
            writer,
            size: (width, height),
            raw_mode: false,
            alternate_screen: false,
            focus_reporting: false,
            fail_alternate_screen: false,
            events: RefCell::new(VecDeque::new()),
        }
    }

    /// Script the events `read_event` returns, oldest first.
    pub fn with_events(self, events: Vec<CrosstermEvent>) -> Self {
        *self.events.borrow_mut() = events.into_iter().collect();
        self
    }

    /// Make `enter_alternate_screen` fail, leaving start half done.
    pub fn failing_alternate_screen(mut self) -> Self {
        self.fail_alternate_screen = true;
        self
    }

    /// Queue one more event.
    pub fn push_event(&self, event: CrosstermEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Change the size reported by `size`.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.alternate_screen
    }

    /// Check if focus reporting is on.
    pub fn is_focus_reporting(&self) -> bool {
        self.focus_reporting
    }

    /// Bytes written so far.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TerminalBackend for TestableBackend<W> {
    fn enable_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = false;
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        if self.fail_alternate_screen {
            return Err(DisplayError::Io(io::Error::new(
                io::ErrorKind::Unsupported,
                "alternate screen unavailable",
            )));
        }
        self.alternate_screen = true;
        execute!(self.writer, EnterAlternateScreen)?;
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        self.alternate_screen = false;
        let _ = execute!(self.writer, LeaveAlternateScreen);
        Ok(())
    }

    fn enable_focus_reporting(&mut self) -> Result<()> {
        self.focus_reporting = true;
        execute!(self.writer, EnableFocusChange)?;
        Ok(())
    }

    fn disable_focus_reporting(&mut self) -> Result<()> {
        self.focus_reporting = false;
        let _ = execute!(self.writer, DisableFocusChange);
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        let _ = execute!(self.writer, cursor::Show);
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(self.size)
    }

    fn poll(&self, timeout: Duration) -> Result<bool> {
        if self.events.borrow().is_empty() {
            std::thread::sleep(timeout);
            return Ok(false);
        }
        Ok(true)
    }

    fn read_event(&self) -> Result<CrosstermEvent> {
        self.events
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| DisplayError::Io(io::Error::new(io::ErrorKind::WouldBlock, "no events")))
    }

    fn write_flush(
        &mut self,
        buffer: &mut CellBuffer,
        renderer: &mut DiffRenderer,
        caret: (i32, i32),
    ) -> Result<()> {
        renderer.flush(buffer, &mut self.writer, caret)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Instant;

    #[test]
    fn test_testable_backend_lifecycle_flags() {
        let mut backend = TestableBackend::new(Vec::new(), 80, 24);
        backend.enable_raw_mode().unwrap();
        backend.enter_alternate_screen().unwrap();
        backend.enable_focus_reporting().unwrap();
        assert!(backend.is_raw_mode());
        assert!(backend.is_alternate_screen());
        assert!(backend.is_focus_reporting());

        backend.disable_focus_reporting().unwrap();
        backend.leave_alternate_screen().unwrap();
        backend.disable_raw_mode().unwrap();
        assert!(!backend.is_raw_mode());
        assert!(!backend.is_alternate_screen());
        assert!(!backend.is_focus_reporting());
    }

    #[test]
    fn test_testable_backend_writes_escape_sequences() {
        let mut backend = TestableBackend::new(Vec::new(), 80, 24);
        backend.enter_alternate_screen().unwrap();
        let output = String::from_utf8_lossy(backend.writer()).to_string();
        assert!(output.contains("\x1b[?1049h"));
    }

    #[test]
    fn test_testable_backend_size() {
        let mut backend = TestableBackend::new(Vec::new(), 120, 40);
        assert_eq!(backend.size().unwrap(), (120, 40));
        backend.set_size(90, 30);
        assert_eq!(backend.size().unwrap(), (90, 30));
    }

    #[test]
    fn test_testable_backend_events() {
        let backend = TestableBackend::new(Vec::new(), 80, 24).with_events(vec![
            CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
        ]);
        assert!(backend.poll(Duration::from_millis(10)).unwrap());
        assert!(matches!(
            backend.read_event().unwrap(),
            CrosstermEvent::Key(_)
        ));
        assert!(backend.read_event().is_err());
    }

    #[test]
    fn test_testable_backend_quiet_poll_waits() {
        let backend = TestableBackend::new(Vec::new(), 80, 24);
        let start = Instant::now();
        assert!(!backend.poll(Duration::from_millis(20)).unwrap());
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_testable_backend_failing_alternate_screen() {
        let mut backend = TestableBackend::new(Vec::new(), 80, 24).failing_alternate_screen();
        assert!(backend.enter_alternate_screen().is_err());
        assert!(!backend.is_alternate_screen());
    }

    #[test]
    fn test_testable_backend_write_flush() {
        let mut backend = TestableBackend::new(Vec::new(), 4, 2);
        let mut buffer = CellBuffer::new(4, 2);
        let mut renderer = DiffRenderer::new();
        backend.write_flush(&mut buffer, &mut renderer, (0, 0)).unwrap();
        assert_eq!(renderer.cells_written(), 8);
        assert!(!backend.into_writer().is_empty());
    }
}
