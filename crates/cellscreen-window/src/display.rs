//! [`Display`] over a pixel window.

use std::time::Duration;

use cellscreen_core::{
    Attr, Budget, Deadline, Display, DisplayError, Key, Result, Session, WindowConfig,
};
use tracing::{debug, trace};

use crate::engine::{border_rects, caret_box, row_rect, Frame, Repaint};
use crate::geometry::{clamp_sizing, FontDescriptor, Rect, WindowGeometry};
use crate::glyph::{BlockGlyphCache, GlyphCache};
use crate::headless::HeadlessPlatform;
use crate::keys::{self, KeyDown};
use crate::paint::{paint_region, PaintContext};
use crate::platform::{PlatformEvent, WindowMode, WindowPlatform};
use crate::settings::{MemorySettingsStore, SettingsStore};

/// Window display over an in-memory platform.
pub type HeadlessDisplay = WindowDisplay<HeadlessPlatform, BlockGlyphCache, MemorySettingsStore>;

/// Character grid emulated in a pixel window.
///
/// Nothing is allocated until the platform reports the client size: before
/// that the grid is `0 x 0` and writes are ignored.
pub struct WindowDisplay<P: WindowPlatform, G: GlyphCache, S: SettingsStore> {
    platform: P,
    glyphs: G,
    settings: S,
    config: WindowConfig,
    session: Session,
    frame: Option<Frame>,
    font: FontDescriptor,
    geometry: Option<WindowGeometry>,
    mode: WindowMode,
    started: bool,
    glyphs_ready: bool,
    /// The last key-down was consumed; drop the character it translates to.
    swallow_char: bool,
    damage: Vec<Rect>,
}

impl HeadlessDisplay {
    /// Headless display with a `width` by `height` pixel client and
    /// `cell_width` by `cell_height` block glyphs.
    #[must_use]
    pub fn headless(width: u32, height: u32, cell_width: u32, cell_height: u32) -> Self {
        Self::new(
            HeadlessPlatform::new(width, height),
            BlockGlyphCache::new(cell_width, cell_height),
            MemorySettingsStore::new(),
            WindowConfig::default(),
        )
    }
}

impl<P: WindowPlatform, G: GlyphCache, S: SettingsStore> WindowDisplay<P, G, S> {
    pub fn new(platform: P, glyphs: G, settings: S, config: WindowConfig) -> Self {
        let font = FontDescriptor {
            size: config.font_size,
            path: config.font_file.clone(),
            ..FontDescriptor::default()
        };
        Self {
            platform,
            glyphs,
            settings,
            config,
            session: Session::new(),
            frame: None,
            font,
            geometry: None,
            mode: WindowMode::Windowed,
            started: false,
            glyphs_ready: false,
            swallow_char: false,
            damage: Vec::new(),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn glyphs(&self) -> &G {
        &self.glyphs
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Front and back buffers, once the first size notification arrived.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Font the glyph cache was initialized with.
    pub fn font(&self) -> &FontDescriptor {
        &self.font
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.session.cursor()
    }

    pub fn attributes(&self) -> Attr {
        self.session.attr()
    }

    /// Diff the buffers and repaint what changed, reporting the regions.
    pub fn sync_report(&mut self) -> Result<Repaint> {
        if !self.started {
            return Err(DisplayError::NotStarted);
        }
        let cell = self.glyphs.cell_size();
        let Some(frame) = self.frame.as_mut() else {
            return Ok(Repaint::default());
        };

        let rows = frame.sync_rows();
        let width = frame.width();
        for &y in &rows {
            self.damage.push(row_rect(y, width, cell));
        }
        let (cx, cy) = self.session.cursor();
        self.damage.push(caret_box(cx, cy, cell));

        let regions = self.update()?;
        trace!(rows = rows.len(), regions = regions.len(), "window sync");
        Ok(Repaint { rows, regions })
    }

    /// Paint and present every damaged region.
    fn update(&mut self) -> Result<Vec<Rect>> {
        if self.damage.is_empty() {
            return Ok(Vec::new());
        }
        let regions = std::mem::take(&mut self.damage);
        let canvas = self.platform.begin_paint();
        let mut ctx = PaintContext {
            front: self.frame.as_ref().map(Frame::front),
            glyphs: &mut self.glyphs,
            caret: self.session.cursor(),
        };
        for region in &regions {
            paint_region(canvas, *region, &mut ctx);
        }
        self.platform.end_paint(&regions)?;
        Ok(regions)
    }

    /// Match the grid to the client area. A changed grid reallocates both
    /// buffers and queues `RESIZE`; the strips beyond the grid are always
    /// repainted.
    fn resize_buffer(&mut self) {
        let (cw, ch) = self.glyphs.cell_size();
        if cw == 0 || ch == 0 {
            return;
        }
        let client = self
            .platform
            .client_size()
            .unwrap_or_else(|| self.platform.work_area());
        let width = u16::try_from(client.0 / cw).unwrap_or(u16::MAX);
        let height = u16::try_from(client.1 / ch).unwrap_or(u16::MAX);

        let unchanged = self
            .frame
            .as_ref()
            .is_some_and(|f| (f.width(), f.height()) == (width, height));
        if !unchanged {
            self.glyphs.flush();
            self.frame = Some(Frame::new(width, height));
            self.session.push_key(Key::RESIZE);
            debug!(width, height, "window grid resized");
        }

        self.damage
            .extend(border_rects(client, (width, height), (cw, ch)));
    }

    fn init_glyphs(&mut self) -> Result<()> {
        if self.glyphs_ready {
            self.glyphs.deinit();
            self.glyphs_ready = false;
        }
        self.glyphs.init(&self.font)?;
        self.glyphs_ready = true;
        Ok(())
    }

    fn remember_geometry(&mut self) {
        if self.mode != WindowMode::Windowed {
            return;
        }
        if let Some(geometry) = self.platform.outer_geometry() {
            self.geometry = Some(geometry);
            self.settings.store_geometry(&geometry);
        }
    }

    fn toggle_fullscreen(&mut self) -> Result<()> {
        self.remember_geometry();
        self.mode = self.mode.toggled();
        let geometry = match self.mode {
            WindowMode::Windowed => self.geometry,
            WindowMode::Fullscreen => None,
        };
        debug!(mode = ?self.mode, "switching window mode");
        self.platform.open(self.mode, geometry, &self.config.title)?;
        self.resize_buffer();
        Ok(())
    }

    fn handle_event(&mut self, event: PlatformEvent) -> Result<()> {
        trace!(?event, "window event");
        if !matches!(event, PlatformEvent::Char(_)) {
            self.swallow_char = false;
        }
        match event {
            PlatformEvent::Size { .. } => {
                if !self.glyphs_ready {
                    self.init_glyphs()?;
                }
                self.resize_buffer();
                self.update()?;
            }
            PlatformEvent::Paint(rect) => {
                self.damage.push(rect);
                self.update()?;
            }
            PlatformEvent::KeyDown { vk, alt } => {
                let mods = self.platform.modifiers();
                match keys::key_down(vk, alt, mods, self.session.keys()) {
                    KeyDown::ToggleFullscreen => {
                        self.toggle_fullscreen()?;
                        self.swallow_char = true;
                    }
                    KeyDown::Queued => self.swallow_char = true,
                    KeyDown::PassThrough => {}
                }
            }
            PlatformEvent::Char(code) => {
                if std::mem::take(&mut self.swallow_char) {
                    trace!(code, "character of a consumed key dropped");
                } else {
                    let mods = self.platform.modifiers();
                    keys::char_input(code, mods, self.session.keys());
                }
            }
            PlatformEvent::FocusGained => self.session.push_key(Key::REDRAW),
            PlatformEvent::FocusLost => {}
            PlatformEvent::ExitSizeMove => self.remember_geometry(),
            PlatformEvent::Sizing { edge, rect } => {
                self.platform.apply_sizing(clamp_sizing(edge, rect));
            }
            PlatformEvent::FontChosen(font) => {
                self.settings.store_font(&font);
                self.font = font;
                self.init_glyphs()?;
                self.resize_buffer();
                if let Some((w, h)) = self.platform.client_size() {
                    self.damage.push(Rect::from_size(w, h));
                }
                self.update()?;
            }
            PlatformEvent::ToggleFullscreen => self.toggle_fullscreen()?,
            PlatformEvent::CloseRequested => debug!("close request ignored"),
        }
        Ok(())
    }

    fn try_start(&mut self) -> Result<()> {
        self.geometry = self.settings.load_geometry();
        if let Some(font) = self.settings.load_font() {
            self.font = font;
        }
        self.mode = WindowMode::Windowed;
        self.platform
            .open(self.mode, self.geometry, &self.config.title)?;
        self.started = true;

        // Take whatever the window system delivered during creation.
        while let Some(event) = self.platform.next_event(Some(Duration::ZERO))? {
            self.handle_event(event)?;
        }
        debug!(size = ?self.screen_size(), "window display started");
        Ok(())
    }
}

impl<P: WindowPlatform, G: GlyphCache, S: SettingsStore> Display for WindowDisplay<P, G, S> {
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
        if !self.started {
            return;
        }
        self.frame = None;
        self.damage.clear();
        if self.glyphs_ready {
            self.glyphs.deinit();
            self.glyphs_ready = false;
        }
        self.platform.close();
        self.session.reset();
        self.started = false;
        debug!("window display shut down");
    }

    fn screen_size(&self) -> (u16, u16) {
        self.frame
            .as_ref()
            .map_or((0, 0), |f| (f.width(), f.height()))
    }

    fn clear_screen(&mut self) {
        let (w, h) = self.screen_size();
        self.clear_area(0, 0, i32::from(w) - 1, i32::from(h) - 1);
    }

    fn clear_area(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let blank = self.session.blank();
        if let Some(frame) = self.frame.as_mut() {
            frame.back_mut().fill_area(x1, y1, x2, y2, blank);
        }
    }

    fn write_char(&mut self, x: i32, y: i32, ch: char) {
        let cell = self.session.cell(ch);
        if let Some(frame) = self.frame.as_mut() {
            frame.back_mut().set(x, y, cell);
        }
    }

    fn set_attributes(&mut self, and: Attr, or: Attr) {
        self.session.set_attributes(and, or);
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        let (px, py) = self.session.move_cursor(x, y);
        if !self.started {
            return;
        }
        let cell = self.glyphs.cell_size();
        if cell.0 == 0 || cell.1 == 0 {
            return;
        }
        self.damage.push(caret_box(px, py, cell));
        self.damage.push(caret_box(x, y, cell));
        if let Err(e) = self.update() {
            debug!(error = %e, "caret repaint failed");
        }
    }

    fn sync(&mut self) -> Result<()> {
        self.sync_report().map(|_| ())
    }

    fn get_key(&mut self, timeout: Option<Duration>) -> Result<Key> {
        if !self.started {
            return Err(DisplayError::NotStarted);
        }
        let deadline = Deadline::new(timeout);

        loop {
            if let Some(key) = self.session.pop_key() {
                return Ok(key);
            }

            let wait = match deadline.budget() {
                Budget::Elapsed => return Ok(Key::TIMEOUT),
                Budget::Remaining(left) => Some(left),
                Budget::Infinite => None,
            };

            match self.platform.next_event(wait)? {
                Some(event) => self.handle_event(event)?,
                None if wait.is_none() => return Err(DisplayError::EventSourceClosed),
                None => {}
            }
        }
    }
}

impl<P: WindowPlatform, G: GlyphCache, S: SettingsStore> Drop for WindowDisplay<P, G, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SizingEdge;
    use crate::platform::Modifiers;
    use std::time::Instant;

    fn started(width: u32, height: u32) -> HeadlessDisplay {
        let mut display = HeadlessDisplay::headless(width, height, 8, 16);
        display.start().unwrap();
        display
    }

    const WAIT: Duration = Duration::from_millis(20);

    fn drain(display: &mut HeadlessDisplay) -> Vec<Key> {
        let mut keys = Vec::new();
        loop {
            let key = display.get_key(Some(WAIT)).unwrap();
            if key == Key::TIMEOUT {
                return keys;
            }
            keys.push(key);
        }
    }

    #[test]
    fn test_start_allocates_from_first_size() {
        let mut display = started(640, 400);
        assert_eq!(display.screen_size(), (80, 25));
        assert_eq!(display.get_key(Some(Duration::ZERO)).unwrap(), Key::RESIZE);
        assert_eq!(display.get_key(Some(Duration::ZERO)).unwrap(), Key::TIMEOUT);
    }

    #[test]
    fn test_not_started_operations() {
        let mut display = HeadlessDisplay::headless(640, 400, 8, 16);
        assert_eq!(display.screen_size(), (0, 0));
        display.write_char(0, 0, 'x');
        assert!(matches!(display.sync(), Err(DisplayError::NotStarted)));
        assert!(matches!(
            display.get_key(Some(Duration::ZERO)),
            Err(DisplayError::NotStarted)
        ));
    }

    #[test]
    fn test_failed_open_is_startup_error() {
        let mut display = WindowDisplay::new(
            HeadlessPlatform::new(640, 400).failing_open(),
            BlockGlyphCache::new(8, 16),
            MemorySettingsStore::new(),
            WindowConfig::default(),
        );
        assert!(matches!(display.start(), Err(DisplayError::Startup(_))));
        display.shutdown();
        assert_eq!(display.screen_size(), (0, 0));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut display = started(64, 32);
        display.shutdown();
        display.shutdown();
        assert_eq!(display.screen_size(), (0, 0));
        assert!(display.platform().mode().is_none());
        assert!(display.glyphs().font().is_none());
    }

    #[test]
    fn test_write_sync_presents_cell() {
        let mut display = started(640, 400);
        display.sync().unwrap();
        display.set_attributes(Attr::ALL, Attr::BOLD);
        display.write_char(0, 0, 'A');
        let repaint = display.sync_report().unwrap();
        assert_eq!(repaint.rows, vec![0]);
        let front = display.frame().unwrap().front();
        assert_eq!(front.get(0, 0).unwrap().ch, 'A');
        assert_eq!(front.get(0, 0).unwrap().attr, Attr::BOLD);
    }

    #[test]
    fn test_first_sync_repaints_every_row() {
        let mut display = started(64, 48);
        let repaint = display.sync_report().unwrap();
        assert_eq!(repaint.rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_second_sync_only_caret() {
        let mut display = started(64, 48);
        display.sync().unwrap();
        let repaint = display.sync_report().unwrap();
        assert_eq!(repaint.rows_changed(), 0);
        assert_eq!(repaint.regions, vec![caret_box(0, 0, (8, 16))]);
    }

    #[test]
    fn test_clear_screen_uses_current_attr() {
        let mut display = started(64, 48);
        display.set_attributes(Attr::NONE, Attr::REVERSE);
        display.clear_screen();
        display.sync().unwrap();
        let front = display.frame().unwrap().front();
        assert!(front.cells().iter().all(|c| c.ch == ' ' && c.attr == Attr::REVERSE));
    }

    #[test]
    fn test_set_cursor_repaints_old_and_new_caret() {
        let mut display = started(640, 400);
        display.sync().unwrap();
        display.platform_mut().clear_presents();
        display.set_cursor(5, 5);
        let presents = display.platform().presents();
        assert_eq!(presents.len(), 1);
        assert_eq!(
            presents[0],
            vec![caret_box(0, 0, (8, 16)), caret_box(5, 5, (8, 16))]
        );
        assert_eq!(display.cursor(), (5, 5));
    }

    #[test]
    fn test_set_cursor_far_off_grid_paints_nothing() {
        let mut display = started(640, 400);
        display.sync().unwrap();
        display.set_cursor(i32::MAX, i32::MIN);
        display.set_cursor(i32::MIN, i32::MAX);
        assert_eq!(display.cursor(), (i32::MIN, i32::MAX));
        display.sync().unwrap();
        let canvas = display.platform().canvas();
        assert_eq!(canvas.pixel(0, 0), Some(0));
        assert_eq!(canvas.pixel(639, 399), Some(0));

        display.set_cursor(2, 1);
        let canvas = display.platform().canvas();
        assert_eq!(canvas.pixel(16, 16), Some(crate::paint::CARET));
    }

    #[test]
    fn test_caret_pixels_follow_cursor() {
        let mut display = started(640, 400);
        display.sync().unwrap();
        display.set_cursor(2, 1);
        let canvas = display.platform().canvas();
        assert_eq!(canvas.pixel(16, 16), Some(crate::paint::CARET));
        assert_eq!(canvas.pixel(0, 0), Some(0));
    }

    #[test]
    fn test_resize_reallocates_before_writes() {
        let mut display = started(640, 400);
        assert_eq!(display.get_key(Some(Duration::ZERO)).unwrap(), Key::RESIZE);
        display.platform_mut().resize_client(800, 480);
        assert_eq!(display.get_key(Some(WAIT)).unwrap(), Key::RESIZE);
        assert_eq!(display.screen_size(), (100, 30));
        display.write_char(99, 29, '#');
        display.sync().unwrap();
        assert_eq!(display.frame().unwrap().front().get(99, 29).unwrap().ch, '#');
    }

    #[test]
    fn test_same_grid_size_no_resize_key() {
        let mut display = started(640, 400);
        drain(&mut display);
        // Extra pixels that do not add a cell.
        display.platform_mut().resize_client(645, 405);
        assert!(drain(&mut display).is_empty());
        assert_eq!(display.screen_size(), (80, 25));
    }

    #[test]
    fn test_focus_gained_is_redraw() {
        let mut display = started(64, 32);
        drain(&mut display);
        display.platform_mut().push_event(PlatformEvent::FocusGained);
        assert_eq!(display.get_key(None).unwrap(), Key::REDRAW);
    }

    #[test]
    fn test_key_down_then_swallowed_char() {
        let mut display = started(64, 32);
        drain(&mut display);
        let p = display.platform_mut();
        p.push_event(PlatformEvent::KeyDown { vk: 0x0D, alt: false });
        p.push_event(PlatformEvent::Char(0x0D));
        p.push_event(PlatformEvent::KeyDown { vk: u16::from(b'Q'), alt: false });
        p.push_event(PlatformEvent::Char(u32::from('q')));
        assert_eq!(drain(&mut display), vec![Key(-0x0D), Key::char('q')]);
    }

    #[test]
    fn test_ctrl_a_as_char() {
        let mut display = started(64, 32);
        drain(&mut display);
        let p = display.platform_mut();
        p.push_event_with(PlatformEvent::KeyDown { vk: u16::from(b'A'), alt: false }, Modifiers::CTRL);
        p.push_event_with(PlatformEvent::Char(1), Modifiers::CTRL);
        let key = display.get_key(None).unwrap();
        assert_eq!(key, Key::ctrl_ascii(1));
        assert_eq!(display.key_name(key), "KEY_^A");
    }

    #[test]
    fn test_alt_letter_queues_escape_then_char() {
        let mut display = started(64, 32);
        drain(&mut display);
        let p = display.platform_mut();
        p.push_event(PlatformEvent::KeyDown { vk: u16::from(b'F'), alt: true });
        p.push_event(PlatformEvent::Char(u32::from('f')));
        assert_eq!(drain(&mut display), vec![Key(-0x1B), Key::char('f')]);
    }

    #[test]
    fn test_timeout_bounds() {
        let mut display = started(64, 32);
        drain(&mut display);
        let start = Instant::now();
        let key = display.get_key(Some(Duration::from_millis(100))).unwrap();
        let elapsed = start.elapsed();
        assert_eq!(key, Key::TIMEOUT);
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(500));
    }

    #[test]
    fn test_infinite_wait_on_exhausted_script() {
        let mut display = started(64, 32);
        drain(&mut display);
        assert!(matches!(
            display.get_key(None),
            Err(DisplayError::EventSourceClosed)
        ));
    }

    #[test]
    fn test_alt_return_toggles_fullscreen_and_back() {
        let mut display = WindowDisplay::new(
            HeadlessPlatform::new(640, 400).with_work_area(1024, 768),
            BlockGlyphCache::new(8, 16),
            MemorySettingsStore::new(),
            WindowConfig::default(),
        );
        display.start().unwrap();
        drain(&mut display);

        display.platform_mut().push_event(PlatformEvent::KeyDown { vk: 0x0D, alt: true });
        assert_eq!(drain(&mut display), vec![Key::RESIZE]);
        assert_eq!(display.mode(), WindowMode::Fullscreen);
        assert_eq!(display.screen_size(), (128, 48));
        assert!(display.settings().load_geometry().is_some());

        display.platform_mut().push_event(PlatformEvent::ToggleFullscreen);
        assert_eq!(drain(&mut display), vec![Key::RESIZE]);
        assert_eq!(display.mode(), WindowMode::Windowed);
        assert_eq!(display.screen_size(), (80, 25));
    }

    #[test]
    fn test_exit_size_move_persists_geometry() {
        let mut display = started(640, 400);
        drain(&mut display);
        display.platform_mut().move_to(33, 44);
        display.platform_mut().push_event(PlatformEvent::ExitSizeMove);
        drain(&mut display);
        let g = display.settings().load_geometry().unwrap();
        assert_eq!((g.x, g.y, g.width, g.height), (33, 44, 640, 400));
    }

    #[test]
    fn test_restores_persisted_geometry() {
        let mut settings = MemorySettingsStore::new();
        settings.store_geometry(&WindowGeometry {
            x: 1,
            y: 2,
            width: 320,
            height: 160,
        });
        let mut display = WindowDisplay::new(
            HeadlessPlatform::new(640, 400),
            BlockGlyphCache::new(8, 16),
            settings,
            WindowConfig::default(),
        );
        display.start().unwrap();
        assert_eq!(display.screen_size(), (40, 10));
    }

    #[test]
    fn test_sizing_is_clamped() {
        let mut display = started(640, 400);
        drain(&mut display);
        display.platform_mut().push_event(PlatformEvent::Sizing {
            edge: SizingEdge::Right,
            rect: Rect::new(0, 0, 20, 300),
        });
        drain(&mut display);
        assert_eq!(display.platform().sizing(), &[Rect::new(0, 0, 100, 300)]);
    }

    #[test]
    fn test_font_choice_persists_and_reinitializes() {
        let mut display = started(640, 400);
        drain(&mut display);
        let font = FontDescriptor {
            family: "Iosevka".to_string(),
            size: 20.0,
            path: None,
        };
        display.platform_mut().push_event(PlatformEvent::FontChosen(font.clone()));
        drain(&mut display);
        assert_eq!(display.settings().load_font(), Some(font.clone()));
        assert_eq!(display.glyphs().font(), Some(&font));
    }

    #[test]
    fn test_close_request_ignored() {
        let mut display = started(64, 32);
        drain(&mut display);
        display.platform_mut().push_event(PlatformEvent::CloseRequested);
        assert!(drain(&mut display).is_empty());
        assert!(display.platform().mode().is_some());
    }

    #[test]
    fn test_paint_event_repaints_region() {
        let mut display = started(64, 32);
        display.write_char(0, 0, 'x');
        display.sync().unwrap();
        display.platform_mut().clear_presents();
        display.platform_mut().push_event(PlatformEvent::Paint(Rect::new(0, 0, 8, 16)));
        drain(&mut display);
        assert_eq!(display.platform().presents(), &[vec![Rect::new(0, 0, 8, 16)]]);
        assert!(display.platform().canvas().lit_in(Rect::new(1, 1, 7, 15)) > 0);
    }
}
