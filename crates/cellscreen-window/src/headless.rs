//! Scripted window platform over a [`PixelCanvas`].

use std::collections::VecDeque;
use std::time::Duration;

use cellscreen_core::{DisplayError, Result};

use crate::canvas::{Canvas, PixelCanvas};
use crate::geometry::{Rect, WindowGeometry};
use crate::platform::{Modifiers, PlatformEvent, WindowMode, WindowPlatform};

/// A window that exists only in memory.
///
/// Events are replayed from a script; an empty script behaves like an idle
/// user (waits out the timeout, then reports nothing). Every present is
/// recorded so tests can inspect which regions were repainted.
#[derive(Debug)]
pub struct HeadlessPlatform {
    client: (u32, u32),
    work_area: (u32, u32),
    geometry: WindowGeometry,
    mode: Option<WindowMode>,
    events: VecDeque<(PlatformEvent, Modifiers)>,
    modifiers: Modifiers,
    canvas: PixelCanvas,
    presents: Vec<Vec<Rect>>,
    sizing: Vec<Rect>,
    opens: usize,
    fail_open: bool,
}

impl HeadlessPlatform {
    /// Platform whose windows open with a `width` by `height` client area.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            client: (width, height),
            work_area: (1920, 1080),
            geometry: WindowGeometry {
                x: 0,
                y: 0,
                width,
                height,
            },
            mode: None,
            events: VecDeque::new(),
            modifiers: Modifiers::NONE,
            canvas: PixelCanvas::default(),
            presents: Vec::new(),
            sizing: Vec::new(),
            opens: 0,
            fail_open: false,
        }
    }

    /// Queue events delivered with no modifiers held.
    #[must_use]
    pub fn with_events(mut self, events: Vec<PlatformEvent>) -> Self {
        for event in events {
            self.push_event(event);
        }
        self
    }

    /// Monitor size used for fullscreen windows.
    #[must_use]
    pub const fn with_work_area(mut self, width: u32, height: u32) -> Self {
        self.work_area = (width, height);
        self
    }

    /// Make `open` fail.
    #[must_use]
    pub const fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn push_event(&mut self, event: PlatformEvent) {
        self.push_event_with(event, Modifiers::NONE);
    }

    /// Queue an event generated while `modifiers` were held.
    pub fn push_event_with(&mut self, event: PlatformEvent, modifiers: Modifiers) {
        self.events.push_back((event, modifiers));
    }

    /// Resize the client area as a user drag would, queueing the `Size` event.
    pub fn resize_client(&mut self, width: u32, height: u32) {
        self.client = (width, height);
        self.geometry.width = width;
        self.geometry.height = height;
        self.push_event(PlatformEvent::Size { width, height });
    }

    /// Move the window without resizing it.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.geometry.x = x;
        self.geometry.y = y;
    }

    /// Current mode, `None` while closed.
    #[must_use]
    pub const fn mode(&self) -> Option<WindowMode> {
        self.mode
    }

    /// How many times a window was opened.
    #[must_use]
    pub const fn opens(&self) -> usize {
        self.opens
    }

    /// The framebuffer as last painted.
    #[must_use]
    pub const fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    /// Regions passed to each `end_paint`, oldest first.
    #[must_use]
    pub fn presents(&self) -> &[Vec<Rect>] {
        &self.presents
    }

    /// Forget recorded presents.
    pub fn clear_presents(&mut self) {
        self.presents.clear();
    }

    /// Rectangles applied by sizing drags.
    #[must_use]
    pub fn sizing(&self) -> &[Rect] {
        &self.sizing
    }

    /// Events still queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl WindowPlatform for HeadlessPlatform {
    fn open(
        &mut self,
        mode: WindowMode,
        geometry: Option<WindowGeometry>,
        _title: &str,
    ) -> Result<()> {
        if self.fail_open {
            return Err(DisplayError::Startup("window could not be created".to_string()));
        }
        match mode {
            WindowMode::Windowed => {
                if let Some(g) = geometry {
                    self.geometry = g;
                    self.client = (g.width, g.height);
                }
            }
            WindowMode::Fullscreen => self.client = self.work_area,
        }
        self.mode = Some(mode);
        self.opens += 1;
        self.canvas.resize(self.client.0, self.client.1);
        // The size notification arrives while the window is being created,
        // ahead of anything already queued.
        self.events.push_front((
            PlatformEvent::Size {
                width: self.client.0,
                height: self.client.1,
            },
            Modifiers::NONE,
        ));
        Ok(())
    }

    fn close(&mut self) {
        self.mode = None;
    }

    fn client_size(&self) -> Option<(u32, u32)> {
        self.mode.map(|_| self.client)
    }

    fn work_area(&self) -> (u32, u32) {
        self.work_area
    }

    fn outer_geometry(&self) -> Option<WindowGeometry> {
        self.mode.map(|_| self.geometry)
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn next_event(&mut self, timeout: Option<Duration>) -> Result<Option<PlatformEvent>> {
        match self.events.pop_front() {
            Some((event, modifiers)) => {
                self.modifiers = modifiers;
                if let PlatformEvent::Size { width, height } = event {
                    if self.canvas.size() != (width, height) {
                        self.canvas.resize(width, height);
                    }
                }
                Ok(Some(event))
            }
            None => {
                if let Some(timeout) = timeout {
                    std::thread::sleep(timeout);
                }
                Ok(None)
            }
        }
    }

    fn apply_sizing(&mut self, rect: Rect) {
        self.sizing.push(rect);
    }

    fn begin_paint(&mut self) -> &mut dyn Canvas {
        &mut self.canvas
    }

    fn end_paint(&mut self, regions: &[Rect]) -> Result<()> {
        self.canvas.set_clip(None);
        self.presents.push(regions.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_queues_size_first() {
        let mut platform = HeadlessPlatform::new(640, 400).with_events(vec![PlatformEvent::FocusGained]);
        platform.open(WindowMode::Windowed, None, "t").unwrap();
        assert_eq!(
            platform.next_event(Some(Duration::ZERO)).unwrap(),
            Some(PlatformEvent::Size {
                width: 640,
                height: 400
            })
        );
        assert_eq!(
            platform.next_event(Some(Duration::ZERO)).unwrap(),
            Some(PlatformEvent::FocusGained)
        );
        assert_eq!(platform.canvas().size(), (640, 400));
    }

    #[test]
    fn test_open_restores_geometry() {
        let mut platform = HeadlessPlatform::new(640, 400);
        let g = WindowGeometry {
            x: 5,
            y: 6,
            width: 300,
            height: 200,
        };
        platform.open(WindowMode::Windowed, Some(g), "t").unwrap();
        assert_eq!(platform.client_size(), Some((300, 200)));
        assert_eq!(platform.outer_geometry(), Some(g));
    }

    #[test]
    fn test_fullscreen_uses_work_area() {
        let mut platform = HeadlessPlatform::new(640, 400).with_work_area(1024, 768);
        platform.open(WindowMode::Fullscreen, None, "t").unwrap();
        assert_eq!(platform.client_size(), Some((1024, 768)));
    }

    #[test]
    fn test_closed_platform_has_no_client() {
        let mut platform = HeadlessPlatform::new(10, 10);
        assert_eq!(platform.client_size(), None);
        platform.open(WindowMode::Windowed, None, "t").unwrap();
        platform.close();
        assert_eq!(platform.client_size(), None);
        assert_eq!(platform.outer_geometry(), None);
    }

    #[test]
    fn test_failing_open() {
        let mut platform = HeadlessPlatform::new(10, 10).failing_open();
        assert!(matches!(
            platform.open(WindowMode::Windowed, None, "t"),
            Err(DisplayError::Startup(_))
        ));
    }

    #[test]
    fn test_modifiers_follow_events() {
        let mut platform = HeadlessPlatform::new(10, 10);
        platform.push_event_with(PlatformEvent::KeyDown { vk: 0x25, alt: false }, Modifiers::CTRL);
        platform.push_event(PlatformEvent::FocusLost);
        platform.next_event(None).unwrap();
        assert_eq!(platform.modifiers(), Modifiers::CTRL);
        platform.next_event(None).unwrap();
        assert_eq!(platform.modifiers(), Modifiers::NONE);
    }

    #[test]
    fn test_empty_script_waits_out_timeout() {
        let mut platform = HeadlessPlatform::new(10, 10);
        let start = std::time::Instant::now();
        assert_eq!(platform.next_event(Some(Duration::from_millis(20))).unwrap(), None);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
