//! Real window: winit for events, softbuffer for presentation.
//!
//! The event loop is pumped from `next_event`, so the display keeps its
//! synchronous `get_key` contract on the thread that created the loop.

use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Duration;

use cellscreen_core::{Budget, Deadline, DisplayError, Result};
use softbuffer::{Context, Surface};
use tracing::debug;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::canvas::{Canvas, PixelCanvas};
use crate::geometry::{Rect, WindowGeometry, MIN_WINDOW_EDGE};
use crate::keys::ctrl_letter;
use crate::platform::{Modifiers, PlatformEvent, WindowMode, WindowPlatform};

/// Virtual-key code for keys that only produce text.
const VK_OEM: u16 = 0xBA;

const FUNCTION_KEYS: [NamedKey; 24] = [
    NamedKey::F1,
    NamedKey::F2,
    NamedKey::F3,
    NamedKey::F4,
    NamedKey::F5,
    NamedKey::F6,
    NamedKey::F7,
    NamedKey::F8,
    NamedKey::F9,
    NamedKey::F10,
    NamedKey::F11,
    NamedKey::F12,
    NamedKey::F13,
    NamedKey::F14,
    NamedKey::F15,
    NamedKey::F16,
    NamedKey::F17,
    NamedKey::F18,
    NamedKey::F19,
    NamedKey::F20,
    NamedKey::F21,
    NamedKey::F22,
    NamedKey::F23,
    NamedKey::F24,
];

type Queue = VecDeque<(PlatformEvent, Modifiers)>;

fn startup(e: impl std::fmt::Display) -> DisplayError {
    DisplayError::Startup(e.to_string())
}

fn present_error(e: impl std::fmt::Display) -> DisplayError {
    DisplayError::Io(std::io::Error::other(e.to_string()))
}

/// A winit window presented through a softbuffer surface.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    window: Option<Rc<Window>>,
    #[allow(dead_code)]
    context: Option<Context<Rc<Window>>>,
    surface: Option<Surface<Rc<Window>, Rc<Window>>>,
    canvas: PixelCanvas,
    queue: Queue,
    held: ModifiersState,
    current: Modifiers,
    exited: bool,
}

impl WinitPlatform {
    /// Create the event loop. Must run on the main thread on most platforms.
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().map_err(startup)?;
        Ok(Self {
            event_loop,
            window: None,
            context: None,
            surface: None,
            canvas: PixelCanvas::default(),
            queue: VecDeque::new(),
            held: ModifiersState::empty(),
            current: Modifiers::NONE,
            exited: false,
        })
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        let Self {
            event_loop,
            canvas,
            queue,
            held,
            ..
        } = self;
        let status = event_loop.pump_events(timeout, |event, _| {
            if let Event::WindowEvent { event, .. } = event {
                translate(event, held, canvas, queue);
            }
        });
        if let PumpStatus::Exit(code) = status {
            debug!(code, "window event loop exited");
            self.exited = true;
        }
    }

    fn pop(&mut self) -> Option<PlatformEvent> {
        let (event, modifiers) = self.queue.pop_front()?;
        self.current = modifiers;
        Some(event)
    }
}

fn translate(event: WindowEvent, held: &mut ModifiersState, canvas: &mut PixelCanvas, queue: &mut Queue) {
    let mods = Modifiers {
        ctrl: held.control_key(),
        shift: held.shift_key(),
    };
    match event {
        WindowEvent::Resized(size) => {
            canvas.resize(size.width, size.height);
            queue.push_back((
                PlatformEvent::Size {
                    width: size.width,
                    height: size.height,
                },
                mods,
            ));
            queue.push_back((
                PlatformEvent::Paint(Rect::from_size(size.width, size.height)),
                mods,
            ));
        }
        WindowEvent::RedrawRequested => {
            let (w, h) = canvas.size();
            queue.push_back((PlatformEvent::Paint(Rect::from_size(w, h)), mods));
        }
        WindowEvent::Focused(true) => queue.push_back((PlatformEvent::FocusGained, mods)),
        WindowEvent::Focused(false) => queue.push_back((PlatformEvent::FocusLost, mods)),
        WindowEvent::Moved(_) => queue.push_back((PlatformEvent::ExitSizeMove, mods)),
        WindowEvent::CloseRequested => queue.push_back((PlatformEvent::CloseRequested, mods)),
        WindowEvent::ModifiersChanged(m) => *held = m.state(),
        WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
            key_events(&event, held.alt_key(), mods, queue);
        }
        _ => {}
    }
}

/// A pressed key as a key-down plus, for text keys, a character.
fn key_events(event: &KeyEvent, alt: bool, mods: Modifiers, queue: &mut Queue) {
    match &event.logical_key {
        WinitKey::Named(named) => {
            if let Some(vk) = named_vk(*named) {
                queue.push_back((PlatformEvent::KeyDown { vk, alt }, mods));
            }
            if *named == NamedKey::Space {
                queue.push_back((PlatformEvent::Char(0x20), mods));
            }
        }
        WinitKey::Character(text) => {
            let Some(ch) = text.chars().next() else {
                return;
            };
            let vk = if ch.is_ascii_alphanumeric() {
                u32::from(ch.to_ascii_uppercase()) as u16
            } else {
                VK_OEM
            };
            queue.push_back((PlatformEvent::KeyDown { vk, alt }, mods));
            let code = if mods.ctrl {
                ctrl_letter(ch).unwrap_or_else(|| u32::from(ch))
            } else {
                u32::from(ch)
            };
            queue.push_back((PlatformEvent::Char(code), mods));
        }
        _ => {}
    }
}

fn named_vk(key: NamedKey) -> Option<u16> {
    let vk = match key {
        NamedKey::Backspace => 0x08,
        NamedKey::Tab => 0x09,
        NamedKey::Enter => 0x0D,
        NamedKey::Shift => 0x10,
        NamedKey::Control => 0x11,
        NamedKey::Alt => 0x12,
        NamedKey::Pause => 0x13,
        NamedKey::CapsLock => 0x14,
        NamedKey::Escape => 0x1B,
        NamedKey::Space => 0x20,
        NamedKey::PageUp => 0x21,
        NamedKey::PageDown => 0x22,
        NamedKey::End => 0x23,
        NamedKey::Home => 0x24,
        NamedKey::ArrowLeft => 0x25,
        NamedKey::ArrowUp => 0x26,
        NamedKey::ArrowRight => 0x27,
        NamedKey::ArrowDown => 0x28,
        NamedKey::PrintScreen => 0x2C,
        NamedKey::Insert => 0x2D,
        NamedKey::Delete => 0x2E,
        NamedKey::Super => 0x5B,
        NamedKey::NumLock => 0x90,
        other => {
            let n = FUNCTION_KEYS.iter().position(|&f| f == other)?;
            0x70 + n as u16
        }
    };
    Some(vk)
}

impl WindowPlatform for WinitPlatform {
    fn open(&mut self, mode: WindowMode, geometry: Option<WindowGeometry>, title: &str) -> Result<()> {
        if let Some(window) = &self.window {
            match mode {
                WindowMode::Fullscreen => window.set_fullscreen(Some(Fullscreen::Borderless(None))),
                WindowMode::Windowed => {
                    window.set_fullscreen(None);
                    if let Some(g) = geometry {
                        window.set_outer_position(PhysicalPosition::new(g.x, g.y));
                        let _ = window.request_inner_size(PhysicalSize::new(g.width, g.height));
                    }
                }
            }
            return Ok(());
        }

        let min = MIN_WINDOW_EDGE as u32;
        let mut builder = WindowBuilder::new()
            .with_title(title)
            .with_min_inner_size(PhysicalSize::new(min, min));
        match mode {
            WindowMode::Fullscreen => {
                builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
            }
            WindowMode::Windowed => {
                if let Some(g) = geometry {
                    builder = builder
                        .with_position(PhysicalPosition::new(g.x, g.y))
                        .with_inner_size(PhysicalSize::new(g.width, g.height));
                }
            }
        }

        let window = Rc::new(builder.build(&self.event_loop).map_err(startup)?);
        let context = Context::new(window.clone()).map_err(startup)?;
        let surface = Surface::new(&context, window.clone()).map_err(startup)?;

        let size = window.inner_size();
        self.canvas.resize(size.width, size.height);
        self.queue.push_front((
            PlatformEvent::Size {
                width: size.width,
                height: size.height,
            },
            Modifiers::NONE,
        ));
        debug!(width = size.width, height = size.height, ?mode, "window opened");

        self.window = Some(window);
        self.context = Some(context);
        self.surface = Some(surface);
        Ok(())
    }

    fn close(&mut self) {
        self.surface = None;
        self.context = None;
        self.window = None;
    }

    fn client_size(&self) -> Option<(u32, u32)> {
        self.window.as_ref().map(|w| {
            let size = w.inner_size();
            (size.width, size.height)
        })
    }

    fn work_area(&self) -> (u32, u32) {
        self.window
            .as_ref()
            .and_then(|w| w.current_monitor())
            .map_or_else(|| self.canvas.size(), |m| (m.size().width, m.size().height))
    }

    fn outer_geometry(&self) -> Option<WindowGeometry> {
        let window = self.window.as_ref()?;
        let position = window.outer_position().ok()?;
        let size = window.outer_size();
        Some(WindowGeometry {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        })
    }

    fn modifiers(&self) -> Modifiers {
        self.current
    }

    fn next_event(&mut self, timeout: Option<Duration>) -> Result<Option<PlatformEvent>> {
        let deadline = Deadline::new(timeout);
        loop {
            if let Some(event) = self.pop() {
                return Ok(Some(event));
            }
            if self.exited {
                return Err(DisplayError::EventSourceClosed);
            }
            match deadline.budget() {
                Budget::Elapsed => {
                    self.pump(Some(Duration::ZERO));
                    return Ok(self.pop());
                }
                Budget::Remaining(left) => self.pump(Some(left)),
                Budget::Infinite => self.pump(None),
            }
        }
    }

    fn apply_sizing(&mut self, rect: Rect) {
        if let Some(window) = &self.window {
            let size = PhysicalSize::new(rect.width().max(0) as u32, rect.height().max(0) as u32);
            let _ = window.request_inner_size(size);
        }
    }

    fn begin_paint(&mut self) -> &mut dyn Canvas {
        &mut self.canvas
    }

    fn end_paint(&mut self, _regions: &[Rect]) -> Result<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let (w, h) = self.canvas.size();
        let (Some(nw), Some(nh)) = (NonZeroU32::new(w), NonZeroU32::new(h)) else {
            return Ok(());
        };
        surface.resize(nw, nh).map_err(present_error)?;
        let mut buffer = surface.buffer_mut().map_err(present_error)?;
        let pixels = self.canvas.pixels();
        let n = buffer.len().min(pixels.len());
        buffer[..n].copy_from_slice(&pixels[..n]);
        buffer.present().map_err(present_error)?;
        Ok(())
    }
}
