//! Gallery viewer state machine.
//!
//! The gallery page opens a full-screen overlay when a card is selected. This
//! module is the authoritative model of that overlay; `static/site.js`
//! implements the same transitions in the browser, and the page renderer asks
//! the model which controls each pre-rendered slide needs.
//!
//! ```text
//!            open(i)                 previous (i > 0)
//!  Closed ───────────▶ Open(i) ◀──────────────────────┐
//!    ▲                   │  │                          │
//!    └───── close ───────┘  └──── next (i < len-1) ────┘
//! ```
//!
//! Entering `Open` locks background scrolling and binds the arrow/escape keys
//! on the [`ViewerHost`]; leaving it releases both. Dropping an open viewer
//! (navigating away) releases them too, so a lock can never outlive the
//! overlay.

/// Where the viewer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Closed,
    Open(usize),
}

/// Keys the viewer reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Side effects of opening and closing the overlay.
pub trait ViewerHost {
    /// Stop the page behind the overlay from scrolling.
    fn lock_scroll(&mut self);
    fn unlock_scroll(&mut self);
    /// Start listening for arrow/escape keys.
    fn bind_keys(&mut self);
    fn unbind_keys(&mut self);
}

/// Host that does nothing; used when only the transitions matter, e.g. while
/// pre-rendering slides.
#[derive(Debug, Default)]
pub struct NoopHost;

impl ViewerHost for NoopHost {
    fn lock_scroll(&mut self) {}
    fn unlock_scroll(&mut self) {}
    fn bind_keys(&mut self) {}
    fn unbind_keys(&mut self) {}
}

/// Modal viewer over a list of `len` already-loaded items.
#[derive(Debug)]
pub struct Viewer<H: ViewerHost> {
    host: H,
    len: usize,
    state: ViewerState,
}

impl<H: ViewerHost> Viewer<H> {
    pub fn new(len: usize, host: H) -> Self {
        Self {
            host,
            len,
            state: ViewerState::Closed,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Open(_))
    }

    pub fn selected(&self) -> Option<usize> {
        match self.state {
            ViewerState::Open(i) => Some(i),
            ViewerState::Closed => None,
        }
    }

    /// Select item `index`. Out-of-range indices are ignored.
    pub fn open(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        if self.state == ViewerState::Closed {
            self.host.lock_scroll();
            self.host.bind_keys();
        }
        self.state = ViewerState::Open(index);
    }

    pub fn close(&mut self) {
        if self.state == ViewerState::Closed {
            return;
        }
        self.host.unbind_keys();
        self.host.unlock_scroll();
        self.state = ViewerState::Closed;
    }

    pub fn previous(&mut self) {
        if let ViewerState::Open(i) = self.state {
            if i > 0 {
                self.state = ViewerState::Open(i - 1);
            }
        }
    }

    pub fn next(&mut self) {
        if let ViewerState::Open(i) = self.state {
            if i + 1 < self.len {
                self.state = ViewerState::Open(i + 1);
            }
        }
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.state, ViewerState::Open(i) if i > 0)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.state, ViewerState::Open(i) if i + 1 < self.len)
    }

    /// 1-based position such as `3 / 5`.
    pub fn position(&self) -> Option<String> {
        self.selected().map(|i| format!("{} / {}", i + 1, self.len))
    }

    /// Keys are only bound while open; anything arriving while closed is
    /// dropped.
    pub fn handle_key(&mut self, key: Key) {
        if !self.is_open() {
            return;
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            Key::Other => {}
        }
    }
}

impl<H: ViewerHost> Drop for Viewer<H> {
    fn drop(&mut self) {
        self.close();
    }
}
