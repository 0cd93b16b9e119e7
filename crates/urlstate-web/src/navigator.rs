#![forbid(unsafe_code)]

//! Navigation seam and an in-memory history.
//!
//! # Invariants
//!
//! 1. `MemoryHistory` always has at least one entry and a cursor inside the
//!    entry list.
//! 2. A push drops every entry after the cursor.
//! 3. The location observable changes only after the entry list is updated,
//!    and no borrow is held while its subscribers run.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;
use urlstate_core::PageUrl;
use urlstate_runtime::Observable;

use crate::error::{Result, WebError};

/// Flags carried by every navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GotoOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace_state: bool,
    /// Keep the scroll position.
    pub no_scroll: bool,
    /// Keep input focus on the currently focused element.
    pub keep_focus: bool,
}

/// Client-side router.
pub trait Navigator {
    /// Current location.
    fn location(&self) -> PageUrl;

    /// Navigate to `href`, resolved against the current location.
    fn goto(&self, href: &str, options: GotoOptions) -> Result<()>;
}

impl<N: Navigator + ?Sized> Navigator for Rc<N> {
    fn location(&self) -> PageUrl {
        (**self).location()
    }

    fn goto(&self, href: &str, options: GotoOptions) -> Result<()> {
        (**self).goto(href, options)
    }
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn location(&self) -> PageUrl {
        (**self).location()
    }

    fn goto(&self, href: &str, options: GotoOptions) -> Result<()> {
        (**self).goto(href, options)
    }
}

// ── MemoryHistory ───────────────────────────────────────────────────────

/// A navigation as it was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub href: String,
    pub options: GotoOptions,
}

struct HistoryInner {
    origin: String,
    entries: Vec<PageUrl>,
    cursor: usize,
    log: Vec<Navigation>,
}

/// In-memory history stack.
///
/// Cloning creates a new handle to the **same** history.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<HistoryInner>>,
    location: Observable<PageUrl>,
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryHistory")
            .field("origin", &inner.origin)
            .field("entries", &inner.entries.len())
            .field("cursor", &inner.cursor)
            .field("location", &inner.entries[inner.cursor].href())
            .finish()
    }
}

impl MemoryHistory {
    pub const DEFAULT_ORIGIN: &'static str = "http://localhost";

    /// History with a single entry at `href`.
    #[must_use]
    pub fn new(href: &str) -> Self {
        Self::with_origin(Self::DEFAULT_ORIGIN, href)
    }

    /// History that only accepts absolute URLs under `origin`.
    #[must_use]
    pub fn with_origin(origin: &str, href: &str) -> Self {
        let url = PageUrl::parse(href);
        Self {
            inner: Rc::new(RefCell::new(HistoryInner {
                origin: origin.trim_end_matches('/').to_string(),
                entries: vec![url.clone()],
                cursor: 0,
                log: Vec::new(),
            })),
            location: Observable::new(url),
        }
    }

    /// The current location as an observable, for tracking by resources
    /// and computed values.
    #[must_use]
    pub fn location_signal(&self) -> Observable<PageUrl> {
        self.location.clone()
    }

    /// Number of entries in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Always false; a history has at least its initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every entry's href, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.inner.borrow().entries.iter().map(PageUrl::href).collect()
    }

    /// Every navigation requested so far, oldest first.
    #[must_use]
    pub fn navigations(&self) -> Vec<Navigation> {
        self.inner.borrow().log.clone()
    }

    #[must_use]
    pub fn last_navigation(&self) -> Option<Navigation> {
        self.inner.borrow().log.last().cloned()
    }

    /// Step back one entry. Returns false at the oldest entry.
    pub fn back(&self) -> bool {
        self.step(-1)
    }

    /// Step forward one entry. Returns false at the newest entry.
    pub fn forward(&self) -> bool {
        self.step(1)
    }

    fn step(&self, delta: isize) -> bool {
        let url = {
            let mut inner = self.inner.borrow_mut();
            let Some(next) = inner.cursor.checked_add_signed(delta) else {
                return false;
            };
            if next >= inner.entries.len() {
                return false;
            }
            inner.cursor = next;
            inner.entries[next].clone()
        };
        self.location.set(url);
        true
    }

    fn check_origin(&self, href: &str) -> Result<()> {
        if !href.contains("://") {
            return Ok(());
        }
        let inner = self.inner.borrow();
        let same_origin = href
            .strip_prefix(inner.origin.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']));
        if same_origin {
            Ok(())
        } else {
            Err(WebError::rejected(href, format!("outside origin {}", inner.origin)))
        }
    }
}

impl Navigator for MemoryHistory {
    fn location(&self) -> PageUrl {
        self.location.get()
    }

    fn goto(&self, href: &str, options: GotoOptions) -> Result<()> {
        self.check_origin(href)?;
        debug!(
            href,
            replace_state = options.replace_state,
            no_scroll = options.no_scroll,
            keep_focus = options.keep_focus,
            "navigate"
        );

        let url = {
            let mut inner = self.inner.borrow_mut();
            let cursor = inner.cursor;
            let url = inner.entries[cursor].resolve(href);
            if options.replace_state {
                inner.entries[cursor] = url.clone();
            } else {
                inner.entries.truncate(cursor + 1);
                inner.entries.push(url.clone());
                inner.cursor = cursor + 1;
            }
            inner.log.push(Navigation {
                href: href.to_string(),
                options,
            });
            url
        };
        self.location.set(url);
        Ok(())
    }
}
