#![forbid(unsafe_code)]

//! Lifecycle hooks for a single run.
//!
//! Hooks are owned by the run they were passed to and dropped when it ends
//! or is superseded, so two runs never share a mutable closure.

use std::fmt;

/// Lifecycle notifications for one run. Every method defaults to a no-op.
pub trait RunHooks {
    /// The run was accepted and is about to draw its first frame.
    fn on_start(&mut self) {}

    /// A frame was written to the surface.
    fn on_update(&mut self, _text: &str) {}

    /// The run converged on its target text.
    fn on_complete(&mut self) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl RunHooks for NoHooks {}

type StartFn = Box<dyn FnMut()>;
type UpdateFn = Box<dyn FnMut(&str)>;

/// Closure-backed hooks, built up one callback at a time.
///
/// ```
/// use scramble_text::hooks::FnHooks;
///
/// let hooks = FnHooks::new()
///     .with_complete(|| println!("resolved"));
/// # let _ = hooks;
/// ```
#[derive(Default)]
pub struct FnHooks {
    start: Option<StartFn>,
    update: Option<UpdateFn>,
    complete: Option<StartFn>,
}

impl fmt::Debug for FnHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHooks")
            .field("on_start", &self.start.is_some())
            .field("on_update", &self.update.is_some())
            .field("on_complete", &self.complete.is_some())
            .finish()
    }
}

impl FnHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_start(mut self, f: impl FnMut() + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_update(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }
}

impl RunHooks for FnHooks {
    fn on_start(&mut self) {
        if let Some(f) = &mut self.start {
            f();
        }
    }

    fn on_update(&mut self, text: &str) {
        if let Some(f) = &mut self.update {
            f(text);
        }
    }

    fn on_complete(&mut self) {
        if let Some(f) = &mut self.complete {
            f();
        }
    }
}
