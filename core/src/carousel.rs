//! Carousel state machine: index bookkeeping, the transition lock, and the
//! drag lifecycle. All visual output goes through [`SlideRenderer`]; all
//! timing comes in as caller-supplied millisecond timestamps.

use crate::gesture::{PointerKind, SwipeTracker, SwipeVerdict};
use crate::position::committed_offset;
use crate::renderer::{ControlState, SlideRenderer};

/// How long a committed navigation keeps further navigation locked out
/// while its animation settles.
pub const TRANSITION_MS: f64 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

#[derive(Clone, Copy, Debug, Default)]
struct TransitionLock {
    engaged_at: Option<f64>,
}

impl TransitionLock {
    fn engaged(&self, now_ms: f64) -> bool {
        self.engaged_at
            .map(|at| now_ms - at < TRANSITION_MS)
            .unwrap_or(false)
    }

    fn engage(&mut self, now_ms: f64) {
        self.engaged_at = Some(now_ms);
    }

    fn clear(&mut self) {
        self.engaged_at = None;
    }
}

/// One carousel instance. Multiple independent instances may coexist on a
/// page; nothing here is shared.
#[derive(Clone, Copy, Debug)]
pub struct Carousel {
    slide_count: usize,
    current_index: usize,
    infinite: bool,
    lock: TransitionLock,
    drag: Option<SwipeTracker>,
}

impl Carousel {
    pub fn new(slide_count: usize, infinite: bool) -> Self {
        Self {
            slide_count,
            current_index: 0,
            infinite,
            lock: TransitionLock::default(),
            drag: None,
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn infinite(&self) -> bool {
        self.infinite
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_transitioning(&self, now_ms: f64) -> bool {
        self.lock.engaged(now_ms)
    }

    /// Fewer than two slides means there is nothing to navigate: controls
    /// hide and every gesture or navigation request is a no-op.
    pub fn disabled(&self) -> bool {
        self.slide_count <= 1
    }

    pub fn controls(&self) -> ControlState {
        let at_first = self.current_index == 0;
        let at_last = self.slide_count == 0 || self.current_index == self.slide_count - 1;
        ControlState {
            prev_enabled: self.infinite || !at_first,
            next_enabled: self.infinite || !at_last,
            active_index: self.current_index,
            visible: !self.disabled(),
        }
    }

    /// Wrap/clamp-aware neighbor indices, for image preloading. `None` when
    /// the neighbor would be the current slide itself.
    pub fn adjacent_indices(&self) -> (Option<usize>, Option<usize>) {
        if self.disabled() {
            return (None, None);
        }
        let prev = if self.infinite {
            (self.current_index + self.slide_count - 1) % self.slide_count
        } else {
            self.current_index.saturating_sub(1)
        };
        let next = if self.infinite {
            (self.current_index + 1) % self.slide_count
        } else {
            (self.current_index + 1).min(self.slide_count - 1)
        };
        (
            (prev != self.current_index).then_some(prev),
            (next != self.current_index).then_some(next),
        )
    }

    /// Full committed re-render of the current position and affordances.
    /// Used at mount, after re-initialization, and for snap-back.
    pub fn sync(&self, renderer: &mut dyn SlideRenderer) {
        renderer.set_offset(committed_offset(self.current_index));
        renderer.set_active_slide(self.current_index);
        renderer.set_controls(&self.controls());
    }

    pub fn go_to_next(&mut self, now_ms: f64, renderer: &mut dyn SlideRenderer) -> bool {
        if self.disabled() || self.lock.engaged(now_ms) {
            return false;
        }
        let next = if self.current_index + 1 < self.slide_count {
            self.current_index + 1
        } else if self.infinite {
            0
        } else {
            // Already on the last slide: clamp, no lock, no render.
            return false;
        };
        self.commit(next, now_ms, renderer);
        true
    }

    pub fn go_to_previous(&mut self, now_ms: f64, renderer: &mut dyn SlideRenderer) -> bool {
        if self.disabled() || self.lock.engaged(now_ms) {
            return false;
        }
        let prev = if self.current_index > 0 {
            self.current_index - 1
        } else if self.infinite {
            self.slide_count - 1
        } else {
            return false;
        };
        self.commit(prev, now_ms, renderer);
        true
    }

    /// Direct jump. Clamps into range and never wraps, even in infinite
    /// mode: dot number `i` always means slide `i`.
    pub fn go_to_slide(
        &mut self,
        index: usize,
        now_ms: f64,
        renderer: &mut dyn SlideRenderer,
    ) -> bool {
        if self.disabled() || self.lock.engaged(now_ms) {
            return false;
        }
        let target = index.min(self.slide_count - 1);
        self.commit(target, now_ms, renderer);
        true
    }

    fn commit(&mut self, index: usize, now_ms: f64, renderer: &mut dyn SlideRenderer) {
        self.current_index = index;
        self.lock.engage(now_ms);
        self.sync(renderer);
    }

    /// Gesture start. Returns whether a drag actually began; mouse drags
    /// are inert on wide viewports and nothing drags a disabled instance.
    pub fn pointer_down(
        &mut self,
        kind: PointerKind,
        x: f64,
        extent_px: f64,
        viewport_width: f64,
        renderer: &mut dyn SlideRenderer,
    ) -> bool {
        if self.disabled() || self.drag.is_some() {
            return false;
        }
        if !kind.drag_armed(viewport_width) || extent_px <= 0.0 {
            return false;
        }
        self.drag = Some(SwipeTracker::begin(x, extent_px, self.current_index));
        renderer.set_transition_enabled(false);
        renderer.set_dragging(true);
        true
    }

    /// Gesture move. Applies the live offset synchronously and returns
    /// whether the event's vertical-scroll default should be suppressed.
    pub fn pointer_move(&mut self, x: f64, renderer: &mut dyn SlideRenderer) -> bool {
        let Some(tracker) = self.drag.as_mut() else {
            return false;
        };
        let live = tracker.track(x, self.slide_count, self.infinite);
        renderer.set_offset(live);
        tracker.suppresses_scroll(x)
    }

    /// Gesture end: commit past the threshold, snap back otherwise. A
    /// commit that the navigation layer refuses (boundary clamp, engaged
    /// lock) still snaps the strip back to the committed position.
    pub fn pointer_up(&mut self, now_ms: f64, renderer: &mut dyn SlideRenderer) {
        let Some(tracker) = self.drag.take() else {
            return;
        };
        renderer.set_dragging(false);
        renderer.set_transition_enabled(true);
        let committed = match tracker.finish() {
            SwipeVerdict::Commit(NavDirection::Next) => self.go_to_next(now_ms, renderer),
            SwipeVerdict::Commit(NavDirection::Previous) => self.go_to_previous(now_ms, renderer),
            SwipeVerdict::SnapBack => false,
        };
        if !committed {
            self.sync(renderer);
        }
    }

    /// Content-swap entry point: the slide store may have been replaced
    /// wholesale, so every piece of per-content state resets.
    pub fn reinitialize(&mut self, slide_count: usize, renderer: &mut dyn SlideRenderer) {
        self.slide_count = slide_count;
        self.current_index = 0;
        self.lock.clear();
        self.drag = None;
        renderer.set_dragging(false);
        renderer.set_transition_enabled(true);
        self.sync(renderer);
    }
}
