/// Enablement and visibility of the carousel's navigation affordances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlState {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub active_index: usize,
    pub visible: bool,
}

/// Seam between the carousel state machine and whatever draws it.
///
/// The wasm layer implements this against real DOM elements; tests use a
/// recording double. Offsets are percentages of the container width.
pub trait SlideRenderer {
    fn set_offset(&mut self, percent: f64);
    fn set_transition_enabled(&mut self, enabled: bool);
    fn set_active_slide(&mut self, index: usize);
    fn set_controls(&mut self, controls: &ControlState);
    fn set_dragging(&mut self, dragging: bool);
}
