use vitrine_core::{
    committed_offset, damp_offset, offset_bounds, Carousel, ControlState, PointerKind,
    SlideRenderer, TRANSITION_MS,
};

#[derive(Default)]
struct RecordingRenderer {
    offsets: Vec<f64>,
    active: Vec<usize>,
    controls: Vec<ControlState>,
    transitions: Vec<bool>,
    dragging: Vec<bool>,
}

impl SlideRenderer for RecordingRenderer {
    fn set_offset(&mut self, percent: f64) {
        self.offsets.push(percent);
    }

    fn set_transition_enabled(&mut self, enabled: bool) {
        self.transitions.push(enabled);
    }

    fn set_active_slide(&mut self, index: usize) {
        self.active.push(index);
    }

    fn set_controls(&mut self, controls: &ControlState) {
        self.controls.push(*controls);
    }

    fn set_dragging(&mut self, dragging: bool) {
        self.dragging.push(dragging);
    }
}

impl RecordingRenderer {
    fn last_offset(&self) -> f64 {
        *self.offsets.last().expect("no offset rendered")
    }

    fn last_controls(&self) -> ControlState {
        *self.controls.last().expect("no controls rendered")
    }
}

fn assert_close(actual: f64, expected: f64) {
    let delta = (actual - expected).abs();
    assert!(
        delta <= 1e-9,
        "expected {:.9} got {:.9} (delta {:.9})",
        expected,
        actual,
        delta
    );
}

const EXTENT_PX: f64 = 500.0;
const NARROW_VIEWPORT: f64 = 400.0;

fn drag(
    carousel: &mut Carousel,
    renderer: &mut RecordingRenderer,
    start_x: f64,
    end_x: f64,
    now_ms: f64,
) {
    assert!(carousel.pointer_down(
        PointerKind::Touch,
        start_x,
        EXTENT_PX,
        NARROW_VIEWPORT,
        renderer
    ));
    carousel.pointer_move(end_x, renderer);
    carousel.pointer_up(now_ms, renderer);
}

#[test]
fn index_stays_in_range_across_operations() {
    for infinite in [false, true] {
        let mut carousel = Carousel::new(4, infinite);
        let mut renderer = RecordingRenderer::default();
        let mut now = 0.0;
        for _ in 0..12 {
            carousel.go_to_next(now, &mut renderer);
            now += TRANSITION_MS;
            carousel.go_to_previous(now, &mut renderer);
            now += TRANSITION_MS;
            carousel.go_to_slide(9, now, &mut renderer);
            now += TRANSITION_MS;
            assert!(carousel.current_index() < carousel.slide_count());
        }
    }
}

#[test]
fn go_to_slide_clamps_past_end() {
    let mut carousel = Carousel::new(3, true);
    let mut renderer = RecordingRenderer::default();
    assert!(carousel.go_to_slide(7, 0.0, &mut renderer));
    assert_eq!(carousel.current_index(), 2);
    assert_close(renderer.last_offset(), committed_offset(2));
}

#[test]
fn infinite_wraps_both_directions() {
    let mut carousel = Carousel::new(3, true);
    let mut renderer = RecordingRenderer::default();

    assert!(carousel.go_to_previous(0.0, &mut renderer));
    assert_eq!(carousel.current_index(), 2);

    assert!(carousel.go_to_next(TRANSITION_MS, &mut renderer));
    assert_eq!(carousel.current_index(), 0);
}

#[test]
fn clamped_previous_at_start_takes_no_lock() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();

    assert!(!carousel.go_to_previous(0.0, &mut renderer));
    assert_eq!(carousel.current_index(), 0);
    assert!(!carousel.is_transitioning(0.0));
    assert!(renderer.offsets.is_empty());

    // The aborted call left no lock behind: navigation at the same instant
    // still goes through.
    assert!(carousel.go_to_next(0.0, &mut renderer));
    assert_eq!(carousel.current_index(), 1);
}

#[test]
fn clamped_next_at_end_is_inert() {
    let mut carousel = Carousel::new(2, false);
    let mut renderer = RecordingRenderer::default();
    assert!(carousel.go_to_next(0.0, &mut renderer));
    let renders = renderer.offsets.len();

    assert!(!carousel.go_to_next(TRANSITION_MS, &mut renderer));
    assert_eq!(carousel.current_index(), 1);
    assert_eq!(renderer.offsets.len(), renders);
}

#[test]
fn rapid_double_next_changes_index_once() {
    let mut carousel = Carousel::new(4, false);
    let mut renderer = RecordingRenderer::default();

    assert!(carousel.go_to_next(1000.0, &mut renderer));
    assert!(!carousel.go_to_next(1200.0, &mut renderer));
    assert_eq!(carousel.current_index(), 1);

    // The lock is time-bounded, not signaled: advancing the clock releases it.
    assert!(carousel.go_to_next(1000.0 + TRANSITION_MS, &mut renderer));
    assert_eq!(carousel.current_index(), 2);
}

#[test]
fn dot_jump_ignored_while_transitioning() {
    let mut carousel = Carousel::new(3, true);
    let mut renderer = RecordingRenderer::default();
    assert!(carousel.go_to_next(0.0, &mut renderer));
    assert!(!carousel.go_to_slide(0, 100.0, &mut renderer));
    assert_eq!(carousel.current_index(), 1);
}

#[test]
fn swipe_exactly_at_threshold_snaps_back() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();

    // 100 px on a 500 px container is exactly 20% of the extent.
    drag(&mut carousel, &mut renderer, 0.0, -100.0, 0.0);
    assert_eq!(carousel.current_index(), 0);
    assert_close(renderer.last_offset(), committed_offset(0));
}

#[test]
fn swipe_just_past_threshold_commits() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();

    drag(&mut carousel, &mut renderer, 0.0, -101.0, 0.0);
    assert_eq!(carousel.current_index(), 1);
    assert_close(renderer.last_offset(), committed_offset(1));
}

#[test]
fn swipe_back_past_threshold_commits_previous() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();
    assert!(carousel.go_to_slide(1, 0.0, &mut renderer));

    drag(&mut carousel, &mut renderer, 0.0, 101.0, TRANSITION_MS);
    assert_eq!(carousel.current_index(), 0);
}

#[test]
fn snap_back_rerenders_committed_offset() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();

    drag(&mut carousel, &mut renderer, 0.0, -40.0, 0.0);
    assert_eq!(carousel.current_index(), 0);
    assert_close(renderer.last_offset(), committed_offset(0));
    // Transitions come back on when the gesture ends.
    assert_eq!(renderer.transitions.last(), Some(&true));
    assert_eq!(renderer.dragging.last(), Some(&false));
}

#[test]
fn boundary_swipe_snaps_back_when_not_infinite() {
    let mut carousel = Carousel::new(2, false);
    let mut renderer = RecordingRenderer::default();
    assert!(carousel.go_to_next(0.0, &mut renderer));

    // A hard swipe toward "next" on the last slide commits nothing; the
    // strip still settles back onto the committed position.
    drag(&mut carousel, &mut renderer, 0.0, -200.0, TRANSITION_MS);
    assert_eq!(carousel.current_index(), 1);
    assert_close(renderer.last_offset(), committed_offset(1));
}

#[test]
fn edge_damping_keeps_fifth_of_excess() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();

    assert!(carousel.pointer_down(
        PointerKind::Touch,
        0.0,
        EXTENT_PX,
        NARROW_VIEWPORT,
        &mut renderer
    ));
    // +50 px is +10%, entirely past the first-slide boundary.
    carousel.pointer_move(50.0, &mut renderer);
    assert_close(renderer.last_offset(), 2.0);
    carousel.pointer_up(0.0, &mut renderer);
    assert_eq!(carousel.current_index(), 0);
}

#[test]
fn edge_damping_applies_past_last_slide() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();
    assert!(carousel.go_to_slide(2, 0.0, &mut renderer));

    assert!(carousel.pointer_down(
        PointerKind::Touch,
        0.0,
        EXTENT_PX,
        NARROW_VIEWPORT,
        &mut renderer
    ));
    carousel.pointer_move(-50.0, &mut renderer);
    assert_close(renderer.last_offset(), -202.0);
}

#[test]
fn infinite_drag_is_undamped() {
    let mut carousel = Carousel::new(3, true);
    let mut renderer = RecordingRenderer::default();

    assert!(carousel.pointer_down(
        PointerKind::Touch,
        0.0,
        EXTENT_PX,
        NARROW_VIEWPORT,
        &mut renderer
    ));
    carousel.pointer_move(50.0, &mut renderer);
    assert_close(renderer.last_offset(), 10.0);
}

#[test]
fn mouse_drag_gated_by_viewport_width() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();

    assert!(!carousel.pointer_down(PointerKind::Mouse, 0.0, EXTENT_PX, 750.0, &mut renderer));
    assert!(carousel.pointer_down(PointerKind::Mouse, 0.0, EXTENT_PX, 749.0, &mut renderer));
    carousel.pointer_up(0.0, &mut renderer);

    // Touch is not viewport-gated.
    assert!(carousel.pointer_down(PointerKind::Touch, 0.0, EXTENT_PX, 1200.0, &mut renderer));
}

#[test]
fn pointer_down_requires_laid_out_container() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();
    assert!(!carousel.pointer_down(PointerKind::Touch, 0.0, 0.0, NARROW_VIEWPORT, &mut renderer));
}

#[test]
fn scroll_suppression_strictly_past_slop() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();
    assert!(carousel.pointer_down(
        PointerKind::Touch,
        0.0,
        EXTENT_PX,
        NARROW_VIEWPORT,
        &mut renderer
    ));
    assert!(!carousel.pointer_move(10.0, &mut renderer));
    assert!(carousel.pointer_move(10.5, &mut renderer));
    assert!(carousel.pointer_move(-10.5, &mut renderer));
}

#[test]
fn reinitialize_resets_index_and_count() {
    let mut carousel = Carousel::new(5, true);
    let mut renderer = RecordingRenderer::default();
    assert!(carousel.go_to_slide(3, 0.0, &mut renderer));

    carousel.reinitialize(2, &mut renderer);
    assert_eq!(carousel.current_index(), 0);
    assert_eq!(carousel.slide_count(), 2);
    assert_close(renderer.last_offset(), 0.0);
    assert!(renderer.last_controls().visible);

    // The lock was cleared along with the rest of the state.
    assert!(carousel.go_to_next(0.0, &mut renderer));
}

#[test]
fn reinitialize_interrupts_active_drag() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();
    assert!(carousel.pointer_down(
        PointerKind::Touch,
        0.0,
        EXTENT_PX,
        NARROW_VIEWPORT,
        &mut renderer
    ));
    carousel.reinitialize(3, &mut renderer);
    assert!(!carousel.is_dragging());
    assert_eq!(renderer.dragging.last(), Some(&false));
    assert_eq!(renderer.transitions.last(), Some(&true));
}

#[test]
fn single_slide_instance_is_disabled() {
    let mut carousel = Carousel::new(1, true);
    let mut renderer = RecordingRenderer::default();

    assert!(!carousel.controls().visible);
    assert!(!carousel.go_to_next(0.0, &mut renderer));
    assert!(!carousel.go_to_previous(0.0, &mut renderer));
    assert!(!carousel.go_to_slide(0, 0.0, &mut renderer));
    assert!(!carousel.pointer_down(
        PointerKind::Touch,
        0.0,
        EXTENT_PX,
        NARROW_VIEWPORT,
        &mut renderer
    ));
    assert!(renderer.offsets.is_empty());
}

#[test]
fn controls_disable_at_clamped_boundaries() {
    let mut carousel = Carousel::new(3, false);
    let mut renderer = RecordingRenderer::default();

    let controls = carousel.controls();
    assert!(!controls.prev_enabled);
    assert!(controls.next_enabled);

    assert!(carousel.go_to_slide(2, 0.0, &mut renderer));
    let controls = renderer.last_controls();
    assert!(controls.prev_enabled);
    assert!(!controls.next_enabled);
    assert_eq!(controls.active_index, 2);
}

#[test]
fn infinite_controls_always_enabled() {
    let carousel = Carousel::new(3, true);
    let controls = carousel.controls();
    assert!(controls.prev_enabled);
    assert!(controls.next_enabled);
}

#[test]
fn adjacent_indices_wrap_vs_clamp() {
    assert_eq!(Carousel::new(3, true).adjacent_indices(), (Some(2), Some(1)));
    assert_eq!(
        Carousel::new(3, false).adjacent_indices(),
        (None, Some(1))
    );

    let mut renderer = RecordingRenderer::default();
    let mut carousel = Carousel::new(3, false);
    assert!(carousel.go_to_slide(2, 0.0, &mut renderer));
    assert_eq!(carousel.adjacent_indices(), (Some(1), None));

    assert_eq!(Carousel::new(1, true).adjacent_indices(), (None, None));
}

#[test]
fn offset_model_basics() {
    assert_close(committed_offset(0), 0.0);
    assert_close(committed_offset(2), -200.0);
    assert_eq!(offset_bounds(3), (-200.0, 0.0));
    assert_eq!(offset_bounds(0), (0.0, 0.0));

    // In range: untouched. Out of range: boundary plus a fifth of the rest.
    assert_close(damp_offset(-150.0, 3, false), -150.0);
    assert_close(damp_offset(5.0, 3, false), 1.0);
    assert_close(damp_offset(-205.0, 3, false), -201.0);
    assert_close(damp_offset(5.0, 3, true), 5.0);
}
