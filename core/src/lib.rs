pub mod carousel;
pub mod gesture;
pub mod position;
pub mod renderer;

pub use carousel::{Carousel, NavDirection, TRANSITION_MS};
pub use gesture::{
    PointerKind, SwipeTracker, SwipeVerdict, DRAG_VIEWPORT_MAX_PX, SCROLL_SUPPRESS_SLOP_PX,
    SWIPE_COMMIT_RATIO,
};
pub use position::{committed_offset, damp_offset, offset_bounds, EDGE_DAMPING, SLIDE_EXTENT};
pub use renderer::{ControlState, SlideRenderer};
