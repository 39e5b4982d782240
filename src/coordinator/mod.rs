//! Merges classifier output, freeze state and the display mode into what the
//! reader actually shows.

mod highlight;
mod state;

pub use highlight::select_top_k;
pub use state::{CoordinatorView, ModeCoordinator};
