pub mod mapper;
pub mod rect_index;

pub use mapper::{map_contained, map_nearest_center};
pub use rect_index::SentenceRectIndex;
