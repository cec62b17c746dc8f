pub mod map_handler;

pub use map_handler::{__path_get_marker_icon, __path_get_map_points, get_map_points, get_marker_icon};
