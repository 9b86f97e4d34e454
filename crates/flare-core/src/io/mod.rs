pub mod csv;
pub mod visualize;

pub use self::csv::{load_frame_csv, read_frame_csv, save_frame_csv, write_frame_csv};
pub use visualize::{save_heatmap, save_region_map};
