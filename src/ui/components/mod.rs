pub mod keyboard_diagram;
pub mod letter_heatmap;
pub mod progress_bar;
pub mod stats_sidebar;
pub mod typing_area;
