pub mod menu;
pub mod progress_bar;
pub mod sentence_area;
pub mod session_sidebar;
