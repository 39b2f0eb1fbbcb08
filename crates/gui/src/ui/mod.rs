pub mod board_list;
pub mod parameters;
pub mod status_bar;
pub mod tweaks;
