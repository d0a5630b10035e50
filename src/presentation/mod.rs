// Presentation layer - Output ports' terminal implementation
pub mod board_view;
pub mod painter;
pub mod surface;
pub mod term;
