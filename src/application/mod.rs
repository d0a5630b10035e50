// Application layer - Use cases and ports
pub mod board_service;
pub mod layout_service;
pub mod position_source;
pub mod render_loop;
pub mod server_gateway;
pub mod session_service;
pub mod view;
