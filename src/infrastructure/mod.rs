// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod event_stream;
pub mod geo_file;
pub mod http_gateway;
