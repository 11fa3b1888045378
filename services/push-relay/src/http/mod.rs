pub mod fallback_controller;
pub mod health_check_controller;
pub mod http_server;
pub mod model;
pub mod push_controller;
