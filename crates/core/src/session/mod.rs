pub mod camera_session;
pub mod gate_logger;
pub mod session_config;
