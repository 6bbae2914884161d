pub mod camera;
pub mod detection;
pub mod session;
pub mod shared;
