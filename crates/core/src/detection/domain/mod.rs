pub mod camera_status;
pub mod detection_result;
pub mod face_gate;
pub mod gate_thresholds;
pub mod oval_region;
pub mod reason_rules;
pub mod region_stats;
pub mod skin_tone;
