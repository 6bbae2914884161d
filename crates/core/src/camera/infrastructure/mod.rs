pub mod channel_frame_source;
pub mod frame_downsampler;
pub mod image_sequence_source;
