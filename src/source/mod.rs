pub mod enumerate;
pub mod loader;

pub use enumerate::{ACCEPTED_EXTENSIONS, Enumeration, FrameSequence, enumerate_frames, is_accepted_image};
pub use loader::{FrameLoader, ImageFrameLoader, ResizePolicy, to_pixel_buffer};
