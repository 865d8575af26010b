#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from batchstack for tests
pub use batchstack::{
    ChannelDepth, ChannelLayout, ColorSpace, Error, OutputMode, PixelBuffer, RenderSettings,
    ResizePolicy, Resolution, StackConfig, StackPipeline, StackSummary,
};
