//! # batchstack
//!
//! Averages a long, ordered run of frames into stacked images, one fixed-size
//! batch at a time so memory stays bounded by the batch size.
//!
//! ```no_run
//! use batchstack::{Resolution, StackConfig, StackPipeline};
//!
//! # fn main() -> batchstack::Result<()> {
//! let config = StackConfig::single(
//!     Resolution::new(1000, 1000),
//!     "frames".into(),
//!     "stack.png".into(),
//! );
//! let summary = StackPipeline::new(config).run()?;
//! println!("{} groups", summary.groups_reduced);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod stacking;

pub use config::{DEFAULT_BATCH_SIZE, OutputMode, StackConfig, resolve_path};
pub use error::{Error, Result};
pub use models::{ChannelDepth, ChannelLayout, ColorSpace, PixelBuffer, Resolution};
pub use pipeline::{DebugConfig, StackContext, StackPipeline, StackSummary};
pub use sink::{ImageSink, OutputFormat};
pub use source::{FrameLoader, ImageFrameLoader, ResizePolicy};
pub use stacking::{CpuEngine, RenderEngine, RenderSettings};
