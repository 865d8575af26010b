use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use batchstack::{
    ChannelDepth, ChannelLayout, Error, FrameLoader, ImageFrameLoader, PixelBuffer,
    RenderEngine, ResizePolicy, Resolution, Result,
};
use image::{ImageBuffer, Rgb};

/// Resolution used by most tests
pub const TEST_RES: Resolution = Resolution {
    width: 4,
    height: 4,
};

/// 8-bit white widened to 16 bits by the loader
pub const WHITE_16: u16 = 65535;

/// Writes a solid `value` gray 8-bit PNG frame into `dir`.
pub fn write_frame(dir: &Path, name: &str, res: Resolution, value: u8) -> PathBuf {
    let img = ImageBuffer::from_fn(res.width, res.height, |_, _| Rgb([value, value, value]));
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test frame");
    path
}

/// Writes `count` white frames named `frame_000.png`, `frame_001.png`, ...
pub fn write_white_frames(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| write_frame(dir, &format!("frame_{:03}.png", i), TEST_RES, 255))
        .collect()
}

/// Writes a file with an image extension but garbage content.
pub fn write_corrupt_frame(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not a png").expect("Failed to write corrupt frame");
    path
}

pub fn write_text_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "notes").expect("Failed to write text file");
    path
}

/// Solid RGBA frame at 16 bits
pub fn solid_buffer(res: Resolution, value: u16) -> PixelBuffer {
    PixelBuffer::filled(
        res,
        ChannelDepth::Sixteen,
        ChannelLayout::Rgba,
        &[value, value, value, WHITE_16],
    )
}

/// Decodes a written 16-bit PNG back to its RGBA samples.
pub fn read_rgba16(path: &Path) -> Vec<u16> {
    image::open(path)
        .expect("Failed to open output")
        .to_rgba16()
        .into_raw()
}

/// Loader that counts every load attempt
pub struct CountingLoader {
    inner: ImageFrameLoader,
    pub loads: Arc<AtomicUsize>,
}

impl CountingLoader {
    pub fn new(res: Resolution) -> (Self, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let loader = Self {
            inner: ImageFrameLoader::new(res, ChannelDepth::Sixteen, ResizePolicy::Reject),
            loads: loads.clone(),
        };
        (loader, loads)
    }
}

impl FrameLoader for CountingLoader {
    fn load(&self, path: &Path) -> Result<PixelBuffer> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(path)
    }
}

/// Engine whose every render fails
pub struct FailingEngine;

impl RenderEngine for FailingEngine {
    fn reduce_mean(&mut self, _frames: &[PixelBuffer]) -> Result<PixelBuffer> {
        Err(Error::Render {
            reason: "engine unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}
