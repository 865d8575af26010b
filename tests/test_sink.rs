//! Tests for encoding and writing outputs.

mod common;

use batchstack::{ImageSink, OutputFormat};
use common::*;

fn gradient() -> PixelBuffer {
    let res = Resolution::new(3, 2);
    let samples: Vec<u16> = (0..res.pixel_count() * 4)
        .map(|i| if i % 4 == 3 { 65535 } else { (i as u16) * 2731 })
        .collect();
    PixelBuffer::from_samples(res, ChannelDepth::Sixteen, ChannelLayout::Rgba, samples)
        .expect("valid buffer")
}

#[test]
fn test_png_keeps_sixteen_bit_samples() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("out.png");
    let buffer = gradient();

    ImageSink::new().write(&buffer, &path)?;

    assert_eq!(read_rgba16(&path), buffer.samples());
    Ok(())
}

#[test]
fn test_jpeg_is_eight_bit_rgb() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("out.jpg");

    ImageSink::new().write(&solid_buffer(TEST_RES, 65535), &path)?;

    let img = image::open(&path)?;
    assert!(matches!(img, image::DynamicImage::ImageRgb8(_)));
    assert_eq!((img.width(), img.height()), (TEST_RES.width, TEST_RES.height));
    Ok(())
}

#[test]
fn test_unsupported_extension() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("out.bmp");

    let result = ImageSink::new().write(&gradient(), &path);
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    assert!(!path.exists());

    assert_eq!(OutputFormat::from_path(std::path::Path::new("a.JPG"))?, OutputFormat::Jpeg);
    assert_eq!(OutputFormat::from_path(std::path::Path::new("a.png"))?, OutputFormat::Png);
    Ok(())
}

#[test]
fn test_existing_file_is_never_overwritten() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("out.png");
    std::fs::write(&path, b"keep me")?;

    let result = ImageSink::new().write(&gradient(), &path);
    assert!(matches!(result, Err(Error::Io(ref e)) if e.kind() == std::io::ErrorKind::AlreadyExists));
    assert_eq!(std::fs::read(&path)?, b"keep me");
    Ok(())
}

#[test]
fn test_lower_quality_gives_smaller_jpeg() -> anyhow::Result<()> {
    let res = Resolution::new(32, 32);
    let samples: Vec<u16> = (0..res.pixel_count() * 4)
        .map(|i| ((i * 7919) % 65536) as u16)
        .collect();
    let buffer = PixelBuffer::from_samples(res, ChannelDepth::Sixteen, ChannelLayout::Rgba, samples)
        .expect("valid buffer");
    let path = std::path::Path::new("unused.jpg");
    let high = ImageSink::new().with_jpeg_quality(100).encode(&buffer, OutputFormat::Jpeg, path)?;
    let low = ImageSink::new().with_jpeg_quality(10).encode(&buffer, OutputFormat::Jpeg, path)?;
    assert!(low.len() < high.len());
    Ok(())
}
