use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::Resolution;
use crate::sink::{JPEG_QUALITY, OutputFormat};
use crate::source::ResizePolicy;
use crate::stacking::RenderSettings;

/// Batch size of the single-output profile
pub const DEFAULT_BATCH_SIZE: usize = 16;

pub const USAGE: &str = "stack <resolution> <input-folder> <output-image> | \
                         stack <count> <resolution> <input-folder> <output-folder>";

/// Where results go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// All groups combined into one toned image
    Single { output: PathBuf },
    /// One `stack_<n>.png` per group
    Multi { output_dir: PathBuf },
}

#[derive(Debug, Clone)]
pub struct StackConfig {
    pub resolution: Resolution,
    pub input_dir: PathBuf,
    pub batch_size: usize,
    pub mode: OutputMode,
    pub render: RenderSettings,
    pub resize: ResizePolicy,
    pub jpeg_quality: u8,
}

impl StackConfig {
    /// Single-output profile, batch size 16
    pub fn single(resolution: Resolution, input_dir: PathBuf, output: PathBuf) -> Self {
        Self {
            resolution,
            input_dir,
            batch_size: DEFAULT_BATCH_SIZE,
            mode: OutputMode::Single { output },
            render: RenderSettings::default(),
            resize: ResizePolicy::default(),
            jpeg_quality: JPEG_QUALITY,
        }
    }

    /// Multi-output profile with an explicit batch size
    pub fn multi(
        batch_size: usize,
        resolution: Resolution,
        input_dir: PathBuf,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            batch_size,
            mode: OutputMode::Multi { output_dir },
            ..Self::single(resolution, input_dir, PathBuf::new())
        }
    }

    /// Build from positional arguments:
    /// `<resolution> <input> <output-image>` or `<count> <resolution> <input> <output-folder>`
    pub fn from_positional<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        match args {
            [resolution, input, output] => Ok(Self::single(
                resolution.as_ref().parse()?,
                resolve_path(input.as_ref()),
                resolve_path(output.as_ref()),
            )),
            [count, resolution, input, output_dir] => Ok(Self::multi(
                parse_batch_count(count.as_ref())?,
                resolution.as_ref().parse()?,
                resolve_path(input.as_ref()),
                resolve_path(output_dir.as_ref()),
            )),
            _ => Err(Error::Usage { usage: USAGE }),
        }
    }

    pub fn with_render(mut self, render: RenderSettings) -> Self {
        self.render = render;
        self
    }

    pub fn with_resize(mut self, resize: ResizePolicy) -> Self {
        self.resize = resize;
        self
    }

    /// Every configuration check, run before any frame is touched
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidBatchCount {
                input: self.batch_size.to_string(),
            });
        }

        if !self.input_dir.is_dir() {
            return Err(Error::InputNotFound {
                path: self.input_dir.clone(),
            });
        }

        match &self.mode {
            OutputMode::Single { output } => {
                if output.is_dir() {
                    return Err(Error::InvalidOutput {
                        path: output.clone(),
                        reason: "is a folder".to_string(),
                    });
                }
                if let Some(parent) = output.parent() {
                    if !parent.as_os_str().is_empty() && !parent.is_dir() {
                        return Err(Error::InvalidOutput {
                            path: output.clone(),
                            reason: "parent folder does not exist".to_string(),
                        });
                    }
                }
                OutputFormat::from_path(output)?;
            }
            OutputMode::Multi { output_dir } => {
                if output_dir.exists() && !output_dir.is_dir() {
                    return Err(Error::InvalidOutput {
                        path: output_dir.clone(),
                        reason: "needs to be a folder".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn parse_batch_count(input: &str) -> Result<usize> {
    match input.parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(Error::InvalidBatchCount {
            input: input.to_string(),
        }),
    }
}

/// Expand a leading `~/` to the home directory; other paths are used as given
/// (relative ones resolve against the working directory)
pub fn resolve_path(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    Path::new(raw).to_path_buf()
}
