use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::PixelBuffer;
use crate::stacking::reducer::RenderEngine;
use crate::stacking::tone::{FINAL_GAMMA, apply_gamma};

/// Averaged buffer tagged with where it goes
#[derive(Debug, Clone)]
pub struct StackResult {
    pub buffer: PixelBuffer,
    pub destination: PathBuf,
}

/// Output file of group `index` in multi-output mode
pub fn group_output_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("stack_{}.png", index))
}

/// Collects group averages for single-output mode
#[derive(Debug, Default)]
pub struct FinalStack {
    averages: Vec<PixelBuffer>,
}

impl FinalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, average: PixelBuffer) {
        self.averages.push(average);
    }

    pub fn len(&self) -> usize {
        self.averages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }

    /// Average the group averages (background term included again), without tone
    pub fn reduce(&self, engine: &mut dyn RenderEngine) -> Result<PixelBuffer> {
        engine.reduce_mean(&self.averages)
    }

    /// Second-level average followed by the final gamma curve
    pub fn finish(self, engine: &mut dyn RenderEngine, destination: PathBuf) -> Result<StackResult> {
        let averaged = self.reduce(engine)?;
        Ok(StackResult {
            buffer: apply_gamma(&averaged, FINAL_GAMMA),
            destination,
        })
    }
}
