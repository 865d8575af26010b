use std::path::{Path, PathBuf};

use crate::config::{OutputMode, StackConfig};
use crate::error::{Error, Result};
use crate::models::PixelBuffer;
use crate::sink::ImageSink;
use crate::source::{Enumeration, FrameLoader, ImageFrameLoader, enumerate_frames};
use crate::stacking::{BatchGrouper, CpuEngine, FinalStack, Group, RenderEngine, group_output_path};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Directory receiving one `group_<n>.png` per group average
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

/// Context available to every stage of a run
#[derive(Clone, Debug, Default)]
pub struct StackContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackSummary {
    pub frames_loaded: usize,
    pub frames_failed: usize,
    pub entries_rejected: usize,
    pub groups_reduced: usize,
    /// Groups where no frame could be decoded
    pub groups_empty: usize,
    pub outputs_written: Vec<PathBuf>,
    pub outputs_skipped: Vec<PathBuf>,
}

/// Two-level batch averaging pipeline.
///
/// Groups are loaded, reduced and written strictly one after another with a
/// single render engine; only one group's frames are held in memory.
pub struct StackPipeline {
    config: StackConfig,
    context: StackContext,
    loader: Box<dyn FrameLoader>,
    engine: Box<dyn RenderEngine>,
    sink: ImageSink,
}

impl StackPipeline {
    /// Pipeline with the `image` crate loader and the CPU engine
    pub fn new(config: StackConfig) -> Self {
        let loader = ImageFrameLoader::new(
            config.resolution,
            config.render.channel_depth,
            config.resize,
        );
        let engine = CpuEngine::new(config.resolution, config.render);
        let sink = ImageSink::new().with_jpeg_quality(config.jpeg_quality);
        Self {
            config,
            context: StackContext::default(),
            loader: Box::new(loader),
            engine: Box::new(engine),
            sink,
        }
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Save every group average to `output_dir` (single-output mode only).
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if matches!(self.config.mode, OutputMode::Multi { .. }) {
            return Err(Error::InvalidParameter {
                name: "debug-out",
                reason: "group averages are already written in multi-output mode".to_string(),
            });
        }

        // Created on the first save
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(Error::DebugDirNotEmpty { path: output_dir });
            }
        }

        self.context.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });

        Ok(self)
    }

    pub fn with_loader(mut self, loader: Box<dyn FrameLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_engine(mut self, engine: Box<dyn RenderEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Validate the configuration, then run the selected mode
    pub fn run(&mut self) -> Result<StackSummary> {
        self.config.validate()?;
        match self.config.mode.clone() {
            OutputMode::Single { output } => self.run_single(&output),
            OutputMode::Multi { output_dir } => self.run_multi(&output_dir),
        }
    }

    fn run_single(&mut self, output: &Path) -> Result<StackSummary> {
        let mut summary = StackSummary::default();

        if output.exists() {
            println!("skip, output exists \"{}\"", output.display());
            log::info!("Output {} exists, nothing to do", output.display());
            summary.outputs_skipped.push(output.to_path_buf());
            return Ok(summary);
        }

        let enumeration = enumerate_frames(&self.config.input_dir)?;
        summary.entries_rejected = enumeration.rejected.len();
        let grouper = BatchGrouper::new(self.config.batch_size)?;
        let mut stack = FinalStack::new();

        for group in grouper.plan(enumeration.frames.len()) {
            let frames = self.load_group(&enumeration, &group, &mut summary)?;
            if frames.is_empty() {
                log::warn!("Group {} has no readable frames, dropped", group.index);
                summary.groups_empty += 1;
                continue;
            }

            let average = self.reduce_group(&group, &frames)?;
            summary.groups_reduced += 1;
            self.save_debug_output(group.index, &average)?;
            stack.push(average);
        }

        if stack.is_empty() {
            return Err(Error::NoFrames {
                path: self.config.input_dir.clone(),
            });
        }

        if self.context.verbose {
            println!("will render ({} group averages)", stack.len());
        }
        let result = stack.finish(self.engine.as_mut(), output.to_path_buf())?;
        if self.context.verbose {
            println!("did render");
        }

        self.sink.write(&result.buffer, &result.destination)?;
        summary.outputs_written.push(result.destination);
        Ok(summary)
    }

    fn run_multi(&mut self, output_dir: &Path) -> Result<StackSummary> {
        let mut summary = StackSummary::default();
        std::fs::create_dir_all(output_dir)?;

        let enumeration = enumerate_frames(&self.config.input_dir)?;
        summary.entries_rejected = enumeration.rejected.len();
        let grouper = BatchGrouper::new(self.config.batch_size)?;
        let total = enumeration.frames.len();

        for group in grouper.plan(total) {
            let target = group_output_path(output_dir, group.index);

            if target.exists() {
                for index in group.range.clone() {
                    println!("{}/{} skip \"{}\"", index + 1, total, file_name(&enumeration.frames[index]));
                }
                summary.outputs_skipped.push(target);
                continue;
            }

            let frames = self.load_group(&enumeration, &group, &mut summary)?;
            if frames.is_empty() {
                log::warn!("Group {} has no readable frames, dropped", group.index);
                summary.groups_empty += 1;
                continue;
            }

            // Re-checked at group close
            if target.exists() {
                log::info!("{} appeared during the run, skipping", target.display());
                summary.outputs_skipped.push(target);
                continue;
            }

            let average = self.reduce_group(&group, &frames)?;
            summary.groups_reduced += 1;
            self.sink.write(&average, &target)?;
            summary.outputs_written.push(target);
        }

        Ok(summary)
    }

    /// Decode every member of `group`; unreadable files are reported and left out
    fn load_group(
        &self,
        enumeration: &Enumeration,
        group: &Group,
        summary: &mut StackSummary,
    ) -> Result<Vec<PixelBuffer>> {
        let total = enumeration.frames.len();
        let mut frames = Vec::with_capacity(group.len());

        for index in group.range.clone() {
            let path = &enumeration.frames[index];
            match self.loader.load(path) {
                Ok(frame) => {
                    println!(
                        "{}/{} image \"{}\" {}",
                        index + 1,
                        total,
                        file_name(path),
                        frame.resolution()
                    );
                    summary.frames_loaded += 1;
                    frames.push(frame);
                }
                Err(err @ Error::Decode { .. }) => {
                    println!("error \"{}\"", file_name(path));
                    log::warn!("{}", err);
                    summary.frames_failed += 1;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(frames)
    }

    fn reduce_group(&mut self, group: &Group, frames: &[PixelBuffer]) -> Result<PixelBuffer> {
        if self.context.verbose {
            println!("average will render (group {}, {} frames)", group.index, frames.len());
        }
        log::debug!(
            "Reducing group {} ({}/{} frames) on {}",
            group.index,
            frames.len(),
            group.len(),
            self.engine.name()
        );
        let average = self.engine.reduce_mean(frames)?;
        if self.context.verbose {
            println!("average did render");
        }
        Ok(average)
    }

    fn save_debug_output(&self, index: usize, average: &PixelBuffer) -> Result<()> {
        if let Some(debug_config) = &self.context.debug {
            if !debug_config.enabled {
                return Ok(());
            }
            std::fs::create_dir_all(&debug_config.output_dir)?;
            let path = debug_config.output_dir.join(format!("group_{}.png", index));
            self.sink.write(average, &path)?;
            if self.context.verbose {
                println!("  Debug: saved {}", path.display());
            }
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
