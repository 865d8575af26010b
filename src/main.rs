use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use batchstack::{
    ChannelDepth, ColorSpace, Error, RenderSettings, ResizePolicy, StackConfig, StackPipeline,
    resolve_path,
};

/// Exit status for a rejected invocation; nothing was read or written
const EXIT_CONFIG: u8 = 2;

#[derive(Parser)]
#[command(name = "stack")]
#[command(version, about = "Average a folder of frames into stacked images")]
struct Cli {
    /// `<resolution> <input-folder> <output-image>` or
    /// `<count> <resolution> <input-folder> <output-folder>`
    #[arg(value_name = "ARGS", allow_negative_numbers = true)]
    args: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Bits per channel (8 or 16)
    #[arg(long, default_value = "16", value_name = "BITS")]
    depth: u8,

    /// Averaging color space (gamma or linear)
    #[arg(long, default_value = "gamma", value_name = "SPACE")]
    color_space: String,

    /// Resize frames to the resolution instead of rejecting a mismatch
    #[arg(long)]
    resize: bool,

    /// Save each group average to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let rendered = err.to_string();
            println!("{}", rendered.lines().next().unwrap_or("invalid arguments"));
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("batchstack={log_level}")),
    )
    .init();

    if let Err(err) = run(&cli) {
        let is_config = err.downcast_ref::<Error>().is_some_and(Error::is_config);
        if is_config {
            println!("{err}");
            return ExitCode::from(EXIT_CONFIG);
        }
        println!("{err:#}");
        return ExitCode::FAILURE;
    }

    println!("done!");
    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    let render = RenderSettings {
        channel_depth: ChannelDepth::from_bits(cli.depth)?,
        color_space: cli.color_space.parse::<ColorSpace>()?,
    };
    let resize = if cli.resize {
        ResizePolicy::Resize
    } else {
        ResizePolicy::Reject
    };

    let config = StackConfig::from_positional(cli.args.as_slice())?
        .with_render(render)
        .with_resize(resize);
    config.validate()?;

    let mut pipeline = StackPipeline::new(config).with_verbose(cli.verbose);
    if let Some(dir) = &cli.debug_out {
        pipeline = pipeline.with_debug(resolve_path(&dir.to_string_lossy()))?;
    }

    let summary = pipeline.run().context("stacking failed")?;
    log::info!(
        "{} frames loaded, {} unreadable, {} groups averaged, {} written, {} skipped",
        summary.frames_loaded,
        summary.frames_failed,
        summary.groups_reduced,
        summary.outputs_written.len(),
        summary.outputs_skipped.len()
    );

    Ok(())
}
