use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extensions (lower-cased) accepted as input frames
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "tiff"];

/// Input frames in stacking order
pub type FrameSequence = Vec<PathBuf>;

/// Result of listing an input folder
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    /// Accepted frames, sorted by file name
    pub frames: FrameSequence,
    /// Visible entries that are not images
    pub rejected: Vec<PathBuf>,
    /// Visible entries seen in total
    pub total_entries: usize,
}

pub fn is_accepted_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ACCEPTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_hidden(name: &OsString) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// List `dir`, sorted by name, keeping regular files with an accepted
/// extension. Hidden entries are dropped silently, other entries are
/// reported and skipped.
pub fn enumerate_frames(dir: &Path) -> Result<Enumeration> {
    if !dir.is_dir() {
        return Err(Error::InputNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut names: Vec<OsString> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<_>>()?;
    names.retain(|name| !is_hidden(name));
    names.sort();

    let mut enumeration = Enumeration {
        total_entries: names.len(),
        ..Enumeration::default()
    };

    // Progress counters count accepted frames only, so rejected entries carry none
    for name in names {
        let path = dir.join(&name);
        if path.is_file() && is_accepted_image(&path) {
            enumeration.frames.push(path);
        } else {
            println!("non image \"{}\"", name.to_string_lossy());
            enumeration.rejected.push(path);
        }
    }

    log::debug!(
        "Enumerated {}: {} frames, {} skipped",
        dir.display(),
        enumeration.frames.len(),
        enumeration.rejected.len()
    );

    Ok(enumeration)
}
