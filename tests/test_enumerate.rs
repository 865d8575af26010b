//! Tests for listing input folders.

mod common;

use batchstack::source::enumerate_frames;
use common::*;

#[test]
fn test_frames_sorted_and_filtered() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    write_frame(dir.path(), "b.png", TEST_RES, 10);
    write_frame(dir.path(), "a.jpg", TEST_RES, 10);
    write_frame(dir.path(), "C.tiff", TEST_RES, 10);
    write_text_file(dir.path(), ".DS_Store");
    write_text_file(dir.path(), "notes.txt");
    std::fs::create_dir(dir.path().join("dir.png"))?;

    let enumeration = enumerate_frames(dir.path())?;

    let names: Vec<String> = enumeration
        .frames
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    // Byte order: uppercase before lowercase
    assert_eq!(names, vec!["C.tiff", "a.jpg", "b.png"]);

    assert_eq!(enumeration.rejected.len(), 2);
    assert!(enumeration.rejected.contains(&dir.path().join("notes.txt")));
    assert!(enumeration.rejected.contains(&dir.path().join("dir.png")));
    assert_eq!(enumeration.total_entries, 5);

    Ok(())
}

#[test]
fn test_extension_match_ignores_case() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    write_frame(dir.path(), "SHOT.PNG", TEST_RES, 10);
    write_text_file(dir.path(), "shot.jpeg");

    let enumeration = enumerate_frames(dir.path())?;
    assert_eq!(enumeration.frames, vec![dir.path().join("SHOT.PNG")]);
    assert_eq!(enumeration.rejected, vec![dir.path().join("shot.jpeg")]);
    Ok(())
}

#[test]
fn test_missing_folder_is_input_not_found() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let missing = dir.path().join("nope");
    assert!(matches!(
        enumerate_frames(&missing),
        Err(Error::InputNotFound { .. })
    ));

    let file = write_text_file(dir.path(), "file.txt");
    assert!(matches!(
        enumerate_frames(&file),
        Err(Error::InputNotFound { .. })
    ));
    Ok(())
}

#[test]
fn test_empty_folder() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let enumeration = enumerate_frames(dir.path())?;
    assert!(enumeration.frames.is_empty());
    assert!(enumeration.rejected.is_empty());
    Ok(())
}
