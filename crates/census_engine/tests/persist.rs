use std::fs;
use std::io::{self, Write};

use census_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn write_with_publishes_filled_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let path = writer
        .write_with("pop.csv", |out| -> Result<(), PersistError> {
            out.write_all(b"geoid\n")?;
            Ok(())
        })
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "pop.csv");
    assert_eq!(fs::read_to_string(&path).unwrap(), "geoid\n");
}

#[test]
fn failed_fill_leaves_target_untouched() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("pop.csv");
    fs::write(&target, "previous").unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let result = writer.write_with("pop.csv", |out| -> Result<(), PersistError> {
        out.write_all(b"partial")?;
        Err(io::Error::new(io::ErrorKind::Other, "disk full").into())
    });
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&target).unwrap(), "previous");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}
