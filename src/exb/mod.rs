use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub mod document;
pub mod error;

pub use document::{Document, Element, Node};
pub use error::ExbError;

pub const EXB_EXTENSION: &str = "exb";

/// Find all `.exb` files under `directory`, sorted for a stable batch order.
pub fn exb_files_in(directory: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == EXB_EXTENSION))
        .collect();
    files.sort();
    files
}

/// Read and parse one transcription file. Files are always UTF-8.
pub fn read_document(path: &Path) -> Result<Document, ExbError> {
    let contents = fs::read_to_string(path)?;
    Document::parse(&contents)
}

pub fn write_document(path: &Path, document: &Document) -> Result<(), ExbError> {
    fs::write(path, document.to_xml())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_exb_files_recursively_and_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.exb"), "<x/>").unwrap();
        fs::write(dir.path().join("nested/a.exb"), "<x/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = exb_files_in(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("b.exb"));
        assert!(files[1].ends_with("nested/a.exb"));
    }

    #[test]
    fn read_write_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.exb");
        fs::write(&path, "<a><b>x</b></a>").unwrap();

        let document = read_document(&path).unwrap();
        let copy = dir.path().join("copy.exb");
        write_document(&copy, &document).unwrap();
        assert_eq!(fs::read_to_string(&copy).unwrap(), "<a><b>x</b></a>");
    }
}
