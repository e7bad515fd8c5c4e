//! Finds the image files that make up a gallery.

use std::fs::read_dir;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Searches `directory` (non-recursively) for image files whose names end
/// with one of `extensions` and returns their file names in gallery order:
/// descending by plain string comparison, so that date-prefixed names list
/// newest first. The match is a case-sensitive suffix match, so names
/// beginning with `.` are selected like any other. Entries which aren't
/// selected are logged and skipped.
pub fn find_images(directory: &Path, extensions: &[String]) -> Result<Vec<String>> {
    let read_err = |err| Error::ReadDir {
        path: directory.to_owned(),
        err,
    };

    let mut file_names = Vec::new();
    for result in read_dir(directory).map_err(read_err)? {
        let entry = result.map_err(read_err)?;
        let os_file_name = entry.file_name();
        let lossy = os_file_name.to_string_lossy();

        if !has_extension(&lossy, extensions) {
            warn!("Skipping {}: not a recognized image extension", lossy);
            continue;
        }

        // `Path::is_file` follows symlinks, like the copy step does.
        let path = entry.path();
        if !path.is_file() {
            warn!("Skipping {}: not a regular file", lossy);
            continue;
        }

        match os_file_name.to_str() {
            Some(file_name) => file_names.push(file_name.to_owned()),
            None => return Err(Error::InvalidFileName(path)),
        }
    }

    file_names.sort_by(|a, b| b.cmp(a));
    Ok(file_names)
}

fn has_extension(file_name: &str, extensions: &[String]) -> bool {
    extensions
        .iter()
        .any(|ext| file_name.ends_with(ext.as_str()))
}

/// The result of an image search.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error searching for images.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the image directory can't be listed.
    #[error("reading image directory `{}`: {err}", .path.display())]
    ReadDir { path: PathBuf, err: std::io::Error },

    /// Returned when a selected image's file name isn't valid UTF-8 and so
    /// can't be looked up in the caption store or written into the page.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(PathBuf),
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn extensions(exts: &[&str]) -> Vec<String> {
        exts.iter().map(|ext| ext.to_string()).collect()
    }

    fn fixture(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            fs::write(dir.path().join(file), b"not really an image").unwrap();
        }
        dir
    }

    #[test]
    fn test_descending_order() -> Result<()> {
        let dir = fixture(&["a.jpg", "c.jpg", "b.jpg"]);
        assert_eq!(
            vec!["c.jpg", "b.jpg", "a.jpg"],
            find_images(dir.path(), &extensions(&[".jpg"]))?
        );
        Ok(())
    }

    #[test]
    fn test_order_is_lexicographic_not_numeric() -> Result<()> {
        let dir = fixture(&["2.jpg", "10.jpg", "9.jpg"]);
        assert_eq!(
            vec!["9.jpg", "2.jpg", "10.jpg"],
            find_images(dir.path(), &extensions(&[".jpg"]))?
        );
        Ok(())
    }

    #[test]
    fn test_extension_filter() -> Result<()> {
        let dir = fixture(&["photo.jpg", "photo.png", "photo.txt", "notes.txt"]);
        assert_eq!(
            vec!["photo.png", "photo.jpg"],
            find_images(dir.path(), &extensions(&[".jpg", ".png"]))?
        );
        assert_eq!(
            vec!["photo.jpg"],
            find_images(dir.path(), &extensions(&[".jpg"]))?
        );
        Ok(())
    }

    #[test]
    fn test_extension_match_is_case_sensitive() -> Result<()> {
        let dir = fixture(&["upper.JPG", "lower.jpg"]);
        assert_eq!(
            vec!["lower.jpg"],
            find_images(dir.path(), &extensions(&[".jpg"]))?
        );
        Ok(())
    }

    #[test]
    fn test_dotfile_images_are_selected() -> Result<()> {
        let dir = fixture(&[".2021-01-01.jpg", "b.jpg", ".jpg"]);
        assert_eq!(
            vec!["b.jpg", ".jpg", ".2021-01-01.jpg"],
            find_images(dir.path(), &extensions(&[".jpg"]))?
        );
        Ok(())
    }

    #[test]
    fn test_skips_directories() -> Result<()> {
        let dir = fixture(&["shown.jpg"]);
        fs::create_dir(dir.path().join("album.jpg")).unwrap();
        assert_eq!(
            vec!["shown.jpg"],
            find_images(dir.path(), &extensions(&[".jpg"]))?
        );
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        match find_images(&dir.path().join("nope"), &extensions(&[".jpg"])) {
            Err(Error::ReadDir { .. }) => {}
            other => panic!("wanted read error, got {:?}", other),
        }
    }
}
