use crate::page::IMAGES_DIRECTORY;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Responsible for writing the rendered page to disk and deploying it along
/// with the image tree.
pub struct Writer<'a> {
    /// Where the rendered page is written.
    pub output_file: &'a Path,

    /// The image tree which is deployed next to the page.
    pub images_directory: &'a Path,

    /// The deployment directory. The page is copied to
    /// `{target_directory}/{output file name}` and the image tree is merged
    /// into `{target_directory}/images`.
    pub target_directory: &'a Path,
}

impl Writer<'_> {
    /// Writes `page` to the output file, replacing any previous contents.
    pub fn write_page(&self, page: &str) -> Result<()> {
        fs::write(self.output_file, page).map_err(|err| Error::Write {
            path: self.output_file.to_owned(),
            err,
        })?;
        info!("Wrote {}", self.output_file.display());
        Ok(())
    }

    /// Copies the output file and the image tree into the target directory,
    /// creating it if necessary. Existing files at the destination are
    /// overwritten; files which exist only at the destination are kept.
    pub fn deploy(&self) -> Result<()> {
        ensure_directory(self.target_directory)?;

        let file_name = self
            .output_file
            .file_name()
            .ok_or_else(|| Error::NoFileName(self.output_file.to_owned()))?;
        copy_file(self.output_file, &self.target_directory.join(file_name))?;

        let images_target = self.target_directory.join(IMAGES_DIRECTORY);
        let copied = merge_dir(self.images_directory, &images_target)?;
        info!(
            "Copied {} files from {} to {}",
            copied,
            self.images_directory.display(),
            images_target.display()
        );
        Ok(())
    }
}

/// Creates `dir` (and its parents) if nothing exists there. Fails if
/// something other than a directory is in the way.
fn ensure_directory(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory(dir.to_owned())),
        Err(e) => match e.kind() {
            io::ErrorKind::NotFound => fs::create_dir_all(dir).map_err(|err| Error::CreateDir {
                path: dir.to_owned(),
                err,
            }),
            _ => Err(Error::CreateDir {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    // Copying a file onto itself would truncate it.
    if same_path(src, dst) {
        debug!("Not copying {} onto itself", src.display());
        return Ok(());
    }
    fs::copy(src, dst).map_err(|err| Error::Copy {
        from: src.to_owned(),
        to: dst.to_owned(),
        err,
    })?;
    Ok(())
}

/// Recursively copies `src` into `dst`, creating directories as needed and
/// overwriting files that already exist. Symlinks are followed. Returns the
/// number of files copied.
pub fn merge_dir(src: &Path, dst: &Path) -> Result<usize> {
    if same_path(src, dst) {
        debug!("Not copying {} onto itself", src.display());
        return Ok(0);
    }

    let mut copied = 0;
    for result in WalkDir::new(src).follow_links(true) {
        let entry = result?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| Error::OutsideSource(entry.path().to_owned()))?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|err| Error::CreateDir { path: target, err })?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The result of a writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error writing or deploying the page.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the output file can't be written.
    #[error("writing `{}`: {err}", .path.display())]
    Write { path: PathBuf, err: io::Error },

    /// Returned when something other than a directory exists where a
    /// directory is needed.
    #[error("`{}` exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Returned when a directory can't be created.
    #[error("creating directory `{}`: {err}", .path.display())]
    CreateDir { path: PathBuf, err: io::Error },

    /// Returned when a file can't be copied.
    #[error("copying `{}` to `{}`: {err}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        err: io::Error,
    },

    /// Returned when the output file path has no file name.
    #[error("output path `{}` has no file name", .0.display())]
    NoFileName(PathBuf),

    /// Returned when the directory walk yields a path outside the tree being
    /// copied.
    #[error("`{}` is outside the copied directory", .0.display())]
    OutsideSource(PathBuf),

    /// Returned for errors walking the image tree.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
}
