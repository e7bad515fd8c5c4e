//! Defines [`Config`], the resolved settings for one gallery build, and its
//! loading from an optional `gallery.yaml` project file.
//!
//! A project file may set any of the following (shown with their defaults);
//! relative paths are resolved against the directory containing the file:
//!
//! ```yaml
//! images_directory: images
//! captions_file: data.yaml
//! output_file: index.html
//! extensions: [.jpg, .png]
//! on_missing_caption: prompt-and-persist   # or `fail`
//! title: Suns in the Corner of the Page
//! stylesheet_url: https://cdn.jsdelivr.net/npm/@picocss/pico@1/css/pico.min.css
//! ```

use crate::page::{DEFAULT_STYLESHEET_URL, DEFAULT_TITLE};
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "gallery.yaml";

/// What to do when an image has no usable caption. Either way the build
/// fails; the policy only decides whether the caption store is repaired
/// first so that the next build can succeed.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MissingCaptionPolicy {
    /// Fail immediately.
    Fail,

    /// Ask the operator for the caption, save it to the caption store, then
    /// fail.
    #[default]
    PromptAndPersist,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Project {
    images_directory: PathBuf,
    captions_file: PathBuf,
    output_file: PathBuf,
    extensions: Vec<String>,
    on_missing_caption: MissingCaptionPolicy,
    title: String,
    stylesheet_url: String,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            images_directory: PathBuf::from("images"),
            captions_file: PathBuf::from("data.yaml"),
            output_file: PathBuf::from("index.html"),
            extensions: vec![String::from(".jpg"), String::from(".png")],
            on_missing_caption: MissingCaptionPolicy::default(),
            title: DEFAULT_TITLE.to_owned(),
            stylesheet_url: DEFAULT_STYLESHEET_URL.to_owned(),
        }
    }
}

/// Everything a build needs to know. Paths are ready to use as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The directory scanned for images. Also the tree that is deployed.
    pub images_directory: PathBuf,

    /// The YAML caption store.
    pub captions_file: PathBuf,

    /// Where the rendered page is written before deployment.
    pub output_file: PathBuf,

    /// The deployment directory. The page is copied into it, and the image
    /// tree is merged into `{target_directory}/images`.
    pub target_directory: PathBuf,

    /// File name suffixes, each with a leading dot, which mark an image.
    pub extensions: Vec<String>,

    pub on_missing_caption: MissingCaptionPolicy,
    pub title: String,
    pub stylesheet_url: String,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a [`PROJECT_FILE`]
    /// and loads the first one found. Without a project file, `dir` is the
    /// project root and every setting takes its default.
    pub fn from_directory(dir: &Path, target_directory: &Path) -> Result<Config> {
        for ancestor in dir.ancestors() {
            let path = ancestor.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path, target_directory);
            }
        }
        Ok(Config::with_root(dir, target_directory))
    }

    /// Loads a specific project file.
    pub fn from_project_file(path: &Path, target_directory: &Path) -> Result<Config> {
        let contents = read_to_string(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;

        // An empty project file just marks the project root.
        let mut project: Project = if contents.trim().is_empty() {
            Project::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|err| Error::Parse {
                path: path.to_owned(),
                err,
            })?
        };
        project.extensions = normalize_extensions(project.extensions)?;

        match path.parent() {
            None => Err(Error::NoParent(path.to_owned())),
            Some(project_root) => Ok(Config::resolve(project_root, project, target_directory)),
        }
    }

    /// The default configuration for a project rooted at `root`.
    pub fn with_root(root: &Path, target_directory: &Path) -> Config {
        Config::resolve(root, Project::default(), target_directory)
    }

    fn resolve(root: &Path, project: Project, target_directory: &Path) -> Config {
        Config {
            images_directory: root.join(project.images_directory),
            captions_file: root.join(project.captions_file),
            output_file: root.join(project.output_file),
            target_directory: target_directory.to_owned(),
            extensions: project.extensions,
            on_missing_caption: project.on_missing_caption,
            title: project.title,
            stylesheet_url: project.stylesheet_url,
        }
    }
}

// Gives every extension a leading dot so `jpg` and `.jpg` mean the same
// thing.
fn normalize_extensions(extensions: Vec<String>) -> Result<Vec<String>> {
    if extensions.is_empty() {
        return Err(Error::NoExtensions);
    }
    extensions
        .into_iter()
        .map(|ext| {
            let bare = ext.trim_start_matches('.');
            if bare.is_empty() {
                Err(Error::InvalidExtension(ext))
            } else {
                Ok(format!(".{}", bare))
            }
        })
        .collect()
}

/// The result of loading configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the project file can't be opened.
    #[error("opening project file `{}`: {err}", .path.display())]
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid.
    #[error("parsing project file `{}`: {err}", .path.display())]
    Parse {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    /// Returned when the project file path has no parent directory.
    #[error("can't get parent directory for project file `{}`", .0.display())]
    NoParent(PathBuf),

    /// Returned when `extensions` is empty.
    #[error("`extensions` must list at least one image extension")]
    NoExtensions,

    /// Returned when an extension is empty or only dots.
    #[error("invalid image extension {0:?}")]
    InvalidExtension(String),
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_project_file() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let config = Config::from_directory(dir.path(), Path::new("build"))?;
        assert_eq!(Config::with_root(dir.path(), Path::new("build")), config);
        assert_eq!(vec![".jpg", ".png"], config.extensions);
        assert_eq!(
            MissingCaptionPolicy::PromptAndPersist,
            config.on_missing_caption
        );
        assert_eq!(dir.path().join("images"), config.images_directory);
        Ok(())
    }

    #[test]
    fn test_project_file_in_ancestor() -> Result<()> {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PROJECT_FILE),
            "images_directory: photos\nextensions: [jpg]\non_missing_caption: fail\ntitle: Moons\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = Config::from_directory(&nested, Path::new("out"))?;
        assert_eq!(dir.path().join("photos"), config.images_directory);
        assert_eq!(dir.path().join("data.yaml"), config.captions_file);
        assert_eq!(dir.path().join("index.html"), config.output_file);
        assert_eq!(PathBuf::from("out"), config.target_directory);
        assert_eq!(vec![".jpg"], config.extensions);
        assert_eq!(MissingCaptionPolicy::Fail, config.on_missing_caption);
        assert_eq!("Moons", config.title);
        assert_eq!(DEFAULT_STYLESHEET_URL, config.stylesheet_url);
        Ok(())
    }

    #[test]
    fn test_empty_project_file_marks_root() -> Result<()> {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), "").unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let config = Config::from_directory(&nested, Path::new("build"))?;
        assert_eq!(Config::with_root(dir.path(), Path::new("build")), config);
        Ok(())
    }

    #[test]
    fn test_empty_extensions_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), "extensions: []\n").unwrap();
        match Config::from_directory(dir.path(), Path::new("build")) {
            Err(Error::NoExtensions) => {}
            other => panic!("wanted NoExtensions, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), "image_dir: photos\n").unwrap();
        match Config::from_directory(dir.path(), Path::new("build")) {
            Err(Error::Parse { .. }) => {}
            other => panic!("wanted parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_extensions() {
        assert_eq!(
            vec![".jpg", ".png"],
            normalize_extensions(vec!["jpg".to_owned(), ".png".to_owned()]).unwrap()
        );
        assert!(normalize_extensions(vec![".".to_owned()]).is_err());
    }
}
