//! Defines the [`CaptionStore`], the persisted mapping from image file names
//! to caption records, and the [`Caption`] result of looking a file name up in
//! it.
//!
//! The store is a YAML mapping:
//!
//! ```yaml
//! 2021-04-16-sunrise.jpg:
//!   text: Sunrise over the bay
//! 2021-04-17-sunset.jpg:
//!   text: Sunset, same bay
//! ```
//!
//! Records are kept as raw YAML values so that a malformed record only fails
//! the build when an image actually needs it, and so that saving the store
//! never drops fields a user added by hand.

use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The field in a caption record which holds the caption text.
const TEXT_FIELD: &str = "text";

/// The outcome of resolving a caption for an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Caption<'a> {
    /// The record exists and has a string `text` field.
    Found(&'a str),

    /// No usable record exists.
    Missing(Missing),
}

/// Why a caption could not be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Missing {
    /// There is no record for the file name.
    Absent,

    /// There is a record, but it has no `text` field or the field isn't a
    /// string.
    Malformed,
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Missing::Absent => write!(f, "no caption record"),
            Missing::Malformed => write!(f, "caption record has no `text` string"),
        }
    }
}

/// The in-memory caption map. Keys are ordered so that saving is
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptionStore {
    records: BTreeMap<String, Value>,
}

impl CaptionStore {
    /// Loads a store from a YAML file. An empty file yields an empty store; a
    /// document whose top level isn't a mapping of strings is an error.
    pub fn load(path: &Path) -> Result<CaptionStore> {
        let mut contents = String::new();
        File::open(path)
            .and_then(|file| BufReader::new(file).read_to_string(&mut contents))
            .map_err(|err| Error::Read {
                path: path.to_owned(),
                err,
            })?;
        CaptionStore::parse(&contents).map_err(|err| Error::Parse {
            path: path.to_owned(),
            err,
        })
    }

    /// Parses a store from YAML text.
    pub fn parse(input: &str) -> std::result::Result<CaptionStore, serde_yaml::Error> {
        if input.trim().is_empty() {
            return Ok(CaptionStore::default());
        }
        let records = match serde_yaml::from_str::<Value>(input)? {
            Value::Null => BTreeMap::new(),
            value => serde_yaml::from_value(value)?,
        };
        Ok(CaptionStore { records })
    }

    /// Writes the whole store to `path`, replacing its previous contents.
    /// The store is written to a sibling file which is then renamed over
    /// `path`, so a failed save leaves the previous store intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut contents = serde_yaml::to_string(&self.records).map_err(Error::Serialize)?;
        contents.push('\n');

        let tmp_path = temp_path(path);
        let result = File::create(&tmp_path)
            .and_then(|file| {
                let mut w = BufWriter::new(file);
                w.write_all(contents.as_bytes())?;
                w.into_inner().map_err(|err| err.into_error())?.sync_all()
            })
            .and_then(|()| fs::rename(&tmp_path, path));
        result.map_err(|err| {
            let _ = fs::remove_file(&tmp_path);
            Error::Write {
                path: path.to_owned(),
                err,
            }
        })
    }

    /// Looks up the caption for `file_name`.
    pub fn resolve(&self, file_name: &str) -> Caption<'_> {
        match self.records.get(file_name) {
            None => Caption::Missing(Missing::Absent),
            Some(record) => match record
                .as_mapping()
                .and_then(|m| m.get(&Value::String(TEXT_FIELD.to_owned())))
                .and_then(Value::as_str)
            {
                Some(text) => Caption::Found(text),
                None => Caption::Missing(Missing::Malformed),
            },
        }
    }

    /// Sets the caption for `file_name` to `{text: <text>}`, replacing any
    /// previous record.
    pub fn insert(&mut self, file_name: &str, text: &str) {
        let mut record = Mapping::new();
        record.insert(
            Value::String(TEXT_FIELD.to_owned()),
            Value::String(text.to_owned()),
        );
        self.records
            .insert(file_name.to_owned(), Value::Mapping(record));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// The result of a caption store operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or saving a [`CaptionStore`].
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the store file can't be read.
    #[error("reading caption store `{}`: {err}", .path.display())]
    Read { path: PathBuf, err: std::io::Error },

    /// Returned when the store file isn't a YAML mapping of file names.
    #[error("parsing caption store `{}`: {err}", .path.display())]
    Parse {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    /// Returned when the store can't be serialized.
    #[error("serializing caption store: {0}")]
    Serialize(serde_yaml::Error),

    /// Returned when the store file can't be written.
    #[error("writing caption store `{}`: {err}", .path.display())]
    Write { path: PathBuf, err: std::io::Error },
}
