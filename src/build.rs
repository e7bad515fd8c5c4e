//! Exports the [`build_gallery`] function which stitches together the steps of
//! building a gallery: loading the caption store ([`crate::caption`]), finding
//! the images ([`crate::image`]), resolving a caption for each, rendering the
//! page ([`crate::page`]), and writing and deploying it ([`crate::write`]).

use crate::caption::{self, Caption, CaptionStore, Missing};
use crate::config::{Config, MissingCaptionPolicy};
use crate::image::{self, find_images};
use crate::page::{Card, Page};
use crate::prompt::{self, Prompt};
use crate::write::{self, Writer};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info};

/// What a successful build produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    /// The number of cards on the page.
    pub cards: usize,

    /// Where the page was written.
    pub output_file: PathBuf,

    /// Where the page and images were deployed.
    pub target_directory: PathBuf,
}

/// Builds and deploys the gallery described by `config`.
///
/// Every image must have a caption before anything is written. The first
/// image without one (in gallery order) fails the build with
/// [`Error::MissingCaption`]. Under
/// [`MissingCaptionPolicy::PromptAndPersist`], `prompt` is asked for the
/// caption first and the caption store is saved with the answer, so the next
/// build gets further; the current build still fails.
pub fn build_gallery(config: &Config, prompt: &mut dyn Prompt) -> Result<Summary> {
    let mut captions = CaptionStore::load(&config.captions_file)?;
    debug!(
        "Loaded {} captions from {}",
        captions.len(),
        config.captions_file.display()
    );

    let file_names = find_images(&config.images_directory, &config.extensions)?;

    let (file_name, reason) = match resolve_cards(&captions, &file_names) {
        Resolution::Complete(cards) => return write_gallery(config, &cards),
        Resolution::Missing {
            file_name, reason, ..
        } => (file_name.to_owned(), reason),
    };

    error!("Missing caption for {}: {}", file_name, reason);
    if config.on_missing_caption == MissingCaptionPolicy::PromptAndPersist {
        let text = prompt.caption(&file_name)?;
        captions.insert(&file_name, &text);
        captions.save(&config.captions_file)?;
        info!(
            "Saved caption for {} to {}; run again to build the gallery",
            file_name,
            config.captions_file.display()
        );
    }
    Err(Error::MissingCaption { file_name, reason })
}

/// The outcome of resolving captions for a list of images.
#[derive(Debug, PartialEq, Eq)]
enum Resolution<'a> {
    /// Every image has a caption. The cards are in the same order as the
    /// images.
    Complete(Vec<Card<'a>>),

    /// The first image without a usable caption, and how many images before
    /// it were resolved.
    Missing {
        file_name: &'a str,
        reason: Missing,
        resolved: usize,
    },
}

// Each card is logged as it resolves, so the log shows how far a failing
// build got.
fn resolve_cards<'a>(captions: &'a CaptionStore, file_names: &'a [String]) -> Resolution<'a> {
    let mut cards = Vec::with_capacity(file_names.len());
    for file_name in file_names {
        match captions.resolve(file_name) {
            Caption::Found(caption) => {
                info!("Generated {} card", file_name);
                cards.push(Card {
                    file_name: file_name.as_str(),
                    caption,
                });
            }
            Caption::Missing(reason) => {
                return Resolution::Missing {
                    file_name: file_name.as_str(),
                    reason,
                    resolved: cards.len(),
                }
            }
        }
    }
    Resolution::Complete(cards)
}

fn write_gallery(config: &Config, cards: &[Card]) -> Result<Summary> {
    let page = Page {
        title: &config.title,
        stylesheet_url: &config.stylesheet_url,
        cards,
    }
    .render()
    .map_err(Error::Render)?;

    let writer = Writer {
        output_file: &config.output_file,
        images_directory: &config.images_directory,
        target_directory: &config.target_directory,
    };
    writer.write_page(&page)?;
    writer.deploy()?;

    Ok(Summary {
        cards: cards.len(),
        output_file: config.output_file.clone(),
        target_directory: config.target_directory.clone(),
    })
}

/// The result of a build.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a gallery.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned for errors loading or saving the caption store.
    #[error(transparent)]
    Captions(#[from] caption::Error),

    /// Returned for errors finding images.
    #[error(transparent)]
    Images(#[from] image::Error),

    /// Returned when an image has no usable caption. If the caption store was
    /// repaired, the next build can succeed.
    #[error("missing caption for `{file_name}`: {reason}")]
    MissingCaption { file_name: String, reason: Missing },

    /// Returned when the operator couldn't be asked for a caption.
    #[error(transparent)]
    Prompt(#[from] prompt::Error),

    /// Returned when the page can't be rendered.
    #[error("rendering page: {0}")]
    Render(io::Error),

    /// Returned for errors writing or deploying the page.
    #[error(transparent)]
    Write(#[from] write::Error),
}
