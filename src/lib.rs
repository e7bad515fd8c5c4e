//! The library code for the `gallerist` static photo gallery generator. A
//! build is a single pass:
//!
//! 1. Load the caption store, a YAML mapping from image file name to caption
//!    ([`crate::caption`])
//! 2. Find the images, newest first by file name ([`crate::image`])
//! 3. Resolve a caption for every image ([`crate::build`])
//! 4. Render one page with a card per image ([`crate::page`])
//! 5. Write the page and deploy it with the images ([`crate::write`])
//!
//! A build never writes a page with a missing caption. Depending on the
//! configured [`config::MissingCaptionPolicy`], the operator may be asked for
//! the missing caption ([`crate::prompt`]); the answer is saved to the caption
//! store, but the build still fails and must be run again.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod caption;
pub mod config;
pub mod html;
pub mod image;
pub mod page;
pub mod prompt;
pub mod write;
