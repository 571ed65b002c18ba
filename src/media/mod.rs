//! Media module for catalog and transfer target representation.

pub mod catalog;
pub mod target;

pub use crate::api::types::MediaItem;
pub use catalog::{Catalog, Page, PageWindow};
pub use target::TransferTarget;
