#![forbid(unsafe_code)]

pub mod contentful;
pub mod source;

pub use contentful::{ContentfulConfig, ContentfulSource};
pub use source::{ContentError, ContentSource, InMemoryContentSource};
