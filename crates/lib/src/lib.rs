#![allow(clippy::missing_errors_doc)]

pub mod artifact;
pub mod build;
pub mod collate;
pub mod format;
mod fs;
pub mod layout;
pub mod list;
pub mod post;
pub mod post_query;
pub mod single;
pub mod timestamp;
pub mod validate;

pub use layout::SiteLayout;
pub use post::CanonicalPost;
pub use post_query::PostQuery;
