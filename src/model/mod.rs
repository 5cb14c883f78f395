//! Pure data structures: remote documents, client envelopes and CMS DTOs.

pub mod attributes;
pub mod collection;
pub mod document;
pub mod envelope;
pub mod post;

pub use attributes::*;
pub use collection::*;
pub use document::*;
pub use envelope::*;
pub use post::*;
