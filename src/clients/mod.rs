//! Boundaries to the two external collaborators, plus the wrappers and
//! in-memory stand-ins built on them.
//!
//! - [`DocumentApi`]: the remote syndication API. [`DocumentService`] adds
//!   normalization and document construction on top.
//! - [`ContentApi`]: the local CMS. The in-memory implementation lives in
//!   [`crate::store`].

pub mod content_api;
pub mod document_api;
pub mod library;
pub mod mock;
pub mod sdk_method;
pub mod service;

pub use content_api::*;
pub use document_api::*;
pub use library::DocumentLibrary;
pub use mock::MockDocumentApi;
pub use sdk_method::*;
pub use service::*;
