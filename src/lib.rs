//! # Syndication Bridge
//!
//! > **Connects a CMS admin screen to a remote document-syndication API.**
//!
//! The bridge answers the AJAX calls of a CMS plugin: it searches the remote
//! API and reshapes results for display, imports remote stories as local
//! drafts or posts (with their images), and manages "group" documents on the
//! remote side.
//!
//! ## 🏗️ Design
//!
//! ### One reshaping core, thin handlers around it
//! The only real logic is the [`normalizer`]: a pure function that turns
//! either a single fetched document or a paginated collection into one
//! uniform [`NormalizedEnvelope`](model::NormalizedEnvelope), dropping the
//! `auth` and `query` link relations on the way. Every handler is otherwise a
//! short sequence of token check, collaborator call, reshape and reply.
//!
//! ### Collaborators are traits
//! The remote API ([`DocumentApi`](clients::DocumentApi)) and the CMS
//! ([`ContentApi`](clients::ContentApi)) are async traits. The crate ships
//! in-memory implementations of both for tests and the demo:
//! [`DocumentLibrary`](clients::DocumentLibrary) and the
//! [`ContentStore`](store::ContentStore) actor.
//!
//! ### Typed dispatch
//! SDK calls are named by [`SdkMethod`](clients::SdkMethod) rather than
//! strings, and whether a result is a single document or a collection is a
//! [`QueryKind`](normalizer::QueryKind) decided once.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Core ([`normalizer`], [`model`])
//! - **Role**: Parse API JSON into typed documents and reshape it for clients.
//! - **Key items**: [`normalize`](normalizer::normalize),
//!   [`Document`](model::Document), [`merge_attributes`](model::merge_attributes).
//!
//! ### 2. The Boundaries ([`clients`], [`store`])
//! - **Role**: Talk to the remote API and the CMS.
//! - **Key items**: [`DocumentService`](clients::DocumentService),
//!   [`MockDocumentApi`](clients::MockDocumentApi),
//!   [`ContentHandle`](store::ContentHandle).
//!
//! ### 3. The Handlers ([`handlers`])
//! - **Role**: The AJAX actions and their JSON replies.
//! - **Key items**: [`Handlers::dispatch`](handlers::Handlers::dispatch),
//!   [`HandlerError`](handlers::HandlerError).
//!
//! ### 4. The Orchestrator ([`lifecycle`], [`config`])
//! - **Role**: Load settings, spawn the store, wire handlers, set up tracing.
//! - **Key items**: [`BridgeSystem`](lifecycle::BridgeSystem),
//!   [`Settings`](config::Settings).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Reshape a saved API response
//! syndication-bridge normalize --method queryDocs --file response.json
//!
//! # Run the end-to-end demo with logs
//! RUST_LOG=info syndication-bridge demo
//! ```

pub mod clients;
pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod model;
pub mod normalizer;
pub mod store;
