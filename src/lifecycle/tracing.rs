//! # Tracing Setup
//!
//! Structured logging for the bridge, filtered by `RUST_LOG`.
//!
//! The subscriber uses the compact format and hides module paths
//! (`with_target(false)`); handler spans carry the action name instead.
//!
//! ```bash
//! # One line per handled request plus store mutations
//! RUST_LOG=info syndication-bridge demo
//!
//! # Full query options and store requests
//! RUST_LOG=debug syndication-bridge demo
//! ```
//!
//! With `RUST_LOG=info` a draft import reads like:
//!
//! ```text
//! INFO create_post: Created id=1 size=1
//! INFO create_post: Attachment created id=2 parent=1
//! INFO create_post: Image attached post_id=1 image_id=2
//! INFO Handled action="pmp_draft_post" status=200
//! ```

/// Installs the global subscriber. Panics if one is already set.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but returns `false` instead of panicking when a
/// subscriber is already installed. Safe to call from every test.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_test_writer()
        .try_init()
        .is_ok()
}
