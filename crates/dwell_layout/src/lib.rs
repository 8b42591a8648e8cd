//! Keyboard layouts and the sentence they build.
//!
//! This crate owns the vocabulary side of the keyboard:
//!
//! - [`KeySpec`] / [`Layout`]: immutable key tables
//! - [`SentenceBuffer`]: the tokens selected so far
//! - [`LayoutCatalog`]: the set of named layouts plus the two derivation
//!   functions that choose what to show next
//!
//! # Derivation
//!
//! ```text
//!   SentenceBuffer ──trailing words──► derive_rule_based ──► &Layout
//!   ranked suggestions ──────────────► derive_suggestion_layout ──► Layout
//! ```
//!
//! Rule-based derivation is pure over the lower-cased, whitespace-normalized
//! trailing one to three words of the sentence. The suggestion layout keeps
//! the first six keys of `default` and fills the remaining eighteen slots.

mod buffer;
mod builtin;
mod catalog;
mod error;
mod key;
mod layout;

pub use buffer::SentenceBuffer;
pub use catalog::{derive_rule, LayoutCatalog};
pub use error::{LayoutError, LayoutResult};
pub use key::{KeySpec, KeyType, Modality};
pub use layout::Layout;

/// Well-known layout ids.
pub mod ids {
    pub const DEFAULT: &str = "default";
    pub const AFTER_I: &str = "afterI";
    pub const AFTER_I_LIKE: &str = "afterILike";
    pub const AFTER_I_LIKE_TO_PLAY: &str = "afterILikeToPlay";
    pub const VOCAB: &str = "vocab";
    pub const SUGGESTIONS: &str = "suggestions";

    /// Layouts every catalog must define.
    pub const REQUIRED: [&str; 4] = [DEFAULT, AFTER_I, AFTER_I_LIKE, AFTER_I_LIKE_TO_PLAY];
}

/// Well-known action key ids.
pub mod keys {
    pub const CLEAR: &str = "clear";
    pub const HOME: &str = "home";
    pub const EXIT: &str = "exit";
    pub const VOCAB: &str = "vocab";
}

/// First slot of the default layout that suggestions may overwrite.
pub const SUGGESTION_FIRST_SLOT: usize = 6;

/// Maximum number of suggestions shown at once.
pub const MAX_SUGGESTIONS: usize = 18;

/// Background colour of suggestion keys.
pub const SUGGESTION_COLOR: &str = "#e3f2fd";
