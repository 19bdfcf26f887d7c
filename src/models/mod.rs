//! Domain models for the dictation server.
//!
//! - [`Child`]: A learner with a curriculum position, owned by one user.
//! - [`DictationConfig`]: Per-child settings, created lazily with defaults.
//! - [`DictationTask`]: Words chosen for one dictation session, fixed at creation.
//! - [`CurriculumItem`]: Catalog entry tying a word to a textbook unit.
//! - [`Feedback`]: User feedback with admin replies.

mod child;
mod curriculum;
mod dictation_config;
mod feedback;
pub mod lenient;
mod task;

pub use child::*;
pub use curriculum::*;
pub use dictation_config::*;
pub use feedback::*;
pub use task::*;
