//! Backend for children's dictation practice.
//!
//! Children follow a curriculum position; each gets a lazily created
//! [`models::DictationConfig`]. Dictation tasks are built by
//! [`selection::select_words`] from an explicit list or a sampled textbook
//! unit, then stored through [`db::Database`]. The [`api`] module serves it
//! all over HTTP along with user feedback.

pub mod admin;
pub mod api;
pub mod curriculum;
pub mod db;
pub mod models;
pub mod selection;
