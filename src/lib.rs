//! apexdoc: re-indent Apex source and generate documentation comments.
//!
//! Two independent transforms, both expressed as [`edit::TextEdit`]s against
//! the original text:
//!
//! - [`reindent`]: brace-depth indentation of a whole document.
//! - [`synthesize`]: a `/** ... */` block for a selected class or method,
//!   refreshed from any block already there.

pub mod config;
pub mod edit;
pub mod error;
pub mod model;
pub mod parser;
pub mod reindent;
pub mod render;
pub mod source;
pub mod synthesize;

pub use error::{Error, Result};
pub use reindent::{format, reindent, IndentUnit};
pub use synthesize::{insert_comment, plan_comment, CommentOptions, CommentPlan};
