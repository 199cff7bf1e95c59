//! Declaration signatures and existing documentation blocks.

pub mod existing;
pub mod signature;

pub use signature::{classify, parse_signature, skip_line_comments, ModifierSet, SignatureParser};
