//! Library components of the tabmap command-line tool.

pub mod edits;
pub mod logging;
pub mod pairs;
pub mod settings;
