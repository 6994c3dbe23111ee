//! Presentation helpers shared by the library and the command-line tool.

pub mod format;
