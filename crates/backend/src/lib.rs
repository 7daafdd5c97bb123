//! Boothpack Backend - translate an inclusion plan into a bundling backend's
//! command line and run it.

pub mod invoke;
pub mod vocabulary;

pub use invoke::{command_line, invoke};
pub use vocabulary::{vocabulary_for, FlagVocabulary, NuitkaVocabulary, PyInstallerVocabulary};
