//! Public library modules for the CLI crate
pub mod assign;
pub mod import;
pub mod report;
