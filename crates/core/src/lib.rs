//! Core library: path-section access evaluation, voting, configuration and
//! the directory snapshot the checks read from.

pub mod access;
pub mod assignment;
pub mod config;
pub mod directory;
pub mod error;
pub mod evaluator;
pub mod fixture;
pub mod models;
pub mod path;
pub mod permission;
pub mod registry;

pub use access::{AccessResult, DefaultPosture, NoMatchPolicy};
pub use error::AccessError;
pub use evaluator::{EvaluatorOptions, PathResolver, PathSectionAccessEvaluator, SectionLookup};
pub use registry::{AccessCheck, AccessRegistry, Verdict, Vote};
