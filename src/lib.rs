//! bashplate generates commented Bash script skeletons from a small
//! feature configuration gathered interactively, loaded from a serialized
//! snapshot, or both (a loaded base seeding the question defaults).

/// Command-line interface module for the bashplate application
pub mod cli;

/// The feature configuration model and its JSON persistence
pub mod config;

/// Common constants used across modules
pub mod constants;

/// Error types and handling for the bashplate application
pub mod error;

/// The ordered fragment generators producing the script text
pub mod fragments;

/// Logger configuration
pub mod logger;

/// Artifact finalization and utility-file path resolution
pub mod output;

/// User input and interaction handling
pub mod prompt;

/// The level-gated question flow filling in the configuration
pub mod questions;

/// The indentation-tracking output writer behind each artifact
pub mod writer;
