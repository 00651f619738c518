//! # Printer Module
//!
//! Printer profiles: which protocol to speak and the physical settings that
//! go with it.
//!
//! ## Modules
//!
//! - [`config`]: profile and label stock definitions

pub mod config;

pub use config::{DOTS_PER_MM, LabelSetup, Profile};
