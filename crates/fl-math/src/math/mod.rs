//! Core math modules.

pub mod entropy;
pub mod frequency;
