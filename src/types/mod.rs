// Type definitions for the PDF protection pipeline

pub mod document;
pub mod outcome;

pub use document::*;
pub use outcome::*;
