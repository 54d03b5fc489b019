//! Core data types shared by every classifier.

pub mod classification;

pub use classification::Classification;
