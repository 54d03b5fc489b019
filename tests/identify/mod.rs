//! Integration tests for the identification cascade.

mod cascade;
mod classifiers;
mod config;
