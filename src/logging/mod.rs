// file: src/logging/mod.rs
// version: 1.0.0
// guid: 8d03f6b1-7c2e-49a5-b480-3e91d7c5a268

//! Logging module

pub mod logger;
