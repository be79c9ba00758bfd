//! # tramita-storage
//!
//! File storage for Tramita document uploads. The record store only keeps
//! `file_url` strings; the bytes behind them live here.

pub mod local;

pub use local::LocalFileStore;
