//! # tramita-entity
//!
//! Domain entity models for Tramita. Every struct in this crate represents
//! a stored record or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize`; persistence row mapping lives
//! in `tramita-store`.

pub mod case;
pub mod reminder;
