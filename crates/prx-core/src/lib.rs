//! # prx-core
//!
//! Core types, ID prefixes, and progress math for Praxis.
//!
//! This crate provides the foundational types shared across all Praxis crates:
//! - Entity structs for the learning domain (content, lessons, enrollments,
//!   lesson completions)
//! - Status enums with state machine transitions
//! - ID prefix constants
//! - The pure progress calculator and slug helper
//!
//! Nothing in this crate performs I/O; persistence lives in `prx-db`.

pub mod entities;
pub mod enums;
pub mod ids;
pub mod progress;
