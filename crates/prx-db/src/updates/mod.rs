//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL. A `Some(order_index)`
//! on a lesson additionally triggers the sequencer's move algorithm.

pub mod content;
pub mod lesson;
