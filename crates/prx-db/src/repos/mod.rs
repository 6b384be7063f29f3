//! Repository modules adding domain operations to `PraxisService`.
//!
//! Each module adds methods via `impl PraxisService` blocks:
//!
//! - `content` — the rows lessons and enrollments hang off
//! - `lesson` — the sequencer keeping `order_index` contiguous
//! - `enrollment` — the ledger keeping progress consistent with completions

pub mod content;
pub mod enrollment;
pub mod lesson;
