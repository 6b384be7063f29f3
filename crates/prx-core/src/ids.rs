//! ID prefix constants.
//!
//! Every row minted by this core carries a `prefix-8hexchars` ID, generated
//! in SQL by `PraxisDb::generate_id`. Learner IDs are minted by the external
//! auth layer and pass through this core as opaque strings.

/// Content item (`cnt-a3f8b2c1`).
pub const PREFIX_CONTENT: &str = "cnt";

/// Lesson (`lsn-a3f8b2c1`).
pub const PREFIX_LESSON: &str = "lsn";

/// Enrollment (`enr-a3f8b2c1`).
pub const PREFIX_ENROLLMENT: &str = "enr";

/// Lesson completion fact (`cmp-a3f8b2c1`).
pub const PREFIX_COMPLETION: &str = "cmp";

/// All prefixes minted by this core, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_CONTENT,
    PREFIX_LESSON,
    PREFIX_ENROLLMENT,
    PREFIX_COMPLETION,
];
