//! Entity structs for the Praxis learning domain.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod content;
mod enrollment;
mod lesson;

pub use content::Content;
pub use enrollment::{CompletionReceipt, Enrollment, LessonCompletion};
pub use lesson::Lesson;
