// Domain types and value objects
pub mod float_range;
pub mod outcome;
pub mod skin;

// Re-export commonly used types
pub use float_range::FloatRange;
pub use outcome::{OutcomeFilter, OutcomeTemplate};
pub use skin::{Currency, InputSkin};
