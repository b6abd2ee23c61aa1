pub mod validation;

pub use validation::{field_messages, not_blank, null_as_blank, ValidatedJson};
