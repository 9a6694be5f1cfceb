pub mod record;

pub use record::{Formatter, Record, SubmitRequest};
