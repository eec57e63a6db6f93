//! Shared record types: values, records and join keys.

mod key;
mod value;

pub use key::{JoinKey, KeyFormat};
pub use value::{is_null_value, Record, Value};
