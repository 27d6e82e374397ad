//! `@searchable` path expressions: parsing and validation

mod parser;
mod validator;

pub use parser::{parse_path, strip_keys_of, PathSyntaxError};
pub use validator::{validate_path, PathError};
