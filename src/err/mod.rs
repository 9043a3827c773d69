//! Error types of the crate, grouped by the operation that can fail.

mod capture_error;
pub use capture_error::*;

mod content_error;
pub use content_error::*;

mod invalid_arg_error;
pub use invalid_arg_error::*;

mod layer;
pub use layer::*;

mod len_error;
pub use len_error::*;

mod logic_error;
pub use logic_error::*;

mod parse_error;
pub use parse_error::*;

mod serialize_error;
pub use serialize_error::*;

mod value_too_big_error;
pub use value_too_big_error::*;

mod value_type;
pub use value_type::*;
