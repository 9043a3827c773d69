//! The polymorphic layer abstraction: type tags, the [`AnyLayer`] sum
//! type, the [`Pdu`] chain and the `/` composition operator.

mod any_layer;
pub use any_layer::*;

mod compose;

mod layer_type;
pub use layer_type::*;

mod pdu;
pub use pdu::*;

mod raw_data;
pub use raw_data::*;
