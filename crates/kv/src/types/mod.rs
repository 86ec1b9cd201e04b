//! Typed values stored by the resource store

mod value;

pub use value::Value;
