//! Error kinds produced while parsing. The error type itself is [`cas_error::Error`].

pub mod kind;

pub use cas_error::Error;
