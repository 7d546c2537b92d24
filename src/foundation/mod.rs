pub mod error;
pub mod kind;
