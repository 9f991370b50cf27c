pub mod replay;
pub mod source;
pub mod types;
