pub mod config;
pub mod document;
pub mod error;
pub mod parse;
pub mod validate;
pub mod wasm;
