//! Configuration module for the highlight engine
//!
//! Compile-time limits live in `constants`; user-facing preferences with
//! environment-variable defaults and a TOML loader live in `runtime`.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
