//! Writing rendered models to disk.

pub mod write;

pub use write::{run_post_process, write_bytes_atomic, write_models};
