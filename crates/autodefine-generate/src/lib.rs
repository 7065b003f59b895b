//! Sequelize model generation from discovered catalog metadata.
//!
//! Tables render to `sequelize.define` modules (JavaScript or TypeScript),
//! with optional `db.d.ts` / `db.tables.ts` companions.

pub mod defaults;
pub mod errors;
pub mod extensions;
pub mod model;
pub mod output;
pub mod types;
pub mod typescript;

pub use errors::GenerationError;
pub use extensions::{OptionProvider, OptionRegistry, OptionRequest};
pub use model::{ModelGenerator, RenderedModel, TypedAttribute};
pub use output::{run_post_process, write_bytes_atomic, write_models};
