#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod errors;
pub mod renderer;
pub mod utils;

pub use errors::{Result, ShaderError, ShaderStage};
pub use renderer::backend::GlBackend;
pub use renderer::pipeline::{
    CompiledProgram, ProgramCache, ShaderParams, ShaderRequirements, TextureVariant,
};
pub use renderer::{GlRenderer, ShaderCacheSettings};
