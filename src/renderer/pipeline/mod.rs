//! Shader program pipeline
//!
//! Turns a [`ShaderRequirements`] into a ready-to-use GL program:
//! - requirements: the cache key
//! - shader_gen: source assembly from the fixed templates
//! - program: compile/link pipeline and the compiled program type
//! - cache: ProgramCache, at most one program per key
//! - diagnostics: lazily formatted cache introspection

pub mod cache;
pub mod diagnostics;
pub mod program;
pub mod requirements;
pub mod shader_gen;

pub use cache::ProgramCache;
pub use diagnostics::{CacheReport, DiagnosticsScope};
pub use program::{CompiledProgram, ShaderParams, UniformTable};
pub use requirements::{ShaderRequirements, TextureVariant};
pub use shader_gen::{ShaderGenerator, ShaderSources};
