//! Shader Cache Settings
//!
//! Configuration for the program cache owned by a [`GlRenderer`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gl_shader_cache::renderer::{GlRenderer, ShaderCacheSettings};
//!
//! // Defaults: "gl-shader-generator" scope, failed sources dumped to the log
//! let renderer = GlRenderer::new(gl, ShaderCacheSettings::default());
//!
//! // Quiet failures, custom log target
//! let settings = ShaderCacheSettings {
//!     scope_name: "my-compositor::shaders",
//!     dump_failed_sources: false,
//!     ..Default::default()
//! };
//! ```
//!
//! [`GlRenderer`]: super::GlRenderer

/// Default name of the diagnostics scope and log target.
pub const DEFAULT_SCOPE_NAME: &str = "gl-shader-generator";

/// Runtime configuration for shader compilation and the program cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderCacheSettings {
    /// Name of the diagnostics scope. Also used as the `log` target for every
    /// message emitted by the cache and the compile/link pipeline.
    pub scope_name: &'static str,

    /// One-line human-readable description of the diagnostics scope.
    pub scope_description: &'static str,

    /// When `true`, a rejected shader source is written to the error log with
    /// line numbers so driver messages can be matched to lines.
    pub dump_failed_sources: bool,

    /// Maximum number of bytes of a driver info log kept in errors and logs.
    pub info_log_limit: usize,

    /// Number of cache slots reserved up front.
    ///
    /// The key space is small (variants × tint), so the default covers every
    /// combination without reallocating.
    pub initial_capacity: usize,
}

impl Default for ShaderCacheSettings {
    fn default() -> Self {
        Self {
            scope_name: DEFAULT_SCOPE_NAME,
            scope_description: "GL renderer shader compilation and cache.",
            dump_failed_sources: true,
            info_log_limit: 512,
            initial_capacity: 18,
        }
    }
}
