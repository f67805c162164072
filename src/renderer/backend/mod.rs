//! GPU Shading API Seam
//!
//! [`GlBackend`] is the narrow slice of a GLES2-style API that the program
//! cache needs: shader and program object lifetime, compile/link status, info
//! logs, attribute binding, uniform resolution and the handful of uniform
//! uploads performed at draw time.
//!
//! The production implementation wraps [`glow::Context`] (feature `glow`).
//! Tests drive the cache through a recording implementation instead.
//!
//! # Context binding
//!
//! Every method assumes the GL context owning these objects is current on the
//! calling thread. The renderer binds the context; the cache never does.

#[cfg(all(feature = "glow", not(target_arch = "wasm32")))]
mod glow_context;

use std::fmt::Debug;

use crate::errors::ShaderStage;

/// Minimal GL shading API used by the compile/link pipeline and the cache.
pub trait GlBackend {
    /// Shader object handle. Transient: only lives inside one pipeline run.
    type Shader: Copy + Debug;
    /// Linked program handle, owned by a cache entry.
    type Program: Copy + Debug + PartialEq;
    /// Resolved uniform location.
    type UniformLocation: Clone + Debug;

    // ── Shader objects ───────────────────────────────────────────────────────

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;

    /// Uploads `source`, compiles it and reports the compile status.
    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool;

    fn shader_info_log(&self, shader: Self::Shader) -> String;

    fn delete_shader(&self, shader: Self::Shader);

    // ── Program objects ──────────────────────────────────────────────────────

    fn create_program(&self) -> Result<Self::Program, String>;

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);

    fn bind_attrib_location(&self, program: Self::Program, index: u32, name: &str);

    /// Links `program` and reports the link status.
    fn link_program(&self, program: Self::Program) -> bool;

    fn program_info_log(&self, program: Self::Program) -> String;

    fn delete_program(&self, program: Self::Program);

    /// Numeric object name of `program`, as shown in diagnostics.
    fn program_id(&self, program: Self::Program) -> u32;

    // ── Uniforms ─────────────────────────────────────────────────────────────

    /// Returns `None` when `name` is not an active uniform of `program`.
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;

    fn use_program(&self, program: Self::Program);

    fn uniform_matrix4(&self, location: &Self::UniformLocation, value: &[f32; 16]);

    fn uniform_1i(&self, location: &Self::UniformLocation, value: i32);

    fn uniform_1f(&self, location: &Self::UniformLocation, value: f32);

    fn uniform_4f(&self, location: &Self::UniformLocation, value: &[f32; 4]);
}
