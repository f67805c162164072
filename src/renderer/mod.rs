//! GL Renderer Context
//!
//! [`GlRenderer`] is the per-context owner of the shader program cache. It
//! creates the cache empty when the context is initialised and destroys every
//! remaining program when the context is torn down, so cache lifetime is
//! always paired with the context that owns the GL objects.
//!
//! All calls happen on the thread where the GL context is current; nothing
//! here binds the context.

pub mod backend;
pub mod pipeline;
pub mod settings;

use std::fmt;

use crate::errors::Result;
use crate::utils::time::Instant;

use self::backend::GlBackend;
use self::pipeline::{CompiledProgram, ProgramCache, ShaderParams, ShaderRequirements};

pub use self::settings::ShaderCacheSettings;

/// Renderer context holding a GL backend and its program cache.
pub struct GlRenderer<B: GlBackend> {
    backend: B,
    programs: ProgramCache<B>,
}

impl<B: GlBackend> GlRenderer<B> {
    #[must_use]
    pub fn new(backend: B, settings: ShaderCacheSettings) -> Self {
        log::info!(
            target: settings.scope_name,
            "Registered diagnostics scope '{}': {}",
            settings.scope_name,
            settings.scope_description.trim_end()
        );
        Self {
            backend,
            programs: ProgramCache::new(settings),
        }
    }

    #[inline]
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    #[must_use]
    pub fn program_cache(&self) -> &ProgramCache<B> {
        &self.programs
    }

    /// Returns the program for `requirements`, compiling it on first use.
    pub fn get_program(&mut self, requirements: &ShaderRequirements) -> Result<&CompiledProgram<B>> {
        self.programs.lookup_or_create(&self.backend, requirements)
    }

    /// Binds the program for `params.requirements` and uploads its uniforms.
    ///
    /// Uniforms the program does not expose are skipped.
    pub fn use_program(&mut self, params: &ShaderParams) -> Result<()> {
        let entry = self
            .programs
            .lookup_or_create(&self.backend, &params.requirements)?;
        self.backend.use_program(entry.program());
        entry.uniforms().apply(&self.backend, params);
        Ok(())
    }

    /// Destroys the cached program for `requirements`, if any.
    pub fn destroy_program(&mut self, requirements: &ShaderRequirements) -> bool {
        self.programs.destroy(&self.backend, requirements)
    }

    /// Logs the cache report if the diagnostics scope has a listener.
    pub fn log_shader_report(&self) {
        self.programs.log_report(&self.backend);
    }

    /// Writes the cache report to `out`.
    pub fn write_shader_report<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        self.programs.write_report(&self.backend, out)
    }

    /// Writes the cache report as of `now` to `out`.
    pub fn write_shader_report_at<W: fmt::Write>(&self, out: &mut W, now: Instant) -> fmt::Result {
        write!(out, "{}", self.programs.report(&self.backend, now))
    }

    /// Destroys every cached program. Also runs on drop.
    pub fn teardown(&mut self) {
        self.programs.destroy_all(&self.backend);
    }
}

impl<B: GlBackend> Drop for GlRenderer<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
