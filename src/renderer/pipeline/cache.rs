//! Program Cache
//!
//! Owner of every linked program of a renderer context, keyed by
//! [`ShaderRequirements`].
//!
//! # Lookup
//!
//! The key space is variants × tint (18 keys), so programs live in a plain
//! `Vec` scanned linearly with memberwise key comparison. A hit refreshes the
//! entry's last-used time and performs no GL work. A miss runs the
//! compile/link pipeline and inserts the new entry at the front; a failed
//! build inserts nothing.
//!
//! # Lifetime
//!
//! Entries leave the cache only through [`ProgramCache::destroy`] or
//! [`ProgramCache::destroy_all`]; there is no eviction. Both need the backend
//! to release the GL program, so the owning renderer must call
//! `destroy_all` at teardown. Callers must ensure no pending draw still
//! references a destroyed program.

use std::fmt;

use super::diagnostics::{CacheReport, DiagnosticsScope};
use super::program::{CompiledProgram, build_program};
use super::requirements::ShaderRequirements;
use super::shader_gen::ShaderGenerator;
use crate::errors::Result;
use crate::renderer::backend::GlBackend;
use crate::renderer::settings::ShaderCacheSettings;
use crate::utils::time::Instant;

/// Compiled programs of one renderer context.
pub struct ProgramCache<B: GlBackend> {
    programs: Vec<CompiledProgram<B>>,
    generator: ShaderGenerator,
    scope: DiagnosticsScope,
    settings: ShaderCacheSettings,
}

impl<B: GlBackend> Default for ProgramCache<B> {
    fn default() -> Self {
        Self::new(ShaderCacheSettings::default())
    }
}

impl<B: GlBackend> ProgramCache<B> {
    #[must_use]
    pub fn new(settings: ShaderCacheSettings) -> Self {
        Self {
            programs: Vec::with_capacity(settings.initial_capacity),
            generator: ShaderGenerator::new(),
            scope: DiagnosticsScope::new(settings.scope_name, settings.scope_description),
            settings,
        }
    }

    // ── Lookup ───────────────────────────────────────────────────────────────

    /// Returns the program for `requirements`, compiling it on first use.
    pub fn lookup_or_create(
        &mut self,
        backend: &B,
        requirements: &ShaderRequirements,
    ) -> Result<&CompiledProgram<B>> {
        self.lookup_or_create_at(backend, requirements, Instant::now())
    }

    /// [`lookup_or_create`](Self::lookup_or_create) with an explicit clock reading.
    pub fn lookup_or_create_at(
        &mut self,
        backend: &B,
        requirements: &ShaderRequirements,
        now: Instant,
    ) -> Result<&CompiledProgram<B>> {
        if let Some(index) = self.position(requirements) {
            self.programs[index].touch(now);
            return Ok(&self.programs[index]);
        }

        let program = build_program(backend, &self.generator, requirements, &self.settings, now)?;
        self.programs.insert(0, program);
        Ok(&self.programs[0])
    }

    /// Returns the cached program for `requirements` without touching it.
    #[must_use]
    pub fn get(&self, requirements: &ShaderRequirements) -> Option<&CompiledProgram<B>> {
        self.position(requirements).map(|index| &self.programs[index])
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, requirements: &ShaderRequirements) -> bool {
        self.position(requirements).is_some()
    }

    fn position(&self, requirements: &ShaderRequirements) -> Option<usize> {
        self.programs
            .iter()
            .position(|entry| entry.requirements() == requirements)
    }

    // ── Destruction ──────────────────────────────────────────────────────────

    /// Removes the entry for `requirements` and deletes its GL program.
    ///
    /// Returns `false` if no such entry exists.
    pub fn destroy(&mut self, backend: &B, requirements: &ShaderRequirements) -> bool {
        let Some(index) = self.position(requirements) else {
            return false;
        };
        let entry = self.programs.remove(index);
        release(backend, &entry, self.scope.name());
        true
    }

    /// Destroys every entry. The cache is empty afterwards.
    pub fn destroy_all(&mut self, backend: &B) {
        let target = self.scope.name();
        for entry in self.programs.drain(..) {
            release(backend, &entry, target);
        }
    }

    // ── Inspection ───────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Entries, most recently inserted first.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledProgram<B>> {
        self.programs.iter()
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ShaderCacheSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn scope(&self) -> &DiagnosticsScope {
        &self.scope
    }

    // ── Diagnostics ──────────────────────────────────────────────────────────

    /// Lazily formatted dump of the templates and every cached program.
    #[must_use]
    pub fn report<'a>(&'a self, backend: &'a B, now: Instant) -> CacheReport<'a, B> {
        CacheReport {
            backend,
            programs: &self.programs,
            now,
        }
    }

    /// Writes the report to an explicit subscriber.
    pub fn write_report<W: fmt::Write>(&self, backend: &B, out: &mut W) -> fmt::Result {
        write!(out, "{}", self.report(backend, Instant::now()))
    }

    /// Logs the report on the scope's target, if anything is listening.
    pub fn log_report(&self, backend: &B) {
        if !self.scope.is_enabled() {
            return;
        }
        log::debug!(
            target: self.scope.name(),
            "{}\n{}",
            self.scope.description(),
            self.report(backend, Instant::now())
        );
    }
}

fn release<B: GlBackend>(backend: &B, entry: &CompiledProgram<B>, target: &str) {
    log::debug!(
        target: target,
        "Deleting shader program for: {}",
        entry.requirements().description()
    );
    backend.delete_program(entry.program());
}

impl<B: GlBackend> Drop for ProgramCache<B> {
    fn drop(&mut self) {
        if !self.programs.is_empty() {
            log::warn!(
                target: self.scope.name(),
                "ProgramCache dropped with {} live programs; their GL objects are leaked",
                self.programs.len()
            );
        }
    }
}
