//! Shader Cache Diagnostics
//!
//! A [`DiagnosticsScope`] names the log target the cache reports to. The full
//! cache report ([`CacheReport`]) is a borrowed, read-only view that formats
//! itself only when displayed, so building one costs nothing until a
//! subscriber actually consumes the text.
//!
//! Report layout:
//!
//! ```text
//! Vertex shader body:
//! ---------------------------------------------------------------------
//! <vertex template>
//! Fragment shader body:
//! ---------------------------------------------------------------------
//! <fragment template>
//! ---------------------------------------------------------------------
//! Cached GLSL programs:
//!     id: (used secs ago) description +/-flags
//!      3: (0.5) SHADER_VARIANT_RGBA -green
//! Total: 1 programs.
//! ```

use std::fmt;

use super::program::CompiledProgram;
use super::shader_gen::{FRAGMENT_SHADER, VERTEX_SHADER};
use crate::renderer::backend::GlBackend;
use crate::utils::time::{Instant, elapsed_secs};

const BAR: &str =
    "-----------------------------------------------------------------------------";

/// Named introspection scope registered by a program cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsScope {
    name: &'static str,
    description: &'static str,
}

impl DiagnosticsScope {
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }

    /// Scope name, also the `log` target of every cache message.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Whether the installed logger would accept debug output for this scope.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        log::log_enabled!(target: self.name, log::Level::Debug)
    }
}

/// Read-only snapshot view of a program cache, formatted on display.
pub struct CacheReport<'a, B: GlBackend> {
    pub(crate) backend: &'a B,
    pub(crate) programs: &'a [CompiledProgram<B>],
    pub(crate) now: Instant,
}

impl<B: GlBackend> fmt::Display for CacheReport<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vertex shader body:\n{BAR}\n{VERTEX_SHADER}\n\
             Fragment shader body:\n{BAR}\n{FRAGMENT_SHADER}\n{BAR}\n"
        )?;

        f.write_str("Cached GLSL programs:\n    id: (used secs ago) description +/-flags\n")?;
        let mut count = 0_usize;
        for entry in self.programs {
            count += 1;
            writeln!(
                f,
                "{:>6}: ({:.1}) {}",
                self.backend.program_id(entry.program()),
                elapsed_secs(entry.last_used(), self.now),
                entry.requirements().description()
            )?;
        }
        writeln!(f, "Total: {count} programs.")
    }
}
