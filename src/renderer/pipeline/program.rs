//! Compiled Programs and the Compile/Link Pipeline
//!
//! [`build_program`] drives the backend from assembled source text to a linked
//! program with resolved uniforms:
//!
//! ```text
//! SourceAssembled → VertexCompiled → FragmentCompiled → Linked → Ready
//!        │                │                  │             │
//!        └────────────────┴──────────────────┴─────────────┴──→ Failed
//! ```
//!
//! Every GL object created along the way is held by a [`GlObject`] guard.
//! Guards delete their object when dropped, so any early return releases
//! exactly the objects created so far, newest first. Shader objects never
//! survive the call; the program survives only on success.

use std::fmt;

use super::requirements::ShaderRequirements;
use super::shader_gen::{ShaderGenerator, ShaderSources, number_lines};
use crate::errors::{Result, ShaderError, ShaderStage};
use crate::renderer::backend::GlBackend;
use crate::renderer::settings::ShaderCacheSettings;
use crate::utils::time::Instant;

/// Attribute slot of the `position` vertex input.
pub const POSITION_ATTRIB_LOCATION: u32 = 0;
/// Attribute slot of the `texcoord` vertex input.
pub const TEXCOORD_ATTRIB_LOCATION: u32 = 1;

const PROJECTION_UNIFORM: &str = "proj";
const TEXTURE_UNIFORMS: [&str; 3] = ["tex", "tex1", "tex2"];
const ALPHA_UNIFORM: &str = "alpha";
const COLOR_UNIFORM: &str = "unicolor";

// ─── Uniforms ────────────────────────────────────────────────────────────────

/// Uniform locations of a linked program.
///
/// `None` means the driver did not report the uniform as active (typically
/// optimised out for this variant). Absent uniforms are skipped at draw time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformTable<L> {
    pub projection: Option<L>,
    pub textures: [Option<L>; 3],
    pub alpha: Option<L>,
    pub color: Option<L>,
}

impl<L> Default for UniformTable<L> {
    fn default() -> Self {
        Self {
            projection: None,
            textures: [None, None, None],
            alpha: None,
            color: None,
        }
    }
}

impl<L: Clone> UniformTable<L> {
    fn resolve<B>(backend: &B, program: B::Program) -> Self
    where
        B: GlBackend<UniformLocation = L>,
    {
        Self {
            projection: backend.uniform_location(program, PROJECTION_UNIFORM),
            textures: TEXTURE_UNIFORMS.map(|name| backend.uniform_location(program, name)),
            alpha: backend.uniform_location(program, ALPHA_UNIFORM),
            color: backend.uniform_location(program, COLOR_UNIFORM),
        }
    }

    /// Uploads `params` into every resolved location; sampler `i` is bound to
    /// texture unit `i`.
    pub(crate) fn apply<B>(&self, backend: &B, params: &ShaderParams)
    where
        B: GlBackend<UniformLocation = L>,
    {
        if let Some(location) = &self.projection {
            backend.uniform_matrix4(location, &params.projection);
        }
        for (location, unit) in self.textures.iter().zip(0_i32..) {
            if let Some(location) = location {
                backend.uniform_1i(location, unit);
            }
        }
        if let Some(location) = &self.alpha {
            backend.uniform_1f(location, params.alpha);
        }
        if let Some(location) = &self.color {
            backend.uniform_4f(location, &params.color);
        }
    }

    /// Number of uniforms that resolved to a location.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        usize::from(self.projection.is_some())
            + self.textures.iter().filter(|t| t.is_some()).count()
            + usize::from(self.alpha.is_some())
            + usize::from(self.color.is_some())
    }
}

/// Per-draw shader configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderParams {
    pub requirements: ShaderRequirements,
    /// Column-major projection matrix.
    pub projection: [f32; 16],
    pub alpha: f32,
    /// Fill colour for [`TextureVariant::Solid`](super::requirements::TextureVariant::Solid).
    pub color: [f32; 4],
}

impl ShaderParams {
    #[must_use]
    pub fn new(requirements: ShaderRequirements) -> Self {
        Self {
            requirements,
            ..Default::default()
        }
    }
}

impl Default for ShaderParams {
    fn default() -> Self {
        #[rustfmt::skip]
        let identity = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self {
            requirements: ShaderRequirements::default(),
            projection: identity,
            alpha: 1.0,
            color: [0.0; 4],
        }
    }
}

// ─── CompiledProgram ─────────────────────────────────────────────────────────

/// A linked program together with the key it was built for.
pub struct CompiledProgram<B: GlBackend> {
    requirements: ShaderRequirements,
    program: B::Program,
    uniforms: UniformTable<B::UniformLocation>,
    last_used: Instant,
}

impl<B: GlBackend> CompiledProgram<B> {
    #[inline]
    #[must_use]
    pub fn requirements(&self) -> &ShaderRequirements {
        &self.requirements
    }

    #[inline]
    #[must_use]
    pub fn program(&self) -> B::Program {
        self.program
    }

    #[inline]
    #[must_use]
    pub fn uniforms(&self) -> &UniformTable<B::UniformLocation> {
        &self.uniforms
    }

    #[inline]
    #[must_use]
    pub fn last_used(&self) -> Instant {
        self.last_used
    }

    #[inline]
    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_used = now;
    }
}

impl<B: GlBackend> fmt::Debug for CompiledProgram<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledProgram")
            .field("requirements", &self.requirements)
            .field("program", &self.program)
            .field("uniforms", &self.uniforms)
            .field("last_used", &self.last_used)
            .finish()
    }
}

// ─── Object guard ────────────────────────────────────────────────────────────

/// Owns one GL object for the duration of a pipeline run.
///
/// Deletes the object on drop unless [`GlObject::keep`] hands it out.
struct GlObject<'a, B, H: Copy> {
    backend: &'a B,
    handle: H,
    delete: fn(&B, H),
    armed: bool,
}

impl<'a, B, H: Copy> GlObject<'a, B, H> {
    fn new(backend: &'a B, handle: H, delete: fn(&B, H)) -> Self {
        Self {
            backend,
            handle,
            delete,
            armed: true,
        }
    }

    #[inline]
    fn handle(&self) -> H {
        self.handle
    }

    fn keep(mut self) -> H {
        self.armed = false;
        self.handle
    }
}

impl<B, H: Copy> Drop for GlObject<'_, B, H> {
    fn drop(&mut self) {
        if self.armed {
            (self.delete)(self.backend, self.handle);
        }
    }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Compiles and links the program for `requirements`.
///
/// On error no GL object created by this call is left alive.
pub fn build_program<B: GlBackend>(
    backend: &B,
    generator: &ShaderGenerator,
    requirements: &ShaderRequirements,
    settings: &ShaderCacheSettings,
    now: Instant,
) -> Result<CompiledProgram<B>> {
    let target = settings.scope_name;
    log::debug!(
        target: target,
        "Compiling shader program for: {}",
        requirements.description()
    );

    let sources: ShaderSources = generator.generate(requirements)?;

    let vertex = compile_stage(backend, ShaderStage::Vertex, &[sources.vertex()], settings)?;
    let fragment = compile_stage(
        backend,
        ShaderStage::Fragment,
        &sources.fragment_parts(),
        settings,
    )?;

    let program = backend
        .create_program()
        .map_err(|reason| ShaderError::Allocation {
            what: "program object",
            reason,
        })?;
    let program = GlObject::new(backend, program, B::delete_program);

    backend.attach_shader(program.handle(), vertex.handle());
    backend.attach_shader(program.handle(), fragment.handle());
    backend.bind_attrib_location(program.handle(), POSITION_ATTRIB_LOCATION, "position");
    backend.bind_attrib_location(program.handle(), TEXCOORD_ATTRIB_LOCATION, "texcoord");

    if !backend.link_program(program.handle()) {
        let log = truncate_info_log(backend.program_info_log(program.handle()), settings);
        log::error!(target: target, "link info: {log}");
        return Err(ShaderError::Link { log });
    }

    // The linked program keeps the compiled code.
    drop(fragment);
    drop(vertex);

    let program = program.keep();
    let uniforms = UniformTable::resolve(backend, program);

    Ok(CompiledProgram {
        requirements: *requirements,
        program,
        uniforms,
        last_used: now,
    })
}

fn compile_stage<'a, B: GlBackend>(
    backend: &'a B,
    stage: ShaderStage,
    parts: &[&str],
    settings: &ShaderCacheSettings,
) -> Result<GlObject<'a, B, B::Shader>> {
    let shader = backend
        .create_shader(stage)
        .map_err(|reason| ShaderError::Allocation {
            what: "shader object",
            reason,
        })?;
    let shader = GlObject::new(backend, shader, B::delete_shader);

    if !backend.compile_shader(shader.handle(), &parts.concat()) {
        let log = truncate_info_log(backend.shader_info_log(shader.handle()), settings);
        let target = settings.scope_name;
        log::error!(target: target, "{stage} shader info: {log}");
        if settings.dump_failed_sources {
            log::error!(target: target, "shader source:\n{}", number_lines(parts));
        }
        return Err(ShaderError::Compile { stage, log });
    }

    Ok(shader)
}

/// Caps `log` at the configured size and strips trailing newlines and NULs.
fn truncate_info_log(mut log: String, settings: &ShaderCacheSettings) -> String {
    if log.len() > settings.info_log_limit {
        let mut end = settings.info_log_limit;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    let trimmed = log.trim_end_matches(['\n', '\r', '\0', ' ']).len();
    log.truncate(trimmed);
    log
}
