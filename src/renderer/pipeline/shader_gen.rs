//! Shader Source Assembly
//!
//! Produces the GLSL text for a [`ShaderRequirements`]:
//!
//! - the vertex source is the fixed [`VERTEX_SHADER`] template, shared by all keys;
//! - the fragment source is three parts concatenated in order: the
//!   [`FRAGMENT_VERSION`] pragma, a generated configuration block, and the fixed
//!   [`FRAGMENT_SHADER`] body which dispatches on the configured macros.
//!
//! The configuration block is rendered with minijinja from a constant template.
//! Assembly is a pure function of the key: the same requirements always give
//! byte-identical text.

use minijinja::{Environment, UndefinedBehavior, context};

use super::requirements::ShaderRequirements;
use crate::errors::Result;

/// Vertex stage template, shared by every program.
pub const VERTEX_SHADER: &str = include_str!("../shaders/vertex.glsl");

/// Fragment stage body, compiled after the version pragma and configuration block.
pub const FRAGMENT_SHADER: &str = include_str!("../shaders/fragment.glsl");

/// Version pragma heading every fragment source.
pub const FRAGMENT_VERSION: &str = "#version 100\n";

const CONFIG_TEMPLATE: &str = r##"#define DEF_GREEN_TINT {{ "true" if green_tint else "false" }}
#define DEF_VARIANT {{ variant }}
"##;

/// Source text for one program, ready to hand to the compile/link pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    config: String,
}

impl ShaderSources {
    #[inline]
    #[must_use]
    pub fn vertex(&self) -> &'static str {
        VERTEX_SHADER
    }

    /// The generated `#define` block for this key.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &str {
        &self.config
    }

    /// Fragment source as its three ordered parts.
    #[must_use]
    pub fn fragment_parts(&self) -> [&str; 3] {
        [FRAGMENT_VERSION, &self.config, FRAGMENT_SHADER]
    }

    /// Fragment source as a single string.
    #[must_use]
    pub fn fragment(&self) -> String {
        self.fragment_parts().concat()
    }
}

/// Renders configuration blocks and assembles full shader sources.
pub struct ShaderGenerator {
    env: Environment<'static>,
}

impl Default for ShaderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderGenerator {
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    /// Renders the `#define` block encoding `requirements`.
    pub fn config_block(&self, requirements: &ShaderRequirements) -> Result<String> {
        let block = self.env.render_str(
            CONFIG_TEMPLATE,
            context! {
                green_tint => requirements.green_tint,
                variant => requirements.variant.symbol(),
            },
        )?;
        Ok(block)
    }

    pub fn generate(&self, requirements: &ShaderRequirements) -> Result<ShaderSources> {
        Ok(ShaderSources {
            config: self.config_block(requirements)?,
        })
    }
}

/// Prefixes every line of the concatenated `parts` with a 6-wide line number.
///
/// A part that does not end in a newline continues its last line into the
/// next part, so numbering matches what the driver sees.
#[must_use]
pub fn number_lines(parts: &[&str]) -> String {
    let mut out = String::with_capacity(parts.iter().map(|p| p.len()).sum::<usize>() * 2);
    let mut line = 1;
    let mut at_line_start = true;

    for part in parts {
        for segment in part.split_inclusive('\n') {
            if at_line_start {
                out.push_str(&format!("{line:>6}: "));
                line += 1;
            }
            out.push_str(segment);
            at_line_start = segment.ends_with('\n');
        }
    }

    out
}
