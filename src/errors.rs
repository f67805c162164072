//! Error Types
//!
//! This module defines the error types produced by the shader program cache.
//!
//! # Overview
//!
//! The main error type [`ShaderError`] covers the three ways a program request
//! can fail:
//! - The driver rejects a shader stage at compile time
//! - The driver rejects the program at link time
//! - A GPU object or the generated configuration text cannot be produced
//!
//! None of these are fatal to the cache as a whole. The failing request is
//! abandoned, nothing is inserted, and existing entries are left untouched.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, ShaderError>`.
//!
//! ```rust,ignore
//! use gl_shader_cache::errors::{Result, ShaderError};
//!
//! fn draw(renderer: &mut GlRenderer<glow::Context>, params: &ShaderParams) -> Result<()> {
//!     match renderer.use_program(params) {
//!         Err(ShaderError::Compile { .. }) => Ok(()), // skip this draw
//!         other => other,
//!     }
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// Programmable pipeline stage of a shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// The error type for shader program creation.
#[derive(Error, Debug)]
pub enum ShaderError {
    /// The driver rejected the source of one shader stage.
    #[error("Failed to compile {stage} shader: {log}")]
    Compile {
        /// Stage whose compilation failed
        stage: ShaderStage,
        /// Driver info log, truncated to the configured limit
        log: String,
    },

    /// The driver refused to link the compiled stages into a program.
    #[error("Failed to link shader program: {log}")]
    Link {
        /// Driver info log, truncated to the configured limit
        log: String,
    },

    /// A GPU object or the generated configuration text could not be created.
    #[error("Failed to allocate {what}: {reason}")]
    Allocation {
        /// What was being created
        what: &'static str,
        /// Underlying reason reported by the driver or template engine
        reason: String,
    },
}

impl From<minijinja::Error> for ShaderError {
    fn from(err: minijinja::Error) -> Self {
        ShaderError::Allocation {
            what: "shader configuration",
            reason: err.to_string(),
        }
    }
}

/// Alias for `Result<T, ShaderError>`.
pub type Result<T> = std::result::Result<T, ShaderError>;
