//! Recording `GlBackend` used by the integration tests.
//!
//! Hands out sequential object names, tracks which shaders/programs are alive,
//! counts deletes per handle and can be told to reject compiles, links or
//! object creation.

#![allow(dead_code)]

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use gl_shader_cache::{GlBackend, ShaderStage, TextureVariant};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Released {
    Shader(u32),
    Program(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Upload {
    Matrix4(String, [f32; 16]),
    Int(String, i32),
    Float(String, f32),
    Vec4(String, [f32; 4]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockUniform {
    pub program: u32,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct MockState {
    next_name: u32,

    pub live_shaders: FxHashSet<u32>,
    pub live_programs: FxHashSet<u32>,
    pub shader_stages: FxHashMap<u32, ShaderStage>,
    pub shader_sources: FxHashMap<u32, String>,
    pub attached: FxHashMap<u32, Vec<u32>>,
    pub attrib_bindings: FxHashMap<u32, Vec<(u32, String)>>,

    pub compile_calls: usize,
    pub link_calls: usize,
    pub program_deletes: FxHashMap<u32, usize>,
    pub released: Vec<Released>,
    pub invalid_deletes: usize,

    pub used_program: Option<u32>,
    pub uploads: Vec<Upload>,

    pub fail_compile: Option<ShaderStage>,
    pub fail_link: bool,
    pub fail_create_shader: Option<ShaderStage>,
    pub fail_create_program: bool,
    pub inactive_uniforms: FxHashSet<String>,
}

impl MockState {
    fn next(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }

    /// GL objects of any kind still alive.
    pub fn live_objects(&self) -> usize {
        self.live_shaders.len() + self.live_programs.len()
    }
}

/// Whether `source` defines `DEF_GREEN_TINT` as a GLSL bool literal and
/// `DEF_VARIANT` as one of the known variant symbols.
pub fn has_valid_config(source: &str) -> bool {
    let define = |name: &str| {
        source.lines().find_map(|line| {
            let mut words = line.split_whitespace();
            (words.next() == Some("#define") && words.next() == Some(name))
                .then(|| words.collect::<Vec<_>>().join(" "))
        })
    };
    let tint_ok = matches!(define("DEF_GREEN_TINT").as_deref(), Some("true" | "false"));
    let variant_ok = define("DEF_VARIANT").is_some_and(|symbol| {
        TextureVariant::ALL
            .iter()
            .any(|variant| variant.symbol() == symbol)
    });
    tint_ok && variant_ok
}

#[derive(Debug, Clone, Default)]
pub struct MockGl(Rc<RefCell<MockState>>);

impl MockGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Ref<'_, MockState> {
        self.0.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, MockState> {
        self.0.borrow_mut()
    }
}

impl GlBackend for MockGl {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = MockUniform;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut s = self.state_mut();
        if s.fail_create_shader == Some(stage) {
            return Err(format!("out of {stage} shader objects"));
        }
        let name = s.next();
        s.live_shaders.insert(name);
        s.shader_stages.insert(name, stage);
        Ok(name)
    }

    fn compile_shader(&self, shader: u32, source: &str) -> bool {
        let mut s = self.state_mut();
        s.compile_calls += 1;
        s.shader_sources.insert(shader, source.to_owned());
        let stage = s.shader_stages[&shader];
        if stage == ShaderStage::Fragment && !has_valid_config(source) {
            return false;
        }
        s.fail_compile != Some(stage)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let stage = self.state().shader_stages[&shader];
        format!("0:3(1): error: syntax error in {stage} stage\n")
    }

    fn delete_shader(&self, shader: u32) {
        let mut s = self.state_mut();
        if s.live_shaders.remove(&shader) {
            s.released.push(Released::Shader(shader));
        } else {
            s.invalid_deletes += 1;
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut s = self.state_mut();
        if s.fail_create_program {
            return Err("out of program objects".to_owned());
        }
        let name = s.next();
        s.live_programs.insert(name);
        Ok(name)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.state_mut()
            .attached
            .entry(program)
            .or_default()
            .push(shader);
    }

    fn bind_attrib_location(&self, program: u32, index: u32, name: &str) {
        self.state_mut()
            .attrib_bindings
            .entry(program)
            .or_default()
            .push((index, name.to_owned()));
    }

    fn link_program(&self, _program: u32) -> bool {
        let mut s = self.state_mut();
        s.link_calls += 1;
        !s.fail_link
    }

    fn program_info_log(&self, _program: u32) -> String {
        "error: fragment input v_texcoord not written by vertex shader\n".to_owned()
    }

    fn delete_program(&self, program: u32) {
        let mut s = self.state_mut();
        *s.program_deletes.entry(program).or_default() += 1;
        if s.live_programs.remove(&program) {
            s.released.push(Released::Program(program));
        } else {
            s.invalid_deletes += 1;
        }
    }

    fn program_id(&self, program: u32) -> u32 {
        program
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<MockUniform> {
        if self.state().inactive_uniforms.contains(name) {
            return None;
        }
        Some(MockUniform {
            program,
            name: name.to_owned(),
        })
    }

    fn use_program(&self, program: u32) {
        self.state_mut().used_program = Some(program);
    }

    fn uniform_matrix4(&self, location: &MockUniform, value: &[f32; 16]) {
        self.state_mut()
            .uploads
            .push(Upload::Matrix4(location.name.clone(), *value));
    }

    fn uniform_1i(&self, location: &MockUniform, value: i32) {
        self.state_mut()
            .uploads
            .push(Upload::Int(location.name.clone(), value));
    }

    fn uniform_1f(&self, location: &MockUniform, value: f32) {
        self.state_mut()
            .uploads
            .push(Upload::Float(location.name.clone(), value));
    }

    fn uniform_4f(&self, location: &MockUniform, value: &[f32; 4]) {
        self.state_mut()
            .uploads
            .push(Upload::Vec4(location.name.clone(), *value));
    }
}
