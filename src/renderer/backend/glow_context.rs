//! [`GlBackend`] for a native [`glow::Context`].

use glow::HasContext;

use super::GlBackend;
use crate::errors::ShaderStage;

// SAFETY (all blocks below): `GlBackend` requires the caller to have this
// context current on the calling thread, and every handle passed in was
// created by this same context.
impl GlBackend for glow::Context {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type UniformLocation = glow::NativeUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { HasContext::create_shader(self, shader_type) }
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool {
        unsafe {
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
            self.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn bind_attrib_location(&self, program: Self::Program, index: u32, name: &str) {
        unsafe { HasContext::bind_attrib_location(self, program, index, name) }
    }

    fn link_program(&self, program: Self::Program) -> bool {
        unsafe {
            HasContext::link_program(self, program);
            self.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn program_id(&self, program: Self::Program) -> u32 {
        program.0.get()
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn use_program(&self, program: Self::Program) {
        unsafe { HasContext::use_program(self, Some(program)) }
    }

    fn uniform_matrix4(&self, location: &Self::UniformLocation, value: &[f32; 16]) {
        unsafe { self.uniform_matrix_4_f32_slice(Some(location), false, value) }
    }

    fn uniform_1i(&self, location: &Self::UniformLocation, value: i32) {
        unsafe { self.uniform_1_i32(Some(location), value) }
    }

    fn uniform_1f(&self, location: &Self::UniformLocation, value: f32) {
        unsafe { self.uniform_1_f32(Some(location), value) }
    }

    fn uniform_4f(&self, location: &Self::UniformLocation, value: &[f32; 4]) {
        unsafe { self.uniform_4_f32_slice(Some(location), value) }
    }
}
