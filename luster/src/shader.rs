//! Shader stages and programs.
//!
//! A [`Stage`] is one compiled shader stage; a [`Program`] links several stages into the object
//! draws run through. Compilation and linking failures surface the driver info log verbatim —
//! there is no recovery path for a broken pipeline, so callers typically treat those as fatal.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::ffi::CString;
use std::fmt;
use std::ptr::{null, null_mut};
use std::rc::Rc;

use crate::context::GraphicsContext;
use crate::state::GLState;
use crate::vertex_array::VertexAttrib;

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  Vertex,
  /// Geometry shader.
  Geometry,
  /// Fragment shader.
  Fragment,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::Vertex => f.write_str("vertex shader"),
      StageType::Geometry => f.write_str("geometry shader"),
      StageType::Fragment => f.write_str("fragment shader"),
    }
  }
}

fn opengl_shader_type(ty: StageType) -> GLenum {
  match ty {
    StageType::Vertex => gl::VERTEX_SHADER,
    StageType::Geometry => gl::GEOMETRY_SHADER,
    StageType::Fragment => gl::FRAGMENT_SHADER,
  }
}

/// Errors that shader stages can emit.
#[non_exhaustive]
#[derive(Debug)]
pub enum StageError {
  /// Occurs when a shader fails to compile.
  CompilationFailed(StageType, String),
  /// Occurs when the driver cannot create a stage of that type.
  CreationFailed(StageType),
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageError::CompilationFailed(ty, ref log) => write!(f, "{} compilation error: {}", ty, log),
      StageError::CreationFailed(ty) => write!(f, "unable to create {}", ty),
    }
  }
}

impl error::Error for StageError {}

/// A compiled shader stage.
///
/// Stages are transient: they only exist to be linked into a [`Program`] and are usually dropped
/// right after linking succeeds.
#[derive(Debug)]
pub struct Stage {
  handle: GLuint,
  ty: StageType,
}

impl Stage {
  /// Compile a shader stage from a GLSL source string.
  pub fn new<C>(_ctx: &mut C, ty: StageType, src: &str) -> Result<Self, StageError>
  where
    C: GraphicsContext,
  {
    unsafe {
      let handle = gl::CreateShader(opengl_shader_type(ty));

      if handle == 0 {
        return Err(StageError::CreationFailed(ty));
      }

      let c_src = CString::new(src.as_bytes()).unwrap();
      gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
      gl::CompileShader(handle);

      let mut compiled: GLint = gl::FALSE.into();
      gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

      if compiled == gl::TRUE.into() {
        Ok(Stage { handle, ty })
      } else {
        let log = shader_info_log(handle);
        gl::DeleteShader(handle);

        Err(StageError::CompilationFailed(ty, log))
      }
    }
  }

  /// The stage type this stage was compiled as.
  pub fn ty(&self) -> StageType {
    self.ty
  }
}

impl Drop for Stage {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteShader(self.handle);
    }
  }
}

/// Errors that shader programs can emit.
#[non_exhaustive]
#[derive(Debug)]
pub enum ProgramError {
  /// Occurs when the program fails to link.
  LinkFailed(String),
  /// An attribute name the program doesn’t expose.
  ///
  /// Either the name never appeared in the sources or the compiler optimized it out.
  InactiveAttrib(String),
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::LinkFailed(ref log) => write!(f, "program link error: {}", log),
      ProgramError::InactiveAttrib(ref name) => write!(f, "inactive attribute: {}", name),
    }
  }
}

impl error::Error for ProgramError {}

/// A linked shader program.
///
/// The native name is released exactly once, on drop. Stages attached at link time can be — and
/// usually are — dropped as soon as `new` returns.
#[derive(Debug)]
pub struct Program {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Program {
  /// Link the given stages into a new program.
  pub fn new<C>(ctx: &mut C, stages: &[Stage]) -> Result<Self, ProgramError>
  where
    C: GraphicsContext,
  {
    unsafe {
      let handle = gl::CreateProgram();

      for stage in stages {
        gl::AttachShader(handle, stage.handle);
      }

      gl::LinkProgram(handle);

      let mut linked: GLint = gl::FALSE.into();
      gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

      if linked == gl::TRUE.into() {
        Ok(Program {
          handle,
          state: ctx.state().clone(),
        })
      } else {
        let log = program_info_log(handle);
        gl::DeleteProgram(handle);

        Err(ProgramError::LinkFailed(log))
      }
    }
  }

  /// Look up the location of a vertex attribute by the name it has in the shader sources.
  pub fn attribute_location(&self, name: &str) -> Result<VertexAttrib, ProgramError> {
    let c_name = CString::new(name.as_bytes()).unwrap();
    let location = unsafe { gl::GetAttribLocation(self.handle, c_name.as_ptr() as *const GLchar) };

    if location < 0 {
      return Err(ProgramError::InactiveAttrib(name.to_owned()));
    }

    Ok(VertexAttrib(location as GLuint))
  }

  /// Make this program the one draw calls run through.
  pub fn activate(&self) {
    self.state.borrow_mut().use_program(self.handle);
  }
}

impl Drop for Program {
  fn drop(&mut self) {
    self.state.borrow_mut().forget_program(self.handle);

    unsafe {
      gl::DeleteProgram(self.handle);
    }
  }
}

unsafe fn shader_info_log(handle: GLuint) -> String {
  let mut log_len: GLint = 0;
  gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

  let mut log: Vec<u8> = Vec::with_capacity(log_len as usize);
  gl::GetShaderInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);
  log.set_len(log_len as usize);

  String::from_utf8_lossy(&log).into_owned()
}

unsafe fn program_info_log(handle: GLuint) -> String {
  let mut log_len: GLint = 0;
  gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

  let mut log: Vec<u8> = Vec::with_capacity(log_len as usize);
  gl::GetProgramInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);
  log.set_len(log_len as usize);

  String::from_utf8_lossy(&log).into_owned()
}
