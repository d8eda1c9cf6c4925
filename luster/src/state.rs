//! Graphics state.
//!
//! Even with direct-state-access entry points, a handful of driver selectors stay global and
//! mutable: the draw framebuffer, the current vertex array, the current program, what lives on
//! each texture unit and the viewport. [`GLState`] owns a cached view of those selectors so that
//! re-binding an already-bound object costs nothing GPU-wise, and so that dropped objects can
//! scrub themselves out of the cache.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::marker::PhantomData;

// TLS synchronization barrier for `GLState`.
thread_local!(static TLS_ACQUIRE_GFX_STATE: RefCell<Option<()>> = RefCell::new(Some(())));

/// The graphics state.
///
/// This type caches the mutable selectors of the OpenGL context it was acquired from. It is
/// deliberately `!Send` and `!Sync`: a context must only ever be touched from the thread holding
/// it current, and at most one `GLState` can exist per thread.
#[derive(Debug)]
pub struct GLState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  // texture bound to each texture unit
  bound_textures: Vec<GLuint>,

  // framebuffer bound to the draw target
  bound_draw_framebuffer: GLuint,

  // vertex array
  bound_vertex_array: GLuint,

  // shader program
  current_program: GLuint,

  // viewport
  viewport: [GLint; 4],
}

impl GLState {
  /// Create a new `GLState`.
  ///
  /// Only one `GLState` per thread can exist at any time; a second acquisition on the same thread
  /// fails with [`StateQueryError::UnavailableGLState`].
  pub fn new() -> Result<Self, StateQueryError> {
    TLS_ACQUIRE_GFX_STATE.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          inner.take();
          Ok(Self::get_from_context())
        }

        None => Err(StateQueryError::UnavailableGLState),
      }
    })
  }

  /// Build the cache from the current OpenGL context.
  fn get_from_context() -> Self {
    unsafe {
      let bound_textures = vec![0; 48]; // 48 is the platform minimal requirement

      let mut bound_draw_framebuffer = 0;
      gl::GetIntegerv(gl::DRAW_FRAMEBUFFER_BINDING, &mut bound_draw_framebuffer);

      let mut bound_vertex_array = 0;
      gl::GetIntegerv(gl::VERTEX_ARRAY_BINDING, &mut bound_vertex_array);

      let mut current_program = 0;
      gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut current_program);

      let mut viewport: [GLint; 4] = [0; 4];
      gl::GetIntegerv(gl::VIEWPORT, viewport.as_mut_ptr());

      GLState {
        _a: PhantomData,
        bound_textures,
        bound_draw_framebuffer: bound_draw_framebuffer as GLuint,
        bound_vertex_array: bound_vertex_array as GLuint,
        current_program: current_program as GLuint,
        viewport,
      }
    }
  }

  pub(crate) fn bind_texture_unit(&mut self, unit: u32, handle: GLuint) {
    let unit_ = unit as usize;

    if unit_ >= self.bound_textures.len() {
      self.bound_textures.resize(unit_ + 1, 0);
    }

    if self.bound_textures[unit_] != handle {
      unsafe { gl::BindTextureUnit(unit, handle) };
      self.bound_textures[unit_] = handle;
    }
  }

  pub(crate) fn bind_draw_framebuffer(&mut self, handle: GLuint) {
    if self.bound_draw_framebuffer != handle {
      unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, handle) };
      self.bound_draw_framebuffer = handle;
    }
  }

  pub(crate) fn bind_vertex_array(&mut self, handle: GLuint) {
    if self.bound_vertex_array != handle {
      unsafe { gl::BindVertexArray(handle) };
      self.bound_vertex_array = handle;
    }
  }

  pub(crate) fn use_program(&mut self, handle: GLuint) {
    if self.current_program != handle {
      unsafe { gl::UseProgram(handle) };
      self.current_program = handle;
    }
  }

  pub(crate) fn set_viewport(&mut self, viewport: [GLint; 4]) {
    if self.viewport != viewport {
      unsafe { gl::Viewport(viewport[0], viewport[1], viewport[2], viewport[3]) };
      self.viewport = viewport;
    }
  }

  // Cache scrubbing, called from the Drop impls of the owning handles. The driver unbinds
  // deleted names on its own; the cache must follow suit so a recycled name is not mistaken
  // for a live binding.

  pub(crate) fn forget_texture(&mut self, handle: GLuint) {
    for bound in &mut self.bound_textures {
      if *bound == handle {
        *bound = 0;
      }
    }
  }

  pub(crate) fn forget_framebuffer(&mut self, handle: GLuint) {
    if self.bound_draw_framebuffer == handle {
      self.bound_draw_framebuffer = 0;
    }
  }

  pub(crate) fn forget_vertex_array(&mut self, handle: GLuint) {
    if self.bound_vertex_array == handle {
      self.bound_vertex_array = 0;
    }
  }

  pub(crate) fn forget_program(&mut self, handle: GLuint) {
    if self.current_program == handle {
      self.current_program = 0;
    }
  }
}

/// An error that might happen when the context is queried.
#[non_exhaustive]
#[derive(Debug)]
pub enum StateQueryError {
  /// The `GLState` object is unavailable.
  ///
  /// That might occur if the current thread doesn’t support allocating a new graphics state. It
  /// might happen if you try to have more than one `GLState` in the same thread, for instance.
  UnavailableGLState,
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnavailableGLState => write!(f, "unavailable graphics state"),
    }
  }
}

impl error::Error for StateQueryError {}
