//! Renderbuffers.
//!
//! A renderbuffer is, like a texture, a possible destination when rendering into a framebuffer —
//! but its contents cannot be sampled afterwards, which leaves the driver free to optimize the
//! storage. Use one for attachments you never read back, typically the depth output of an
//! offscreen target.

use gl::types::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::context::GraphicsContext;
use crate::state::GLState;

/// Internal storage format of a renderbuffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderbufferFormat {
  /// 8-bit RGBA color.
  Rgba8,
  /// 32-bit floating-point depth.
  Depth32F,
}

fn opengl_format(format: RenderbufferFormat) -> GLenum {
  match format {
    RenderbufferFormat::Rgba8 => gl::RGBA8,
    RenderbufferFormat::Depth32F => gl::DEPTH_COMPONENT32F,
  }
}

/// A renderbuffer with allocated storage.
///
/// The native name is released exactly once, on drop.
#[derive(Debug)]
pub struct Renderbuffer {
  handle: GLuint,
  _state: Rc<RefCell<GLState>>,
}

impl Renderbuffer {
  /// Create a renderbuffer with storage for `size` pixels of the given format.
  pub fn new<C>(ctx: &mut C, format: RenderbufferFormat, size: [u32; 2]) -> Self
  where
    C: GraphicsContext,
  {
    let mut handle: GLuint = 0;

    unsafe {
      gl::CreateRenderbuffers(1, &mut handle);
      gl::NamedRenderbufferStorage(
        handle,
        opengl_format(format),
        size[0] as GLsizei,
        size[1] as GLsizei,
      );
    }

    Renderbuffer {
      handle,
      _state: ctx.state().clone(),
    }
  }

  pub(crate) fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for Renderbuffer {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteRenderbuffers(1, &self.handle);
    }
  }
}
