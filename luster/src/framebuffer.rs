//! Framebuffers.
//!
//! A [`Framebuffer`] is a render destination: a collection of attachments draws end up in. The
//! default, window-system back buffer is exposed as a framebuffer too
//! ([`Framebuffer::back_buffer`]), so clearing works the same everywhere through
//! `ClearNamedFramebufferfv`.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::rc::Rc;

use crate::bind::Binder;
use crate::context::GraphicsContext;
use crate::renderbuffer::Renderbuffer;
use crate::state::GLState;
use crate::texture::Texture;

/// Reason a framebuffer is incomplete.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IncompleteReason {
  /// Incomplete framebuffer.
  Undefined,
  /// Incomplete attachment.
  IncompleteAttachment,
  /// An attachment is missing.
  MissingAttachment,
  /// Incomplete draw buffer.
  IncompleteDrawBuffer,
  /// Incomplete read buffer.
  IncompleteReadBuffer,
  /// Unsupported framebuffer configuration.
  Unsupported,
  /// Incomplete multisample setup.
  IncompleteMultisample,
  /// Incomplete layer targets.
  IncompleteLayerTargets,
  /// A status this wrapper doesn’t know about.
  Unknown(GLenum),
}

impl fmt::Display for IncompleteReason {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      IncompleteReason::Undefined => write!(f, "framebuffer undefined"),
      IncompleteReason::IncompleteAttachment => write!(f, "incomplete attachment"),
      IncompleteReason::MissingAttachment => write!(f, "missing attachment"),
      IncompleteReason::IncompleteDrawBuffer => write!(f, "incomplete draw buffer"),
      IncompleteReason::IncompleteReadBuffer => write!(f, "incomplete read buffer"),
      IncompleteReason::Unsupported => write!(f, "unsupported framebuffer configuration"),
      IncompleteReason::IncompleteMultisample => write!(f, "incomplete multisample setup"),
      IncompleteReason::IncompleteLayerTargets => write!(f, "incomplete layer targets"),
      IncompleteReason::Unknown(status) => write!(f, "unknown completeness status: {:#x}", status),
    }
  }
}

/// Framebuffer errors.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum FramebufferError {
  /// The framebuffer failed its completeness check.
  Incomplete(IncompleteReason),
}

impl fmt::Display for FramebufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      FramebufferError::Incomplete(ref reason) => write!(f, "incomplete framebuffer: {}", reason),
    }
  }
}

impl error::Error for FramebufferError {}

/// A framebuffer object.
///
/// The native name is released exactly once, on drop; the back buffer (name 0) is never
/// deleted.
#[derive(Debug)]
pub struct Framebuffer {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Framebuffer {
  /// Create a new framebuffer with no attachments.
  pub fn new<C>(ctx: &mut C) -> Self
  where
    C: GraphicsContext,
  {
    let mut handle: GLuint = 0;

    unsafe {
      gl::CreateFramebuffers(1, &mut handle);
    }

    Framebuffer {
      handle,
      state: ctx.state().clone(),
    }
  }

  /// The default, window-system framebuffer.
  pub fn back_buffer<C>(ctx: &mut C) -> Self
  where
    C: GraphicsContext,
  {
    Framebuffer {
      handle: 0,
      state: ctx.state().clone(),
    }
  }

  /// Attach a texture as color output `index`.
  pub fn attach_color(&self, index: u32, texture: &Texture) {
    unsafe {
      gl::NamedFramebufferTexture(
        self.handle,
        gl::COLOR_ATTACHMENT0 + index,
        texture.handle(),
        0,
      );
    }
  }

  /// Attach a renderbuffer as the depth output.
  pub fn attach_depth_renderbuffer(&self, renderbuffer: &Renderbuffer) {
    unsafe {
      gl::NamedFramebufferRenderbuffer(
        self.handle,
        gl::DEPTH_ATTACHMENT,
        gl::RENDERBUFFER,
        renderbuffer.handle(),
      );
    }
  }

  /// Check the framebuffer for completeness.
  pub fn validate(&self) -> Result<(), FramebufferError> {
    let status = unsafe { gl::CheckNamedFramebufferStatus(self.handle, gl::DRAW_FRAMEBUFFER) };

    match status {
      gl::FRAMEBUFFER_COMPLETE => Ok(()),
      gl::FRAMEBUFFER_UNDEFINED => incomplete(IncompleteReason::Undefined),
      gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => incomplete(IncompleteReason::IncompleteAttachment),
      gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
        incomplete(IncompleteReason::MissingAttachment)
      }
      gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => incomplete(IncompleteReason::IncompleteDrawBuffer),
      gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => incomplete(IncompleteReason::IncompleteReadBuffer),
      gl::FRAMEBUFFER_UNSUPPORTED => incomplete(IncompleteReason::Unsupported),
      gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => incomplete(IncompleteReason::IncompleteMultisample),
      gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => {
        incomplete(IncompleteReason::IncompleteLayerTargets)
      }
      _ => incomplete(IncompleteReason::Unknown(status)),
    }
  }

  /// Bind the framebuffer, making it the draw target.
  pub fn bind(&self) {
    self.state.borrow_mut().bind_draw_framebuffer(self.handle);
  }

  /// Unbind the framebuffer, restoring the default draw target.
  pub fn unbind(&self) {
    self.state.borrow_mut().bind_draw_framebuffer(0);
  }

  /// Clear the color output of this framebuffer — and only this framebuffer — to the given
  /// color. No binding is required or performed.
  pub fn clear(&self, color: [f32; 4]) {
    unsafe {
      gl::ClearNamedFramebufferfv(self.handle, gl::COLOR, 0, color.as_ptr());
    }
  }
}

fn incomplete(reason: IncompleteReason) -> Result<(), FramebufferError> {
  Err(FramebufferError::Incomplete(reason))
}

impl Binder for Framebuffer {
  fn bind(&self) {
    Framebuffer::bind(self)
  }

  fn unbind(&self) {
    Framebuffer::unbind(self)
  }
}

impl Drop for Framebuffer {
  fn drop(&mut self) {
    // the back buffer is not ours to delete
    if self.handle != 0 {
      self.state.borrow_mut().forget_framebuffer(self.handle);

      unsafe {
        gl::DeleteFramebuffers(1, &self.handle);
      }
    }
  }
}
