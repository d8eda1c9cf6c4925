//! Graphics context.
//!
//! A graphics context abstracts the low-level, stateful handle every wrapped object operates
//! through. This crate doesn’t provide you with creating such contexts: a windowing crate (such
//! as `luster-glfw`) opens the native context and hands you an object implementing
//! [`GraphicsContext`].
//!
//! # On contexts and threads
//!
//! A context must only ever be touched from the one thread holding it current. The
//! [`GLState`] shared by all objects of a context is `!Send` and `!Sync`, so this constraint is
//! enforced by construction: you cannot move nor share wrapped objects across threads, and you
//! can acquire at most one state per thread.

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::GLState;

/// Class of graphics context.
///
/// Every constructor in this crate takes a context as first argument: the context witnesses that
/// a native context is current on the calling thread and provides the shared [`GLState`] the new
/// object will go through for every bind.
///
/// # Safety
///
/// Implementors must guarantee a native OpenGL 4.5 context is current on the thread the object
/// lives on, for as long as the object lives.
pub unsafe trait GraphicsContext {
  /// Get access to the graphics state of this context.
  ///
  /// This returns a `Rc<RefCell<GLState>>` because the state is shared by all the objects created
  /// from this context, to keep the bind cache consistent.
  fn state(&self) -> &Rc<RefCell<GLState>>;

  /// Swap the back and front buffers.
  fn swap_buffers(&mut self);
}

/// Check for a pending OpenGL error and log it if any.
///
/// Returns `true` if an error was found. Useful to assert driver health after a setup phase.
pub fn check_error() -> bool {
  let err = unsafe { gl::GetError() };

  if err != gl::NO_ERROR {
    log::error!("GL error: {:#x}", err);
    true
  } else {
    false
  }
}
