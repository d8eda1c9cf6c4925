//! GPU buffers.
//!
//! A buffer is a typed, contiguous region of GPU memory. Buffers are created from a slice of
//! data and a [`Usage`] hint, and their storage can be partially rewritten with
//! [`Buffer::write`]. What a buffer means is decided later, by the object it gets associated to
//! — a [`VertexArray`](crate::vertex_array::VertexArray) reads vertex attributes or element
//! indices out of it.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::rc::Rc;

use crate::context::GraphicsContext;
use crate::state::GLState;

/// Buffer usage hint.
///
/// A hint about the access pattern of the buffer’s contents, on the *frequency* × *nature* grid
/// the driver understands. It never changes what you can do with the buffer, only how the driver
/// places it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Usage {
  /// Written once, drawn from many times.
  StaticDraw,
  /// Rewritten repeatedly, drawn from many times.
  DynamicDraw,
  /// Written once, drawn from a few times.
  StreamDraw,
  /// Written once by the GPU, read back by the application.
  StaticRead,
  /// Rewritten repeatedly by the GPU, read back by the application.
  DynamicRead,
  /// Written once by the GPU, read back a few times.
  StreamRead,
  /// Written once by the GPU, used as a GPU copy source.
  StaticCopy,
  /// Rewritten repeatedly by the GPU, used as a GPU copy source.
  DynamicCopy,
  /// Written once by the GPU, used a few times as a GPU copy source.
  StreamCopy,
}

pub(crate) fn opengl_usage(usage: Usage) -> GLenum {
  match usage {
    Usage::StaticDraw => gl::STATIC_DRAW,
    Usage::DynamicDraw => gl::DYNAMIC_DRAW,
    Usage::StreamDraw => gl::STREAM_DRAW,
    Usage::StaticRead => gl::STATIC_READ,
    Usage::DynamicRead => gl::DYNAMIC_READ,
    Usage::StreamRead => gl::STREAM_READ,
    Usage::StaticCopy => gl::STATIC_COPY,
    Usage::DynamicCopy => gl::DYNAMIC_COPY,
    Usage::StreamCopy => gl::STREAM_COPY,
  }
}

/// Buffer errors.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum BufferError {
  /// A write would end past the allocated storage.
  Overflow {
    /// Number of elements the buffer holds.
    len: usize,
    /// Last element index the write would have touched.
    requested: usize,
  },
}

impl fmt::Display for BufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      BufferError::Overflow { len, requested } => write!(
        f,
        "buffer overflow: length is {} elements, write ends at {}",
        len, requested
      ),
    }
  }
}

impl error::Error for BufferError {}

/// A GPU buffer holding `len` elements of type `T`.
///
/// The storage is allocated and filled at creation and cannot be resized; the native name is
/// released exactly once, when the `Buffer` is dropped.
#[derive(Debug)]
pub struct Buffer<T> {
  handle: GLuint,
  len: usize,
  _state: Rc<RefCell<GLState>>,
  _t: PhantomData<T>,
}

impl<T> Buffer<T>
where
  T: Copy,
{
  /// Create a new buffer, uploading `data` with the given usage hint.
  pub fn new<C>(ctx: &mut C, data: &[T], usage: Usage) -> Self
  where
    C: GraphicsContext,
  {
    let mut handle: GLuint = 0;

    unsafe {
      gl::CreateBuffers(1, &mut handle);
      gl::NamedBufferData(
        handle,
        (data.len() * mem::size_of::<T>()) as GLsizeiptr,
        data.as_ptr() as *const _,
        opengl_usage(usage),
      );
    }

    Buffer {
      handle,
      len: data.len(),
      _state: ctx.state().clone(),
      _t: PhantomData,
    }
  }

  /// Replace part of the buffer contents, starting at element `offset`.
  pub fn write(&mut self, offset: usize, data: &[T]) -> Result<(), BufferError> {
    let end = offset + data.len();

    if end > self.len {
      return Err(BufferError::Overflow {
        len: self.len,
        requested: end,
      });
    }

    unsafe {
      gl::NamedBufferSubData(
        self.handle,
        (offset * mem::size_of::<T>()) as GLintptr,
        (data.len() * mem::size_of::<T>()) as GLsizeiptr,
        data.as_ptr() as *const _,
      );
    }

    Ok(())
  }

  /// Number of elements in the buffer.
  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  /// Whether the buffer holds no element.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub(crate) fn handle(&self) -> GLuint {
    self.handle
  }
}

impl<T> Drop for Buffer<T> {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteBuffers(1, &self.handle);
    }
  }
}
