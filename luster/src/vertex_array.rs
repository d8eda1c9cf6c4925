//! Vertex arrays.
//!
//! A vertex array stores no vertex data of its own: it describes how to read attributes out of
//! [`Buffer`]s. The direct-state-access workflow is:
//!
//! 1. create the buffers and fill them with data;
//! 2. create a [`VertexArray`];
//! 3. associate each buffer to a binding slot with [`VertexArray::vertex_buffer`];
//! 4. specify the format of each attribute with [`VertexArray::attrib_format`];
//! 5. tie the attribute to its slot with [`VertexArray::attrib_binding`] and enable it.
//!
//! Offsets and strides are counted in `f32` components, not bytes; the ×4 happens at the call
//! site into the driver.

use gl::types::*;
use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use crate::bind::Binder;
use crate::buffer::Buffer;
use crate::context::GraphicsContext;
use crate::state::GLState;

/// A vertex attribute location, resolved from a linked
/// [`Program`](crate::shader::Program).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VertexAttrib(pub(crate) GLuint);

/// A vertex array object.
///
/// Holds the attribute formats, their buffer bindings and the optional element buffer
/// association. The native name is released exactly once, on drop.
#[derive(Debug)]
pub struct VertexArray {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl VertexArray {
  /// Create a new vertex array.
  pub fn new<C>(ctx: &mut C) -> Self
  where
    C: GraphicsContext,
  {
    let mut handle: GLuint = 0;

    unsafe {
      gl::CreateVertexArrays(1, &mut handle);
    }

    VertexArray {
      handle,
      state: ctx.state().clone(),
    }
  }

  /// Bind the vertex array, making it the one draw calls read from.
  pub fn bind(&self) {
    self.state.borrow_mut().bind_vertex_array(self.handle);
  }

  /// Unbind the vertex array.
  pub fn unbind(&self) {
    self.state.borrow_mut().bind_vertex_array(0);
  }

  /// Specify the format of an attribute: `size` `f32` components, starting `rel_offset`
  /// components into the vertex.
  pub fn attrib_format(&self, attr: VertexAttrib, size: u32, rel_offset: u32) {
    unsafe {
      gl::VertexArrayAttribFormat(
        self.handle,
        attr.0,
        size as GLint,
        gl::FLOAT,
        gl::FALSE,
        rel_offset * mem::size_of::<f32>() as GLuint,
      );
    }
  }

  /// Tie an attribute to a buffer binding slot.
  ///
  /// Using the same `bind_index` in [`VertexArray::vertex_buffer`] and here is what connects an
  /// attribute to the buffer its data lives in.
  pub fn attrib_binding(&self, bind_index: u32, attr: VertexAttrib) {
    unsafe {
      gl::VertexArrayAttribBinding(self.handle, attr.0, bind_index);
    }
  }

  /// Enable an attribute so it is read during draws.
  pub fn enable_attrib(&self, attr: VertexAttrib) {
    unsafe {
      gl::EnableVertexArrayAttrib(self.handle, attr.0);
    }
  }

  /// Disable an attribute.
  pub fn disable_attrib(&self, attr: VertexAttrib) {
    unsafe {
      gl::DisableVertexArrayAttrib(self.handle, attr.0);
    }
  }

  /// Associate a data buffer to a binding slot, starting `offset` components into the buffer,
  /// with consecutive vertices `stride` components apart.
  pub fn vertex_buffer(&self, bind_index: u32, buffer: &Buffer<f32>, offset: usize, stride: usize) {
    unsafe {
      gl::VertexArrayVertexBuffer(
        self.handle,
        bind_index,
        buffer.handle(),
        (offset * mem::size_of::<f32>()) as GLintptr,
        (stride * mem::size_of::<f32>()) as GLsizei,
      );
    }
  }

  /// Associate a 16-bit element buffer, switching draws through this vertex array to indexed
  /// mode.
  pub fn element_buffer(&self, buffer: &Buffer<u16>) {
    unsafe {
      gl::VertexArrayElementBuffer(self.handle, buffer.handle());
    }
  }
}

impl Binder for VertexArray {
  fn bind(&self) {
    VertexArray::bind(self)
  }

  fn unbind(&self) {
    VertexArray::unbind(self)
  }
}

impl Drop for VertexArray {
  fn drop(&mut self) {
    self.state.borrow_mut().forget_vertex_array(self.handle);

    unsafe {
      gl::DeleteVertexArrays(1, &self.handle);
    }
  }
}
