//! Draw calls.
//!
//! The two ways of turning the currently active program and vertex array into fragments: in
//! buffer order ([`draw_arrays`]) or through a 16-bit element buffer ([`draw_elements_u16`]).

use gl::types::*;
use std::ptr::null;

/// Primitive topology used by draw calls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
  /// A point.
  Point,
  /// A line, defined by two points.
  Line,
  /// A strip of lines, defined by at least two points and zero or many extra ones.
  LineStrip,
  /// A triangle, defined by three points.
  Triangle,
  /// A fan of triangles, defined by a center point and zero or many extra ones.
  TriangleFan,
  /// A strip of triangles, defined by at least three points and zero or many extra ones.
  TriangleStrip,
}

fn opengl_mode(mode: Mode) -> GLenum {
  match mode {
    Mode::Point => gl::POINTS,
    Mode::Line => gl::LINES,
    Mode::LineStrip => gl::LINE_STRIP,
    Mode::Triangle => gl::TRIANGLES,
    Mode::TriangleFan => gl::TRIANGLE_FAN,
    Mode::TriangleStrip => gl::TRIANGLE_STRIP,
  }
}

/// Draw `vert_nb` vertices in buffer order, starting at `first`.
pub fn draw_arrays(mode: Mode, first: usize, vert_nb: usize) {
  unsafe {
    gl::DrawArrays(opengl_mode(mode), first as GLint, vert_nb as GLsizei);
  }
}

/// Draw `elem_nb` vertices through the 16-bit element buffer associated to the current vertex
/// array.
pub fn draw_elements_u16(mode: Mode, elem_nb: usize) {
  unsafe {
    gl::DrawElements(
      opengl_mode(mode),
      elem_nb as GLsizei,
      gl::UNSIGNED_SHORT,
      null(),
    );
  }
}
