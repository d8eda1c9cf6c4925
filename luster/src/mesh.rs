//! Declarative mesh building.
//!
//! Setting up a drawable by hand means juggling a program, one buffer per data region, a vertex
//! array, attribute formats, bindings, strides and offsets — and keeping all of those numbers
//! consistent with each other. A [`MeshConfig`] states the *what* instead: the shader stages,
//! the attributes in declaration order, the raw data, and optionally indices, textures, source
//! images and an offscreen target. [`Mesh::new`] derives every offset, stride and the vertex
//! count from it, builds the GPU objects, and hands back a [`Mesh`] that can be redrawn every
//! frame without reinterpreting anything.
//!
//! Attributes sharing a buffer index are interleaved in declaration order: the first one starts
//! at offset 0, each next one right after the previous one’s footprint, and the buffer stride is
//! the sum of the component counts.

use gl::types::*;
use image::DynamicImage;
use std::cell::RefCell;
use std::collections::HashSet;
use std::error;
use std::fmt;
use std::rc::Rc;

use crate::buffer::{Buffer, Usage};
use crate::context::GraphicsContext;
use crate::draw::{draw_arrays, draw_elements_u16, Mode};
use crate::framebuffer::{Framebuffer, FramebufferError};
use crate::shader::{Program, ProgramError, Stage};
use crate::state::GLState;
use crate::texture::{MagFilter, MinFilter, Texture, TextureError};
use crate::vertex_array::VertexArray;

/// A rectangle with integer coordinates, used to size offscreen targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rect {
  /// Left edge.
  pub x: i32,
  /// Bottom edge.
  pub y: i32,
  /// Width.
  pub w: u32,
  /// Height.
  pub h: u32,
}

/// One vertex attribute of a mesh.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attr {
  /// Index of the data buffer the attribute reads from.
  pub buffer: usize,
  /// Name of the attribute in the shader sources.
  pub name: String,
  /// Number of `f32` components.
  pub size: u32,
}

impl Attr {
  /// Describe an attribute reading `size` components out of data buffer `buffer`.
  pub fn new<N>(buffer: usize, name: N, size: u32) -> Self
  where
    N: Into<String>,
  {
    Attr {
      buffer,
      name: name.into(),
      size,
    }
  }
}

/// Everything needed to build a [`Mesh`].
///
/// `stages` are consumed at build time and released as soon as linking succeeds. `usages` must
/// hold one hint per data buffer, plus one trailing hint for the element buffer whenever
/// `elements` is present.
pub struct MeshConfig {
  /// Compiled shader stages to link, in order.
  pub stages: Vec<Stage>,
  /// Attributes, in declaration order; order decides interleaving.
  pub attributes: Vec<Attr>,
  /// One flat data array per buffer index referenced by `attributes`.
  pub data: Vec<Vec<f32>>,
  /// One usage hint per data buffer, plus a trailing one for `elements` if present.
  pub usages: Vec<Usage>,
  /// Optional element indices; presence switches drawing to indexed mode.
  pub elements: Option<Vec<u16>>,
  /// Primitive topology.
  pub mode: Mode,
  /// Clear color applied before drawing; opaque black if unset.
  pub clear_color: Option<[f32; 4]>,
  /// Existing textures to bind before drawing, in unit order.
  pub textures: Vec<Rc<Texture>>,
  /// Images uploaded into mesh-owned textures, bound after `textures`.
  pub images: Vec<DynamicImage>,
  /// When set, drawing targets an offscreen surface of that size.
  pub offscreen: Option<Rect>,
}

impl Default for MeshConfig {
  fn default() -> Self {
    MeshConfig {
      stages: Vec::new(),
      attributes: Vec::new(),
      data: Vec::new(),
      usages: Vec::new(),
      elements: None,
      mode: Mode::Triangle,
      clear_color: None,
      textures: Vec::new(),
      images: Vec::new(),
      offscreen: None,
    }
  }
}

/// Errors the mesh builder can emit.
#[non_exhaustive]
#[derive(Debug)]
pub enum MeshError {
  /// The attribute buffer indices disagree with the number of data buffers provided.
  ///
  /// Either some provided buffer is never referenced, or an attribute references a buffer that
  /// doesn’t exist.
  BufferCountMismatch {
    /// Number of distinct buffer indices the attributes reference.
    referenced: usize,
    /// Number of data buffers provided.
    provided: usize,
  },
  /// Wrong number of usage hints.
  UsageCountMismatch {
    /// One per data buffer, plus one for the element buffer if present.
    expected: usize,
    /// Number of hints provided.
    found: usize,
  },
  /// An attribute with a component count outside 1..=4.
  AttribSize {
    /// Attribute name.
    name: String,
    /// Rejected component count.
    size: u32,
  },
  /// A data buffer whose length is not a multiple of its stride.
  RaggedBuffer {
    /// Buffer index.
    buffer: usize,
    /// Buffer length, in components.
    len: usize,
    /// Stride, in components.
    stride: usize,
  },
  /// Data buffers that don’t agree on the number of vertices.
  VertexCountMismatch {
    /// Buffer index that disagrees.
    buffer: usize,
    /// Vertex count inferred from that buffer.
    count: usize,
    /// Vertex count inferred from buffer 0.
    expected: usize,
  },
  /// No image was created at that index.
  NoSuchImage {
    /// Rejected index.
    index: usize,
  },
  /// Program linking or attribute lookup failed.
  Program(ProgramError),
  /// The offscreen target failed its completeness check.
  Framebuffer(FramebufferError),
  /// A texture upload was rejected.
  Texture(TextureError),
}

impl fmt::Display for MeshError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      MeshError::BufferCountMismatch {
        referenced,
        provided,
      } => write!(
        f,
        "attributes reference {} data buffers but {} were provided",
        referenced, provided
      ),
      MeshError::UsageCountMismatch { expected, found } => write!(
        f,
        "expected {} usage hints, found {}",
        expected, found
      ),
      MeshError::AttribSize { ref name, size } => write!(
        f,
        "attribute {} has {} components; must be between 1 and 4",
        name, size
      ),
      MeshError::RaggedBuffer {
        buffer,
        len,
        stride,
      } => write!(
        f,
        "data buffer {} holds {} components, not a multiple of its stride {}",
        buffer, len, stride
      ),
      MeshError::VertexCountMismatch {
        buffer,
        count,
        expected,
      } => write!(
        f,
        "data buffer {} yields {} vertices where {} were expected",
        buffer, count, expected
      ),
      MeshError::NoSuchImage { index } => write!(f, "no mesh image at index {}", index),
      MeshError::Program(ref e) => write!(f, "program error: {}", e),
      MeshError::Framebuffer(ref e) => write!(f, "framebuffer error: {}", e),
      MeshError::Texture(ref e) => write!(f, "texture error: {}", e),
    }
  }
}

impl error::Error for MeshError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      MeshError::Program(e) => Some(e),
      MeshError::Framebuffer(e) => Some(e),
      MeshError::Texture(e) => Some(e),
      _ => None,
    }
  }
}

impl From<ProgramError> for MeshError {
  fn from(e: ProgramError) -> Self {
    MeshError::Program(e)
  }
}

impl From<FramebufferError> for MeshError {
  fn from(e: FramebufferError) -> Self {
    MeshError::Framebuffer(e)
  }
}

impl From<TextureError> for MeshError {
  fn from(e: TextureError) -> Self {
    MeshError::Texture(e)
  }
}

/// The derived arithmetic of a config: per-buffer strides, per-attribute relative offsets and
/// the vertex count. Computed without touching the driver.
#[derive(Debug)]
struct Layout {
  /// Per-buffer stride, in components; the sum of the component counts of the attributes
  /// assigned to that buffer.
  strides: Vec<usize>,
  /// Per-attribute relative offset, in components, in attribute declaration order.
  offsets: Vec<usize>,
  /// Number of vertices to draw.
  vert_nb: usize,
}

impl Layout {
  fn new(
    attributes: &[Attr],
    data_lens: &[usize],
    usage_nb: usize,
    elem_nb: Option<usize>,
  ) -> Result<Self, MeshError> {
    // every provided buffer must be referenced, and nothing else
    let referenced: HashSet<usize> = attributes.iter().map(|attr| attr.buffer).collect();
    let out_of_range = attributes.iter().any(|attr| attr.buffer >= data_lens.len());

    if referenced.len() != data_lens.len() || out_of_range {
      return Err(MeshError::BufferCountMismatch {
        referenced: referenced.len(),
        provided: data_lens.len(),
      });
    }

    let expected_usages = data_lens.len() + usize::from(elem_nb.is_some());
    if usage_nb != expected_usages {
      return Err(MeshError::UsageCountMismatch {
        expected: expected_usages,
        found: usage_nb,
      });
    }

    // walk the attributes in declaration order, tracking a running offset per buffer; the final
    // running offset of a buffer is its stride
    let mut strides = vec![0; data_lens.len()];
    let mut offsets = Vec::with_capacity(attributes.len());

    for attr in attributes {
      if attr.size < 1 || attr.size > 4 {
        return Err(MeshError::AttribSize {
          name: attr.name.clone(),
          size: attr.size,
        });
      }

      offsets.push(strides[attr.buffer]);
      strides[attr.buffer] += attr.size as usize;
    }

    let vert_nb = match elem_nb {
      // indexed: the element list alone decides, whatever the data lengths
      Some(n) => n,

      None => {
        let mut vert_nb = 0;

        for (buffer, (&len, &stride)) in data_lens.iter().zip(&strides).enumerate() {
          if len % stride != 0 {
            return Err(MeshError::RaggedBuffer {
              buffer,
              len,
              stride,
            });
          }

          let count = len / stride;

          if buffer == 0 {
            vert_nb = count;
          } else if count != vert_nb {
            return Err(MeshError::VertexCountMismatch {
              buffer,
              count,
              expected: vert_nb,
            });
          }
        }

        vert_nb
      }
    };

    Ok(Layout {
      strides,
      offsets,
      vert_nb,
    })
  }
}

// Render destination of a mesh.
enum Target {
  Offscreen {
    region: Rect,
    framebuffer: Framebuffer,
    color: Rc<Texture>,
  },
  BackBuffer(Framebuffer),
}

/// A built drawable.
///
/// Owns the linked program, the vertex array, one buffer per data region, the optional element
/// buffer, the textures created from source images and the optional offscreen target. Everything
/// is released together when the mesh is dropped; redrawing is [`Mesh::draw`].
pub struct Mesh {
  program: Program,
  vertex_array: VertexArray,
  _buffers: Vec<Buffer<f32>>,
  _element_buffer: Option<Buffer<u16>>,
  vert_nb: usize,
  indexed: bool,
  mode: Mode,
  clear_color: [f32; 4],
  target: Target,
  prebound: Vec<Rc<Texture>>,
  textures: Vec<Texture>,
  state: Rc<RefCell<GLState>>,
}

impl Mesh {
  /// Build a drawable out of a configuration.
  ///
  /// The shader stages in the config are released as soon as linking succeeds; all other
  /// created objects live as long as the returned mesh.
  pub fn new<C>(ctx: &mut C, config: MeshConfig) -> Result<Self, MeshError>
  where
    C: GraphicsContext,
  {
    let MeshConfig {
      stages,
      attributes,
      data,
      usages,
      elements,
      mode,
      clear_color,
      textures: prebound,
      images,
      offscreen,
    } = config;

    let data_lens: Vec<usize> = data.iter().map(Vec::len).collect();
    let layout = Layout::new(
      &attributes,
      &data_lens,
      usages.len(),
      elements.as_ref().map(Vec::len),
    )?;

    let program = Program::new(ctx, &stages)?;
    drop(stages); // transient; the program keeps what it needs

    let target = match offscreen {
      Some(region) => {
        let color = Texture::new(ctx, [region.w, region.h]);
        color.set_filters(MagFilter::Nearest, MinFilter::Nearest);

        let framebuffer = Framebuffer::new(ctx);
        framebuffer.attach_color(0, &color);
        framebuffer.validate()?;

        Target::Offscreen {
          region,
          framebuffer,
          color: Rc::new(color),
        }
      }

      None => Target::BackBuffer(Framebuffer::back_buffer(ctx)),
    };

    let clear_color = clear_color.unwrap_or([0., 0., 0., 1.]);

    let buffers: Vec<Buffer<f32>> = data
      .iter()
      .zip(&usages)
      .map(|(region, &usage)| Buffer::new(ctx, region, usage))
      .collect();

    let vertex_array = VertexArray::new(ctx);

    for (attr, &offset) in attributes.iter().zip(&layout.offsets) {
      let location = program.attribute_location(&attr.name)?;

      vertex_array.attrib_format(location, attr.size, offset as u32);
      vertex_array.attrib_binding(attr.buffer as u32, location);
      vertex_array.enable_attrib(location);
    }

    for (index, buffer) in buffers.iter().enumerate() {
      vertex_array.vertex_buffer(index as u32, buffer, 0, layout.strides[index]);
    }

    let indexed = elements.is_some();
    let element_buffer = elements.map(|elements| {
      // the trailing usage hint belongs to the element buffer
      let buffer = Buffer::new(ctx, &elements, usages[data.len()]);
      vertex_array.element_buffer(&buffer);
      buffer
    });

    let textures: Vec<Texture> = images
      .iter()
      .map(|img| {
        let texture = Texture::from_image(ctx, img);
        texture.set_filters(MagFilter::Nearest, MinFilter::Nearest);
        texture
      })
      .collect();

    Ok(Mesh {
      program,
      vertex_array,
      _buffers: buffers,
      _element_buffer: element_buffer,
      vert_nb: layout.vert_nb,
      indexed,
      mode,
      clear_color,
      target,
      prebound,
      textures,
      state: ctx.state().clone(),
    })
  }

  /// Redraw the mesh.
  ///
  /// Bindings performed here are undone in strict reverse order before returning, so no texture
  /// unit or draw target leaks into whatever runs next. Texture units are assigned afresh on
  /// every call: the offscreen color surface (if any) takes unit 0, prebound textures follow,
  /// then the image-built ones.
  pub fn draw(&mut self) {
    let mut unit = 0;

    match &self.target {
      Target::Offscreen {
        region,
        framebuffer,
        color,
      } => {
        framebuffer.bind();
        color.bind(unit);
        unit += 1;

        self.state.borrow_mut().set_viewport([
          region.x as GLint,
          region.y as GLint,
          region.w as GLint,
          region.h as GLint,
        ]);
        framebuffer.clear(self.clear_color);
      }

      Target::BackBuffer(back) => back.clear(self.clear_color),
    }

    for texture in &self.prebound {
      texture.bind(unit);
      unit += 1;
    }

    for texture in &self.textures {
      texture.bind(unit);
      unit += 1;
    }

    self.program.activate();
    self.vertex_array.bind();

    if self.indexed {
      draw_elements_u16(self.mode, self.vert_nb);
    } else {
      draw_arrays(self.mode, 0, self.vert_nb);
    }

    self.vertex_array.unbind();

    for texture in self.textures.iter().rev() {
      unit -= 1;
      texture.unbind(unit);
    }

    for texture in self.prebound.iter().rev() {
      unit -= 1;
      texture.unbind(unit);
    }

    if let Target::Offscreen {
      framebuffer, color, ..
    } = &self.target
    {
      unit -= 1;
      color.unbind(unit);
      framebuffer.unbind();
    }
  }

  /// Re-upload new pixel content into the texture built from source image `index`, preserving
  /// its storage and filtering.
  ///
  /// Meant for per-frame procedural textures; the new image must keep the original dimensions.
  pub fn update_image(&mut self, index: usize, img: &DynamicImage) -> Result<(), MeshError> {
    let texture = self
      .textures
      .get(index)
      .ok_or(MeshError::NoSuchImage { index })?;

    texture.upload(img)?;

    Ok(())
  }

  /// The color surface of the offscreen target, if the mesh renders offscreen.
  ///
  /// Share it into another mesh’s `textures` to sample what this one rendered.
  pub fn offscreen_texture(&self) -> Option<Rc<Texture>> {
    match &self.target {
      Target::Offscreen { color, .. } => Some(color.clone()),
      Target::BackBuffer(..) => None,
    }
  }

  /// Number of vertices issued per draw call.
  pub fn vertex_count(&self) -> usize {
    self.vert_nb
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn interleaved_layout() {
    // one buffer of [x, y, r, g, b] triangle data
    let attrs = [Attr::new(0, "pos", 2), Attr::new(0, "col", 3)];
    let layout = Layout::new(&attrs, &[15], 1, None).unwrap();

    assert_eq!(layout.strides, [5]);
    assert_eq!(layout.offsets, [0, 2]);
    assert_eq!(layout.vert_nb, 3);
  }

  #[test]
  fn offsets_follow_declaration_order() {
    let attrs = [
      Attr::new(0, "pos", 2),
      Attr::new(0, "uv", 2),
      Attr::new(0, "col", 3),
    ];
    let layout = Layout::new(&attrs, &[28], 1, None).unwrap();

    assert_eq!(layout.strides, [7]);
    assert_eq!(layout.offsets, [0, 2, 4]);
    assert_eq!(layout.vert_nb, 4);
  }

  #[test]
  fn split_buffers_with_elements() {
    // two buffers of 4 vertices each, drawn through 6 indices
    let attrs = [Attr::new(0, "pos", 2), Attr::new(1, "uv", 2)];
    let layout = Layout::new(&attrs, &[8, 8], 3, Some(6)).unwrap();

    assert_eq!(layout.strides, [2, 2]);
    assert_eq!(layout.offsets, [0, 0]);
    assert_eq!(layout.vert_nb, 6);
  }

  #[test]
  fn interleaving_tracks_offsets_per_buffer() {
    let attrs = [
      Attr::new(0, "pos", 2),
      Attr::new(1, "uv", 2),
      Attr::new(0, "col", 3),
      Attr::new(1, "fade", 1),
    ];
    let layout = Layout::new(&attrs, &[10, 6], 2, None).unwrap();

    assert_eq!(layout.strides, [5, 3]);
    assert_eq!(layout.offsets, [0, 0, 2, 2]);
    assert_eq!(layout.vert_nb, 2);
  }

  #[test]
  fn elements_decide_vertex_count_alone() {
    // data lengths that would never pass the non-indexed checks
    let attrs = [Attr::new(0, "pos", 2)];
    let layout = Layout::new(&attrs, &[7], 2, Some(6)).unwrap();

    assert_eq!(layout.vert_nb, 6);
  }

  #[test]
  fn vertex_count_disagreement_is_rejected() {
    let attrs = [Attr::new(0, "pos", 2), Attr::new(1, "uv", 3)];
    let err = Layout::new(&attrs, &[10, 9], 2, None).unwrap_err();

    assert!(matches!(
      err,
      MeshError::VertexCountMismatch {
        buffer: 1,
        count: 3,
        expected: 5,
      }
    ));
  }

  #[test]
  fn ragged_buffer_is_rejected() {
    let attrs = [Attr::new(0, "pos", 2)];
    let err = Layout::new(&attrs, &[5], 1, None).unwrap_err();

    assert!(matches!(
      err,
      MeshError::RaggedBuffer {
        buffer: 0,
        len: 5,
        stride: 2,
      }
    ));
  }

  #[test]
  fn unreferenced_buffer_is_rejected() {
    let attrs = [Attr::new(0, "pos", 2)];
    let err = Layout::new(&attrs, &[6, 6], 2, None).unwrap_err();

    assert!(matches!(
      err,
      MeshError::BufferCountMismatch {
        referenced: 1,
        provided: 2,
      }
    ));
  }

  #[test]
  fn out_of_range_buffer_index_is_rejected() {
    let attrs = [Attr::new(0, "pos", 2), Attr::new(5, "uv", 2)];
    let err = Layout::new(&attrs, &[6, 6], 2, None).unwrap_err();

    assert!(matches!(err, MeshError::BufferCountMismatch { .. }));
  }

  #[test]
  fn usage_hint_count_without_elements() {
    let attrs = [Attr::new(0, "pos", 2), Attr::new(1, "uv", 2)];
    let err = Layout::new(&attrs, &[8, 8], 3, None).unwrap_err();

    assert!(matches!(
      err,
      MeshError::UsageCountMismatch {
        expected: 2,
        found: 3,
      }
    ));
  }

  #[test]
  fn elements_require_one_extra_usage_hint() {
    let attrs = [Attr::new(0, "pos", 2)];
    let err = Layout::new(&attrs, &[8], 1, Some(6)).unwrap_err();

    assert!(matches!(
      err,
      MeshError::UsageCountMismatch {
        expected: 2,
        found: 1,
      }
    ));

    assert!(Layout::new(&attrs, &[8], 2, Some(6)).is_ok());
  }

  #[test]
  fn attribute_size_bounds() {
    let attrs = [Attr::new(0, "pos", 0)];
    let err = Layout::new(&attrs, &[8], 1, None).unwrap_err();

    assert!(matches!(err, MeshError::AttribSize { size: 0, .. }));

    let attrs = [Attr::new(0, "mat", 5)];
    let err = Layout::new(&attrs, &[10], 1, None).unwrap_err();

    assert!(matches!(err, MeshError::AttribSize { size: 5, .. }));
  }

  #[test]
  fn empty_config_draws_nothing() {
    let layout = Layout::new(&[], &[], 0, None).unwrap();

    assert_eq!(layout.vert_nb, 0);
  }
}
