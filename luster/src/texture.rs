//! Textures.
//!
//! A [`Texture`] is a 2D RGBA8 image living on the GPU, with immutable storage dimensions. Its
//! contents can be (re)uploaded from any [`image::DynamicImage`]: arbitrary source pixel layouts
//! are first normalized to a dense RGBA byte layout, borrowing the source when it already is one.
//!
//! Shaders read textures through texture units: bind a texture to a unit and a sampler uniform
//! to the same unit, and the shader fetches texels out of it.

use gl::types::*;
use image::DynamicImage;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::rc::Rc;

use crate::context::GraphicsContext;
use crate::state::GLState;

/// Magnification filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MagFilter {
  /// Nearest interpolation.
  Nearest,
  /// Linear interpolation.
  Linear,
}

/// Minification filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MinFilter {
  /// Nearest interpolation.
  Nearest,
  /// Linear interpolation.
  Linear,
}

fn opengl_mag_filter(filter: MagFilter) -> GLint {
  match filter {
    MagFilter::Nearest => gl::NEAREST as GLint,
    MagFilter::Linear => gl::LINEAR as GLint,
  }
}

fn opengl_min_filter(filter: MinFilter) -> GLint {
  match filter {
    MinFilter::Nearest => gl::NEAREST as GLint,
    MinFilter::Linear => gl::LINEAR as GLint,
  }
}

/// Texture errors.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum TextureError {
  /// An upload whose dimensions disagree with the texture storage.
  ///
  /// Storage is immutable; to change the size, drop the texture and create a new one.
  SizeMismatch {
    /// Storage dimensions.
    expected: [u32; 2],
    /// Dimensions of the rejected image.
    found: [u32; 2],
  },
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TextureError::SizeMismatch { expected, found } => write!(
        f,
        "texture size mismatch: storage is {}×{}, image is {}×{}",
        expected[0], expected[1], found[0], found[1]
      ),
    }
  }
}

impl error::Error for TextureError {}

/// A 2D RGBA8 texture with immutable storage.
///
/// The native name is released exactly once, on drop.
#[derive(Debug)]
pub struct Texture {
  handle: GLuint,
  size: [u32; 2],
  state: Rc<RefCell<GLState>>,
}

impl Texture {
  /// Create a texture with storage for `size` texels, contents undefined.
  pub fn new<C>(ctx: &mut C, size: [u32; 2]) -> Self
  where
    C: GraphicsContext,
  {
    let mut handle: GLuint = 0;

    unsafe {
      gl::CreateTextures(gl::TEXTURE_2D, 1, &mut handle);
      gl::TextureStorage2D(
        handle,
        1,
        gl::RGBA8,
        size[0] as GLsizei,
        size[1] as GLsizei,
      );
    }

    Texture {
      handle,
      size,
      state: ctx.state().clone(),
    }
  }

  /// Create a texture sized to `img` and upload its contents.
  pub fn from_image<C>(ctx: &mut C, img: &DynamicImage) -> Self
  where
    C: GraphicsContext,
  {
    use image::GenericImageView;

    let (w, h) = img.dimensions();
    let texture = Self::new(ctx, [w, h]);
    texture.upload_unchecked(img);

    texture
  }

  /// Upload new contents into the texture.
  ///
  /// The image is normalized to a dense RGBA byte layout first and must match the storage
  /// dimensions.
  pub fn upload(&self, img: &DynamicImage) -> Result<(), TextureError> {
    use image::GenericImageView;

    let (w, h) = img.dimensions();

    if [w, h] != self.size {
      return Err(TextureError::SizeMismatch {
        expected: self.size,
        found: [w, h],
      });
    }

    self.upload_unchecked(img);

    Ok(())
  }

  // Dimensions are the caller’s problem here.
  fn upload_unchecked(&self, img: &DynamicImage) {
    // Normalize to dense RGBA8, borrowing if the source already is one.
    let converted;
    let rgba = match img {
      DynamicImage::ImageRgba8(rgba) => rgba,
      _ => {
        converted = img.to_rgba8();
        &converted
      }
    };

    unsafe {
      gl::TextureSubImage2D(
        self.handle,
        0,
        0,
        0,
        self.size[0] as GLsizei,
        self.size[1] as GLsizei,
        gl::RGBA,
        gl::UNSIGNED_BYTE,
        rgba.as_raw().as_ptr() as *const _,
      );
    }
  }

  /// Set the magnification and minification filters.
  pub fn set_filters(&self, mag: MagFilter, min: MinFilter) {
    unsafe {
      gl::TextureParameteri(self.handle, gl::TEXTURE_MAG_FILTER, opengl_mag_filter(mag));
      gl::TextureParameteri(self.handle, gl::TEXTURE_MIN_FILTER, opengl_min_filter(min));
    }
  }

  /// Bind the texture to a texture unit.
  pub fn bind(&self, unit: u32) {
    self.state.borrow_mut().bind_texture_unit(unit, self.handle);
  }

  /// Unbind the texture from a texture unit.
  pub fn unbind(&self, unit: u32) {
    self.state.borrow_mut().bind_texture_unit(unit, 0);
  }

  /// Storage dimensions, in texels.
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  pub(crate) fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for Texture {
  fn drop(&mut self) {
    self.state.borrow_mut().forget_texture(self.handle);

    unsafe {
      gl::DeleteTextures(1, &self.handle);
    }
  }
}
