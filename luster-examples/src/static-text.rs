//! Draw a few lines of text by rasterizing them into an atlas texture.
//!
//! The path to a TrueType font is read from the command line interface and is the sole
//! argument. The text is rendered black-on-white into an RGBA image, which the mesh builder
//! turns into a texture sampled on a color-tinted quad.
//!
//! Press <escape> to quit or close the window.

use fontdue::{Font, FontSettings, Metrics};
use glfw::{Action, Key, WindowEvent};
use image::{DynamicImage, Rgba, RgbaImage};
use luster::buffer::Usage;
use luster::context::GraphicsContext as _;
use luster::draw::Mode;
use luster::mesh::{Attr, Mesh, MeshConfig};
use luster::shader::{Stage, StageType};
use luster_glfw::GlfwSurface;
use luster_windowing::{WindowDim, WindowOpt};
use std::env;
use std::fs;

const VS: &str = include_str!("text-vs.glsl");
const FS: &str = include_str!("text-fs.glsl");

const TEXT: [&str; 4] = [
  "The Quick Brown Fox",
  "Jumps Over The Lazy God",
  "This is a multiline text",
  "... and we are here to rock!",
];

const PX: f32 = 32.;
const LINE_HEIGHT: i32 = 40;

// X, Y, U, V, R, G, B, interleaved.
const QUAD: [f32; 28] = [
  -0.9, -0.9, 0., 1., 1., 0., 0., //
  -0.9, 0.9, 0., 0., 0., 1., 0., //
  0.9, -0.9, 1., 1., 0., 0., 1., //
  0.9, 0.9, 1., 0., 1., 1., 1., //
];

fn blit_glyph(atlas: &mut RgbaImage, metrics: &Metrics, bitmap: &[u8], pen_x: i32, baseline: i32) {
  let x0 = pen_x + metrics.xmin;
  let y0 = baseline - metrics.height as i32 - metrics.ymin;

  for row in 0..metrics.height {
    for col in 0..metrics.width {
      let coverage = bitmap[row * metrics.width + col];

      if coverage == 0 {
        continue;
      }

      let x = x0 + col as i32;
      let y = y0 + row as i32;

      if x < 0 || y < 0 || x >= atlas.width() as i32 || y >= atlas.height() as i32 {
        continue;
      }

      // black text over the white background
      let shade = 255 - coverage;
      atlas.put_pixel(x as u32, y as u32, Rgba([shade, shade, shade, 255]));
    }
  }
}

fn render_atlas(font: &Font) -> RgbaImage {
  let mut atlas = RgbaImage::from_pixel(512, 256, Rgba([255, 255, 255, 255]));

  for (line, text) in TEXT.iter().enumerate() {
    let baseline = LINE_HEIGHT + line as i32 * LINE_HEIGHT;
    let mut pen_x = 10.;

    for ch in text.chars() {
      let (metrics, bitmap) = font.rasterize(ch, PX);
      blit_glyph(&mut atlas, &metrics, &bitmap, pen_x as i32, baseline);
      pen_x += metrics.advance_width;
    }
  }

  atlas
}

fn main() {
  env_logger::init();

  let path = match env::args().nth(1) {
    Some(path) => path,
    None => {
      eprintln!("missing first argument (path to a TrueType font)");
      return;
    }
  };

  log::info!("loading font {}", path);
  let font_bytes = fs::read(&path).expect("error while reading font on disk");
  let font = Font::from_bytes(font_bytes, FontSettings::default()).expect("font parsing");

  let atlas = render_atlas(&font);

  let mut surface = GlfwSurface::new(
    WindowDim::Windowed(800, 600),
    "Static text",
    WindowOpt::default(),
  )
  .expect("GLFW surface creation");

  let vs = Stage::new(&mut surface, StageType::Vertex, VS).expect("vertex stage");
  let fs = Stage::new(&mut surface, StageType::Fragment, FS).expect("fragment stage");

  let mut mesh = Mesh::new(
    &mut surface,
    MeshConfig {
      stages: vec![vs, fs],
      attributes: vec![
        Attr::new(0, "pos", 2),
        Attr::new(0, "uv", 2),
        Attr::new(0, "col", 3),
      ],
      data: vec![QUAD.to_vec()],
      usages: vec![Usage::StaticDraw],
      mode: Mode::TriangleStrip,
      clear_color: Some([0.3, 0.3, 0.3, 1.]),
      images: vec![DynamicImage::ImageRgba8(atlas)],
      ..MeshConfig::default()
    },
  )
  .expect("text mesh");

  'app: loop {
    surface.window.glfw.poll_events();
    for (_, event) in surface.events_rx.try_iter() {
      match event {
        WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => break 'app,
        _ => (),
      }
    }

    mesh.draw();

    surface.swap_buffers();
  }
}
