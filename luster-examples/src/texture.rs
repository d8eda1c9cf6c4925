//! A procedural checker texture sampled on a triangle, set up by hand.
//!
//! Press <escape> to quit or close the window.

use glfw::{Action, Key, WindowEvent};
use image::{DynamicImage, Rgba, RgbaImage};
use luster::buffer::{Buffer, Usage};
use luster::context::GraphicsContext as _;
use luster::draw::{draw_arrays, Mode};
use luster::framebuffer::Framebuffer;
use luster::shader::{Program, Stage, StageType};
use luster::texture::{MagFilter, MinFilter, Texture};
use luster::vertex_array::VertexArray;
use luster_glfw::GlfwSurface;
use luster_windowing::{WindowDim, WindowOpt};

const VS: &str = include_str!("texture-vs.glsl");
const FS: &str = include_str!("texture-fs.glsl");

// X, Y, U, V, interleaved.
const VERTICES: [f32; 12] = [
  -1., -1., 0., 1., //
  0., 1., 0., 0., //
  1., -1., 1., 1., //
];

const BG: [f32; 4] = [0.3, 0.3, 0.3, 1.];

fn checker() -> DynamicImage {
  let mut img = RgbaImage::new(64, 64);

  for (x, y, pixel) in img.enumerate_pixels_mut() {
    let r = (255. * (x % 8) as f32 / 7.) as u8;
    let g = (255. * (y % 16) as f32 / 15.) as u8;
    *pixel = Rgba([r, g, 0, 255]);
  }

  DynamicImage::ImageRgba8(img)
}

fn main() {
  env_logger::init();
  log::info!("starting");

  let mut surface = GlfwSurface::new(
    WindowDim::Windowed(800, 600),
    "Texture",
    WindowOpt::default(),
  )
  .expect("GLFW surface creation");

  let vs = Stage::new(&mut surface, StageType::Vertex, VS).expect("vertex stage");
  let fs = Stage::new(&mut surface, StageType::Fragment, FS).expect("fragment stage");
  let program = Program::new(&mut surface, &[vs, fs]).expect("program link");

  let vbo = Buffer::new(&mut surface, &VERTICES, Usage::StaticDraw);

  let bind_pos = 0;
  let vao = VertexArray::new(&mut surface);
  vao.vertex_buffer(bind_pos, &vbo, 0, 4);

  let pos = program.attribute_location("pos").expect("pos attribute");
  vao.attrib_format(pos, 2, 0);
  vao.attrib_binding(bind_pos, pos);
  vao.enable_attrib(pos);

  let uv = program.attribute_location("uv").expect("uv attribute");
  vao.attrib_format(uv, 2, 2);
  vao.attrib_binding(bind_pos, uv);
  vao.enable_attrib(uv);

  let txr = Texture::from_image(&mut surface, &checker());
  txr.set_filters(MagFilter::Nearest, MinFilter::Nearest);
  txr.bind(0); // the sampler uniform defaults to unit 0

  let back_buffer = Framebuffer::back_buffer(&mut surface);

  program.activate();
  vao.bind();

  'app: loop {
    surface.window.glfw.poll_events();
    for (_, event) in surface.events_rx.try_iter() {
      match event {
        WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => break 'app,
        _ => (),
      }
    }

    back_buffer.clear(BG);
    draw_arrays(Mode::Triangle, 0, 3);

    surface.swap_buffers();
  }
}
