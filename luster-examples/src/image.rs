//! Load an image from disk and stretch it on a quad.
//!
//! The image path is read from the command line interface and is the sole argument.
//!
//! Press <escape> to quit or close the window.

use glfw::{Action, Key, WindowEvent};
use luster::buffer::{Buffer, Usage};
use luster::context::GraphicsContext as _;
use luster::draw::{draw_arrays, Mode};
use luster::framebuffer::Framebuffer;
use luster::shader::{Program, Stage, StageType};
use luster::texture::{MagFilter, MinFilter, Texture};
use luster::vertex_array::VertexArray;
use luster_glfw::GlfwSurface;
use luster_windowing::{WindowDim, WindowOpt};
use std::env;

const VS: &str = include_str!("texture-vs.glsl");
const FS: &str = include_str!("texture-fs.glsl");

// X, Y, U, V, interleaved; V flipped so the image shows upright.
const VERTICES: [f32; 16] = [
  -0.9, -0.9, 0., 1., //
  -0.9, 0.9, 0., 0., //
  0.9, -0.9, 1., 1., //
  0.9, 0.9, 1., 0., //
];

const BG: [f32; 4] = [0.3, 0.3, 0.3, 1.];

fn main() {
  env_logger::init();

  let path = match env::args().nth(1) {
    Some(path) => path,
    None => {
      eprintln!("missing first argument (path to the image to display)");
      return;
    }
  };

  log::info!("loading {}", path);
  let img = image::open(&path).expect("error while reading image on disk");

  let mut surface = GlfwSurface::new(WindowDim::Windowed(800, 600), "Image", WindowOpt::default())
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

  let txr = Texture::from_image(&mut surface, &img);
  txr.set_filters(MagFilter::Nearest, MinFilter::Nearest);
  txr.bind(0);

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
    draw_arrays(Mode::TriangleStrip, 0, 4);

    surface.swap_buffers();
  }
}
