//! A ball bouncing around a per-frame procedural texture.
//!
//! Every frame the ball is rasterized into a small RGBA image on the CPU and the image is
//! re-uploaded into the same texture, which a fullscreen-ish quad samples.
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
const VERTICES: [f32; 16] = [
  0.9, 0.9, 1., 0., //
  -0.9, 0.9, 0., 0., //
  0.9, -0.9, 1., 1., //
  -0.9, -0.9, 0., 1., //
];

const BG: [f32; 4] = [0.3, 0.3, 0.3, 1.];

// canvas size; deliberately tiny so the nearest filtering shows
const W: f32 = 100.;
const H: f32 = 75.;
const RADIUS: f32 = 10.;

fn draw_ball(img: &mut RgbaImage, x: f32, y: f32) {
  for (px, py, pixel) in img.enumerate_pixels_mut() {
    let dx = px as f32 - x;
    let dy = py as f32 - y;

    *pixel = if dx * dx + dy * dy <= RADIUS * RADIUS {
      Rgba([255, 0, 0, 255])
    } else {
      Rgba([0, 0, 0, 255])
    };
  }
}

fn main() {
  env_logger::init();
  log::info!("starting");

  let mut surface = GlfwSurface::new(
    WindowDim::Windowed(800, 600),
    "Bouncing ball",
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

  let mut img = DynamicImage::ImageRgba8(RgbaImage::new(W as u32, H as u32));
  let txr = Texture::new(&mut surface, [W as u32, H as u32]);
  txr.set_filters(MagFilter::Nearest, MinFilter::Nearest);
  txr.bind(0);

  let back_buffer = Framebuffer::back_buffer(&mut surface);

  program.activate();
  vao.bind();

  let (mut x, mut y) = (W * 0.3, H * 0.6);
  let (mut dx, mut dy) = (1.3, 0.7);

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

    if x > W - RADIUS || x < RADIUS {
      x = x.clamp(RADIUS, W - RADIUS);
      dx = -dx;
    }
    if y > H - RADIUS || y < RADIUS {
      y = y.clamp(RADIUS, H - RADIUS);
      dy = -dy;
    }

    x += dx;
    y += dy;

    let canvas = img.as_mut_rgba8().expect("rgba canvas");
    draw_ball(canvas, x, y);
    txr.upload(&img).expect("ball upload");

    surface.swap_buffers();
  }
}
