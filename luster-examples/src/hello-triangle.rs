//! Hello world: one RGB triangle, set up by hand from a single interleaved buffer.
//!
//! Every wrapper object is driven explicitly here — buffer, vertex array, attribute formats —
//! so you can see what the mesh builder (see the `easy-mesh` example) derives for you.
//!
//! Press <escape> to quit or close the window.

use glfw::{Action, Key, WindowEvent};
use luster::buffer::{Buffer, Usage};
use luster::context::GraphicsContext as _;
use luster::draw::{draw_arrays, Mode};
use luster::framebuffer::Framebuffer;
use luster::shader::{Program, Stage, StageType};
use luster::vertex_array::VertexArray;
use luster_glfw::GlfwSurface;
use luster_windowing::{WindowDim, WindowOpt};

const VS: &str = include_str!("triangle-vs.glsl");
const FS: &str = include_str!("triangle-fs.glsl");

// X, Y, R, G, B, interleaved.
const VERTICES: [f32; 15] = [
  -1., -1., 1., 0., 0., //
  0., 1., 0., 1., 0., //
  1., -1., 0., 0., 1., //
];

const BG: [f32; 4] = [0.3, 0.3, 0.3, 1.];

fn main() {
  env_logger::init();
  log::info!("starting");

  let mut surface = GlfwSurface::new(
    WindowDim::Windowed(800, 600),
    "Hello triangle",
    WindowOpt::default(),
  )
  .expect("GLFW surface creation");

  let vs = Stage::new(&mut surface, StageType::Vertex, VS).expect("vertex stage");
  let fs = Stage::new(&mut surface, StageType::Fragment, FS).expect("fragment stage");
  let program = Program::new(&mut surface, &[vs, fs]).expect("program link");

  let vbo = Buffer::new(&mut surface, &VERTICES, Usage::StaticDraw);

  let bind_pos = 0; // binding slot of the one buffer in the vertex array
  let vao = VertexArray::new(&mut surface);
  vao.vertex_buffer(bind_pos, &vbo, 0, 5);

  let pos = program.attribute_location("pos").expect("pos attribute");
  vao.attrib_format(pos, 2, 0);
  vao.attrib_binding(bind_pos, pos);
  vao.enable_attrib(pos);

  let col = program.attribute_location("col").expect("col attribute");
  vao.attrib_format(col, 3, 2);
  vao.attrib_binding(bind_pos, col);
  vao.enable_attrib(col);

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
