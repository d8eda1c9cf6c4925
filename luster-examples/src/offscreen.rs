//! Render once into a hand-assembled offscreen target, then sample it forever.
//!
//! Three colored triangles are drawn a single time into a framebuffer backed by a color texture
//! and a depth renderbuffer; the main loop then just draws a quad sampling that texture.
//!
//! Press <escape> to quit or close the window.

use glfw::{Action, Key, WindowEvent};
use luster::bind::{block_bind, Binder};
use luster::buffer::{Buffer, Usage};
use luster::context::{check_error, GraphicsContext as _};
use luster::draw::{draw_arrays, Mode};
use luster::framebuffer::Framebuffer;
use luster::renderbuffer::{Renderbuffer, RenderbufferFormat};
use luster::shader::{Program, Stage, StageType};
use luster::texture::{MagFilter, MinFilter, Texture};
use luster::vertex_array::VertexArray;
use luster_glfw::GlfwSurface;
use luster_windowing::{WindowDim, WindowOpt};

const VS: &str = include_str!("offscreen-vs.glsl");
const COL_FS: &str = include_str!("offscreen-col-fs.glsl");
const TXR_FS: &str = include_str!("offscreen-txr-fs.glsl");

// X, Y, R, G, B, interleaved: the triangles drawn onto the texture.
const TRIS: [f32; 45] = [
  -1., -1., 0., 0., 0., //
  0., -1., 1., 0., 0., //
  -0.75, 0., 0.5, 1., 1., //
  //
  0., -1., 1., 1., 0., //
  1., -1., 0., 1., 1., //
  0.75, 0., 0.5, 0., 0., //
  //
  -0.75, 0., 0., 0., 1., //
  0.75, 0., 1., 1., 0., //
  0., 1., 0.5, 0., 1., //
];

// X, Y, U, V, interleaved: the quad the texture ends up on.
const QUAD: [f32; 16] = [
  0., -0.9, 0., 0., //
  -0.9, 0.9, 0., 1., //
  0.9, -0.9, 1., 0., //
  0., 0.9, 1., 1., //
];

fn main() {
  env_logger::init();
  log::info!("starting");

  let mut surface = GlfwSurface::new(
    WindowDim::Windowed(800, 600),
    "Offscreen",
    WindowOpt::default(),
  )
  .expect("GLFW surface creation");

  // both programs share the vertex source; each one compiles its own transient stages
  let vs = Stage::new(&mut surface, StageType::Vertex, VS).expect("vertex stage");
  let fs = Stage::new(&mut surface, StageType::Fragment, COL_FS).expect("color fragment stage");
  let program_col = Program::new(&mut surface, &[vs, fs]).expect("color program link");

  let vs = Stage::new(&mut surface, StageType::Vertex, VS).expect("vertex stage");
  let fs = Stage::new(&mut surface, StageType::Fragment, TXR_FS).expect("texture fragment stage");
  let program_txr = Program::new(&mut surface, &[vs, fs]).expect("texture program link");

  // triangles, drawn through the color program
  let tris_bind = 0;
  let vbo_c = Buffer::new(&mut surface, &TRIS, Usage::StaticDraw);
  let vao_c = VertexArray::new(&mut surface);
  vao_c.vertex_buffer(tris_bind, &vbo_c, 0, 5);

  let pos_c = program_col.attribute_location("pos").expect("pos attribute");
  vao_c.attrib_format(pos_c, 2, 0);
  vao_c.attrib_binding(tris_bind, pos_c);
  vao_c.enable_attrib(pos_c);

  let col = program_col.attribute_location("col").expect("col attribute");
  vao_c.attrib_format(col, 3, 2);
  vao_c.attrib_binding(tris_bind, col);
  vao_c.enable_attrib(col);

  // quad, drawn through the texture program
  let quad_bind = 1;
  let vbo_t = Buffer::new(&mut surface, &QUAD, Usage::StaticDraw);
  let vao_t = VertexArray::new(&mut surface);
  vao_t.vertex_buffer(quad_bind, &vbo_t, 0, 4);

  let pos_t = program_txr.attribute_location("pos").expect("pos attribute");
  vao_t.attrib_format(pos_t, 2, 0);
  vao_t.attrib_binding(quad_bind, pos_t);
  vao_t.enable_attrib(pos_t);

  let uv = program_txr.attribute_location("uv").expect("uv attribute");
  vao_t.attrib_format(uv, 2, 2);
  vao_t.attrib_binding(quad_bind, uv);
  vao_t.enable_attrib(uv);

  // the offscreen target: color texture + depth renderbuffer
  let [w, h] = surface.size();
  let fbo = Framebuffer::new(&mut surface);
  let txr = Texture::new(&mut surface, [w, h]);
  txr.set_filters(MagFilter::Nearest, MinFilter::Nearest);
  let depth = Renderbuffer::new(&mut surface, RenderbufferFormat::Depth32F, [w, h]);
  fbo.attach_color(0, &txr);
  fbo.attach_depth_renderbuffer(&depth);
  fbo.validate().expect("framebuffer completeness");

  txr.bind(0);

  // draw the triangles onto the texture, once
  {
    let _bound = block_bind(vec![&fbo as &dyn Binder, &vao_c]);
    program_col.activate();

    fbo.clear([0.8, 0.8, 0.8, 1.]);
    draw_arrays(Mode::Triangle, 0, 9);
  }

  check_error();

  let back_buffer = Framebuffer::back_buffer(&mut surface);

  vao_t.bind();
  program_txr.activate();

  'app: loop {
    surface.window.glfw.poll_events();
    for (_, event) in surface.events_rx.try_iter() {
      match event {
        WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => break 'app,
        _ => (),
      }
    }

    back_buffer.clear([0.3, 0.3, 0.3, 1.]);
    draw_arrays(Mode::TriangleStrip, 0, 4);

    surface.swap_buffers();
  }
}
