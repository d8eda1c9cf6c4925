//! The declarative mesh builder, twice over.
//!
//! The first mesh renders an RGB triangle into an offscreen target from one interleaved buffer.
//! The second one draws a quad out of two separate buffers (one per attribute) through an
//! element buffer — and samples the first mesh’s offscreen color surface as its texture.
//!
//! Press <escape> to quit or close the window.

use glfw::{Action, Key, WindowEvent};
use luster::buffer::Usage;
use luster::context::GraphicsContext as _;
use luster::draw::Mode;
use luster::mesh::{Attr, Mesh, MeshConfig, Rect};
use luster::shader::{Stage, StageType};
use luster_glfw::GlfwSurface;
use luster_windowing::{WindowDim, WindowOpt};

const TRI_VS: &str = include_str!("triangle-vs.glsl");
const TRI_FS: &str = include_str!("triangle-fs.glsl");
const QUAD_VS: &str = include_str!("texture-vs.glsl");
const QUAD_FS: &str = include_str!("texture-fs.glsl");

fn main() {
  env_logger::init();
  log::info!("starting");

  let mut surface = GlfwSurface::new(
    WindowDim::Windowed(800, 600),
    "Easy mesh",
    WindowOpt::default(),
  )
  .expect("GLFW surface creation");

  // A triangle with a different color per vertex: a single buffer, two interleaved attributes,
  // rendered once into an offscreen target.
  let vs = Stage::new(&mut surface, StageType::Vertex, TRI_VS).expect("triangle vertex stage");
  let fs = Stage::new(&mut surface, StageType::Fragment, TRI_FS).expect("triangle fragment stage");

  let mut triangle = Mesh::new(
    &mut surface,
    MeshConfig {
      stages: vec![vs, fs],
      // attributes are read in declaration order from each buffer
      attributes: vec![Attr::new(0, "pos", 2), Attr::new(0, "col", 3)],
      data: vec![vec![
        -1., -1., 1., 0., 0., //
        0., 1., 0., 1., 0., //
        1., -1., 0., 0., 1., //
      ]],
      usages: vec![Usage::StaticDraw],
      mode: Mode::Triangle,
      offscreen: Some(Rect {
        x: 0,
        y: 0,
        w: 800,
        h: 600,
      }),
      ..MeshConfig::default()
    },
  )
  .expect("triangle mesh");

  // A quad out of two buffers, one attribute each, drawn as two indexed triangles; its texture
  // is whatever the first mesh rendered offscreen.
  let vs = Stage::new(&mut surface, StageType::Vertex, QUAD_VS).expect("quad vertex stage");
  let fs = Stage::new(&mut surface, StageType::Fragment, QUAD_FS).expect("quad fragment stage");

  let mut quad = Mesh::new(
    &mut surface,
    MeshConfig {
      stages: vec![vs, fs],
      attributes: vec![Attr::new(0, "pos", 2), Attr::new(1, "uv", 2)],
      data: vec![
        vec![-0.9, -0.9, -0.9, 0.9, 0.9, -0.9, 0.9, 0.9],
        vec![0., 0., 0., 1., 1., 0., 1., 1.],
      ],
      // the trailing hint feeds the element buffer
      usages: vec![Usage::StaticDraw, Usage::StaticDraw, Usage::StaticDraw],
      elements: Some(vec![0, 1, 2, 1, 3, 2]),
      mode: Mode::Triangle,
      clear_color: Some([0.6, 0.6, 0.6, 1.]),
      textures: vec![triangle.offscreen_texture().expect("offscreen texture")],
      ..MeshConfig::default()
    },
  )
  .expect("quad mesh");

  // the triangle only needs to exist on its texture once
  triangle.draw();

  'app: loop {
    surface.window.glfw.poll_events();
    for (_, event) in surface.events_rx.try_iter() {
      match event {
        WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => break 'app,
        _ => (),
      }
    }

    quad.draw();

    surface.swap_buffers();
  }
}
