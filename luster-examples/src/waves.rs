//! A small wave simulation, displayed through a per-frame re-uploaded texture.
//!
//! The wave equation runs on a coarse grid with a few walls in it; each step is rendered into
//! an RGBA image and pushed into the mesh’s texture with `update_image`. Math loosely based on
//! <https://www.thanassis.space/wavePhysics.html>.
//!
//! Click anywhere to drop a wave. Press <escape> to quit or close the window.

use glfw::{Action, Key, MouseButton, WindowEvent};
use image::{DynamicImage, Rgba, RgbaImage};
use luster::buffer::Usage;
use luster::context::GraphicsContext as _;
use luster::draw::Mode;
use luster::mesh::{Attr, Mesh, MeshConfig};
use luster::shader::{Stage, StageType};
use luster_glfw::GlfwSurface;
use luster_windowing::{WindowDim, WindowOpt};

const VS: &str = include_str!("texture-vs.glsl");
const FS: &str = include_str!("waves-fs.glsl");

const WIDTH: usize = 128;
const HEIGHT: usize = 128;
const DAMP: f32 = 0.95;

const SIDE: u32 = 512;

// X, Y, U, V, interleaved.
const QUAD: [f32; 16] = [
  -1., -1., 0., 0., //
  -1., 1., 0., 1., //
  1., -1., 1., 0., //
  1., 1., 1., 1., //
];

struct Grid {
  w: usize,
  h: usize,
  materials: Vec<u8>,
  prev: Vec<f32>,
  curr: Vec<f32>,
}

impl Grid {
  fn new(w: usize, h: usize) -> Self {
    let mut materials = vec![0; w * h];

    // walls all around the border
    for x in 0..w {
      materials[x] = 1;
      materials[(h - 1) * w + x] = 1;
    }
    for y in 0..h {
      materials[y * w] = 1;
      materials[(y + 1) * w - 1] = 1;
    }

    // a vertical wall segment in the middle of the pool
    for y in 16..48 {
      materials[y * w + 32] = 1;
    }

    Grid {
      w,
      h,
      materials,
      prev: vec![0.; w * h],
      curr: vec![0.; w * h],
    }
  }

  fn get(&self, x: usize, y: usize) -> f32 {
    self.curr[y * self.w + x]
  }

  fn set(&mut self, x: usize, y: usize, v: f32) {
    if x < self.w && y < self.h {
      self.curr[y * self.w + x] = v;
    }
  }

  fn update(&mut self, damp: f32) {
    for y in 1..self.h - 1 {
      for x in 1..self.w - 1 {
        let i = y * self.w + x;

        if self.materials[i] == 0 {
          let old = self.prev[i];
          let left = self.curr[i - 1];
          let right = self.curr[i + 1];
          let top = self.curr[i + self.w];
          let bottom = self.curr[i - self.w];

          self.prev[i] = damp * ((left + right + top + bottom) * 0.5 - old);
        }
      }
    }

    std::mem::swap(&mut self.prev, &mut self.curr);
  }

  fn render(&self, img: &mut RgbaImage) {
    for y in 0..self.h {
      for x in 0..self.w {
        let pixel = match self.materials[y * self.w + x] {
          0 => {
            // fluid: positive amplitude in red, negative in blue, overflow in green
            let mut val = self.get(x, y);
            let mut over = 0;

            if val > 1. {
              over = 255;
              val -= 1.;
            }

            let (pos, neg) = if val > 0. {
              ((255. * val) as u8, 0)
            } else {
              (0, (-255. * val) as u8)
            };

            Rgba([pos, over, neg, 255])
          }

          _ => Rgba([0, 255, 0, 255]), // wall
        };

        img.put_pixel(x as u32, y as u32, pixel);
      }
    }
  }
}

fn main() {
  env_logger::init();
  log::info!("starting");

  let mut surface = GlfwSurface::new(WindowDim::Windowed(SIDE, SIDE), "Waves", WindowOpt::default())
    .expect("GLFW surface creation");

  let mut grid = Grid::new(WIDTH, HEIGHT);
  let mut img = DynamicImage::ImageRgba8(RgbaImage::new(WIDTH as u32, HEIGHT as u32));

  if let Some(canvas) = img.as_mut_rgba8() {
    grid.render(canvas);
  }

  let vs = Stage::new(&mut surface, StageType::Vertex, VS).expect("vertex stage");
  let fs = Stage::new(&mut surface, StageType::Fragment, FS).expect("fragment stage");

  let mut mesh = Mesh::new(
    &mut surface,
    MeshConfig {
      stages: vec![vs, fs],
      attributes: vec![Attr::new(0, "pos", 2), Attr::new(0, "uv", 2)],
      data: vec![QUAD.to_vec()],
      usages: vec![Usage::StaticDraw],
      mode: Mode::TriangleStrip,
      clear_color: Some([0.3, 0.3, 0.3, 1.]),
      images: vec![img],
      ..MeshConfig::default()
    },
  )
  .expect("waves mesh");

  // the image stays on our side of the fence for the per-frame updates
  let mut img = DynamicImage::ImageRgba8(RgbaImage::new(WIDTH as u32, HEIGHT as u32));

  'app: loop {
    surface.window.glfw.poll_events();
    for (_, event) in surface.events_rx.try_iter() {
      match event {
        WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => break 'app,

        WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
          let (cx, cy) = surface.window.get_cursor_pos();
          let (ww, wh) = surface.window.get_size();
          let x = (cx / ww as f64 * WIDTH as f64) as usize;
          let y = HEIGHT.saturating_sub((cy / wh as f64 * HEIGHT as f64) as usize + 1);

          grid.set(x, y, 20.);
        }

        _ => (),
      }
    }

    mesh.draw();

    grid.update(DAMP);
    if let Some(canvas) = img.as_mut_rgba8() {
      grid.render(canvas);
    }
    mesh.update_image(0, &img).expect("grid upload");

    surface.swap_buffers();
  }
}
