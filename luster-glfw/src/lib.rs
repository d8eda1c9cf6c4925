//! [GLFW](https://crates.io/crates/glfw) backend for luster.
//!
//! Opens a window holding a core-profile OpenGL 4.5 context, loads the GL symbols, acquires the
//! graphics state and hands you a [`GlfwSurface`]: the window, the event receiver and a
//! [`GraphicsContext`] implementation, all in one place.

#![deny(missing_docs)]

use gl;
use glfw::{self, Context as _, Glfw, SwapInterval, Window, WindowEvent, WindowMode};
use luster::context::GraphicsContext;
use luster::state::{GLState, StateQueryError};
use luster_windowing::{CursorMode, WindowDim, WindowOpt};
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::os::raw::c_void;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

/// Error that can be risen while creating a surface.
#[non_exhaustive]
#[derive(Debug)]
pub enum GlfwSurfaceError {
  /// Initialization of the surface went wrong.
  ///
  /// This variant exposes a **glfw** error for further information about what went wrong.
  InitError(glfw::InitError),

  /// Window creation failed.
  WindowCreationFailed,

  /// No primary monitor was found for a fullscreen window.
  NoPrimaryMonitor,

  /// The graphics state is not available.
  ///
  /// This error is generated when the initialization code is called on a thread on which the
  /// graphics state has already been acquired.
  GraphicsStateError(StateQueryError),
}

impl fmt::Display for GlfwSurfaceError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlfwSurfaceError::InitError(ref e) => write!(f, "initialization error: {}", e),
      GlfwSurfaceError::WindowCreationFailed => f.write_str("failed to create window"),
      GlfwSurfaceError::NoPrimaryMonitor => f.write_str("no primary monitor available"),
      GlfwSurfaceError::GraphicsStateError(ref e) => {
        write!(f, "failed to get graphics state: {}", e)
      }
    }
  }
}

impl From<glfw::InitError> for GlfwSurfaceError {
  fn from(e: glfw::InitError) -> Self {
    GlfwSurfaceError::InitError(e)
  }
}

impl error::Error for GlfwSurfaceError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      GlfwSurfaceError::InitError(e) => Some(e),
      GlfwSurfaceError::GraphicsStateError(e) => Some(e),
      _ => None,
    }
  }
}

/// GLFW surface.
///
/// This type exposes the GLFW window and its event receiver and implements [`GraphicsContext`],
/// so it is both the thing you poll events from and the context you create GPU objects with.
pub struct GlfwSurface {
  /// Wrapped GLFW events queue.
  pub events_rx: Receiver<(f64, WindowEvent)>,

  /// Wrapped GLFW window.
  pub window: Window,

  opts: WindowOpt,
  state: Rc<RefCell<GLState>>,
}

impl GlfwSurface {
  /// Initialize GLFW, open a window and bootstrap a luster environment that lives as long as
  /// the surface.
  pub fn new(dim: WindowDim, title: &str, opts: WindowOpt) -> Result<Self, GlfwSurfaceError> {
    let mut glfw = glfw::init(glfw::FAIL_ON_ERRORS)?;

    // OpenGL hints
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(
      glfw::OpenGlProfileHint::Core,
    ));
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
    glfw.window_hint(glfw::WindowHint::ContextVersionMajor(4));
    glfw.window_hint(glfw::WindowHint::ContextVersionMinor(5));
    glfw.window_hint(glfw::WindowHint::Samples(opts.num_samples()));

    let (mut window, events_rx) = create_window(&mut glfw, dim, title)?;

    window.make_current();
    window.set_all_polling(true);
    window.set_cursor_mode(glfw_cursor_mode(opts.cursor_mode()));
    glfw.set_swap_interval(SwapInterval::Sync(1));

    // init OpenGL
    gl::load_with(|s| window.get_proc_address(s) as *const c_void);

    let state = GLState::new().map_err(GlfwSurfaceError::GraphicsStateError)?;

    let (w, h) = window.get_framebuffer_size();
    log::info!("opened {}×{} OpenGL 4.5 surface: {}", w, h, title);

    Ok(GlfwSurface {
      events_rx,
      window,
      opts,
      state: Rc::new(RefCell::new(state)),
    })
  }

  /// Retrieve the window options the surface was created with.
  pub fn opts(&self) -> &WindowOpt {
    &self.opts
  }

  /// Change the cursor mode.
  pub fn set_cursor_mode(&mut self, mode: CursorMode) -> &mut Self {
    self.window.set_cursor_mode(glfw_cursor_mode(mode));
    self.opts = self.opts.set_cursor_mode(mode);
    self
  }

  /// Size of the surface’s framebuffer.
  pub fn size(&self) -> [u32; 2] {
    let (w, h) = self.window.get_framebuffer_size();
    [w as u32, h as u32]
  }

  /// Width of the surface’s framebuffer.
  pub fn width(&self) -> u32 {
    self.size()[0]
  }

  /// Height of the surface’s framebuffer.
  pub fn height(&self) -> u32 {
    self.size()[1]
  }
}

unsafe impl GraphicsContext for GlfwSurface {
  fn state(&self) -> &Rc<RefCell<GLState>> {
    &self.state
  }

  fn swap_buffers(&mut self) {
    self.window.swap_buffers();
  }
}

fn create_window(
  glfw: &mut Glfw,
  dim: WindowDim,
  title: &str,
) -> Result<(Window, Receiver<(f64, WindowEvent)>), GlfwSurfaceError> {
  match dim {
    WindowDim::Windowed(w, h) => glfw
      .create_window(w, h, title, WindowMode::Windowed)
      .ok_or(GlfwSurfaceError::WindowCreationFailed),

    WindowDim::Fullscreen => glfw.with_primary_monitor(|glfw, monitor| {
      let monitor = monitor.ok_or(GlfwSurfaceError::NoPrimaryMonitor)?;
      let mode = monitor
        .get_video_mode()
        .ok_or(GlfwSurfaceError::NoPrimaryMonitor)?;

      glfw
        .create_window(mode.width, mode.height, title, WindowMode::FullScreen(monitor))
        .ok_or(GlfwSurfaceError::WindowCreationFailed)
    }),

    WindowDim::FullscreenRestricted(w, h) => glfw.with_primary_monitor(|glfw, monitor| {
      let monitor = monitor.ok_or(GlfwSurfaceError::NoPrimaryMonitor)?;

      glfw
        .create_window(w, h, title, WindowMode::FullScreen(monitor))
        .ok_or(GlfwSurfaceError::WindowCreationFailed)
    }),
  }
}

fn glfw_cursor_mode(mode: CursorMode) -> glfw::CursorMode {
  match mode {
    CursorMode::Visible => glfw::CursorMode::Normal,
    CursorMode::Invisible => glfw::CursorMode::Hidden,
    CursorMode::Disabled => glfw::CursorMode::Disabled,
  }
}
