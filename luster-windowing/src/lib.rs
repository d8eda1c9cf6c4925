//! # luster windowing
//!
//! `luster` abstracts over OpenGL but doesn’t give you a way to create an OpenGL context —
//! creating and managing contexts is tightly related to the kind of application you target.
//! Companion crates (`luster-glfw`, and in theory any `luster-*` windowing backend) solve that;
//! this crate holds the vocabulary they all share: how big the window is ([`WindowDim`]) and the
//! hints that customize it ([`WindowOpt`]).

#![deny(missing_docs)]

/// Dimension metrics.
///
///   - `Windowed(width, height)` opens in windowed mode with the wished resolution.
///   - `Fullscreen` opens in fullscreen mode by using the primary monitor resolution.
///   - `FullscreenRestricted(width, height)` is a mix between `Windowed(width, height)` and
///     `Fullscreen`. It opens in fullscreen mode by using the wished resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WindowDim {
  /// Windowed mode.
  Windowed(u32, u32),
  /// Fullscreen mode (adapt to your screen).
  Fullscreen,
  /// Fullscreen mode with restricted viewport dimension.
  FullscreenRestricted(u32, u32),
}

/// Cursor mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorMode {
  /// The cursor is always visible.
  Visible,
  /// The cursor exists yet has been hidden.
  Invisible,
  /// The cursor is disabled.
  Disabled,
}

/// Different window options.
///
/// Feel free to look at the different methods available to tweak the options. You may want to
/// start with `default()` though.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowOpt {
  cursor_mode: CursorMode,
  num_samples: Option<u32>,
}

impl Default for WindowOpt {
  /// Defaults:
  ///
  /// - `cursor_mode` set to `CursorMode::Visible`.
  /// - `num_samples` set to `None`.
  fn default() -> Self {
    WindowOpt {
      cursor_mode: CursorMode::Visible,
      num_samples: None,
    }
  }
}

impl WindowOpt {
  /// Hide, unhide or disable the cursor. Default to `CursorMode::Visible`.
  #[inline]
  pub fn set_cursor_mode(self, mode: CursorMode) -> Self {
    WindowOpt {
      cursor_mode: mode,
      ..self
    }
  }

  /// Get the cursor mode.
  #[inline]
  pub fn cursor_mode(&self) -> CursorMode {
    self.cursor_mode
  }

  /// Set the number of samples to use for multisampling.
  ///
  /// Pass `None` to disable multisampling.
  #[inline]
  pub fn set_num_samples<S>(self, samples: S) -> Self
  where
    S: Into<Option<u32>>,
  {
    WindowOpt {
      num_samples: samples.into(),
      ..self
    }
  }

  /// Get the number of samples to use in multisampling, if any.
  #[inline]
  pub fn num_samples(&self) -> Option<u32> {
    self.num_samples
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn opt_accessors_round_trip() {
    let opt = WindowOpt::default()
      .set_cursor_mode(CursorMode::Disabled)
      .set_num_samples(4);

    assert_eq!(opt.cursor_mode(), CursorMode::Disabled);
    assert_eq!(opt.num_samples(), Some(4));

    let opt = opt.set_num_samples(None);
    assert_eq!(opt.num_samples(), None);
  }
}
