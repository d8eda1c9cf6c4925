//! # What is this?
//!
//! `luster` re-exposes OpenGL 4.5 driver objects — buffers, textures, vertex arrays, shader
//! stages and programs, framebuffers, renderbuffers — as typed handles with method-call
//! ergonomics, instead of raw function calls taking object names as bare integers. It sticks to
//! the direct-state-access style throughout: objects are created ready to use and operated on by
//! name, without binding them first.
//!
//! What you get:
//!
//! - **owning handles**: every wrapper releases its native name exactly once, when dropped — no
//!   double-free, no use-after-release across multi-step setups;
//! - **a cached state layer**: the global mutable selectors (draw framebuffer, vertex array,
//!   program, texture units, viewport) go through [`state::GLState`], which skips redundant
//!   driver calls and is structurally single-threaded;
//! - **a declarative mesh builder**: describe shaders, data, attribute layout, optional indices,
//!   textures and an offscreen target in one [`mesh::MeshConfig`]; offsets, strides and the
//!   vertex count are derived for you and the result redraws itself every frame. See the
//!   [`mesh`] module.
//!
//! What you don’t get: rendering algorithms, shader cross-compilation, windowing. Creating the
//! native context is left to companion crates (e.g. `luster-glfw`); anything implementing
//! [`context::GraphicsContext`] will do.
//!
//! # A word on threads
//!
//! Everything here assumes one render loop on the one thread holding the context current. The
//! shared state is `!Send` and `!Sync`, so the compiler holds that line for you.

pub mod bind;
pub mod buffer;
pub mod context;
pub mod draw;
pub mod framebuffer;
pub mod mesh;
pub mod renderbuffer;
pub mod shader;
pub mod state;
pub mod texture;
pub mod vertex_array;
