//! orbview
//!
//! A small decorative 3D scene for native windows and web canvases: a
//! shader-colored planet overlaid with a particle cloud and surrounded by a
//! starfield. The planet reacts to pointer hover, the camera orbits with
//! damping, and the whole scene graph is released explicitly on teardown.
//! Rendering goes through wgpu so the same crate runs natively and in the
//! browser via WASM.
//!
//! High-level modules
//! - `app`: winit event loop wiring pointer, resize and redraw to the scene
//! - `camera`: orbit camera, damped controller and pointer-to-ray projection
//! - `context`: central GPU and window context that owns device/queue/surface
//! - `pipelines`: render pipelines for the planet shader and point clouds
//! - `scene`: scene graph, geometry, materials and the disposal routine
//! - `tween`: single-scalar easing used for the hover uniform
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod pipelines;
pub mod scene;
pub mod tween;

pub use app::run;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::WindowEvent;
