//! Scene data: graph nodes, geometry, materials and the planet scene itself.
//!
//! - `graph` holds the generic node tree and the disposal routine
//! - `geometry` generates and uploads meshes and point clouds
//! - `material` pairs shader pipelines with their uniform and texture slots
//! - `view` composes the three of them into the planet scene

pub mod geometry;
pub mod graph;
pub mod material;
pub mod view;

/// The concrete node type the renderer works with.
pub type SceneNode = graph::Node<geometry::Geometry, material::Material>;

pub use view::PlanetScene;
