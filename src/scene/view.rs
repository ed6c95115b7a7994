//! The planet scene: a shader-colored sphere, its particle overlay and a
//! surrounding starfield.
//!
//! Owns the scene graph root and drives the per-frame state: planet
//! rotation, the time uniform and the hover tween. Torn down exactly once
//! via [`PlanetScene::destroy`].

use cgmath::{Matrix4, Point3, Rad};
use instant::Instant;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use winit::dpi::PhysicalPosition;

use crate::{
    context::Context,
    pipelines::{
        planet::{COLOR_A, PlanetUniform, mk_planet_material},
        points::mk_points_material,
    },
    scene::{
        SceneNode,
        geometry::{Geometry, SphereData, scatter_stars},
    },
    tween::{Ease, Tween},
};

const SPHERE_SEGMENTS: u32 = 50;
const STAR_COUNT: usize = 10_000;
const STAR_SPREAD: f32 = 2000.0;
const HOVER_TWEEN_SECONDS: f32 = 0.5;
// Per-frame spin applied to the planet on both the x and y axis.
const SPIN_STEP: f32 = 0.01;

// Child slots under the root, in insertion order.
const PLANET: usize = 0;

pub struct PlanetScene {
    root: SceneNode,
    uniform: PlanetUniform,
    hover: Tween,
    hovered: bool,
    started: Instant,
}

impl PlanetScene {
    /// Build the scene graph: root with the planet mesh, the sphere
    /// particle overlay and the starfield as its three children.
    pub fn new(ctx: &Context) -> Self {
        let mut rng = SmallRng::seed_from_u64(instant::now() as u64);

        let sphere = SphereData::generate(1.0, SPHERE_SEGMENTS, SPHERE_SEGMENTS, &mut rng);
        let stars = scatter_stars(STAR_COUNT, STAR_SPREAD, &mut rng);

        let camera_layout = &ctx.camera.bind_group_layout;

        let planet = SceneNode::with_resources(
            Geometry::from_sphere(&ctx.device, &sphere),
            mk_planet_material(&ctx.device, &ctx.config, camera_layout),
        );
        let particles = SceneNode::with_resources(
            Geometry::from_points(&ctx.device, "Sphere Particle Buffer", &sphere.to_points()),
            mk_points_material(
                &ctx.device,
                &ctx.config,
                camera_layout,
                "Sphere Particle Uniform Buffer",
                COLOR_A,
            ),
        );
        let starfield = SceneNode::with_resources(
            Geometry::from_points(&ctx.device, "Starfield Buffer", &stars),
            mk_points_material(
                &ctx.device,
                &ctx.config,
                camera_layout,
                "Starfield Uniform Buffer",
                COLOR_A,
            ),
        );

        let mut root = SceneNode::new();
        root.add_child(planet);
        root.add_child(particles);
        root.add_child(starfield);

        log::info!(
            "scene built: {} sphere vertices, {} stars",
            sphere.vertices.len(),
            stars.len()
        );

        Self {
            root,
            uniform: PlanetUniform::new(),
            hover: Tween::new(0.0, HOVER_TWEEN_SECONDS, Ease::ExpoInOut),
            hovered: false,
            started: Instant::now(),
        }
    }

    /// Cast a ray through the pointer and retarget the hover tween.
    pub fn on_pointer_move(&mut self, ctx: &Context, position: PhysicalPosition<f64>) {
        let ndc_x = (position.x / ctx.config.width as f64) as f32 * 2.0 - 1.0;
        let ndc_y = -((position.y / ctx.config.height as f64) as f32) * 2.0 + 1.0;

        let ray = ctx.camera.camera.cast_ray(ndc_x, ndc_y, &ctx.projection);
        let hovered = ray
            .intersect_sphere(Point3::new(0.0, 0.0, 0.0), 1.0)
            .is_some();
        if hovered != self.hovered {
            log::debug!("pointer {} the planet", if hovered { "over" } else { "off" });
            self.hovered = hovered;
        }
        self.hover.to(if hovered { 1.0 } else { 0.0 });
    }

    /// Advance rotation, the time uniform and the hover tween, and upload
    /// the planet uniform.
    pub fn update(&mut self, ctx: &Context, dt_seconds: f32) {
        let hover = self.hover.advance(dt_seconds);

        let Some(planet) = self.root.children_mut().get_mut(PLANET) else {
            return;
        };
        planet.rotation.x += SPIN_STEP;
        planet.rotation.y += SPIN_STEP;

        self.uniform.model =
            (Matrix4::from_angle_x(Rad(planet.rotation.x))
                * Matrix4::from_angle_y(Rad(planet.rotation.y)))
            .into();
        self.uniform.time = self.started.elapsed().as_secs_f32();
        self.uniform.hover = hover;

        if let Some(material) = &planet.material {
            ctx.queue.write_buffer(
                &material.uniform_buffer,
                0,
                bytemuck::cast_slice(&[self.uniform]),
            );
        }
    }

    /// Record draw calls for every node in the graph.
    pub fn draw<'a, 'pass>(
        &'a self,
        camera_bind_group: &'a wgpu::BindGroup,
        render_pass: &'pass mut wgpu::RenderPass<'a>,
    ) where
        'a: 'pass,
    {
        draw_node(&self.root, camera_bind_group, render_pass);
    }

    /// Tear the scene down, releasing every GPU resource exactly once.
    pub fn destroy(&mut self) {
        log::info!("disposing scene graph");
        self.root.dispose();
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }
}

fn draw_node<'a, 'pass>(
    node: &'a SceneNode,
    camera_bind_group: &'a wgpu::BindGroup,
    render_pass: &'pass mut wgpu::RenderPass<'a>,
) where
    'a: 'pass,
{
    if let (Some(geometry), Some(material)) = (&node.geometry, &node.material) {
        render_pass.set_pipeline(&material.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &material.bind_group, &[]);
        render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
        match &geometry.index_buffer {
            Some(index_buffer) => {
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..geometry.count, 0, 0..1);
            }
            None => render_pass.draw(0..geometry.count, 0..1),
        }
    }
    for child in node.children() {
        draw_node(child, camera_bind_group, render_pass);
    }
}
