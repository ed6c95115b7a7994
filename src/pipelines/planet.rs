//! The planet's shader material: displaced, two-color surface reacting to
//! time and pointer hover.

use wgpu::util::DeviceExt;

use crate::{
    pipelines::{mk_render_pipeline, uniform_bind_group_layout},
    scene::{
        geometry::{PlanetVertex, Vertex},
        material::Material,
    },
};

/// Emerald and violet, the page's accent colors.
pub const COLOR_A: [f32; 3] = [0x31 as f32 / 255.0, 0xc4 as f32 / 255.0, 0x8d as f32 / 255.0];
pub const COLOR_B: [f32; 3] = [0x6c as f32 / 255.0, 0x63 as f32 / 255.0, 0xff as f32 / 255.0];

/// Uniform block for the planet shader. vec3 fields are padded to 16 bytes
/// by the trailing scalar, matching WGSL uniform layout.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlanetUniform {
    pub model: [[f32; 4]; 4],
    pub color_a: [f32; 3],
    pub time: f32,
    pub color_b: [f32; 3],
    pub hover: f32,
}

impl PlanetUniform {
    pub fn new() -> Self {
        Self {
            model: cgmath::Matrix4::from_scale(1.0).into(),
            color_a: COLOR_A,
            time: 0.0,
            color_b: COLOR_B,
            hover: 0.0,
        }
    }
}

impl Default for PlanetUniform {
    fn default() -> Self {
        Self::new()
    }
}

pub fn mk_planet_material(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> Material {
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Planet Uniform Buffer"),
        contents: bytemuck::cast_slice(&[PlanetUniform::new()]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group_layout = uniform_bind_group_layout(device, "planet_bind_group_layout");
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
        label: Some("planet_bind_group"),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Planet Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, &bind_group_layout],
        push_constant_ranges: &[],
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Planet Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("planet.wgsl").into()),
    };

    let pipeline = mk_render_pipeline(
        device,
        &pipeline_layout,
        config.format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        wgpu::PrimitiveTopology::TriangleList,
        &[PlanetVertex::desc()],
        shader,
    );

    Material::new(pipeline, bind_group, uniform_buffer)
}
