//! Point-cloud material used by the sphere particle overlay and the
//! starfield.

use wgpu::util::DeviceExt;

use crate::{
    pipelines::{mk_render_pipeline, uniform_bind_group_layout, planet::COLOR_A},
    scene::{
        geometry::{PointVertex, Vertex},
        material::Material,
    },
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointsUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub _padding: f32,
}

impl PointsUniform {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            model: cgmath::Matrix4::from_scale(1.0).into(),
            color,
            _padding: 0.0,
        }
    }
}

impl Default for PointsUniform {
    fn default() -> Self {
        Self::new(COLOR_A)
    }
}

pub fn mk_points_material(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    label: &str,
    color: [f32; 3],
) -> Material {
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&[PointsUniform::new(color)]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group_layout = uniform_bind_group_layout(device, "points_bind_group_layout");
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
        label: Some("points_bind_group"),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Points Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, &bind_group_layout],
        push_constant_ranges: &[],
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Points Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("points.wgsl").into()),
    };

    let pipeline = mk_render_pipeline(
        device,
        &pipeline_layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        wgpu::PrimitiveTopology::PointList,
        &[PointVertex::desc()],
        shader,
    );

    Material::new(pipeline, bind_group, uniform_buffer)
}
