//! Materials: a shader pipeline plus its uniform buffer and texture slots.
//!
//! A material's GPU allocations are exactly its enumerable slots (the
//! uniform buffer and whichever texture maps are present); the pipeline and
//! bind group objects themselves carry no allocation that survives drop, so
//! releasing the slots is the material's complete disposal.

use crate::scene::graph::{MaterialResources, Release};

/// A GPU texture with its view and optional sampler.
#[derive(Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture sized to the surface.
    ///
    /// Rebuilt on every resize; the old one is simply dropped since the
    /// depth texture is owned by the context, not the scene graph.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            sampler: None,
        }
    }
}

impl Release for Texture {
    fn release(&mut self) {
        self.texture.destroy();
    }
}

/// Shader pipeline with uniform state and optional texture maps.
///
/// The map slots are statically named rather than discovered: any slot that
/// holds a texture is visited on disposal, so adding a map never needs a
/// matching change in the teardown path.
pub struct Material {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
    pub uniform_buffer: wgpu::Buffer,
    pub color_map: Option<Texture>,
    pub normal_map: Option<Texture>,
    pub env_map: Option<Texture>,
}

impl Material {
    pub fn new(
        pipeline: wgpu::RenderPipeline,
        bind_group: wgpu::BindGroup,
        uniform_buffer: wgpu::Buffer,
    ) -> Self {
        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            color_map: None,
            normal_map: None,
            env_map: None,
        }
    }
}

impl MaterialResources for Material {
    fn for_each_resource(&mut self, f: &mut dyn FnMut(&mut dyn Release)) {
        f(&mut self.uniform_buffer);
        for slot in [&mut self.color_map, &mut self.normal_map, &mut self.env_map] {
            if let Some(texture) = slot {
                f(texture);
            }
        }
    }
}
