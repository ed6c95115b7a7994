//! Mesh and point-cloud data: generation on the CPU, upload to the GPU.
//!
//! Generation is kept free of GPU types so tessellation and scattering can
//! be tested directly; [`Geometry`] wraps the uploaded buffers and is what
//! the scene graph owns and eventually releases.

use rand::Rng;
use wgpu::util::DeviceExt;

use crate::scene::graph::Release;

/// Vertex layout description for a pipeline.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// Planet surface vertex: position, normal and a per-vertex random scalar
/// in [0, 1) that the shader uses to displace and tint the surface.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlanetVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub random: f32,
}

impl Vertex for PlanetVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlanetVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Bare position vertex for point clouds (sphere particles, stars).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
}

impl Vertex for PointVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
            0 => Float32x3,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// CPU-side tessellation of a UV sphere.
pub struct SphereData {
    pub vertices: Vec<PlanetVertex>,
    pub indices: Vec<u32>,
}

impl SphereData {
    /// Tessellate a UV sphere of the given radius.
    ///
    /// `width_segments` counts longitude bands, `height_segments` latitude
    /// bands; vertices are shared along the seam, giving
    /// `(width + 1) * (height + 1)` vertices and `width * height * 6`
    /// indices. Each vertex gets a fresh `random` scalar from `rng`.
    pub fn generate(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        rng: &mut impl Rng,
    ) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices =
            Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
        for lat in 0..=height_segments {
            let theta = lat as f32 * std::f32::consts::PI / height_segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            for long in 0..=width_segments {
                let phi = long as f32 * std::f32::consts::TAU / width_segments as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
                vertices.push(PlanetVertex {
                    position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                    normal,
                    random: rng.random::<f32>(),
                });
            }
        }

        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        let stride = width_segments + 1;
        for lat in 0..height_segments {
            for long in 0..width_segments {
                let a = lat * stride + long;
                let b = a + stride;
                // Wound counter-clockwise seen from outside the sphere.
                indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
            }
        }

        Self { vertices, indices }
    }

    /// The sphere surface reused as a bare point cloud.
    pub fn to_points(&self) -> Vec<PointVertex> {
        self.vertices
            .iter()
            .map(|v| PointVertex {
                position: v.position,
            })
            .collect()
    }
}

/// Scatter `count` points uniformly inside a cube spanning
/// `[-spread / 2, spread / 2]` on every axis.
pub fn scatter_stars(count: usize, spread: f32, rng: &mut impl Rng) -> Vec<PointVertex> {
    let half = spread / 2.0;
    (0..count)
        .map(|_| PointVertex {
            position: [
                rng.random_range(-half..half),
                rng.random_range(-half..half),
                rng.random_range(-half..half),
            ],
        })
        .collect()
}

/// Uploaded vertex (and optionally index) buffers for one drawable.
///
/// `count` is the number of indices when an index buffer is present,
/// otherwise the number of vertices.
pub struct Geometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub count: u32,
}

impl Geometry {
    pub fn from_sphere(device: &wgpu::Device, sphere: &SphereData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Planet Vertex Buffer"),
            contents: bytemuck::cast_slice(&sphere.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Planet Index Buffer"),
            contents: bytemuck::cast_slice(&sphere.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer: Some(index_buffer),
            count: sphere.indices.len() as u32,
        }
    }

    pub fn from_points(device: &wgpu::Device, label: &str, points: &[PointVertex]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(points),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            vertex_buffer,
            index_buffer: None,
            count: points.len() as u32,
        }
    }
}

impl Release for Geometry {
    fn release(&mut self) {
        self.vertex_buffer.destroy();
        if let Some(index_buffer) = &self.index_buffer {
            index_buffer.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn sphere_tessellation_counts() {
        let mut rng = SmallRng::seed_from_u64(7);
        let sphere = SphereData::generate(1.0, 50, 50, &mut rng);
        assert_eq!(sphere.vertices.len(), 51 * 51);
        assert_eq!(sphere.indices.len(), 50 * 50 * 6);
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let mut rng = SmallRng::seed_from_u64(7);
        let sphere = SphereData::generate(2.0, 12, 8, &mut rng);
        for vertex in &sphere.vertices {
            let [x, y, z] = vertex.position;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - 2.0).abs() < 1e-4, "vertex off the sphere: {}", len);
        }
    }

    #[test]
    fn sphere_randoms_stay_in_unit_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let sphere = SphereData::generate(1.0, 50, 50, &mut rng);
        assert!(sphere.vertices.iter().all(|v| (0.0..1.0).contains(&v.random)));
        // and they are actually random, not one repeated value
        let first = sphere.vertices[0].random;
        assert!(sphere.vertices.iter().any(|v| v.random != first));
    }

    #[test]
    fn sphere_indices_reference_existing_vertices() {
        let mut rng = SmallRng::seed_from_u64(7);
        let sphere = SphereData::generate(1.0, 6, 4, &mut rng);
        let max = sphere.vertices.len() as u32;
        assert!(sphere.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn stars_fill_the_requested_cube() {
        let mut rng = SmallRng::seed_from_u64(42);
        let stars = scatter_stars(10_000, 2000.0, &mut rng);
        assert_eq!(stars.len(), 10_000);
        assert!(stars.iter().all(|s| s
            .position
            .iter()
            .all(|c| (-1000.0..1000.0).contains(c))));
        // spread should actually be used, not everything near origin
        assert!(stars.iter().any(|s| s.position[0].abs() > 500.0));
    }

    #[test]
    fn point_cloud_mirrors_sphere_positions() {
        let mut rng = SmallRng::seed_from_u64(7);
        let sphere = SphereData::generate(1.0, 6, 4, &mut rng);
        let points = sphere.to_points();
        assert_eq!(points.len(), sphere.vertices.len());
        assert_eq!(points[3].position, sphere.vertices[3].position);
    }
}
