use std::ops::Range;

use cgmath::{Matrix4, One, Quaternion, Vector3};
use wgpu::util::DeviceExt;

use super::{bounds::Aabb, vertex::Vertex3D};
use crate::error::{Result, ViewerError};

/// Local transform of a mesh: `position * rotation * scaling`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scaling: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scaling: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Model matrix, T * R * S
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scaling.x, self.scaling.y, self.scaling.z)
    }
}

/// GPU buffers owned by a mesh once it has been uploaded
pub struct MeshGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// A named piece of geometry in the scene with its own transform and
/// enabled flag. Meshes without geometry are kept as plain nodes so that
/// visibility toggles still reach them.
pub struct Mesh {
    pub name: String,
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    pub transform: Transform,
    enabled: bool,
    local_bounds: Option<Aabb>,
    gpu_resources: Option<MeshGpuResources>,
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("name", &self.name)
            .field("vertices", &self.vertices.len())
            .field("indices", &self.indices.len())
            .field("transform", &self.transform)
            .field("enabled", &self.enabled)
            .field("uploaded", &self.gpu_resources.is_some())
            .finish()
    }
}

impl Mesh {
    /// Builds a mesh from interleaved vertices and a triangle index list.
    ///
    /// Fails if the index count is not a multiple of three or an index
    /// points past the vertex list.
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Result<Self> {
        let name = name.into();
        if indices.len() % 3 != 0 {
            return Err(ViewerError::InvalidGeometry {
                mesh: name,
                reason: format!("{} indices is not a whole number of triangles", indices.len()),
            });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(ViewerError::InvalidGeometry {
                mesh: name,
                reason: format!("index {} out of range for {} vertices", bad, vertices.len()),
            });
        }
        let local_bounds = Aabb::from_points(vertices.iter().map(|v| v.position));
        Ok(Self {
            name,
            vertices,
            indices,
            transform: Transform::default(),
            enabled: true,
            local_bounds,
            gpu_resources: None,
        })
    }

    /// Builds a mesh from flat position/normal arrays, computing normals
    /// when they are missing or do not match the positions.
    pub fn from_flat(
        name: impl Into<String>,
        positions: &[f32],
        normals: &[f32],
        indices: Vec<u32>,
    ) -> Result<Self> {
        let name = name.into();
        if positions.len() % 3 != 0 {
            return Err(ViewerError::InvalidGeometry {
                mesh: name,
                reason: format!("{} position floats is not a multiple of 3", positions.len()),
            });
        }
        let computed;
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            computed = calculate_face_normals(positions, &indices);
            computed.as_slice()
        };
        let vertices = positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| Vertex3D::new([p[0], p[1], p[2]], [n[0], n[1], n[2]]))
            .collect();
        Self::new(name, vertices, indices)
    }

    /// A transform-only node without geometry.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
            transform: Transform::default(),
            enabled: true,
            local_bounds: None,
            gpu_resources: None,
        }
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn has_geometry(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Bounding box of the geometry in world space, `None` for empty nodes.
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.local_bounds
            .map(|b| b.transformed(&self.transform.matrix()))
    }

    /// Uploads vertex, index and transform buffers. Does nothing for empty
    /// nodes or meshes that are already uploaded.
    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        transform_layout: &wgpu::BindGroupLayout,
    ) {
        if self.gpu_resources.is_some() || !self.has_geometry() {
            return;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // cgmath matrices are column-major, which is what the GPU expects
        let matrix = self.transform.matrix();
        let transform_data: &[f32; 16] = matrix.as_ref();
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Transform Buffer", self.name)),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout: transform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        log::debug!(
            "uploaded mesh '{}' ({} vertices, {} triangles)",
            self.name,
            self.vertices.len(),
            self.triangle_count()
        );

        self.gpu_resources = Some(MeshGpuResources {
            vertex_buffer,
            index_buffer,
            transform_buffer,
            transform_bind_group,
        });
    }

    /// Drops the GPU buffers; the mesh is uploaded again on next use.
    pub fn release_gpu_resources(&mut self) {
        self.gpu_resources = None;
    }

    /// Writes the current transform to the GPU if the mesh is uploaded.
    pub fn update_transform(&self, queue: &wgpu::Queue) {
        if let Some(gpu) = &self.gpu_resources {
            let matrix = self.transform.matrix();
            let transform_data: &[f32; 16] = matrix.as_ref();
            queue.write_buffer(&gpu.transform_buffer, 0, bytemuck::cast_slice(transform_data));
        }
    }
}

/// Smooth per-vertex normals averaged from the faces around each vertex.
pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut normals = vec![0.0; vertex_count * 3];

    let vertex = |i: usize| {
        Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
    };

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
            continue;
        }

        let (v0, v1, v2) = (vertex(i0), vertex(i1), vertex(i2));
        let face_normal = (v1 - v0).cross(v2 - v0);

        for idx in [i0, i1, i2] {
            normals[idx * 3] += face_normal.x;
            normals[idx * 3 + 1] += face_normal.y;
            normals[idx * 3 + 2] += face_normal.z;
        }
    }

    for n in normals.chunks_exact_mut(3) {
        let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if length > 0.0 {
            n.iter_mut().for_each(|c| *c /= length);
        } else {
            n.copy_from_slice(&[0.0, 1.0, 0.0]);
        }
    }

    normals
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        // Skip drawing if not uploaded
        let Some(gpu) = &mesh.gpu_resources else {
            return;
        };

        self.set_bind_group(1, &gpu.transform_bind_group, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.indices.len() as u32, 0, instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::from_flat(
            "tri",
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            &[],
            vec![0, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn computes_normals_when_missing() {
        let mesh = triangle();
        for v in mesh.vertices() {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = Mesh::from_flat("bad", &[0.0, 0.0, 0.0], &[], vec![0, 1, 2]).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidGeometry { .. }));
    }

    #[test]
    fn rejects_partial_triangle() {
        let vertices = vec![Vertex3D::new([0.0; 3], [0.0, 1.0, 0.0]); 3];
        assert!(Mesh::new("bad", vertices, vec![0, 1]).is_err());
    }

    #[test]
    fn world_bounds_follow_transform() {
        let mut mesh = triangle();
        mesh.transform.scaling = Vector3::new(2.0, 2.0, 2.0);
        mesh.transform.position = Vector3::new(0.0, -1.0, 0.0);

        let bounds = mesh.world_bounds().unwrap();
        assert_eq!(bounds.min, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(bounds.max, Vector3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn empty_node_has_no_bounds() {
        let node = Mesh::empty("root");
        assert!(!node.has_geometry());
        assert!(node.world_bounds().is_none());
        assert!(node.is_enabled());
    }
}
