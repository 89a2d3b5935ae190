//! glTF / GLB loading: node hierarchy baked into world-space meshes.

use std::path::Path;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::{error::Result, gfx::scene::Mesh};

/// Load a `.gltf` file (with its external or embedded buffers) from disk.
///
/// Images are never decoded; the viewer only consumes geometry.
pub fn load_gltf_meshes(path: &Path) -> Result<Vec<Mesh>> {
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob)?;
    meshes_from_document(&document, &buffers)
}

/// Parse a binary `.glb` container already read into memory.
pub fn load_glb_meshes(bytes: &[u8], base: Option<&Path>) -> Result<Vec<Mesh>> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, base, blob)?;
    meshes_from_document(&document, &buffers)
}

/// Walks the default scene (or every scene when there is no default) and
/// produces one mesh per triangle primitive with the node's world transform
/// baked into its vertices.
pub fn meshes_from_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<Mesh>> {
    let mut meshes = Vec::new();

    let scenes: Vec<gltf::Scene> = match document.default_scene() {
        Some(scene) => vec![scene],
        None => document.scenes().collect(),
    };

    if scenes.is_empty() {
        // No scene graph at all: take the meshes as they are
        for mesh in document.meshes() {
            push_primitives(&mesh, None, Matrix4::identity(), buffers, &mut meshes)?;
        }
    } else {
        for scene in &scenes {
            for node in scene.nodes() {
                visit_node(&node, Matrix4::identity(), buffers, &mut meshes)?;
            }
        }
    }

    Ok(meshes)
}

fn visit_node(
    node: &gltf::Node,
    parent: Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<Mesh>,
) -> Result<()> {
    let world = parent * Matrix4::from(node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        push_primitives(&mesh, node.name(), world, buffers, out)?;
    }
    for child in node.children() {
        visit_node(&child, world, buffers, out)?;
    }
    Ok(())
}

fn push_primitives(
    mesh: &gltf::Mesh,
    node_name: Option<&str>,
    world: Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<Mesh>,
) -> Result<()> {
    let base_name = node_name
        .or(mesh.name())
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh {}", mesh.index()));
    let primitive_count = mesh.primitives().len();
    let normal_matrix = normal_matrix(&world);

    for prim in mesh.primitives() {
        if prim.mode() != gltf::mesh::Mode::Triangles {
            log::debug!(
                "skipping {:?} primitive {} of '{}'",
                prim.mode(),
                prim.index(),
                base_name
            );
            continue;
        }

        let reader = prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };

        let positions: Vec<f32> = positions
            .flat_map(|p| {
                let w = world * Vector4::new(p[0], p[1], p[2], 1.0);
                [w.x, w.y, w.z]
            })
            .collect();

        let normals: Vec<f32> = match reader.read_normals() {
            Some(it) => it
                .flat_map(|n| {
                    let n = (normal_matrix * Vector3::new(n[0], n[1], n[2])).normalize();
                    [n.x, n.y, n.z]
                })
                .collect(),
            None => Vec::new(),
        };

        let indices: Vec<u32> = match reader.read_indices() {
            Some(it) => it.into_u32().collect(),
            None => (0..(positions.len() / 3) as u32).collect(),
        };

        // A negative determinant mirrors the geometry and flips its winding
        let indices = if world.determinant() < 0.0 {
            flip_winding(indices)
        } else {
            indices
        };

        let name = if primitive_count > 1 {
            format!("{} #{}", base_name, prim.index())
        } else {
            base_name.clone()
        };
        out.push(Mesh::from_flat(name, &positions, &normals, indices)?);
    }
    Ok(())
}

pub(crate) fn normal_matrix(world: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(world.x.truncate(), world.y.truncate(), world.z.truncate());
    upper
        .invert()
        .map(|inv| inv.transpose())
        .unwrap_or(upper)
}

pub(crate) fn flip_winding(mut indices: Vec<u32>) -> Vec<u32> {
    for tri in indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;
    use crate::loader::test_models::{cube_glb, cube_gltf_json};

    #[test]
    fn loads_embedded_gltf_with_node_transform() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.gltf");
        std::fs::write(&path, cube_gltf_json(Some([0.0, 3.0, 0.0]))).unwrap();

        let meshes = load_gltf_meshes(&path).unwrap();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].name, "Cube");
        assert_eq!(meshes[0].triangle_count(), 1);

        let bounds = meshes[0].world_bounds().unwrap();
        assert_eq!(bounds.min.y, 3.0 - 1.0);
        assert_eq!(bounds.max.y, 3.0 + 1.0);
    }

    #[test]
    fn loads_glb_bytes() {
        let bytes = cube_glb(None);
        let meshes = load_glb_meshes(&bytes, None).unwrap();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].vertices().len(), 3);
    }

    #[test]
    fn malformed_gltf_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.gltf");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_gltf_meshes(&path), Err(ViewerError::Gltf(_))));
    }

    #[test]
    fn flip_winding_swaps_last_two() {
        assert_eq!(flip_winding(vec![0, 1, 2, 3, 4, 5]), vec![0, 2, 1, 3, 5, 4]);
    }
}
