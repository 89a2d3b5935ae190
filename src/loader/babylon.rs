//! `.babylon` scene loading.
//!
//! A `.babylon` file is a JSON scene description. Meshes carry their vertex
//! data inline or point at a shared entry of `geometries.vertexData` through
//! `geometryId`. Every mesh's world matrix, composed along its `parentId`
//! chain (meshes and `transformNodes`), is baked into the vertices, the same
//! way glTF node transforms are.
//!
//! Babylon scenes are left-handed, so the baked positions and normals are
//! mirrored along Z into the viewer's right-handed space.

use std::{collections::HashMap, path::Path};

use cgmath::{InnerSpace, Matrix4, Quaternion, Rad, Rotation3, SquareMatrix, Vector3, Vector4};
use serde::Deserialize;

use super::gltf::{flip_winding, normal_matrix};
use crate::{
    error::{Result, ViewerError},
    gfx::scene::Mesh,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BabylonScene {
    #[serde(default)]
    meshes: Vec<BabylonMesh>,
    #[serde(default)]
    transform_nodes: Vec<BabylonNode>,
    #[serde(default)]
    geometries: Option<BabylonGeometries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BabylonGeometries {
    #[serde(default)]
    vertex_data: Vec<BabylonVertexData>,
}

#[derive(Debug, Deserialize)]
struct BabylonVertexData {
    id: String,
    #[serde(flatten)]
    geometry: BabylonGeometry,
}

#[derive(Debug, Default, Deserialize)]
struct BabylonGeometry {
    #[serde(default)]
    positions: Option<Vec<f32>>,
    #[serde(default)]
    normals: Option<Vec<f32>>,
    #[serde(default)]
    indices: Option<Vec<u32>>,
}

impl BabylonGeometry {
    fn positions(&self) -> &[f32] {
        self.positions.as_deref().unwrap_or_default()
    }

    fn normals(&self) -> &[f32] {
        self.normals.as_deref().unwrap_or_default()
    }

    fn indices(&self) -> &[u32] {
        self.indices.as_deref().unwrap_or_default()
    }
}

/// Transform part shared by meshes and transform nodes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BabylonNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    position: Option<[f32; 3]>,
    #[serde(default)]
    rotation: Option<[f32; 3]>,
    #[serde(default)]
    rotation_quaternion: Option<[f32; 4]>,
    #[serde(default)]
    scaling: Option<[f32; 3]>,
}

impl BabylonNode {
    fn rotation(&self) -> Quaternion<f32> {
        // The quaternion wins over Euler angles when both are present
        match (self.rotation_quaternion, self.rotation) {
            (Some([x, y, z, w]), _) => Quaternion::new(w, x, y, z),
            (None, Some([x, y, z])) => {
                Quaternion::from_angle_y(Rad(y))
                    * Quaternion::from_angle_x(Rad(x))
                    * Quaternion::from_angle_z(Rad(z))
            }
            (None, None) => Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }

    /// Local `T * R * S`, still in Babylon's left-handed space.
    fn local_matrix(&self) -> Matrix4<f32> {
        let [px, py, pz] = self.position.unwrap_or([0.0; 3]);
        let [sx, sy, sz] = self.scaling.unwrap_or([1.0; 3]);
        Matrix4::from_translation(Vector3::new(px, py, pz))
            * Matrix4::from(self.rotation())
            * Matrix4::from_nonuniform_scale(sx, sy, sz)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BabylonMesh {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    geometry_id: Option<String>,
    #[serde(flatten)]
    node: BabylonNode,
    #[serde(flatten)]
    geometry: BabylonGeometry,
}

impl BabylonMesh {
    fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.node.id.clone())
            .unwrap_or_else(|| format!("mesh {index}"))
    }

    /// Inline vertex data first, then the shared geometry named by `geometryId`.
    fn geometry<'a>(&'a self, shared: &HashMap<&str, &'a BabylonGeometry>) -> Option<&'a BabylonGeometry> {
        if !self.geometry.positions().is_empty() {
            return Some(&self.geometry);
        }
        let id = self.geometry_id.as_deref()?;
        let found = shared.get(id).copied();
        if found.is_none() {
            log::warn!("mesh '{}' refers to unknown geometry '{}'", self.node.id.as_deref().unwrap_or("?"), id);
        }
        found
    }
}

/// Every node that can be a parent, by id.
struct Hierarchy<'a> {
    nodes: HashMap<&'a str, &'a BabylonNode>,
}

impl<'a> Hierarchy<'a> {
    fn new(scene: &'a BabylonScene) -> Self {
        let nodes = scene
            .transform_nodes
            .iter()
            .chain(scene.meshes.iter().map(|m| &m.node))
            .filter_map(|node| node.id.as_deref().map(|id| (id, node)))
            .collect();
        Self { nodes }
    }

    /// Local matrix composed with every ancestor's.
    fn world_matrix(&self, node: &BabylonNode) -> Matrix4<f32> {
        let mut world = node.local_matrix();
        let mut parent_id = node.parent_id.as_deref();
        let mut depth = 0;

        while let Some(id) = parent_id {
            let Some(parent) = self.nodes.get(id) else {
                log::debug!("ignoring unknown parentId '{}'", id);
                break;
            };
            depth += 1;
            if depth > self.nodes.len() {
                log::warn!("parentId cycle through '{}', hierarchy cut", id);
                break;
            }
            world = parent.local_matrix() * world;
            parent_id = parent.parent_id.as_deref();
        }
        world
    }
}

/// Bakes `world` (left-handed) into the geometry and mirrors the result.
/// Meshes without vertex data become empty nodes.
fn build_mesh(name: String, geometry: Option<&BabylonGeometry>, world: Matrix4<f32>) -> Result<Mesh> {
    let Some(geometry) = geometry.filter(|g| !g.positions().is_empty()) else {
        return Ok(Mesh::empty(name));
    };

    let raw = geometry.positions();
    if raw.len() % 3 != 0 {
        return Err(ViewerError::InvalidGeometry {
            mesh: name,
            reason: format!("{} position floats is not a multiple of 3", raw.len()),
        });
    }

    let positions: Vec<f32> = raw
        .chunks_exact(3)
        .flat_map(|p| {
            let w = world * Vector4::new(p[0], p[1], p[2], 1.0);
            [w.x, w.y, -w.z]
        })
        .collect();

    let normal_matrix = normal_matrix(&world);
    let normals: Vec<f32> = geometry
        .normals()
        .chunks_exact(3)
        .flat_map(|n| {
            let n = (normal_matrix * Vector3::new(n[0], n[1], n[2])).normalize();
            [n.x, n.y, -n.z]
        })
        .collect();

    let indices = match geometry.indices() {
        [] => (0..(positions.len() / 3) as u32).collect(),
        indices => indices.to_vec(),
    };

    // The Z mirror reverses the winding unless the node itself mirrors too
    let indices = if world.determinant() >= 0.0 {
        flip_winding(indices)
    } else {
        indices
    };

    Mesh::from_flat(name, &positions, &normals, indices)
}

/// Reads a `.babylon` file and returns one mesh per entry of its `meshes`
/// array, in file order.
pub fn load_babylon_meshes(path: &Path) -> Result<Vec<Mesh>> {
    let text = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_babylon(&text)
}

pub fn parse_babylon(text: &str) -> Result<Vec<Mesh>> {
    let scene: BabylonScene = serde_json::from_str(text)?;
    let hierarchy = Hierarchy::new(&scene);
    let shared: HashMap<&str, &BabylonGeometry> = scene
        .geometries
        .iter()
        .flat_map(|g| g.vertex_data.iter())
        .map(|data| (data.id.as_str(), &data.geometry))
        .collect();

    scene
        .meshes
        .iter()
        .enumerate()
        .map(|(i, mesh)| {
            build_mesh(
                mesh.display_name(i),
                mesh.geometry(&shared),
                hierarchy.world_matrix(&mesh.node),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Transform;
    use crate::loader::test_models::babylon_box_json;
    use serde_json::json;

    fn center(mesh: &Mesh) -> Vector3<f32> {
        mesh.world_bounds().unwrap().center()
    }

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    const CUBE_POSITIONS: [f32; 12] = [-1.0, -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0];

    #[test]
    fn parses_geometry_and_empty_nodes() {
        let meshes = parse_babylon(&babylon_box_json(2.0, [0.0, 0.0, 0.0])).unwrap();
        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[0].name, "box");
        assert_eq!(meshes[0].triangle_count(), 2);
        assert!(!meshes[1].has_geometry());
        assert_eq!(meshes[1].name, "__root__");

        let bounds = meshes[0].world_bounds().unwrap();
        assert_eq!(bounds.half_extent(), Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn position_is_baked_and_mirrored_into_right_handed_space() {
        let meshes = parse_babylon(&babylon_box_json(1.0, [1.0, 2.0, 3.0])).unwrap();
        assert_eq!(meshes[0].transform, Transform::default());
        assert!(close(center(&meshes[0]), Vector3::new(1.0, 2.0, -3.0)));
    }

    #[test]
    fn y_rotation_mirrors_to_opposite_direction() {
        let json = json!({ "meshes": [{
            "name": "r",
            "rotation": [0.0, std::f32::consts::FRAC_PI_2, 0.0],
            "positions": [1.0, 0.0, 0.0,  0.0, 1.0, 0.0,  0.0, 0.0, 0.0],
            "indices": [0, 1, 2]
        }]});
        let meshes = parse_babylon(&json.to_string()).unwrap();

        // +X rotated by +90 degrees about Y in left-handed space lands on -Z,
        // which is +Z after mirroring.
        let p = meshes[0].vertices()[0].position;
        assert!(close(Vector3::new(p[0], p[1], p[2]), Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn geometry_id_resolves_shared_vertex_data() {
        let json = json!({
            "geometries": { "vertexData": [{
                "id": "cube-data",
                "positions": CUBE_POSITIONS,
                "indices": [0, 1, 2, 0, 2, 3]
            }]},
            "meshes": [
                { "name": "a", "id": "a", "geometryId": "cube-data" },
                { "name": "b", "id": "b", "geometryId": "cube-data", "position": [5.0, 0.0, 0.0] },
                { "name": "lost", "id": "lost", "geometryId": "nope" }
            ]
        });
        let meshes = parse_babylon(&json.to_string()).unwrap();

        assert_eq!(meshes[0].triangle_count(), 2);
        assert_eq!(meshes[1].triangle_count(), 2);
        assert!(close(center(&meshes[1]), Vector3::new(5.0, 0.0, 0.0)));
        assert!(!meshes[2].has_geometry());
    }

    #[test]
    fn parent_transforms_are_composed() {
        let json = json!({
            "transformNodes": [
                { "id": "root", "position": [10.0, 0.0, 0.0] }
            ],
            "meshes": [
                { "name": "parent", "id": "parent", "parentId": "root", "scaling": [2.0, 2.0, 2.0] },
                {
                    "name": "child",
                    "id": "child",
                    "parentId": "parent",
                    "position": [0.0, 1.0, 0.0],
                    "positions": CUBE_POSITIONS,
                    "indices": [0, 1, 2, 0, 2, 3]
                }
            ]
        });
        let meshes = parse_babylon(&json.to_string()).unwrap();
        let child = &meshes[1];

        // root * parent * child: (0, 1, 0) scaled by 2, then moved to x = 10
        assert!(close(center(child), Vector3::new(10.0, 2.0, 0.0)));
        let half = child.world_bounds().unwrap().half_extent();
        assert!(close(half, Vector3::new(2.0, 2.0, 2.0)));
    }

    #[test]
    fn parent_cycle_does_not_hang() {
        let json = json!({ "meshes": [
            { "name": "a", "id": "a", "parentId": "b", "positions": CUBE_POSITIONS, "indices": [0, 1, 2] },
            { "name": "b", "id": "b", "parentId": "a" }
        ]});
        let meshes = parse_babylon(&json.to_string()).unwrap();
        assert_eq!(meshes.len(), 2);
        assert!(meshes[0].has_geometry());
    }

    #[test]
    fn missing_meshes_array_is_an_empty_scene() {
        assert!(parse_babylon(r#"{ "cameras": [] }"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_babylon("{ meshes"), Err(ViewerError::Babylon(_))));
    }
}
