//! Small model files assembled in memory for loader and session tests.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

/// Three positions spanning [-1, 1] on every axis.
pub const TRIANGLE_POSITIONS: [[f32; 3]; 3] = [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [0.0, 1.0, 1.0]];

fn triangle_bytes() -> Vec<u8> {
    TRIANGLE_POSITIONS
        .iter()
        .flatten()
        .flat_map(|f| f.to_le_bytes())
        .collect()
}

fn document(translation: Option<[f32; 3]>, uri: Option<String>) -> serde_json::Value {
    let byte_length = triangle_bytes().len();
    let mut node = json!({ "name": "Cube", "mesh": 0 });
    if let Some(t) = translation {
        node["translation"] = json!(t);
    }
    let mut buffer = json!({ "byteLength": byte_length });
    if let Some(uri) = uri {
        buffer["uri"] = json!(uri);
    }

    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [node],
        "meshes": [{ "name": "CubeMesh", "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [-1.0, -1.0, -1.0],
            "max": [1.0, 1.0, 1.0]
        }],
        "bufferViews": [{ "buffer": 0, "byteLength": byte_length }],
        "buffers": [buffer]
    })
}

/// A `.gltf` document with one node, one triangle and an embedded buffer.
pub fn cube_gltf_json(translation: Option<[f32; 3]>) -> String {
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        BASE64.encode(triangle_bytes())
    );
    document(translation, Some(uri)).to_string()
}

/// The same document packed as a binary `.glb` container.
pub fn cube_glb(translation: Option<[f32; 3]>) -> Vec<u8> {
    let mut json_chunk = document(translation, None).to_string().into_bytes();
    while json_chunk.len() % 4 != 0 {
        json_chunk.push(b' ');
    }
    let bin_chunk = triangle_bytes();

    let total = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json_chunk);
    out.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin_chunk);
    out
}

/// A `.babylon` scene with one box mesh of the given half-extent centred at
/// `position`, plus a transform-only node.
pub fn babylon_box_json(half: f32, position: [f32; 3]) -> String {
    let h = half;
    json!({
        "producer": { "name": "test" },
        "meshes": [
            {
                "name": "box",
                "id": "box",
                "position": position,
                "rotation": [0.0, 0.0, 0.0],
                "scaling": [1.0, 1.0, 1.0],
                "positions": [-h, -h, -h,  h, -h, -h,  h, h, -h,  -h, h, h],
                "normals": null,
                "indices": [0, 1, 2, 0, 2, 3]
            },
            {
                "name": "__root__",
                "id": "root",
                "positions": null
            }
        ]
    })
    .to_string()
}
