//! Global uniform bindings for camera and light data
//!
//! Manages the uniform buffer and bind group shared by every mesh drawn in a
//! frame: the camera matrices and the hemispheric light.

use crate::{
    config::LightConfig,
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `viewer.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUboContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    // xyz: normalized direction towards the sky, w: intensity
    light_direction: [f32; 4],
    sky_color: [f32; 4],
    ground_color: [f32; 4],
}

impl GlobalUboContent {
    pub fn new(camera: CameraUniform, light: &LightConfig) -> Self {
        let d = light.direction;
        let len = (d.x * d.x + d.y * d.y + d.z * d.z).sqrt();
        let dir = if len > 0.0 {
            [d.x / len, d.y / len, d.z / len]
        } else {
            [0.0, 1.0, 0.0]
        };
        let [sr, sg, sb] = light.sky_color;
        let [gr, gg, gb] = light.ground_color;

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_direction: [dir[0], dir[1], dir[2], light.intensity],
            sky_color: [sr, sg, sb, 1.0],
            ground_color: [gr, gg, gb, 1.0],
        }
    }
}

pub type GlobalUbo = UniformBuffer<GlobalUboContent>;

/// Writes this frame's camera and light into the global uniform buffer.
pub fn update_global_ubo(
    ubo: &mut GlobalUbo,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: &LightConfig,
) {
    ubo.update_content(queue, GlobalUboContent::new(camera, light));
}

/// Bind group layout and bind group for the global uniforms, bound to slot 0
/// of the mesh pipeline.
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUbo) -> Self {
        let bind_group_layout = binding_types::single_uniform_layout(device, "Globals Bind Group Layout");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
