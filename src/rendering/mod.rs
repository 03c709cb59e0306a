//! Render surface abstraction, per-frame batching, and the wgpu renderer.

mod gpu;

// Re-export public types
pub use gpu::GpuRenderer;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::camera::PerspectiveCamera;
use crate::error::Result;
use crate::scene::Scene;
use crate::shapes::{box_mesh, sphere_mesh, Geometry, MeshData, Primitive};

/// Something that can draw a scene through a camera
pub trait RenderSurface {
    /// Resize the drawable area (pixels)
    fn set_size(&mut self, width: u32, height: u32);

    /// Draw one frame
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;
}

/// Camera plus render surface, passed explicitly to the animation loop
pub struct RenderContext<S: RenderSurface> {
    pub camera: PerspectiveCamera,
    pub surface: S,
}

impl<S: RenderSurface> RenderContext<S> {
    pub fn new(camera: PerspectiveCamera, surface: S) -> Self {
        Self { camera, surface }
    }

    /// Window resize handler: match the camera aspect and surface size
    ///
    /// Zero-sized requests (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.aspect = width as f32 / height as f32;
        self.camera.update_projection_matrix();
        self.surface.set_size(width, height);
    }

    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        self.surface.render(scene, &self.camera)
    }
}

/// Uniform buffer for the shape shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
}

/// Per-instance data: model matrix columns + linear RGBA colour
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Line vertex with its own colour
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Shared unit mesh a primitive is drawn with
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MeshKey {
    UnitBox,
    UnitSphere {
        width_segments: u32,
        height_segments: u32,
    },
}

impl MeshKey {
    /// Unit mesh and the local transform that sizes it to `geometry`
    ///
    /// Lines have no mesh and return `None`.
    pub fn for_geometry(geometry: &Geometry) -> Option<(MeshKey, Mat4)> {
        match *geometry {
            Geometry::Box {
                width,
                height,
                depth,
            } => Some((
                MeshKey::UnitBox,
                Mat4::from_scale(Vec3::new(width, height, depth)),
            )),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => Some((
                MeshKey::UnitSphere {
                    width_segments: width_segments.max(3),
                    height_segments: height_segments.max(2),
                },
                Mat4::from_scale(Vec3::splat(radius.max(0.0))),
            )),
            Geometry::Line { .. } => None,
        }
    }

    pub fn build_mesh(&self) -> MeshData {
        match *self {
            MeshKey::UnitBox => box_mesh(1.0, 1.0, 1.0),
            MeshKey::UnitSphere {
                width_segments,
                height_segments,
            } => sphere_mesh(1.0, width_segments, height_segments),
        }
    }
}

/// Instances sharing one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub mesh: MeshKey,
    pub instances: Range<u32>,
}

/// Everything the GPU needs for one frame, grouped by mesh
#[derive(Debug, Default)]
pub struct FrameBatches {
    pub instances: Vec<InstanceRaw>,
    pub batches: Vec<DrawBatch>,
    /// Line segments as vertex pairs
    pub line_vertices: Vec<LineVertex>,
}

impl FrameBatches {
    /// Collect visible primitives into instanced batches and line segments
    pub fn from_scene(scene: &Scene) -> Self {
        let mut grouped: BTreeMap<MeshKey, Vec<InstanceRaw>> = BTreeMap::new();
        let mut line_vertices = Vec::new();

        for primitive in scene.primitives().filter(|p| p.visible) {
            let color = primitive.material.display_color().to_linear().to_rgba();
            match MeshKey::for_geometry(&primitive.geometry) {
                Some((key, local)) => {
                    grouped.entry(key).or_default().push(InstanceRaw {
                        model: (primitive.model_matrix() * local).to_cols_array_2d(),
                        color,
                    });
                }
                None => push_line_segments(primitive, color, &mut line_vertices),
            }
        }

        let mut frame = FrameBatches {
            line_vertices,
            ..Default::default()
        };
        for (mesh, instances) in grouped {
            let start = frame.instances.len() as u32;
            frame.instances.extend(instances);
            frame.batches.push(DrawBatch {
                mesh,
                instances: start..frame.instances.len() as u32,
            });
        }
        frame
    }
}

/// Expand a polyline into line-list vertex pairs in world space
fn push_line_segments(primitive: &Primitive, color: [f32; 4], out: &mut Vec<LineVertex>) {
    let Geometry::Line { vertices } = &primitive.geometry else {
        return;
    };
    let model = primitive.model_matrix();
    for pair in vertices.windows(2) {
        for point in pair {
            out.push(LineVertex {
                position: model.transform_point3(*point).to_array(),
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::shapes::{create_cube, create_line, create_sphere};

    struct RecordingSurface {
        size: (u32, u32),
        frames: usize,
    }

    impl RenderSurface for RecordingSurface {
        fn set_size(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }

        fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) -> Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    fn context() -> RenderContext<RecordingSurface> {
        RenderContext::new(
            PerspectiveCamera::new(75.0, 1.0, 1.0, 1000.0),
            RecordingSurface {
                size: (100, 100),
                frames: 0,
            },
        )
    }

    #[test]
    fn test_resize_updates_camera_and_surface() {
        let mut ctx = context();
        let before = ctx.camera.projection_matrix();

        ctx.resize(1920, 1080);

        assert_eq!(ctx.camera.aspect, 1920.0 / 1080.0);
        assert_eq!(ctx.surface.size, (1920, 1080));
        assert_ne!(ctx.camera.projection_matrix(), before);
    }

    #[test]
    fn test_zero_sized_resize_is_ignored() {
        let mut ctx = context();
        ctx.resize(800, 0);
        assert_eq!(ctx.camera.aspect, 1.0);
        assert_eq!(ctx.surface.size, (100, 100));
    }

    #[test]
    fn test_render_delegates_to_surface() {
        let mut ctx = context();
        ctx.render(&Scene::new()).unwrap();
        ctx.render(&Scene::new()).unwrap();
        assert_eq!(ctx.surface.frames, 2);
    }

    #[test]
    fn test_batches_group_by_mesh_and_skip_hidden() {
        let mut scene = Scene::new();
        for i in 0..3 {
            scene.add(create_cube(
                Color::WHITE,
                Vec3::new(i as f32, 0.0, 0.0),
                Vec3::ZERO,
                Vec3::ONE,
            ));
        }
        let mut hidden = create_cube(Color::WHITE, Vec3::ZERO, Vec3::ZERO, Vec3::ONE);
        hidden.visible = false;
        scene.add(hidden);
        scene.add(create_sphere(Vec3::ZERO, Vec3::ZERO, 5.0, 32, 32, Color::BLACK));
        scene.add(create_line(
            &[Vec3::ZERO, Vec3::X, Vec3::Y],
            Color::WHITE,
        ));

        let frame = FrameBatches::from_scene(&scene);

        assert_eq!(frame.instances.len(), 4);
        assert_eq!(
            frame.batches,
            vec![
                DrawBatch {
                    mesh: MeshKey::UnitBox,
                    instances: 0..3,
                },
                DrawBatch {
                    mesh: MeshKey::UnitSphere {
                        width_segments: 32,
                        height_segments: 32,
                    },
                    instances: 3..4,
                },
            ]
        );
        // Two segments from three points
        assert_eq!(frame.line_vertices.len(), 4);
    }

    #[test]
    fn test_sphere_instance_scales_by_radius() {
        let mut scene = Scene::new();
        let mut disc = create_sphere(Vec3::ZERO, Vec3::ZERO, 10.0, 16, 16, Color::WHITE);
        disc.scale.z = 0.5;
        scene.add(disc);

        let frame = FrameBatches::from_scene(&scene);
        let model = Mat4::from_cols_array_2d(&frame.instances[0].model);
        let point = model.transform_point3(Vec3::new(0.0, 1.0, 1.0));
        assert!((point - Vec3::new(0.0, 10.0, 5.0)).length() < 1e-5);
    }
}
