//! Shape factory: detached visual primitives built from geometric parameters.
//!
//! Nothing here touches a scene; callers decide where a primitive lives.

mod mesh;

// Re-export public types
pub use mesh::{box_mesh, sphere_mesh, MeshData, Vertex};

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::color::Color;

/// Geometry of a primitive, in its own local space
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box centred on the origin
    Box { width: f32, height: f32, depth: f32 },

    /// UV sphere centred on the origin
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },

    /// Open polyline through the given points
    Line { vertices: Vec<Vec3> },
}

/// Surface appearance of a primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse material; the emissive term keeps it lit without scene lights
    Lambert { color: Color, emissive: Color },

    /// Unlit flat colour
    Basic { color: Color },

    /// Unlit line colour
    LineBasic { color: Color },
}

impl Material {
    pub fn color(&self) -> Color {
        match *self {
            Material::Lambert { color, .. }
            | Material::Basic { color }
            | Material::LineBasic { color } => color,
        }
    }

    /// Colour as seen in a scene without lights
    pub fn display_color(&self) -> Color {
        match *self {
            Material::Lambert { emissive, .. } => emissive,
            Material::Basic { color } | Material::LineBasic { color } => color,
        }
    }
}

/// A renderable object with its transform and visibility
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub geometry: Geometry,
    pub material: Material,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
}

impl Primitive {
    fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
        }
    }

    /// Rotate about the primitive's local Z axis
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_z(angle)).normalize();
    }

    /// Local-to-world transform (scale, then rotation, then translation)
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Convert XYZ Euler angles (radians) into a rotation
pub fn euler_rotation(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

/// Create a unit cube with an emissive Lambert material
pub fn create_cube(color: Color, position: Vec3, rotation: Vec3, scale: Vec3) -> Primitive {
    let mut cube = Primitive::new(
        Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        },
        Material::Lambert {
            color,
            emissive: color,
        },
    );
    cube.position = position;
    cube.rotation = euler_rotation(rotation);
    cube.scale = scale;
    cube
}

/// Create a flat-coloured sphere
///
/// The radius is not validated: zero or negative radii give degenerate
/// geometry that draws nothing.
pub fn create_sphere(
    position: Vec3,
    rotation: Vec3,
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    color: Color,
) -> Primitive {
    let mut sphere = Primitive::new(
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        },
        Material::Basic { color },
    );
    sphere.position = position;
    sphere.rotation = euler_rotation(rotation);
    sphere
}

/// Create a polyline through `vertices` (an empty list gives an empty line)
pub fn create_line(vertices: &[Vec3], color: Color) -> Primitive {
    Primitive::new(
        Geometry::Line {
            vertices: vertices.to_vec(),
        },
        Material::LineBasic { color },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hsl;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_create_cube_copies_transform() {
        let color = Hsl::vivid(255.0).to_rgb();
        let cube = create_cube(
            color,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, FRAC_PI_2),
            Vec3::new(2.0, 1.0, 1.0),
        );

        assert_eq!(cube.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cube.scale, Vec3::new(2.0, 1.0, 1.0));
        assert!(cube.visible);
        assert_eq!(cube.material.display_color(), color);

        // A quarter turn about Z maps +X to +Y
        let x_axis = cube.rotation * Vec3::X;
        assert!((x_axis - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_create_sphere_keeps_degenerate_radius() {
        let sphere = create_sphere(Vec3::ZERO, Vec3::ZERO, -3.0, 32, 32, Color::WHITE);
        match sphere.geometry {
            Geometry::Sphere { radius, .. } => assert_eq!(radius, -3.0),
            other => panic!("expected sphere geometry, got {:?}", other),
        }
        assert_eq!(sphere.scale, Vec3::ONE);
    }

    #[test]
    fn test_create_line_accepts_empty_input() {
        let line = create_line(&[], Color::WHITE);
        assert_eq!(line.geometry, Geometry::Line { vertices: vec![] });

        let line = create_line(&[Vec3::ZERO, Vec3::X], Color::BLACK);
        match &line.geometry {
            Geometry::Line { vertices } => assert_eq!(vertices.len(), 2),
            other => panic!("expected line geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_rotate_z_accumulates() {
        let mut cube = create_cube(Color::WHITE, Vec3::ZERO, Vec3::ZERO, Vec3::ONE);
        for _ in 0..4 {
            cube.rotate_z(FRAC_PI_2 / 4.0);
        }
        let x_axis = cube.rotation * Vec3::X;
        assert!((x_axis - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_model_matrix_applies_scale_before_translation() {
        let cube = create_cube(
            Color::WHITE,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(3.0, 1.0, 1.0),
        );
        let corner = cube.model_matrix().transform_point3(Vec3::new(0.5, 0.0, 0.0));
        assert!((corner - Vec3::new(11.5, 0.0, 0.0)).length() < 1e-5);
    }
}
