//! Scene layout and animation parameters.

/// Layout of the cube ring and disc stack, and their animation
#[derive(Debug, Clone)]
pub struct VisualizerConfig {
    /// Radius of the cube ring (world units)
    pub ring_radius: f32,

    /// Hue of the first cube (degrees); cube i uses hue_offset + i
    pub cube_hue_offset_deg: f32,

    /// Per-frame cube rotation about local Z (radians)
    /// Even bins turn counter-clockwise, odd bins clockwise
    pub rotate_speed: f32,

    /// Number of discs in the stack
    pub disc_count: usize,

    /// Radius of the first disc before shrinking (world units)
    pub disc_radius: f32,

    /// Z distance between consecutive discs (world units)
    pub disc_spacing: f32,

    /// Radius lost per disc (world units)
    pub disc_radius_step: f32,

    /// Z scale flattening spheres into discs
    pub disc_depth_scale: f32,

    /// Sphere tessellation (segments around and top-to-bottom)
    pub sphere_segments: u32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            ring_radius: 100.0,
            cube_hue_offset_deg: 255.0,
            rotate_speed: 0.005,
            disc_count: 10,
            disc_radius: 25.0,
            disc_spacing: 5.0,
            disc_radius_step: 2.0,
            disc_depth_scale: 0.5,
            sphere_segments: 32,
        }
    }
}
