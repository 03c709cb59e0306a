//! Audio-reactive scene: the cube ring, the disc stack, and their animation.

mod driver;

// Re-export public types
pub use driver::{AnimationDriver, DriverState, FrameStats};

use glam::Vec3;
use std::f32::consts::PI;
use tracing::debug;

use crate::color::Hsl;
use crate::error::{Result, VisualizerError};
use crate::params::VisualizerConfig;
use crate::scene::{NodeId, Scene};
use crate::shapes::{create_cube, create_sphere};

/// Scene plus the primitives tracked for per-frame animation
pub struct Visualizer {
    pub scene: Scene,
    config: VisualizerConfig,
    /// One cube per frequency bin, index-aligned with the spectrum
    cubes: Vec<NodeId>,
    /// Flattened spheres, stacked along +Z
    discs: Vec<NodeId>,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            scene: Scene::new(),
            config,
            cubes: Vec::new(),
            discs: Vec::new(),
        }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn cubes(&self) -> &[NodeId] {
        &self.cubes
    }

    pub fn discs(&self) -> &[NodeId] {
        &self.discs
    }

    /// Lay out one cube per frequency bin on a circle in the XY plane
    ///
    /// `bin_count` comes from the live spectrum analyser; without one there
    /// is nothing to align the ring with. Cubes from a previous call are
    /// removed from the scene first.
    pub fn generate_cubes_in_circle(&mut self, radius: f32, bin_count: Option<usize>) -> Result<()> {
        let bins = bin_count.ok_or(VisualizerError::AnalyserNotReady)?;

        for id in self.cubes.drain(..) {
            self.scene.remove(id);
        }

        for i in 0..bins {
            let angle = (2.0 * PI * i as f32) / bins as f32;
            let position = Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0);
            let color = Hsl::vivid(self.config.cube_hue_offset_deg + i as f32).into();

            let cube = create_cube(color, position, Vec3::new(0.0, 0.0, angle), Vec3::ONE);
            self.cubes.push(self.scene.add(cube));
        }

        debug!("Generated {} cubes on a ring of radius {}", bins, radius);
        Ok(())
    }

    /// Stack `count` discs along +Z, each smaller than the last
    ///
    /// Disc i (1-based) sits at z = i * spacing with radius
    /// `radius - i * step`; late discs may get a non-positive radius and
    /// draw nothing. Discs accumulate across calls.
    pub fn generate_spheres(&mut self, count: usize, radius: f32) {
        let cfg = &self.config;
        for i in 1..=count {
            let i_f = i as f32;
            let hue = (i * count) as f32;
            let mut disc = create_sphere(
                Vec3::new(0.0, 0.0, i_f * cfg.disc_spacing),
                Vec3::ZERO,
                radius - i_f * cfg.disc_radius_step,
                cfg.sphere_segments,
                cfg.sphere_segments,
                Hsl::vivid(hue).into(),
            );
            disc.scale.z = cfg.disc_depth_scale;
            self.discs.push(self.scene.add(disc));
        }

        debug!("Generated {} discs (total {})", count, self.discs.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Geometry;

    #[test]
    fn test_cubes_need_an_analyser() {
        let mut visualizer = Visualizer::new(VisualizerConfig::default());
        let result = visualizer.generate_cubes_in_circle(100.0, None);
        assert!(matches!(result, Err(VisualizerError::AnalyserNotReady)));
        assert!(visualizer.cubes().is_empty());
    }

    #[test]
    fn test_cube_ring_layout() {
        let mut visualizer = Visualizer::new(VisualizerConfig::default());
        visualizer.generate_cubes_in_circle(100.0, Some(256)).unwrap();

        assert_eq!(visualizer.cubes().len(), 256);
        for (i, id) in visualizer.cubes().iter().enumerate() {
            let cube = visualizer.scene.get(*id).unwrap();
            let expected_angle = 2.0 * PI * i as f32 / 256.0;

            assert!((cube.position.length() - 100.0).abs() < 1e-3);
            assert_eq!(cube.position.z, 0.0);

            let angle = cube.position.y.atan2(cube.position.x).rem_euclid(2.0 * PI);
            let diff = (angle - expected_angle).abs();
            assert!(diff < 1e-4 || (2.0 * PI - diff) < 1e-4, "cube {} at {}", i, angle);

            assert_eq!(cube.scale, Vec3::ONE);
            assert_eq!(
                cube.material.display_color(),
                Hsl::vivid(255.0 + i as f32).to_rgb()
            );
        }
    }

    #[test]
    fn test_cube_initial_rotation_matches_angle() {
        let mut visualizer = Visualizer::new(VisualizerConfig::default());
        visualizer.generate_cubes_in_circle(50.0, Some(4)).unwrap();

        // Cube 1 sits at 90°, so its local X axis points along world +Y
        let cube = visualizer.scene.get(visualizer.cubes()[1]).unwrap();
        assert!((cube.rotation * Vec3::X - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_regenerating_cubes_replaces_them() {
        let mut visualizer = Visualizer::new(VisualizerConfig::default());
        visualizer.generate_cubes_in_circle(100.0, Some(256)).unwrap();
        visualizer.generate_cubes_in_circle(80.0, Some(128)).unwrap();

        assert_eq!(visualizer.cubes().len(), 128);
        assert_eq!(visualizer.scene.len(), 128);
        let first = visualizer.scene.get(visualizer.cubes()[0]).unwrap();
        assert!((first.position.length() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_disc_stack_layout() {
        let mut visualizer = Visualizer::new(VisualizerConfig::default());
        visualizer.generate_spheres(5, 25.0);

        let expected_z = [5.0, 10.0, 15.0, 20.0, 25.0];
        let expected_radius = [23.0, 21.0, 19.0, 17.0, 15.0];
        let expected_hue = [5.0, 10.0, 15.0, 20.0, 25.0];

        assert_eq!(visualizer.discs().len(), 5);
        for (j, id) in visualizer.discs().iter().enumerate() {
            let disc = visualizer.scene.get(*id).unwrap();
            assert_eq!(disc.position, Vec3::new(0.0, 0.0, expected_z[j]));
            assert_eq!(disc.scale.z, 0.5);
            match disc.geometry {
                Geometry::Sphere {
                    radius,
                    width_segments,
                    height_segments,
                } => {
                    assert_eq!(radius, expected_radius[j]);
                    assert_eq!((width_segments, height_segments), (32, 32));
                }
                ref other => panic!("expected sphere geometry, got {:?}", other),
            }
            assert_eq!(disc.material.color(), Hsl::vivid(expected_hue[j]).to_rgb());
        }
    }

    #[test]
    fn test_discs_accumulate_and_may_degenerate() {
        let mut visualizer = Visualizer::new(VisualizerConfig::default());
        visualizer.generate_spheres(10, 25.0);
        visualizer.generate_spheres(20, 25.0);
        assert_eq!(visualizer.discs().len(), 30);

        // The 13th disc of the second batch has radius 25 - 26 = -1
        let disc = visualizer.scene.get(visualizer.discs()[22]).unwrap();
        assert!(matches!(disc.geometry, Geometry::Sphere { radius, .. } if radius < 0.0));
    }
}
