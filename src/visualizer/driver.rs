//! Per-frame animation: spectrum in, transforms out, then a redraw.

use glam::Vec3;
use tracing::info;

use super::Visualizer;
use crate::audio::SpectrumSnapshot;
use crate::error::{Result, VisualizerError};
use crate::rendering::{RenderContext, RenderSurface};

/// Scheduling state of the animation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Not scheduled; frames are not requested
    Idle,
    /// Requests a new frame after every frame
    Running,
}

/// Summary of one animated frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub visible_cubes: usize,
    pub visible_discs: usize,
}

/// Drives the cube ring and disc stack from spectrum snapshots
pub struct AnimationDriver {
    state: DriverState,
    rotate_speed: f32,

    /// Frames drawn so far. Nothing reads it yet; kept for time-based effects.
    time: u64,

    /// Average magnitude of the last frame's spectrum. Read every frame but
    /// not yet mapped onto any visual.
    average_frequency: f32,
}

impl AnimationDriver {
    pub fn new(rotate_speed: f32) -> Self {
        Self {
            state: DriverState::Idle,
            rotate_speed,
            time: 0,
            average_frequency: 0.0,
        }
    }

    pub fn start(&mut self) {
        if self.state == DriverState::Idle {
            info!("Animation started");
        }
        self.state = DriverState::Running;
    }

    pub fn stop(&mut self) {
        if self.state == DriverState::Running {
            info!("Animation paused at frame {}", self.time);
        }
        self.state = DriverState::Idle;
    }

    pub fn toggle(&mut self) {
        match self.state {
            DriverState::Idle => self.start(),
            DriverState::Running => self.stop(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Whether the host should schedule another frame
    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn average_frequency(&self) -> f32 {
        self.average_frequency
    }

    /// Animate one frame and submit it to the render surface
    ///
    /// Cubes are index-aligned with the spectrum; if their counts differ
    /// nothing is touched and `CollectionMismatch` is returned. Discs use
    /// the first bins of the spectrum; discs beyond the bin count keep
    /// their previous state.
    pub fn frame<S: RenderSurface>(
        &mut self,
        spectrum: &SpectrumSnapshot,
        visualizer: &mut Visualizer,
        context: &mut RenderContext<S>,
    ) -> Result<FrameStats> {
        self.average_frequency = spectrum.average_frequency();

        let bins = &spectrum.magnitudes;
        if visualizer.cubes.len() != bins.len() {
            return Err(VisualizerError::CollectionMismatch {
                cubes: visualizer.cubes.len(),
                bins: bins.len(),
            });
        }

        let mut visible_cubes = 0;
        for (i, (&id, &magnitude)) in visualizer.cubes.iter().zip(bins.iter()).enumerate() {
            let Some(cube) = visualizer.scene.get_mut(id) else {
                continue;
            };
            cube.visible = magnitude != 0;
            cube.scale.x = cube_stretch(magnitude);

            let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
            cube.rotate_z(direction * self.rotate_speed);

            visible_cubes += cube.visible as usize;
        }

        let mut visible_discs = 0;
        for (&id, &magnitude) in visualizer.discs.iter().zip(bins.iter()) {
            let Some(disc) = visualizer.scene.get_mut(id) else {
                continue;
            };
            disc.visible = magnitude != 0;
            disc.scale = disc_scale(magnitude);

            visible_discs += disc.visible as usize;
        }

        context.render(&visualizer.scene)?;
        self.time += 1;

        Ok(FrameStats {
            frame: self.time,
            visible_cubes,
            visible_discs,
        })
    }
}

/// X scale of a cube for a bin magnitude; never below 0.5
pub fn cube_stretch(magnitude: u8) -> f32 {
    (magnitude as f32 / 2.0).max(1.0) / 2.0
}

/// Scale of a disc for a bin magnitude; depth stays flattened at 0.5
pub fn disc_scale(magnitude: u8) -> Vec3 {
    let radial = (magnitude as f32 / 100.0).max(0.01);
    Vec3::new(radial, radial, 0.5)
}
