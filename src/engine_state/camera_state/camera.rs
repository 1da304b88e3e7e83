//! # Camera Implementation
//!
//! A first-person camera for the Z-up world. Yaw turns around the Z axis starting
//! from east (+X), pitch tilts toward +Z. The camera position is the streaming
//! focus and its view vector is the picking ray.

use cgmath::*;
use std::f32::consts::FRAC_PI_2;

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Represents a first-person camera in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation around Z, zero facing east
    pub yaw: Rad<f32>,
    /// Vertical rotation, positive looking up
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use streaming_voxel_world::engine_state::camera_state::Camera;
    ///
    /// let camera = Camera::new(Point3::new(0.0, 0.0, 80.0), Deg(90.0), Deg(-30.0));
    /// assert!(camera.get_view_vec().y > 0.0);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// Gets the camera's forward direction vector.
    ///
    /// # Returns
    /// A normalized 3D vector representing the camera's forward direction
    pub fn get_view_vec(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_cos * yaw_sin, pitch_sin).normalize()
    }

    /// Calculates the view matrix for this camera.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.get_view_vec(), Vector3::unit_z())
    }

    /// Rotates the camera, keeping pitch short of straight up or down.
    pub fn turn<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(&mut self, yaw: Y, pitch: P) {
        self.yaw += yaw.into();
        self.pitch += pitch.into();
        self.clamp_pitch();
    }

    /// Moves the camera horizontally along its yaw.
    pub fn walk(&mut self, distance: f32) {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        self.position += Vector3::new(yaw_cos, yaw_sin, 0.0) * distance;
    }

    fn clamp_pitch(&mut self) {
        // Clamp pitch to prevent gimbal lock
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}
