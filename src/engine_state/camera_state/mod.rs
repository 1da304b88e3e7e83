//! # Camera State Management
//!
//! The camera drives the world: its position is the streaming focus and its view
//! vector is the ray used to pick the block under the crosshair.

mod camera;

pub use camera::Camera;
