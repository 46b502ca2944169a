use glam::Vec2;
use std::f64::consts::TAU;

/// Smooth pseudo-random flow direction (radians) at `position` and time `t` seconds.
///
/// Product of two phase-drifting waves; `frequency` comes from the DNA. The
/// wave phases are evaluated in f64 so the field keeps moving on long runs.
pub fn flow_angle(position: Vec2, t: f64, frequency: f32) -> f32 {
    let u = (position.x * frequency) as f64 + t * 0.7;
    let v = (position.y * frequency * 0.8) as f64 + t * 0.5;
    (u.sin() * v.cos() * TAU) as f32
}

/// Unit vector along the flow at `position`.
pub fn flow_direction(position: Vec2, t: f64, frequency: f32) -> Vec2 {
    Vec2::from_angle(flow_angle(position, t, frequency))
}
