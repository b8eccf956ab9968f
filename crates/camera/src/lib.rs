//! Camera: orbit view, projection, and the screen-to-world ray contract.
//!
//! # Invariants
//! - Camera motion lives outside generation; a world is identical regardless
//!   of where the camera has been.
//! - A ray built from NDC `(0, 0)` passes through the orbit target.

mod orbit;

pub use orbit::{CameraConfig, OrbitCamera};

pub fn crate_info() -> &'static str {
    "planetoid-camera v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("camera"));
    }
}
