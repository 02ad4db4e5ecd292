//! # Localisation module
//!
//! The robot's pose is estimated by an odometry task outside this crate.
//! This module holds the shared record that task writes into and the drive
//! controller reads from.
//!
//! Field frame conventions: `y` is the robot's forward axis at a bearing of
//! zero, bearing increases clockwise (towards `+x`), and is in radians with no
//! range enforced.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The position and bearing of the robot on the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Units: inches
    pub x: f64,

    /// Units: inches
    pub y: f64,

    /// Units: radians
    pub bearing: f64
}

/// A shared handle to the robot's pose.
///
/// Clones share the same pose. The odometry collaborator holds one clone and
/// keeps it up to date, the drive controller holds another.
#[derive(Debug, Clone, Default)]
pub struct PoseStore {
    pose: Arc<RwLock<Pose>>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Create a new pose from a bearing given in degrees.
    pub fn from_degrees(x: f64, y: f64, bearing_deg: f64) -> Self {
        Self {
            x,
            y,
            bearing: bearing_deg.to_radians()
        }
    }

    /// Straight line distance to a point.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }

    /// Bearing of the line from this pose to a point.
    ///
    /// The arguments of `atan2` are swapped from the usual convention, which
    /// gives the angle from the `+y` axis rather than the `+x` axis, i.e. a
    /// bearing.
    pub fn bearing_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).atan2(y - self.y)
    }
}

impl PoseStore {
    /// Create a new store holding the given pose.
    pub fn new(pose: Pose) -> Self {
        Self {
            pose: Arc::new(RwLock::new(pose))
        }
    }

    /// Get a copy of the current pose.
    pub fn get(&self) -> Pose {
        *self.pose.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite the pose.
    pub fn set(&self, pose: Pose) {
        *self.pose.write().unwrap_or_else(PoisonError::into_inner) = pose;
    }

    /// Modify the pose in place.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Pose)
    {
        f(&mut *self.pose.write().unwrap_or_else(PoisonError::into_inner));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_bearing_to() {
        let pose = Pose::default();

        assert_eq!(pose.bearing_to(0.0, 10.0), 0.0);
        assert!((pose.bearing_to(10.0, 0.0) - FRAC_PI_2).abs() < 1e-12);
        assert!((pose.bearing_to(-10.0, 0.0) + FRAC_PI_2).abs() < 1e-12);
        assert!((pose.bearing_to(0.0, -10.0) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_distance_to() {
        let pose = Pose { x: 1.0, y: 1.0, bearing: 0.0 };
        assert_eq!(pose.distance_to(4.0, 5.0), 5.0);
    }

    #[test]
    fn test_store_shared() {
        let store = PoseStore::default();
        let odom = store.clone();

        odom.set(Pose::from_degrees(3.0, 4.0, 90.0));
        let pose = store.get();
        assert_eq!((pose.x, pose.y), (3.0, 4.0));
        assert!((pose.bearing - FRAC_PI_2).abs() < 1e-12);

        odom.update(|p| p.x += 1.0);
        assert_eq!(store.get().x, 4.0);
    }
}
