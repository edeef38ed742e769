//! Synthetic hand geometry for tests.

use crate::types::{Finger, Hand, LandmarkPoint};

const WRIST: [f32; 2] = [0.5, 0.8];
const PALM_LENGTH: f32 = 0.1;
const SEGMENT_LENGTH: f32 = 0.05;

#[derive(Clone, Copy, Debug)]
pub enum Pose {
    /// No bend at any knuckle.
    Straight,
    /// 30 degrees at each knuckle.
    Half,
    /// 80 degrees at each knuckle; the tip ends up below the base.
    Folded,
}

impl Pose {
    fn bend_deg(&self) -> f32 {
        match self {
            Pose::Straight => 0.0,
            Pose::Half => 30.0,
            Pose::Folded => 80.0,
        }
    }
}

/// Builds a hand finger by finger. `heading` is the wrist-to-base angle in
/// degrees, counter-clockwise from "right" with up toward the top of the frame.
pub struct HandSketch {
    fingers: [(Pose, f32); 5],
}

impl HandSketch {
    pub fn new() -> Self {
        Self {
            fingers: [(Pose::Folded, 90.0); 5],
        }
    }

    pub fn finger(mut self, finger: Finger, pose: Pose, heading: f32) -> Self {
        self.fingers[finger as usize] = (pose, heading);
        self
    }

    pub fn all(mut self, pose: Pose, heading: f32) -> Self {
        self.fingers = [(pose, heading); 5];
        self
    }

    pub fn build(&self) -> Hand {
        let mut points: Vec<LandmarkPoint> = vec![[WRIST[0], WRIST[1], 0.0]; 21];
        for finger in Finger::ALL {
            let (pose, heading) = self.fingers[finger as usize];
            let mut angle = heading;
            let mut at = step(WRIST, angle, PALM_LENGTH);
            let joints = finger.joint_indices();
            points[joints[0]] = [at[0], at[1], 0.0];
            for joint in &joints[1..] {
                angle -= pose.bend_deg();
                at = step(at, angle, SEGMENT_LENGTH);
                points[*joint] = [at[0], at[1], 0.0];
            }
        }
        Hand::from_points(&points).expect("sketch always has 21 points")
    }
}

fn step(from: [f32; 2], heading_deg: f32, length: f32) -> [f32; 2] {
    let radians = heading_deg.to_radians();
    [
        from[0] + radians.cos() * length,
        from[1] - radians.sin() * length,
    ]
}
