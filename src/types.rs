use std::time::Instant;

use thiserror::Error;

pub const LANDMARK_COUNT: usize = 21;

/// One tracked joint in frame coordinates, y growing downward.
pub type LandmarkPoint = [f32; 3];

/// Capture tick handed to the landmark source. Pixel access belongs to the
/// pose model behind [`crate::pipeline::LandmarkSource`].
#[derive(Clone, Debug)]
pub struct Frame {
    pub timestamp: Instant,
}

impl Frame {
    pub fn empty() -> Self {
        Self {
            timestamp: Instant::now(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandError {
    #[error("expected 21 hand landmarks, got {0}")]
    WrongLandmarkCount(usize),
}

/// A single detected hand: the wrist followed by four joints per finger.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl Hand {
    pub fn from_points(points: &[LandmarkPoint]) -> Result<Self, HandError> {
        let points: [LandmarkPoint; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| HandError::WrongLandmarkCount(points.len()))?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[LandmarkPoint; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> LandmarkPoint {
        self.points[0]
    }

    /// Wrist plus the finger's four joints, base to tip.
    pub fn chain(&self, finger: Finger) -> [LandmarkPoint; 5] {
        let [a, b, c, d] = finger.joint_indices();
        [
            self.wrist(),
            self.points[a],
            self.points[b],
            self.points[c],
            self.points[d],
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn joint_indices(&self) -> [usize; 4] {
        match self {
            Finger::Thumb => [1, 2, 3, 4],
            Finger::Index => [5, 6, 7, 8],
            Finger::Middle => [9, 10, 11, 12],
            Finger::Ring => [13, 14, 15, 16],
            Finger::Pinky => [17, 18, 19, 20],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Finger::ALL.into_iter().find(|f| f.label() == label)
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FingerCurl {
    NoCurl,
    HalfCurl,
    FullCurl,
}

impl FingerCurl {
    pub fn label(&self) -> &'static str {
        match self {
            FingerCurl::NoCurl => "no_curl",
            FingerCurl::HalfCurl => "half_curl",
            FingerCurl::FullCurl => "full_curl",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [FingerCurl::NoCurl, FingerCurl::HalfCurl, FingerCurl::FullCurl]
            .into_iter()
            .find(|c| c.label() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FingerDirection {
    VerticalUp,
    VerticalDown,
    HorizontalLeft,
    HorizontalRight,
    DiagonalUpLeft,
    DiagonalUpRight,
    DiagonalDownLeft,
    DiagonalDownRight,
}

impl FingerDirection {
    /// Octants counter-clockwise from "right", 45 degrees apart.
    pub const OCTANTS: [FingerDirection; 8] = [
        FingerDirection::HorizontalRight,
        FingerDirection::DiagonalUpRight,
        FingerDirection::VerticalUp,
        FingerDirection::DiagonalUpLeft,
        FingerDirection::HorizontalLeft,
        FingerDirection::DiagonalDownLeft,
        FingerDirection::VerticalDown,
        FingerDirection::DiagonalDownRight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FingerDirection::VerticalUp => "vertical_up",
            FingerDirection::VerticalDown => "vertical_down",
            FingerDirection::HorizontalLeft => "horizontal_left",
            FingerDirection::HorizontalRight => "horizontal_right",
            FingerDirection::DiagonalUpLeft => "diagonal_up_left",
            FingerDirection::DiagonalUpRight => "diagonal_up_right",
            FingerDirection::DiagonalDownLeft => "diagonal_down_left",
            FingerDirection::DiagonalDownRight => "diagonal_down_right",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::OCTANTS.into_iter().find(|d| d.label() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerFeatures {
    pub curl: FingerCurl,
    pub direction: FingerDirection,
}

/// Curl and direction of every finger, indexed by [`Finger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandFeatures {
    fingers: [FingerFeatures; 5],
}

impl HandFeatures {
    pub fn new(fingers: [FingerFeatures; 5]) -> Self {
        Self { fingers }
    }

    /// Every finger in the same state.
    pub fn uniform(curl: FingerCurl, direction: FingerDirection) -> Self {
        Self::new([FingerFeatures { curl, direction }; 5])
    }

    pub fn finger(&self, finger: Finger) -> FingerFeatures {
        self.fingers[finger.position()]
    }

    pub fn with_finger(
        mut self,
        finger: Finger,
        curl: FingerCurl,
        direction: FingerDirection,
    ) -> Self {
        self.fingers[finger.position()] = FingerFeatures { curl, direction };
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Finger, FingerFeatures)> + '_ {
        Finger::ALL.iter().map(|finger| (*finger, self.finger(*finger)))
    }

    pub fn summary(&self) -> String {
        self.iter()
            .map(|(finger, f)| {
                format!(
                    "{}={}/{}",
                    finger.label(),
                    f.curl.label(),
                    f.direction.label()
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureCandidate {
    pub name: String,
    pub confidence: f32,
}

impl GestureCandidate {
    pub fn display_text(&self) -> String {
        format!("{} ({:.0}%)", self.name, self.confidence * 100.0)
    }
}
