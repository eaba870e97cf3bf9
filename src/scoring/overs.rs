use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Over/ball tally in the conventional "O.B" cricket notation, where the ball
/// component is always in 0..=5. Six legal deliveries wrap into one over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overs {
    completed: u32,
    balls: u32,
}

impl Overs {
    pub fn new(completed: u32, balls: u32) -> Self {
        // Normalize any overflow in the ball component
        Self {
            completed: completed + balls / 6,
            balls: balls % 6,
        }
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn balls(&self) -> u32 {
        self.balls
    }

    /// Counts one legal delivery. Returns true when the over wrapped.
    pub fn add_ball(&mut self) -> bool {
        self.balls += 1;
        if self.balls >= 6 {
            self.completed += 1;
            self.balls = 0;
            true
        } else {
            false
        }
    }

    pub fn add(&self, other: Overs) -> Overs {
        Overs::new(
            self.completed + other.completed,
            self.balls + other.balls,
        )
    }

    pub fn total_balls(&self) -> u32 {
        self.completed * 6 + self.balls
    }

    /// Overs as a run-rate denominator: full overs plus balls/6, NOT the
    /// "5.3" display form read as a decimal.
    pub fn as_decimal(&self) -> f64 {
        f64::from(self.completed) + f64::from(self.balls) / 6.0
    }
}

impl fmt::Display for Overs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.completed, self.balls)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid overs string: {0}")]
pub struct ParseOversError(String);

impl FromStr for Overs {
    type Err = ParseOversError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (completed, balls) = s
            .split_once('.')
            .ok_or_else(|| ParseOversError(s.to_string()))?;
        let completed: u32 = completed
            .parse()
            .map_err(|_| ParseOversError(s.to_string()))?;
        let balls: u32 = balls.parse().map_err(|_| ParseOversError(s.to_string()))?;
        if balls >= 6 {
            return Err(ParseOversError(s.to_string()));
        }
        Ok(Overs { completed, balls })
    }
}

impl Serialize for Overs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Overs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
