use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user rating of an assistant response.
///
/// Ratings are recorded in memory on the session and are not persisted
/// anywhere.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    /// The response was helpful.
    Good,

    /// The response was neither helpful nor unhelpful.
    Neutral,

    /// The response was unhelpful.
    Bad,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Good => write!(f, "good"),
            Feedback::Neutral => write!(f, "neutral"),
            Feedback::Bad => write!(f, "bad"),
        }
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "good" => Ok(Feedback::Good),
            "neutral" => Ok(Feedback::Neutral),
            "bad" => Ok(Feedback::Bad),
            other => Err(format!("unrecognized rating: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ratings() {
        assert_eq!("good".parse::<Feedback>(), Ok(Feedback::Good));
        assert_eq!("NEUTRAL".parse::<Feedback>(), Ok(Feedback::Neutral));
        assert_eq!("bad".parse::<Feedback>(), Ok(Feedback::Bad));
        assert!("meh".parse::<Feedback>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for feedback in [Feedback::Good, Feedback::Neutral, Feedback::Bad] {
            assert_eq!(feedback.to_string().parse::<Feedback>(), Ok(feedback));
        }
    }
}
