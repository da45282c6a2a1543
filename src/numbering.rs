// src/numbering.rs
//
// Hierarchical video numbers:
//   main           "123"
//   follow_up      "123.45"   (leading segment of the parent + 2 digits)
//   clarification  "123.45A"  (two-segment parent + one uppercase letter)

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoType {
    Main,
    FollowUp,
    Clarification,
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VideoType::Main => "main",
            VideoType::FollowUp => "follow_up",
            VideoType::Clarification => "clarification",
        };
        f.write_str(name)
    }
}

impl FromStr for VideoType {
    type Err = NumberingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "main" => Ok(VideoType::Main),
            "follow_up" => Ok(VideoType::FollowUp),
            "clarification" => Ok(VideoType::Clarification),
            other => Err(NumberingError::UnknownVideoType(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum NumberingError {
    #[error("Unknown video type '{0}'. Expected main, follow_up or clarification")]
    UnknownVideoType(String),

    #[error("A parent number is required for {0} videos")]
    MissingParent(VideoType),

    #[error("Invalid parent number '{parent}' for {video_type} videos")]
    InvalidParent { parent: String, video_type: VideoType },

    #[error("Invalid hierarchical number '{0}'. Expected NNN, NNN.NN or NNN.NNX")]
    InvalidNumber(String),
}

lazy_static::lazy_static! {
    static ref NUMBER_FORMAT: Regex =
        Regex::new(r"^(?P<main>\d{3})(?:\.(?P<follow>\d{2})(?P<letter>[A-Z])?)?$").unwrap();
}

/// Classify a stored number by its shape: `NNN`, `NNN.NN` or `NNN.NNX`.
pub fn parse_hierarchical_number(number: &str) -> Result<VideoType, NumberingError> {
    let caps = NUMBER_FORMAT
        .captures(number)
        .ok_or_else(|| NumberingError::InvalidNumber(number.to_string()))?;
    Ok(match (caps.name("follow"), caps.name("letter")) {
        (None, _) => VideoType::Main,
        (Some(_), None) => VideoType::FollowUp,
        (Some(_), Some(_)) => VideoType::Clarification,
    })
}

fn is_digits(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}

/// Generate a number for `video_type`. An empty parent counts as missing.
/// Nothing here checks for collisions; callers that persist numbers retry
/// against the database.
pub fn generate_hierarchical_number<R: Rng + ?Sized>(
    video_type: VideoType,
    parent_number: Option<&str>,
    rng: &mut R,
) -> Result<String, NumberingError> {
    let parent = parent_number.map(str::trim).filter(|p| !p.is_empty());

    match video_type {
        VideoType::Main => Ok(format!("{:03}", rng.gen_range(1..=999))),
        VideoType::FollowUp => {
            let parent = parent.ok_or(NumberingError::MissingParent(video_type))?;
            let main_number = parent.split('.').next().unwrap_or_default();
            if !is_digits(main_number) {
                return Err(NumberingError::InvalidParent {
                    parent: parent.to_string(),
                    video_type,
                });
            }
            Ok(format!("{}.{:02}", main_number, rng.gen_range(1..=99)))
        }
        VideoType::Clarification => {
            let parent = parent.ok_or(NumberingError::MissingParent(video_type))?;
            let segments: Vec<&str> = parent.split('.').collect();
            let valid = segments.len() == 2 && is_digits(segments[0]) && is_digits(segments[1]);
            if !valid {
                return Err(NumberingError::InvalidParent {
                    parent: parent.to_string(),
                    video_type,
                });
            }
            let letter = rng.gen_range(b'A'..=b'Z') as char;
            Ok(format!("{}.{}{}", segments[0], segments[1], letter))
        }
    }
}
