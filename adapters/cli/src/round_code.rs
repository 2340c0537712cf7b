#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

const CODE_DOMAIN: &str = "bead";
const CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded round payload.
pub(crate) const CODE_HEADER: &str = "bead:v1";
/// Delimiter used to separate the prefix, the journey/level pair and payload.
const FIELD_DELIMITER: char = ':';

/// Shareable description of one exact round.
///
/// Everything the engine needs to rebuild the identical round: the journey
/// and level select the parameters, the seed replays the generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RoundCode {
    /// One-based journey number within the catalog.
    pub(crate) journey: u32,
    /// One-based level number within the journey.
    pub(crate) level: u32,
    /// Global seed the round was generated from.
    pub(crate) seed: u64,
}

impl RoundCode {
    /// Encodes the round into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableCode { seed: self.seed };
        let json = serde_json::to_vec(&payload).expect("round code serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{CODE_HEADER}:{}x{}:{encoded}", self.journey, self.level)
    }

    /// Decodes a round from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, RoundCodeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RoundCodeError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(RoundCodeError::MissingPrefix)?;
        let version = parts.next().ok_or(RoundCodeError::MissingVersion)?;
        let selection = parts.next().ok_or(RoundCodeError::MissingSelection)?;
        let payload = parts.next().ok_or(RoundCodeError::MissingPayload)?;

        if domain != CODE_DOMAIN {
            return Err(RoundCodeError::InvalidPrefix(domain.to_owned()));
        }
        if version != CODE_VERSION {
            return Err(RoundCodeError::UnsupportedVersion(version.to_owned()));
        }

        let (journey, level) = parse_selection(selection)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(RoundCodeError::InvalidEncoding)?;
        let decoded: SerializableCode =
            serde_json::from_slice(&bytes).map_err(RoundCodeError::InvalidPayload)?;

        Ok(Self {
            journey,
            level,
            seed: decoded.seed,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SerializableCode {
    seed: u64,
}

fn parse_selection(value: &str) -> Result<(u32, u32), RoundCodeError> {
    let invalid = || RoundCodeError::InvalidSelection(value.to_owned());
    let (journey, level) = value.split_once('x').ok_or_else(invalid)?;
    let journey: u32 = journey.parse().map_err(|_| invalid())?;
    let level: u32 = level.parse().map_err(|_| invalid())?;
    if journey == 0 || level == 0 {
        return Err(invalid());
    }
    Ok((journey, level))
}

/// Errors that can occur while decoding shared round codes.
#[derive(Debug)]
pub(crate) enum RoundCodeError {
    EmptyPayload,
    MissingPrefix,
    MissingVersion,
    MissingSelection,
    MissingPayload,
    InvalidPrefix(String),
    UnsupportedVersion(String),
    InvalidSelection(String),
    InvalidEncoding(base64::DecodeError),
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for RoundCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "round code is empty"),
            Self::MissingPrefix => write!(f, "round code is missing its prefix"),
            Self::MissingVersion => write!(f, "round code is missing its version"),
            Self::MissingSelection => write!(f, "round code is missing its journey/level pair"),
            Self::MissingPayload => write!(f, "round code is missing its payload"),
            Self::InvalidPrefix(domain) => write!(f, "unknown round code prefix {domain:?}"),
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported round code version {version:?}")
            }
            Self::InvalidSelection(selection) => {
                write!(f, "invalid journey/level pair {selection:?}")
            }
            Self::InvalidEncoding(error) => write!(f, "round code is not valid base64: {error}"),
            Self::InvalidPayload(error) => write!(f, "round code payload is corrupt: {error}"),
        }
    }
}

impl Error for RoundCodeError {}
