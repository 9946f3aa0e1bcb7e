// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::props::DecoderError;

/// Boxed error returned by lifecycle hooks. Same shape as `lambda_runtime::Error`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} has not been set")]
    StateNotSet(&'static str),
    #[error("{kind} validation failed [{}]", validation_details(.errors))]
    Validation {
        kind: ValueKind,
        errors: Vec<DecoderError>,
    },
    #[error("sendResponse ({status_code}): {message}")]
    SendResponse { status_code: u16, message: String },
    #[error("Error serializing JSON payload {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("HTTP client error {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("{0}")]
    IllegalArguments(String),
}

impl Error {
    /// HTTP status observed for a failed callback, `0` when no response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::SendResponse { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// What a decoder was validating, used as the prefix of validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Property,
    Attribute,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Property => f.write_str("property"),
            ValueKind::Attribute => f.write_str("attribute"),
        }
    }
}

fn validation_details(errors: &[DecoderError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.text))
        .collect::<Vec<String>>()
        .join(", ")
}
