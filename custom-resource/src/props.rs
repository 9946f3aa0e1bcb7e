// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{Error, ValueKind};
use crate::Result;

/// Field name reported when a failure applies to the whole value.
pub const ROOT_FIELD: &str = "$";

/// A single complaint produced by a [`Decoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderError {
    pub field: String,
    pub text: String,
}

impl DecoderError {
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        DecoderError {
            field: field.into(),
            text: text.into(),
        }
    }
}

/// Turns untyped JSON coming from CloudFormation into a typed value.
pub trait Decoder<T>: Send + Sync {
    fn decode(&self, value: &Value) -> std::result::Result<T, Vec<DecoderError>>;
}

impl<T, F> Decoder<T> for F
where
    F: Fn(&Value) -> std::result::Result<T, Vec<DecoderError>> + Send + Sync,
{
    fn decode(&self, value: &Value) -> std::result::Result<T, Vec<DecoderError>> {
        self(value)
    }
}

/// Decoder backed by the `Deserialize` implementation of `T`.
pub struct SerdeDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeDecoder<T> {
    pub fn new() -> Self {
        SerdeDecoder {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Decoder<T> for SerdeDecoder<T> {
    fn decode(&self, value: &Value) -> std::result::Result<T, Vec<DecoderError>> {
        T::deserialize(value).map_err(|err| {
            let text = err.to_string();
            let field = field_from_message(&text).to_string();
            vec![DecoderError::new(field, text)]
        })
    }
}

// serde names the offending field in backticks for missing/unknown field errors
fn field_from_message(message: &str) -> &str {
    message
        .split('`')
        .nth(1)
        .filter(|field| !field.is_empty())
        .unwrap_or(ROOT_FIELD)
}

/// Validates `value` with `decoder`. This is the only place raw event JSON becomes typed.
pub fn resource_props<T, D>(decoder: &D, value: &Value, kind: ValueKind) -> Result<T>
where
    D: Decoder<T> + ?Sized,
{
    decoder
        .decode(value)
        .map_err(|errors| Error::Validation { kind, errors })
}

#[cfg(test)]
#[path = "props_tests.rs"]
mod props_tests;
