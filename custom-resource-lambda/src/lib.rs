// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use cfn_custom_resource::{BoxError, Context, CustomResource, HandlerState};
use log::{info, LevelFilter};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize};

const DEFAULT_NAME_LENGTH: usize = 12;
const MAX_NAME_LENGTH: usize = 128;
const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 30;

fn default_length() -> usize {
    DEFAULT_NAME_LENGTH
}

// CloudFormation passes every scalar property to custom resources as a string
fn number_or_string<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(usize),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

/// Properties of a `Custom::RandomName` resource.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RandomNameProperties {
    #[serde(rename = "ServiceToken", default)]
    pub service_token: Option<String>,
    #[serde(rename = "Prefix")]
    pub prefix: String,
    #[serde(
        rename = "Length",
        default = "default_length",
        deserialize_with = "number_or_string"
    )]
    pub length: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RandomNameAttributes {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Generates `<Prefix>-<random suffix>` names, e.g. for resources that need globally unique names.
#[derive(Debug, Default)]
pub struct RandomName;

impl RandomName {
    fn generate(
        &self,
        state: &mut HandlerState<RandomNameProperties, RandomNameAttributes>,
    ) -> Result<(), BoxError> {
        let properties = state.properties()?;
        let (prefix, length) = (properties.prefix.clone(), properties.length);
        if length == 0 || length > MAX_NAME_LENGTH {
            state.fail(format!(
                "Length must be between 1 and {MAX_NAME_LENGTH}, got {length}"
            ));
            return Ok(());
        }

        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();
        let name = format!("{}-{}", prefix, suffix.to_lowercase());
        info!("Generated name [{}] for {}", &name, state.logical_resource_id()?);

        state.set_data(RandomNameAttributes { name });
        Ok(())
    }
}

#[async_trait]
impl CustomResource for RandomName {
    type Properties = RandomNameProperties;
    type Attributes = RandomNameAttributes;

    async fn create_resource(
        &self,
        state: &mut HandlerState<RandomNameProperties, RandomNameAttributes>,
        _context: &Context,
    ) -> Result<(), BoxError> {
        self.generate(state)
    }

    async fn update_resource(
        &self,
        state: &mut HandlerState<RandomNameProperties, RandomNameAttributes>,
        _context: &Context,
    ) -> Result<(), BoxError> {
        info!(
            "Replacing name for {} (was prefix [{}])",
            state.physical_resource_id()?,
            state.old_properties()?.prefix
        );
        self.generate(state)
    }
}

/// Runtime settings read from the function's environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: LevelFilter,
    pub callback_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LevelFilter::Info,
            callback_timeout: Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let mut config = Config::default();
        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level
                .parse::<LevelFilter>()
                .map_err(|_| format!("LOG_LEVEL has an invalid value [{level}]"))?;
        }
        if let Some(secs) = lookup("CALLBACK_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                format!("CALLBACK_TIMEOUT_SECS must be a number of seconds, got [{secs}]")
            })?;
            config.callback_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
