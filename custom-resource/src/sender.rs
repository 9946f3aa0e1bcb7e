// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use log::{error, info};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};

use crate::errors::Error;
use crate::response::CustomResourceResponse;
use crate::Result;

/// Delivers the final response of an invocation to CloudFormation.
#[async_trait]
pub trait ResponseSender: Send + Sync {
    async fn send(&self, url: &str, response: &CustomResourceResponse) -> Result<()>;
}

/// [`ResponseSender`] that PUTs the JSON body to the pre-signed `ResponseURL`.
#[derive(Debug, Clone)]
pub struct HttpResponseSender {
    client: reqwest::Client,
}

impl HttpResponseSender {
    pub fn new() -> Self {
        HttpResponseSender {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpResponseSender { client })
    }

    async fn write_response(&self, url: &str, response: &CustomResourceResponse) -> Result<()> {
        let body = serde_json::to_vec(response)?;
        info!(
            "writing custom resource response to {} {}",
            url,
            serde_json::to_string_pretty(response)?
        );
        self.put(url, body).await
    }

    async fn put(&self, url: &str, body: Vec<u8>) -> Result<()> {
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await
            .map_err(|err| Error::SendResponse {
                status_code: 0,
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| Error::SendResponse {
            status_code: status.as_u16(),
            message: format!("the response was closed prematurely: {err}"),
        })?;

        info!("received http response {}", status.as_u16());
        if body.is_empty() {
            info!("[no body]");
        } else {
            info!("{}", String::from_utf8_lossy(&body));
        }

        if !status.is_success() {
            return Err(Error::SendResponse {
                status_code: status.as_u16(),
                message: "unexpected status code".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for HttpResponseSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseSender for HttpResponseSender {
    async fn send(&self, url: &str, response: &CustomResourceResponse) -> Result<()> {
        let result = self.write_response(url, response).await;

        if let Err(err) = &result {
            error!("error while writing custom resource response {}", err);
        }
        info!("writing custom resource response done");
        result
    }
}

#[cfg(test)]
#[path = "sender_tests.rs"]
mod sender_tests;
