// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle event sent by CloudFormation to a custom resource provider.
///
/// The variant is selected by the `RequestType` field. `PhysicalResourceId` only exists once
/// the resource has been created, and `OldResourceProperties` only accompanies updates, so
/// both are carried by the variants that have them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "RequestType")]
pub enum CustomResourceEvent {
    Create(CreateRequest),
    Update(UpdateRequest),
    Delete(DeleteRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommonRequest {
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,
    // absent properties decode to null, which the property decoder reports as FAILED
    #[serde(default)]
    pub resource_properties: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
    #[serde(flatten)]
    pub common: CommonRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateRequest {
    #[serde(flatten)]
    pub common: CommonRequest,
    pub physical_resource_id: String,
    #[serde(default)]
    pub old_resource_properties: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    #[serde(flatten)]
    pub common: CommonRequest,
    pub physical_resource_id: String,
}

/// The `RequestType` of an event, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl CustomResourceEvent {
    pub fn request_type(&self) -> RequestType {
        match self {
            CustomResourceEvent::Create(_) => RequestType::Create,
            CustomResourceEvent::Update(_) => RequestType::Update,
            CustomResourceEvent::Delete(_) => RequestType::Delete,
        }
    }

    pub fn common(&self) -> &CommonRequest {
        match self {
            CustomResourceEvent::Create(request) => &request.common,
            CustomResourceEvent::Update(request) => &request.common,
            CustomResourceEvent::Delete(request) => &request.common,
        }
    }

    /// The id CloudFormation already knows the resource by. `None` on `Create`.
    pub fn physical_resource_id(&self) -> Option<&str> {
        match self {
            CustomResourceEvent::Create(_) => None,
            CustomResourceEvent::Update(request) => Some(&request.physical_resource_id),
            CustomResourceEvent::Delete(request) => Some(&request.physical_resource_id),
        }
    }

    pub fn response_url(&self) -> &str {
        &self.common().response_url
    }
}
