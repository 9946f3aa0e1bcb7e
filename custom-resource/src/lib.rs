// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Runtime for AWS CloudFormation custom resources.
//!
//! Implement [`CustomResource`] for a resource type, wrap it in a [`CustomResourceHandler`]
//! and register it with the Lambda runtime through [`CustomResourceHandler::run`]. The handler
//! decodes the lifecycle event, dispatches to the matching hook and always reports a single
//! outcome to the pre-signed `ResponseURL`.

pub mod backoff;
mod errors;
pub mod event;
pub mod handler;
pub mod physical_id;
pub mod props;
pub mod response;
pub mod sender;

pub use crate::errors::{BoxError, Error, ValueKind};
pub use crate::event::{CustomResourceEvent, RequestType};
pub use crate::handler::{CustomResource, CustomResourceHandler, HandlerState};
pub use crate::physical_id::{make_physical_resource_id, make_physical_resource_id_with};
pub use crate::props::{resource_props, Decoder, DecoderError, SerdeDecoder};
pub use crate::response::{CustomResourceResponse, ResponseStatus};
pub use crate::sender::{HttpResponseSender, ResponseSender};
pub use lambda_runtime::Context;

pub type Result<T> = std::result::Result<T, Error>;
