// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use lambda_runtime::{service_fn, Context, LambdaEvent};
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{BoxError, Error, ValueKind};
use crate::event::CustomResourceEvent;
use crate::physical_id::make_physical_resource_id;
use crate::props::{resource_props, Decoder, SerdeDecoder};
use crate::response::{CustomResourceResponse, ResponseStatus};
use crate::sender::{HttpResponseSender, ResponseSender};
use crate::Result;

const UNKNOWN_ERROR: &str = "unknown error";

/// Provisioning logic for one custom resource type.
///
/// Only `create_resource` is required; updates and deletes default to doing nothing.
/// Hooks read the decoded event through `state` and publish output attributes with
/// [`HandlerState::set_data`].
#[async_trait]
pub trait CustomResource: Send + Sync {
    type Properties: DeserializeOwned + Send + Sync + 'static;
    type Attributes: Serialize + Send + Sync + 'static;

    async fn create_resource(
        &self,
        state: &mut HandlerState<Self::Properties, Self::Attributes>,
        context: &Context,
    ) -> std::result::Result<(), BoxError>;

    async fn update_resource(
        &self,
        _state: &mut HandlerState<Self::Properties, Self::Attributes>,
        _context: &Context,
    ) -> std::result::Result<(), BoxError> {
        Ok(())
    }

    async fn delete_resource(
        &self,
        _state: &mut HandlerState<Self::Properties, Self::Attributes>,
        _context: &Context,
    ) -> std::result::Result<(), BoxError> {
        Ok(())
    }
}

/// Per-invocation state. Fields are filled in by the handler as the event is processed;
/// reading one before it has been set is an error naming the field.
pub struct HandlerState<P, A> {
    logical_resource_id: Option<String>,
    physical_resource_id: Option<String>,
    stack_arn: Option<String>,
    stack_id: Option<String>,
    request_id: Option<String>,
    properties: Option<P>,
    old_properties: Option<P>,
    data: Option<A>,
    encoded_data: Option<Value>,
    status: Option<ResponseStatus>,
    reason: Option<String>,
    no_echo: bool,
}

impl<P, A> HandlerState<P, A> {
    pub(crate) fn new() -> Self {
        HandlerState {
            logical_resource_id: None,
            physical_resource_id: None,
            stack_arn: None,
            stack_id: None,
            request_id: None,
            properties: None,
            old_properties: None,
            data: None,
            encoded_data: None,
            status: None,
            reason: None,
            no_echo: false,
        }
    }

    pub fn logical_resource_id(&self) -> Result<&str> {
        self.logical_resource_id
            .as_deref()
            .ok_or(Error::StateNotSet("logicalResourceId"))
    }

    pub fn physical_resource_id(&self) -> Result<&str> {
        self.physical_resource_id
            .as_deref()
            .ok_or(Error::StateNotSet("physicalResourceId"))
    }

    pub fn stack_arn(&self) -> Result<&str> {
        self.stack_arn
            .as_deref()
            .ok_or(Error::StateNotSet("stackArn"))
    }

    /// The short stack id, i.e. the 6th colon-delimited segment of the stack ARN.
    pub fn stack_id(&self) -> Result<&str> {
        self.stack_id.as_deref().ok_or(Error::StateNotSet("stackId"))
    }

    pub fn request_id(&self) -> Result<&str> {
        self.request_id
            .as_deref()
            .ok_or(Error::StateNotSet("requestId"))
    }

    pub fn properties(&self) -> Result<&P> {
        self.properties
            .as_ref()
            .ok_or(Error::StateNotSet("properties"))
    }

    /// Properties before the update. Only set while handling an `Update` event.
    pub fn old_properties(&self) -> Result<&P> {
        self.old_properties
            .as_ref()
            .ok_or(Error::StateNotSet("oldProperties"))
    }

    pub fn data(&self) -> Option<&A> {
        self.data.as_ref()
    }

    pub fn set_data(&mut self, data: A) {
        self.data = Some(data);
    }

    pub fn no_echo(&self) -> bool {
        self.no_echo
    }

    /// Asks CloudFormation to mask the returned attributes.
    pub fn set_no_echo(&mut self, no_echo: bool) {
        self.no_echo = no_echo;
    }

    pub fn status(&self) -> Option<ResponseStatus> {
        self.status
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Marks the invocation as failed. The last reason given is reported.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = Some(ResponseStatus::Failed);
        self.reason = Some(reason.into());
    }

    pub(crate) fn is_failed(&self) -> bool {
        self.status == Some(ResponseStatus::Failed)
    }

    fn set_stack_arn(&mut self, stack_arn: &str) {
        self.stack_id = stack_arn.split(':').nth(5).map(String::from);
        self.stack_arn = Some(stack_arn.to_string());
    }

    fn response(
        &self,
        event: &CustomResourceEvent,
        status: ResponseStatus,
    ) -> CustomResourceResponse {
        let reason = match status {
            ResponseStatus::Success => self.reason.clone(),
            ResponseStatus::Failed => Some(
                self.reason
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ),
        };
        let common = event.common();

        CustomResourceResponse {
            status,
            reason,
            physical_resource_id: self.physical_resource_id.clone().unwrap_or_default(),
            stack_id: common.stack_id.clone(),
            request_id: common.request_id.clone(),
            logical_resource_id: common.logical_resource_id.clone(),
            no_echo: self.no_echo,
            data: self.encoded_data.clone(),
        }
    }
}

/// Runs a [`CustomResource`] for CloudFormation lifecycle events and reports the outcome.
pub struct CustomResourceHandler<R: CustomResource> {
    resource: R,
    property_decoder: Box<dyn Decoder<R::Properties>>,
    attribute_decoder: Option<Box<dyn Decoder<R::Attributes>>>,
    sender: Arc<dyn ResponseSender>,
}

impl<R: CustomResource> CustomResourceHandler<R> {
    /// Reports through an [`HttpResponseSender`] with default client settings.
    pub fn new(resource: R) -> Self {
        Self::new_with_sender(resource, Arc::new(HttpResponseSender::new()))
    }

    pub fn new_with_sender(resource: R, sender: Arc<dyn ResponseSender>) -> Self {
        CustomResourceHandler {
            resource,
            property_decoder: Box::new(SerdeDecoder::new()),
            attribute_decoder: None,
            sender,
        }
    }

    pub fn with_property_decoder(
        mut self,
        decoder: impl Decoder<R::Properties> + 'static,
    ) -> Self {
        self.property_decoder = Box::new(decoder);
        self
    }

    /// Validates the attributes set by the lifecycle hooks before they are reported.
    pub fn with_attribute_decoder(
        mut self,
        decoder: impl Decoder<R::Attributes> + 'static,
    ) -> Self {
        self.attribute_decoder = Some(Box::new(decoder));
        self
    }

    pub fn with_sender(mut self, sender: Arc<dyn ResponseSender>) -> Self {
        self.sender = sender;
        self
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Handles one lifecycle event. Failures of the resource logic are reported to
    /// CloudFormation as `FAILED`; an error is only returned when even the `FAILED`
    /// response could not be delivered.
    pub async fn execute(&self, event: CustomResourceEvent, context: Context) -> Result<()> {
        let mut state = HandlerState::new();
        let common = event.common();
        debug!(
            "handling {:?} request {} for {}",
            event.request_type(),
            common.request_id,
            common.logical_resource_id
        );

        state.request_id = Some(common.request_id.clone());
        state.physical_resource_id = Some(match event.physical_resource_id() {
            Some(physical_resource_id) => physical_resource_id.to_string(),
            None => make_physical_resource_id(&common.stack_id, &common.logical_resource_id),
        });

        if let Err(err) = self.provision(&event, &context, &mut state).await {
            error!("FAILED: {:?}", err);
            state.fail(err.to_string());
        }

        if !state.is_failed() {
            let response = state.response(&event, ResponseStatus::Success);
            match self.sender.send(event.response_url(), &response).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    error!("FAILED TO SEND RESPONSE: {:?}", err);
                    state.fail(err.to_string());
                }
            }
        }

        let response = state.response(&event, ResponseStatus::Failed);
        self.sender.send(event.response_url(), &response).await
    }

    async fn provision(
        &self,
        event: &CustomResourceEvent,
        context: &Context,
        state: &mut HandlerState<R::Properties, R::Attributes>,
    ) -> std::result::Result<(), BoxError> {
        let common = event.common();
        state.set_stack_arn(&common.stack_id);
        state.logical_resource_id = Some(common.logical_resource_id.clone());
        state.properties = Some(resource_props(
            self.property_decoder.as_ref(),
            &common.resource_properties,
            ValueKind::Property,
        )?);

        match event {
            CustomResourceEvent::Create(_) => self.resource.create_resource(state, context).await?,
            CustomResourceEvent::Update(update) => {
                // missing old properties only fail a hook that reads them
                if !update.old_resource_properties.is_null() {
                    state.old_properties = Some(resource_props(
                        self.property_decoder.as_ref(),
                        &update.old_resource_properties,
                        ValueKind::Property,
                    )?);
                }
                self.resource.update_resource(state, context).await?
            }
            CustomResourceEvent::Delete(_) => self.resource.delete_resource(state, context).await?,
        }

        let mut encoded = state.data.as_ref().map(serde_json::to_value).transpose()?;
        if let Some(decoder) = self.attribute_decoder.as_deref() {
            if let Some(raw) = encoded.take() {
                let validated = resource_props(decoder, &raw, ValueKind::Attribute)?;
                encoded = Some(serde_json::to_value(&validated)?);
                state.data = Some(validated);
            }
        }
        state.encoded_data = encoded;
        Ok(())
    }
}

impl<R> CustomResourceHandler<R>
where
    R: CustomResource,
    R::Attributes: DeserializeOwned,
{
    /// Round-trips the attributes through their `Deserialize` implementation before reporting.
    pub fn validate_attributes(self) -> Self {
        self.with_attribute_decoder(SerdeDecoder::<R::Attributes>::new())
    }
}

impl<R: CustomResource + 'static> CustomResourceHandler<R> {
    /// Registers the handler with the Lambda runtime and serves events until shutdown.
    pub async fn run(self) -> std::result::Result<(), lambda_runtime::Error> {
        let handler = Arc::new(self);
        lambda_runtime::run(service_fn(move |event: LambdaEvent<CustomResourceEvent>| {
            let handler = Arc::clone(&handler);
            async move {
                handler
                    .execute(event.payload, event.context)
                    .await
                    .map_err(lambda_runtime::Error::from)
            }
        }))
        .await
    }
}
