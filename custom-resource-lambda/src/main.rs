// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use cfn_custom_resource::{CustomResourceHandler, HttpResponseSender};
use cfn_custom_resource_lambda::{Config, RandomName};
use lambda_runtime::Error;
use log::info;
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    SimpleLogger::new().with_level(config.log_level).init()?;
    info!("Starting Custom::RandomName provider with {:?}", &config);

    let sender = HttpResponseSender::with_timeout(config.callback_timeout)?;
    CustomResourceHandler::new_with_sender(RandomName, Arc::new(sender))
        .validate_attributes()
        .run()
        .await
}
