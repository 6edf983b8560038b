use std::io;
use std::sync::Arc;
use std::time::Duration;

use oneapi_sms::{Auth, InboundSmsMessage, ListenerError, OneApiClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let username = std::env::var("ONEAPI_USERNAME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "ONEAPI_USERNAME environment variable is required",
        )
    })?;
    let password = std::env::var("ONEAPI_PASSWORD").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "ONEAPI_PASSWORD environment variable is required",
        )
    })?;

    let client = OneApiClient::builder(Auth::basic(username, password)?)
        .inbound_messages_retrieving_interval(Duration::from_secs(10))
        .build()?;

    client
        .add_pull_inbound_message_listener(Arc::new(
            |message: &InboundSmsMessage| -> Result<(), ListenerError> {
                println!(
                    "{} -> {}: {}",
                    message.sender_address.as_deref().unwrap_or("?"),
                    message.destination_address.as_deref().unwrap_or("?"),
                    message.message
                );
                Ok(())
            },
        ))
        .await?;

    info!("polling for inbound messages; press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    client.shutdown().await;

    Ok(())
}
