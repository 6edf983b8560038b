use std::sync::Arc;

use oneapi_sms::{
    Auth, DeliveryInfoNotification, ListenerError, NotificationKind, OneApiClient,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Local endpoint that prints delivery statuses pushed to it.
///
/// Try it with:
/// `curl -d '{"deliveryInfoNotification":{"deliveryInfo":{"address":"tel:+79251234567","deliveryStatus":"DeliveredToTerminal"}}}' http://127.0.0.1:3000/dlr`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = match std::env::var("ONEAPI_DLR_PUSH_PORT") {
        Ok(port) => port.parse()?,
        Err(_) => 3000,
    };

    // Receiving pushes does not talk to the API; any credentials will do.
    let client = OneApiClient::builder(Auth::basic("demo", "demo")?)
        .dlr_status_push_port(port)
        .build()?;

    client
        .add_push_delivery_status_listener(Arc::new(
            |notification: &DeliveryInfoNotification| -> Result<(), ListenerError> {
                println!(
                    "{}: {} (callback data: {:?})",
                    notification.delivery_info.address,
                    notification.delivery_info.delivery_status.as_str(),
                    notification.callback_data
                );
                Ok(())
            },
        ))
        .await?;

    if let Some(addr) = client.push_receiver_addr(NotificationKind::DeliveryStatus) {
        info!(%addr, "waiting for delivery status pushes; press Ctrl+C to stop");
    }
    tokio::signal::ctrl_c().await?;
    client.shutdown().await;

    Ok(())
}
