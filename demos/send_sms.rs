use std::io;

use oneapi_sms::{
    Address, Auth, MessageText, OneApiClient, PhoneNumber, SendOptions, SendSms, SenderAddress,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let username = required_env("ONEAPI_USERNAME")?;
    let password = required_env("ONEAPI_PASSWORD")?;
    let sender = required_env("ONEAPI_SENDER")?;
    let phone_raw = required_env("ONEAPI_PHONE")?;
    let message = std::env::var("ONEAPI_MESSAGE")
        .unwrap_or_else(|_| "Hello from the oneapi-sms demo.".to_owned());

    let client = OneApiClient::new(Auth::basic(username, password)?);
    let sender = SenderAddress::new(sender)?;
    let recipient = Address::from(PhoneNumber::parse(None, phone_raw)?);
    let request = SendSms::new(
        sender.clone(),
        vec![recipient],
        MessageText::new(message)?,
        SendOptions::default(),
    )?;

    let request_id = client.send_sms(request).await?;
    info!(request_id = request_id.as_str(), "message accepted");

    let status = client.query_delivery_status(&sender, &request_id).await?;
    for delivery in status.delivery_info {
        println!("{}: {}", delivery.address, delivery.delivery_status.as_str());
    }

    Ok(())
}
