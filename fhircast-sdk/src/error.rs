use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Discovery error: {0}")]
    Discovery(#[from] fhircast_discovery::DiscoveryError),

    #[error("Subscription error: {0}")]
    Subscription(#[from] fhircast_api::SubscriptionError),

    #[error("Connection error: {0}")]
    Connection(#[from] fhircast_stream::ConnectionError),

    #[error("Settings store error: {0}")]
    Store(#[from] config_store::StoreError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SdkError>;
