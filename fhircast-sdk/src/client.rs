//! The FHIRcast client facade

use config_store::{ConfigStore, JsonFileBackend};
use fhircast_api::{HubClient, SubscriptionParameters};
use fhircast_discovery::{CapabilityResolver, CapabilitySet, DiscoveryError};
use fhircast_stream::{Connector, Session, SessionManager, SessionUpdate, WebSocketConnector};
use serde_json::json;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::{Result, SdkError};
use crate::settings::{self, VisualMode};
use crate::status::{StatusSink, TracingStatusSink};

/// A FHIRcast hub client
///
/// Holds the subscription parameters being edited, the last discovered hub
/// capabilities and the notification channel session. Failures of the
/// operations below are reported to the [`StatusSink`] and also returned.
///
/// ```rust,no_run
/// use fhircast_sdk::{ClientConfig, FhircastClient, SessionUpdate};
///
/// # async fn run() -> Result<(), fhircast_sdk::SdkError> {
/// let mut client = FhircastClient::new(ClientConfig::default())?;
/// client.parameters_mut().hub_url = "http://localhost:5000/api/hub".to_string();
/// client.parameters_mut().topic = "DrXRay".to_string();
///
/// client.load_capabilities().await?;
/// client.parameters_mut().events.set_all(true);
/// client.subscribe().await?;
///
/// while let Some(update) = client.next_update().await {
///     if let SessionUpdate::Event(event) = update {
///         println!("{} {}", event.id, event.event_name());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct FhircastClient<C: Connector = WebSocketConnector> {
    config: ClientConfig,
    store: ConfigStore,
    resolver: CapabilityResolver,
    hub: HubClient,
    sessions: SessionManager<C>,
    status: Box<dyn StatusSink>,
    parameters: SubscriptionParameters,
    capabilities: Option<CapabilitySet>,
    visual_mode: VisualMode,
}

impl FhircastClient<WebSocketConnector> {
    /// Create a client with settings persisted to a JSON file
    ///
    /// If the settings file cannot be used the client still works, it just
    /// does not remember anything.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let backend = match &config.settings_path {
            Some(path) => JsonFileBackend::open(path),
            None => JsonFileBackend::open_default(),
        };
        let store = match backend {
            Ok(backend) => ConfigStore::probe(backend),
            Err(e) => {
                warn!("Settings will not be persisted: {}", e);
                ConfigStore::unavailable()
            }
        };

        let connector = WebSocketConnector::with_config(&config.session_config());
        Self::with_components(config, store, connector, Box::new(TracingStatusSink))
    }
}

impl<C: Connector> FhircastClient<C> {
    /// Create a client from explicit parts
    pub fn with_components(
        config: ClientConfig,
        store: ConfigStore,
        connector: C,
        status: Box<dyn StatusSink>,
    ) -> Result<Self> {
        config.validate().map_err(SdkError::InvalidConfig)?;

        let http = config.http_client()?;
        let sessions = SessionManager::with_config(connector, &config.session_config());
        let parameters = settings::load_parameters(&store);
        let visual_mode = VisualMode::load(&store);

        Ok(Self {
            resolver: CapabilityResolver::with_client(http.clone()),
            hub: HubClient::with_client(http),
            config,
            store,
            sessions,
            status,
            parameters,
            capabilities: None,
            visual_mode,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn parameters(&self) -> &SubscriptionParameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut SubscriptionParameters {
        &mut self.parameters
    }

    /// Capabilities from the last successful discovery
    pub fn capabilities(&self) -> Option<&CapabilitySet> {
        self.capabilities.as_ref()
    }

    pub fn session(&self) -> &Session {
        self.sessions.session()
    }

    pub fn is_connected(&self) -> bool {
        self.sessions.is_connected()
    }

    /// Fetch the hub's discovery document and reconcile the event selection
    /// with the events it supports.
    pub async fn load_capabilities(&mut self) -> Result<&CapabilitySet> {
        let capabilities = match self.resolver.resolve(&self.parameters.hub_url).await {
            Ok(capabilities) => capabilities,
            Err(DiscoveryError::MissingHubUrl) => {
                self.report("Cannot load well-known without a hub url!", None);
                return Err(DiscoveryError::MissingHubUrl.into());
            }
            Err(e) => {
                self.report(
                    &format!("Failed to retrieve well-known configuration: {}", e),
                    None,
                );
                return Err(e.into());
            }
        };

        self.parameters
            .events
            .reconcile(&capabilities.events_supported);
        Ok(self.capabilities.insert(capabilities))
    }

    /// Persist the parameters, subscribe, and open the notification channel
    /// at the address the hub returns.
    ///
    /// The session is left untouched when the subscribe request fails.
    pub async fn subscribe(&mut self) -> Result<String> {
        settings::save_parameters(&self.store, &self.parameters);

        let address = match self.hub.subscribe(&self.parameters).await {
            Ok(address) => address,
            Err(e) => {
                self.report(&format!("Failed to request subscribe: {}", e), None);
                return Err(e.into());
            }
        };
        info!("Connection will be at {}", address);

        if let Err(e) = self.sessions.open_session(&address).await {
            self.report(
                &format!("Failed to open notification channel: {}", e),
                Some(json!({ "hub.channel.endpoint": address })),
            );
            return Err(e.into());
        }

        Ok(address)
    }

    /// Ask the hub to end the subscription for the current channel.
    ///
    /// The session stays open; the hub is expected to close the channel.
    pub async fn unsubscribe(&mut self) -> Result<()> {
        let result = self
            .hub
            .unsubscribe(&self.parameters, self.sessions.session().channel_address())
            .await;

        if let Err(e) = result {
            self.report(&format!("Failed to request unsubscribe: {}", e), None);
            return Err(e.into());
        }
        Ok(())
    }

    /// Unsubscribe when connected, otherwise subscribe.
    ///
    /// Updates already queued on the channel are applied first, so a close
    /// the hub sent since the last [`FhircastClient::next_update`] counts.
    pub async fn toggle_connection(&mut self) -> Result<()> {
        for update in self.sessions.drain_pending() {
            self.report_update(&update);
        }

        if self.is_connected() {
            self.unsubscribe().await
        } else {
            self.subscribe().await.map(|_| ())
        }
    }

    /// Close the notification channel. Returns false if none was open.
    pub fn disconnect(&mut self) -> bool {
        self.sessions.close_session()
    }

    /// Wait for the next update on the notification channel.
    ///
    /// Returns `None` when no channel is open.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        let update = self.sessions.next_update().await?;
        self.report_update(&update);
        Some(update)
    }

    pub fn visual_mode(&self) -> VisualMode {
        self.visual_mode
    }

    /// Switch between light and dark mode and remember the choice
    pub fn toggle_visual_mode(&mut self) -> VisualMode {
        self.visual_mode = self.visual_mode.toggled();
        self.visual_mode.save(&self.store);
        self.visual_mode
    }

    fn report_update(&self, update: &SessionUpdate) {
        if let SessionUpdate::Disconnected(reason) = update {
            self.report(&format!("Notification channel {}", reason), None);
        }
    }

    fn report(&self, message: &str, data: Option<serde_json::Value>) {
        self.status.add_message(message, data);
    }
}
