//! Human-readable output for hub messages and settings.

use chrono::{DateTime, Local};
use fhircast_sdk::{
    ConnectMessage, EventMessage, EventSelection, SessionUpdate, SubscriptionParameters,
    VisualMode,
};

/// Options controlling how updates are printed
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Print each context resource as pretty JSON
    pub show_resources: bool,
}

/// Counts of session updates seen while listening
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateStats {
    pub total: u64,
    pub connects: u64,
    pub events: u64,
    pub discarded: u64,
    pub disconnects: u64,
}

impl UpdateStats {
    pub fn update(&mut self, update: &SessionUpdate) {
        self.total += 1;

        match update {
            SessionUpdate::Connect(_) => self.connects += 1,
            SessionUpdate::Event(_) => self.events += 1,
            SessionUpdate::Discarded => self.discarded += 1,
            SessionUpdate::Disconnected(_) => self.disconnects += 1,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Updates: {} total, {} event, {} connect, {} discarded",
            self.total, self.events, self.connects, self.discarded
        )
    }
}

pub fn print_update(update: &SessionUpdate, config: &OutputConfig) {
    match update {
        SessionUpdate::Connect(message) => println!("{}", format_connect(message)),
        SessionUpdate::Event(message) => println!("{}", format_event(message, config)),
        SessionUpdate::Discarded => {}
        SessionUpdate::Disconnected(reason) => println!("Disconnected: {}", reason),
    }
}

pub fn format_connect(message: &ConnectMessage) -> String {
    let mut text = format!("[{}] {}", message.mode, message.topic);
    if !message.events.is_empty() {
        text.push_str(&format!("\n  events: {}", message.events));
    }
    if let Some(lease) = message.lease_seconds {
        text.push_str(&format!("\n  {} second lease", lease));
    }
    text
}

pub fn format_event(message: &EventMessage, config: &OutputConfig) -> String {
    let received = message
        .received_at()
        .map(|ts| {
            DateTime::<Local>::from(ts)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| message.timestamp.clone());

    let mut text = format!(
        "{}\n  ID: {}, received at: {}",
        message.event_name(),
        message.id,
        received
    );

    for entry in &message.event.context {
        let key = entry.key.as_deref().unwrap_or("-");
        let reference = entry
            .reference()
            .or_else(|| entry.resource_type().map(str::to_string))
            .unwrap_or_else(|| "(unknown resource)".to_string());
        text.push_str(&format!("\n  {}: {}", key, reference));

        if config.show_resources {
            if let Ok(json) = serde_json::to_string_pretty(&entry.resource) {
                for line in json.lines() {
                    text.push_str(&format!("\n      {}", line));
                }
            }
        }
    }

    text
}

pub fn format_selection(events: &EventSelection) -> String {
    if events.is_empty() {
        return "No supported events".to_string();
    }

    let mut text = String::from("Events:");
    for (name, selected) in events.iter() {
        text.push_str(&format!("\n  [{}] {}", if selected { "x" } else { " " }, name));
    }
    text
}

pub fn format_settings(params: &SubscriptionParameters, mode: VisualMode) -> String {
    let or_unset = |value: &str| {
        if value.is_empty() {
            "(not set)".to_string()
        } else {
            value.to_string()
        }
    };

    let lease = params
        .lease()
        .map(|lease| format!("{}s", lease))
        .unwrap_or_else(|| "(hub default)".to_string());
    let token = if params.bearer_token().is_some() {
        "(set)"
    } else {
        "(not set)"
    };
    let mode = if mode.is_dark() { "dark" } else { "light" };

    format!(
        "Hub URL:         {}\nTopic:           {}\nLease:           {}\nSubscriber name: {}\nBearer token:    {}\nVisual mode:     {}\n{}",
        or_unset(&params.hub_url),
        or_unset(&params.topic),
        lease,
        or_unset(&params.subscriber_name),
        token,
        mode,
        format_selection(&params.events)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhircast_sdk::DisconnectReason;

    fn event(json: &str) -> EventMessage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_format_event_with_context() {
        let message = event(
            r#"{"id":"evt-1","timestamp":"not a time","event":{"hub.event":"patient-open","context":[
                {"key":"patient","resource":{"resourceType":"Patient","id":"pat-1"}},
                {"resource":{"resourceType":"Encounter"}}
            ]}}"#,
        );

        let text = format_event(&message, &OutputConfig::default());
        assert_eq!(
            text,
            "patient-open\n  ID: evt-1, received at: not a time\n  patient: Patient/pat-1\n  -: Encounter"
        );
    }

    #[test]
    fn test_format_connect() {
        let message = ConnectMessage {
            mode: "subscribe".to_string(),
            topic: "DrXRay".to_string(),
            events: "patient-open".to_string(),
            lease_seconds: Some(300),
        };
        assert_eq!(
            format_connect(&message),
            "[subscribe] DrXRay\n  events: patient-open\n  300 second lease"
        );
    }

    #[test]
    fn test_format_selection() {
        let mut events = EventSelection::from_supported(&["patient-open", "patient-close"]);
        events.set("patient-close", true);

        assert_eq!(
            format_selection(&events),
            "Events:\n  [ ] patient-open\n  [x] patient-close"
        );
        assert_eq!(format_selection(&EventSelection::new()), "No supported events");
    }

    #[test]
    fn test_format_settings_hides_token() {
        let mut params = SubscriptionParameters::new("http://hub", "DrXRay");
        params.bearer_token = "secret".to_string();

        let text = format_settings(&params, VisualMode::Dark);
        assert!(!text.contains("secret"));
        assert!(text.contains("Bearer token:    (set)"));
        assert!(text.contains("Lease:           (hub default)"));
        assert!(text.contains("Visual mode:     dark"));
    }

    #[test]
    fn test_stats() {
        let mut stats = UpdateStats::default();
        stats.update(&SessionUpdate::Discarded);
        stats.update(&SessionUpdate::Event(event(
            r#"{"id":"evt-1","event":{"hub.event":"patient-open"}}"#,
        )));
        stats.update(&SessionUpdate::Disconnected(DisconnectReason::Requested));

        assert_eq!(stats.total, 3);
        assert_eq!(stats.events, 1);
        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.disconnects, 1);
        assert_eq!(
            stats.summary(),
            "Updates: 3 total, 1 event, 0 connect, 1 discarded"
        );
    }
}
