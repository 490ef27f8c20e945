// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration and accessory assembly.
//!
//! [`AccessoryRegistry`] turns one [`BridgeConfig`] into the set of accessories
//! the host framework displays. Each accessory carries its own information
//! service, listed first, followed by its functional services.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::accessory::{
    AppLoopSwitch, ClimateSensor, DEFAULT_TIMER_DURATION, HostService, InformationService,
    MediaControl, MomentaryButton, PowerSwitch, RemoteControl, ServiceFactory, ServiceKind,
};
use crate::dispatcher::CommandDispatcher;
use crate::error::{DeviceError, Result};
use crate::protocol::{HttpConfig, Transport};
use crate::telemetry::{TelemetryCache, TelemetryRegistry};

// ============================================================================
// BridgeConfig
// ============================================================================

/// Which accessory groups to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccessoryToggles {
    /// Power, app loop, animation and next-app switches.
    pub matrix: bool,
    /// Temperature and humidity sensors.
    pub sensors: bool,
    /// Television-style remote.
    pub remote: bool,
    /// Speaker-style media control.
    pub media: bool,
}

impl Default for AccessoryToggles {
    fn default() -> Self {
        Self {
            matrix: true,
            sensors: true,
            remote: true,
            media: false,
        }
    }
}

/// Configuration of one bridged display.
///
/// Deserializes from the host's configuration block; every field except
/// `host` (alias `ip`) has a default.
///
/// # Examples
///
/// ```
/// use awtrix_bridge::registry::BridgeConfig;
///
/// let config: BridgeConfig = serde_json::from_str(r#"{"ip": "192.168.1.60", "port": 8080}"#)?;
/// config.validate()?;
///
/// assert_eq!(config.name, "Awtrix");
/// assert_eq!(config.http_config().endpoint(), "http://192.168.1.60:8080/api/v3/basics");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Hostname or IP address of the display.
    #[serde(alias = "ip")]
    pub host: String,
    /// HTTP port.
    pub port: u16,
    /// Endpoint path.
    pub path: String,
    /// Display name of the main accessory.
    pub name: String,
    /// Telemetry poll interval in seconds.
    pub poll_interval_secs: u64,
    /// Duration sent when the remote starts a timer, e.g. `10m`.
    pub timer: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Accessory groups to expose.
    pub accessories: AccessoryToggles,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: HttpConfig::DEFAULT_PORT,
            path: HttpConfig::DEFAULT_PATH.to_string(),
            name: "Awtrix".to_string(),
            poll_interval_secs: TelemetryCache::DEFAULT_INTERVAL.as_secs(),
            timer: DEFAULT_TIMER_DURATION.to_string(),
            request_timeout_ms: 5000,
            accessories: AccessoryToggles::default(),
        }
    }
}

impl BridgeConfig {
    /// Creates a configuration with defaults for `host`.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the HTTP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the telemetry poll interval, rounded up to whole seconds.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_secs = interval.as_secs() + u64::from(interval.subsec_nanos() > 0);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the timer duration used by the remote.
    #[must_use]
    pub fn with_timer(mut self, timer: impl Into<String>) -> Self {
        self.timer = timer.into();
        self
    }

    /// Sets the accessory toggles.
    #[must_use]
    pub fn with_accessories(mut self, accessories: AccessoryToggles) -> Self {
        self.accessories = accessories;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` for an empty host, a zero
    /// poll interval, a zero request timeout or an empty timer duration.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(DeviceError::InvalidConfiguration("host is required".to_string()).into());
        }
        if self.poll_interval_secs == 0 {
            return Err(DeviceError::InvalidConfiguration(
                "poll_interval_secs must be positive".to_string(),
            )
            .into());
        }
        if self.request_timeout_ms == 0 {
            return Err(DeviceError::InvalidConfiguration(
                "request_timeout_ms must be positive".to_string(),
            )
            .into());
        }
        if self.timer.trim().is_empty() {
            return Err(
                DeviceError::InvalidConfiguration("timer must not be empty".to_string()).into(),
            );
        }
        Ok(())
    }

    /// HTTP parameters derived from this configuration.
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(self.host.trim())
            .with_port(self.port)
            .with_path(self.path.as_str())
            .with_timeout(Duration::from_millis(self.request_timeout_ms))
    }

    /// Telemetry poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

// ============================================================================
// AccessoryRegistry
// ============================================================================

/// One accessory as shown by the host, with its services in display order.
pub struct RegisteredAccessory {
    /// Display name.
    pub name: String,
    /// Services, information service first.
    pub services: Vec<Arc<dyn HostService>>,
}

impl RegisteredAccessory {
    /// Service kinds in display order.
    #[must_use]
    pub fn service_kinds(&self) -> Vec<ServiceKind> {
        self.services.iter().map(|s| s.kind()).collect()
    }
}

impl fmt::Debug for RegisteredAccessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredAccessory")
            .field("name", &self.name)
            .field("services", &self.service_kinds())
            .finish()
    }
}

/// The accessories built for one display.
pub struct AccessoryRegistry {
    cache: Arc<TelemetryCache>,
    accessories: Vec<RegisteredAccessory>,
}

impl AccessoryRegistry {
    /// Builds the accessories for `config` over HTTP.
    ///
    /// The telemetry cache is taken from `telemetry`, so registries for the
    /// same endpoint share one polling loop.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new(
        config: &BridgeConfig,
        factory: &dyn ServiceFactory,
        telemetry: &TelemetryRegistry,
    ) -> Result<Self> {
        config.validate()?;
        let client = config.http_config().into_client()?;
        let endpoint = client.endpoint().to_string();
        Self::with_transport(config, &endpoint, Arc::new(client), factory, telemetry)
    }

    /// Builds the accessories over an arbitrary transport.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn with_transport<P>(
        config: &BridgeConfig,
        endpoint: &str,
        transport: Arc<P>,
        factory: &dyn ServiceFactory,
        telemetry: &TelemetryRegistry,
    ) -> Result<Self>
    where
        P: Transport + 'static,
    {
        config.validate()?;

        let cache = telemetry.get_or_start(endpoint, Arc::clone(&transport), config.poll_interval());
        let dispatcher = CommandDispatcher::new(transport);
        let name = config.name.as_str();

        let information = |display: &str| {
            Arc::new(InformationService::new(
                display,
                dispatcher.clone(),
                Arc::clone(&cache),
            ))
            .bind(factory)
        };

        let mut accessories = Vec::new();

        if config.accessories.matrix {
            accessories.push(RegisteredAccessory {
                name: name.to_string(),
                services: vec![
                    information(name),
                    Arc::new(PowerSwitch::new(name, dispatcher.clone())).bind(factory),
                    Arc::new(AppLoopSwitch::new(name, dispatcher.clone())).bind(factory),
                    Arc::new(MomentaryButton::animation(name, dispatcher.clone())).bind(factory),
                    Arc::new(MomentaryButton::next_app(name, dispatcher.clone())).bind(factory),
                ],
            });
        }

        if config.accessories.sensors {
            let display = format!("{name} Temperature");
            accessories.push(RegisteredAccessory {
                services: vec![
                    information(&display),
                    Arc::new(ClimateSensor::temperature(display.as_str(), Arc::clone(&cache)))
                        .bind(factory),
                    Arc::new(ClimateSensor::humidity(display.as_str(), Arc::clone(&cache)))
                        .bind(factory),
                ],
                name: display,
            });
        }

        if config.accessories.remote {
            let display = format!("{name} Remote");
            accessories.push(RegisteredAccessory {
                services: vec![
                    information(&display),
                    Arc::new(RemoteControl::new(
                        display.as_str(),
                        dispatcher.clone(),
                        config.timer.as_str(),
                    ))
                    .bind(factory),
                ],
                name: display,
            });
        }

        if config.accessories.media {
            let display = format!("{name} Media");
            accessories.push(RegisteredAccessory {
                services: vec![
                    information(&display),
                    Arc::new(MediaControl::new(display.as_str(), dispatcher.clone())).bind(factory),
                ],
                name: display,
            });
        }

        tracing::info!(
            endpoint,
            accessories = accessories.len(),
            "Registered display accessories"
        );

        Ok(Self { cache, accessories })
    }

    /// Returns the accessories in registration order.
    #[must_use]
    pub fn accessories(&self) -> &[RegisteredAccessory] {
        &self.accessories
    }

    /// Returns the shared telemetry cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<TelemetryCache> {
        &self.cache
    }
}

impl fmt::Debug for AccessoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessoryRegistry")
            .field("endpoint", &self.cache.endpoint())
            .field("accessories", &self.accessories)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::{Characteristic, CharacteristicValue};
    use crate::error::Error;
    use crate::testing::{RecordingFactory, ScriptedTransport};
    use serde_json::json;

    fn build(
        config: &BridgeConfig,
        telemetry: &TelemetryRegistry,
    ) -> (Arc<ScriptedTransport>, RecordingFactory, AccessoryRegistry) {
        let transport =
            Arc::new(ScriptedTransport::new().with_fallback(json!({"success": true})));
        let factory = RecordingFactory::new();
        let registry = AccessoryRegistry::with_transport(
            config,
            "mem://awtrix",
            Arc::clone(&transport),
            &factory,
            telemetry,
        )
        .unwrap();
        (transport, factory, registry)
    }

    #[test]
    fn config_defaults() {
        let config = BridgeConfig::new("10.0.0.5");
        assert_eq!(config.port, 80);
        assert_eq!(config.path, "/api/v3/basics");
        assert_eq!(config.name, "Awtrix");
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.timer, "10m");
        assert_eq!(config.http_config().timeout(), Duration::from_secs(5));
        assert!(config.accessories.remote);
        assert!(!config.accessories.media);
    }

    #[test]
    fn config_deserializes_with_ip_alias() {
        let config: BridgeConfig = serde_json::from_value(json!({
            "ip": "10.0.0.5",
            "name": "Office",
            "poll_interval_secs": 10,
            "accessories": {"media": true}
        }))
        .unwrap();

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.name, "Office");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert!(config.accessories.media);
        assert!(config.accessories.matrix);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let invalid = |config: BridgeConfig| {
            matches!(
                config.validate(),
                Err(Error::Device(DeviceError::InvalidConfiguration(_)))
            )
        };

        assert!(invalid(BridgeConfig::default()));
        assert!(invalid(
            BridgeConfig::new("10.0.0.5").with_poll_interval(Duration::ZERO)
        ));
        assert!(invalid(BridgeConfig::new("10.0.0.5").with_timer(" ")));
        assert!(invalid(
            BridgeConfig::new("10.0.0.5").with_request_timeout(Duration::ZERO)
        ));
        assert!(invalid(BridgeConfig {
            request_timeout_ms: 0,
            ..BridgeConfig::new("10.0.0.5")
        }));
        assert!(BridgeConfig::new("10.0.0.5").validate().is_ok());
    }

    #[test]
    fn poll_interval_rounds_up_to_seconds() {
        let config = BridgeConfig::new("10.0.0.5").with_poll_interval(Duration::from_millis(1500));
        assert_eq!(config.poll_interval(), Duration::from_secs(2));

        let config = BridgeConfig::new("10.0.0.5").with_poll_interval(Duration::from_millis(500));
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert!(config.validate().is_ok());

        let config = BridgeConfig::new("10.0.0.5").with_poll_interval(Duration::from_secs(45));
        assert_eq!(config.poll_interval(), Duration::from_secs(45));
    }

    #[test]
    fn request_timeout_reaches_http_config() {
        let config =
            BridgeConfig::new("10.0.0.5").with_request_timeout(Duration::from_millis(750));
        assert_eq!(config.http_config().timeout(), Duration::from_millis(750));
    }

    #[tokio::test(start_paused = true)]
    async fn default_accessory_layout() {
        let telemetry = TelemetryRegistry::new();
        let (_, _factory, registry) = build(&BridgeConfig::new("10.0.0.5"), &telemetry);

        let names: Vec<_> = registry.accessories().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Awtrix", "Awtrix Temperature", "Awtrix Remote"]);

        for accessory in registry.accessories() {
            assert_eq!(accessory.service_kinds()[0], ServiceKind::AccessoryInformation);
        }

        assert_eq!(
            registry.accessories()[0].service_kinds(),
            vec![
                ServiceKind::AccessoryInformation,
                ServiceKind::Switch,
                ServiceKind::Switch,
                ServiceKind::Switch,
                ServiceKind::Switch,
            ]
        );
        assert_eq!(
            registry.accessories()[1].service_kinds(),
            vec![
                ServiceKind::AccessoryInformation,
                ServiceKind::TemperatureSensor,
                ServiceKind::HumiditySensor,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn toggles_select_groups() {
        let telemetry = TelemetryRegistry::new();
        let config = BridgeConfig::new("10.0.0.5").with_accessories(AccessoryToggles {
            matrix: false,
            sensors: false,
            remote: false,
            media: true,
        });
        let (_, _factory, registry) = build(&config, &telemetry);

        assert_eq!(registry.accessories().len(), 1);
        assert_eq!(registry.accessories()[0].name, "Awtrix Media");
        assert_eq!(
            registry.accessories()[0].service_kinds(),
            vec![ServiceKind::AccessoryInformation, ServiceKind::SmartSpeaker]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn registries_share_one_cache_per_endpoint() {
        let telemetry = TelemetryRegistry::new();
        let config = BridgeConfig::new("10.0.0.5");
        let (_, _f1, first) = build(&config, &telemetry);
        let (_, _f2, second) = build(&config, &telemetry);

        assert!(Arc::ptr_eq(first.cache(), second.cache()));
        assert_eq!(telemetry.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sensors_read_shared_snapshot() {
        let telemetry = TelemetryRegistry::new();
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(json!({"Temp": 21.34, "Hum": 55.6, "version": "1.2"}));
        let factory = RecordingFactory::new();
        let _registry = AccessoryRegistry::with_transport(
            &BridgeConfig::new("10.0.0.5"),
            "mem://awtrix",
            transport,
            &factory,
            &telemetry,
        )
        .unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        let temperature = factory.find(ServiceKind::TemperatureSensor, None).unwrap();
        let humidity = factory.find(ServiceKind::HumiditySensor, None).unwrap();
        let info = factory.find(ServiceKind::AccessoryInformation, None).unwrap();

        assert_eq!(
            temperature.get(Characteristic::CurrentTemperature).await,
            Some(CharacteristicValue::Float(21.3))
        );
        assert_eq!(
            humidity.get(Characteristic::CurrentRelativeHumidity).await,
            Some(CharacteristicValue::Float(55.6))
        );
        assert_eq!(
            info.get(Characteristic::FirmwareRevision).await,
            Some(CharacteristicValue::Text("1.2".into()))
        );
    }
}
