use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use p1mon::telegram::Telegram;
use rumqttc::{Client, MqttOptions, QoS};
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;

/// JSON document published for every telegram.
#[derive(Debug, Serialize)]
pub struct TelegramPayload<'a> {
    pub received_at: String,
    #[serde(flatten)]
    pub telegram: &'a Telegram,
}

impl<'a> TelegramPayload<'a> {
    pub fn new(telegram: &'a Telegram) -> Self {
        Self {
            received_at: Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            telegram,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize telegram to JSON")
    }
}

/// Publish a telegram as JSON to the configured MQTT broker, QoS 0.
pub fn publish_telegram(config: &Config, telegram: &Telegram) -> Result<()> {
    let payload = TelegramPayload::new(telegram).to_json()?;

    let mut opts = MqttOptions::new(&config.mqtt_client_id, &config.mqtt_host, config.mqtt_port);
    opts.set_keep_alive(Duration::from_secs(60));

    let (client, mut connection) = Client::new(opts, 10);

    client
        .publish(
            &config.mqtt_topic,
            QoS::AtMostOnce,
            false,
            payload.as_bytes(),
        )
        .context("Failed to queue MQTT publish")?;

    // rumqttc requires driving the event loop to actually send the packet
    for event in connection.iter() {
        match event {
            Ok(rumqttc::Event::Outgoing(rumqttc::Outgoing::Publish(_))) => {
                info!(
                    "Published telegram from {} to {} on {}:{}",
                    telegram.device, config.mqtt_topic, config.mqtt_host, config.mqtt_port
                );
                break;
            }
            Ok(rumqttc::Event::Outgoing(rumqttc::Outgoing::Disconnect)) => break,
            Err(e) => return Err(anyhow::anyhow!("MQTT connection error: {}", e)),
            _ => continue,
        }
    }

    client.disconnect().ok();
    Ok(())
}
