// src/location/gpsd.rs
//! gpsd client provider

use super::{LocationCallback, LocationEvent, LocationOptions, LocationProvider, SampleFilter, Subscription};
use crate::{
    error::{Result, TrackerError},
    geo::Coordinate,
};
use serde::Deserialize;
use std::{
    collections::HashMap,
    sync::atomic::Ordering,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct GpsdMessage {
    class: String,
    #[serde(flatten)]
    data: HashMap<String, serde_json::Value>,
}

/// Streams TPV fixes from a gpsd daemon
#[derive(Debug, Clone)]
pub struct GpsdProvider {
    host: String,
    port: u16,
    name: String,
}

impl GpsdProvider {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        let name = format!("gpsd {}:{}", host, port);
        Self { host, port, name }
    }
}

impl LocationProvider for GpsdProvider {
    fn subscribe(&self, options: &LocationOptions, on_event: LocationCallback) -> Subscription {
        let host = self.host.clone();
        let port = self.port;
        let options = *options;

        Subscription::spawn(move |running| async move {
            let mut reader = match connect_gpsd(&host, port).await {
                Ok(reader) => reader,
                Err(e) => {
                    on_event(LocationEvent::Error(e.to_string()));
                    return;
                }
            };
            info!("connected to gpsd at {}:{}", host, port);

            let mut filter = SampleFilter::new(&options);
            let min_mode = options.accuracy.min_gpsd_mode();
            let mut line = String::new();

            while running.load(Ordering::Relaxed) {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        on_event(LocationEvent::Error("gpsd closed the connection".to_string()));
                        break;
                    }
                    Ok(_) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match parse_gpsd_fix(line, min_mode) {
                            Ok(Some(coord)) => {
                                if filter.accept(coord) {
                                    on_event(LocationEvent::Fix(coord));
                                }
                            }
                            Ok(None) => {}
                            Err(e) => on_event(LocationEvent::Error(e.to_string())),
                        }
                    }
                    Err(e) => {
                        on_event(LocationEvent::Error(format!("Error reading from gpsd: {}", e)));
                        break;
                    }
                }
            }
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Connect to a gpsd daemon and enable JSON watch mode
pub async fn connect_gpsd(host: &str, port: u16) -> Result<BufReader<TcpStream>> {
    let mut stream = TcpStream::connect(format!("{}:{}", host, port))
        .await
        .map_err(|e| TrackerError::Connection(format!("Failed to connect to gpsd at {}:{}: {}", host, port, e)))?;

    let watch_cmd = "?WATCH={\"enable\":true,\"json\":true}\n";
    stream
        .write_all(watch_cmd.as_bytes())
        .await
        .map_err(|e| TrackerError::Connection(format!("Failed to send WATCH command: {}", e)))?;

    Ok(BufReader::new(stream))
}

/// Parse one line of gpsd JSON, returning a coordinate for TPV reports with
/// at least `min_mode`. Other message classes yield `Ok(None)`.
pub fn parse_gpsd_fix(line: &str, min_mode: u8) -> Result<Option<Coordinate>> {
    let msg: GpsdMessage = serde_json::from_str(line)
        .map_err(|e| TrackerError::Parse(format!("Failed to parse gpsd JSON: {}", e)))?;

    match msg.class.as_str() {
        "TPV" => Ok(parse_tpv_message(&msg.data, min_mode)),
        "VERSION" => {
            if let Some(release) = msg.data.get("release").and_then(|v| v.as_str()) {
                info!("gpsd version {}", release);
            }
            Ok(None)
        }
        "DEVICES" => {
            if let Some(devices) = msg.data.get("devices").and_then(|v| v.as_array()) {
                debug!("gpsd managing {} device(s)", devices.len());
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// TPV (Time Position Velocity)
fn parse_tpv_message(msg_data: &HashMap<String, serde_json::Value>, min_mode: u8) -> Option<Coordinate> {
    let mode = msg_data.get("mode").and_then(|v| v.as_u64()).unwrap_or(0);
    if mode < min_mode as u64 {
        return None;
    }

    let lat = msg_data.get("lat").and_then(|v| v.as_f64())?;
    let lon = msg_data.get("lon").and_then(|v| v.as_f64())?;
    Some(Coordinate::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TPV: &str = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":3,"time":"2023-01-01T12:00:00.000Z","ept":0.005,"lat":48.117,"lon":11.517,"alt":545.4,"track":10.3797,"speed":0.091}"#;

    #[test]
    fn test_tpv_parsing() {
        let fix = parse_gpsd_fix(TPV, 3).unwrap();
        assert_eq!(fix, Some(Coordinate::new(48.117, 11.517)));
    }

    #[test]
    fn test_tpv_mode_too_low() {
        let two_d = TPV.replace("\"mode\":3", "\"mode\":2");
        assert_eq!(parse_gpsd_fix(&two_d, 3).unwrap(), None);
        assert!(parse_gpsd_fix(&two_d, 2).unwrap().is_some());
    }

    #[test]
    fn test_tpv_without_position() {
        let json = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":1}"#;
        assert_eq!(parse_gpsd_fix(json, 2).unwrap(), None);
    }

    #[test]
    fn test_sky_ignored() {
        let json = r#"{"class":"SKY","device":"/dev/ttyUSB0","hdop":1.2,"satellites":[{"PRN":1,"ss":42,"used":true}]}"#;
        assert_eq!(parse_gpsd_fix(json, 2).unwrap(), None);
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_gpsd_fix(r#"{"invalid": json"#, 2);
        assert!(matches!(result, Err(TrackerError::Parse(_))));
    }
}
