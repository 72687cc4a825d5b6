// src/location/serial.rs
//! NMEA receiver on a serial port

use super::{nmea, LocationCallback, LocationEvent, LocationOptions, LocationProvider, SampleFilter, Subscription};
use crate::error::{Result, TrackerError};
use std::{sync::atomic::Ordering, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_serial::SerialPortBuilderExt;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SerialProvider {
    port: String,
    baudrate: u32,
    name: String,
}

impl SerialProvider {
    pub fn new(port: impl Into<String>, baudrate: u32) -> Self {
        let port = port.into();
        let name = format!("serial {} @ {} baud", port, baudrate);
        Self { port, baudrate, name }
    }
}

impl LocationProvider for SerialProvider {
    fn subscribe(&self, options: &LocationOptions, on_event: LocationCallback) -> Subscription {
        let port = self.port.clone();
        let baudrate = self.baudrate;
        let options = *options;

        Subscription::spawn(move |running| async move {
            let serial = match tokio_serial::new(port.as_str(), baudrate)
                .timeout(Duration::from_millis(1000))
                .open_native_async()
            {
                Ok(serial) => serial,
                Err(e) => {
                    on_event(LocationEvent::Error(format!("Failed to open serial port {}: {}", port, e)));
                    return;
                }
            };
            info!("reading NMEA from {} at {} baud", port, baudrate);

            let mut reader = BufReader::new(serial);
            let mut filter = SampleFilter::new(&options);
            let mut line = String::new();

            while running.load(Ordering::Relaxed) {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        on_event(LocationEvent::Error(format!("Serial port {} closed", port)));
                        break;
                    }
                    Ok(_) => {
                        if let Some(coord) = nmea::parse_fix(line.trim(), options.accuracy) {
                            if filter.accept(coord) {
                                on_event(LocationEvent::Fix(coord));
                            }
                        }
                    }
                    Err(e) => {
                        on_event(LocationEvent::Error(format!("Error reading from serial port: {}", e)));
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

/// Names and types of the serial ports on this machine
pub fn list_serial_ports() -> Result<Vec<String>> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| TrackerError::Other(format!("Failed to list serial ports: {}", e)))?;

    Ok(ports
        .into_iter()
        .map(|port| format!("{} - {:?}", port.port_name, port.port_type))
        .collect())
}
