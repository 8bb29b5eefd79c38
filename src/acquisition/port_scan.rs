// src/acquisition/port_scan.rs
//! Serial port auto-detection

use serialport::{SerialPortInfo, SerialPortType};
use tracing::debug;

use super::AcquisitionError;

/// Find the most likely EMG device port, if any.
///
/// Ranking, highest first:
/// 1. USB modem/serial device nodes (`usbmodem`, `usbserial`);
/// 2. USB ports whose metadata names a known board or bridge chip
///    (Arduino, CH340, FTDI);
/// 3. plain `COM` ports that are not Bluetooth.
pub fn detect_port() -> Result<Option<String>, AcquisitionError> {
    let ports = serialport::available_ports()?;
    debug!(count = ports.len(), "scanned serial ports");
    Ok(rank_ports(&ports))
}

fn rank_ports(ports: &[SerialPortInfo]) -> Option<String> {
    for port in ports {
        let name = port.port_name.to_lowercase();
        if name.contains("usbmodem") || name.contains("usbserial") {
            return Some(port.port_name.clone());
        }
    }

    for port in ports {
        if let SerialPortType::UsbPort(info) = &port.port_type {
            let descriptor = format!(
                "{} {}",
                info.manufacturer.as_deref().unwrap_or(""),
                info.product.as_deref().unwrap_or("")
            )
            .to_lowercase();
            if ["arduino", "ch340", "ftdi"]
                .iter()
                .any(|chip| descriptor.contains(chip))
            {
                return Some(port.port_name.clone());
            }
        }
    }

    for port in ports {
        let name = port.port_name.to_lowercase();
        if port.port_name.starts_with("COM") && !name.contains("bluetooth") {
            return Some(port.port_name.clone());
        }
    }

    None
}
