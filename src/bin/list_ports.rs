use anyhow::{Context, Result};
use serialport::SerialPortType;

fn main() -> Result<()> {
    let ports = serialport::available_ports().context("failed to enumerate serial ports")?;
    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }

    for port in ports {
        match port.port_type {
            SerialPortType::UsbPort(info) => println!(
                "{}  USB {:04x}:{:04x} {}",
                port.port_name,
                info.vid,
                info.pid,
                info.product.unwrap_or_default()
            ),
            SerialPortType::PciPort => println!("{}  PCI", port.port_name),
            SerialPortType::BluetoothPort => println!("{}  Bluetooth", port.port_name),
            SerialPortType::Unknown => println!("{}", port.port_name),
        }
    }
    Ok(())
}
