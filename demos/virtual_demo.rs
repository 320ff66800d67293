use enocean_bridge::backends::VirtualLink;
use enocean_bridge::{Bridge, BridgeConfig, DeviceAddress, Rocker, RockerDirection};

const CONFIG: &str = r#"
serial_port = "/dev/ttyVIRT0"

[[things]]
uid = "enocean:rocker_switch:hall"
enocean_address = "00:29:F1:B4"

[[things.links]]
channel = "rocker_a"
profile = "jenocean:rocker-to-ONOFF"
item = "Hall_Light"
item_type = "Switch"

[[things.links]]
channel = "rocker_b"
profile = "jenocean:rocker-to-dimmer"
item = "Hall_Dimmer"
item_type = "Dimmer"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = BridgeConfig::from_toml_str(CONFIG)?;
    let link = VirtualLink::new("/dev/ttyVIRT0");
    let (mut bridge, items) = Bridge::start(&config, &link)?;

    let hall: DeviceAddress = "0029F1B4".parse()?;
    for (rocker, direction) in [
        (Rocker::A, RockerDirection::Up),
        (Rocker::A, RockerDirection::Down),
        (Rocker::B, RockerDirection::Up),
        (Rocker::B, RockerDirection::Down),
    ] {
        link.press(hall, rocker, direction);
        link.release(hall, rocker, direction);
    }

    println!("Processed {} trigger(s)", bridge.pump());
    for cmd in items.try_iter() {
        println!("{} <- {}", cmd.item, cmd.command);
    }
    Ok(())
}
