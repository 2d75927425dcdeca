// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto
use {
    snd_sdw_sdca_ctl_service::fwnode::FwNodeDir,
    soundwire_sdca_protocols::{function::*, properties::*, quirks::*, *},
    std::path::PathBuf,
};

const DEVICE_ADDRESS_PROP: &str = "reg";

fn print_node(node: &FwNodeDir) -> Result<(), String> {
    let addr = node.read_u64(DEVICE_ADDRESS_PROP).ok_or_else(|| {
        "Fail to detect device address in the firmware node.".to_string()
    })?;
    let id = SdwSlaveId::from(addr);

    let mut data = SdcaData::default();
    lookup_interface_revision(node, &mut data);
    lookup_functions(node, &mut data);

    println!("SoundWire device:");
    println!("  name: {}", id);
    println!("  link-id: {}", id.link_id);
    println!("  soundwire-version: {}", id.sdw_version);
    println!("  manufacturer-id: 0x{:04x}", id.mfg_id);
    println!("  part-id: 0x{:04x}", id.part_id);
    println!("  class-id: 0x{:02x}", id.class_id);
    println!("  unique-id: {}", id.unique_id);

    println!("SDCA capabilities:");
    println!("  interface-revision: 0x{:08x}", data.interface_revision);
    println!("  functions:");
    FUNCTION_TYPES
        .iter()
        .filter(|function| data.function_mask & function.mask_bit() > 0)
        .for_each(|function| {
            println!("    {} (0x{:02x})", function, u32::from(*function));
        });

    println!("Quirks:");
    let state = if SdcaQuirk::Rt712Vb.matches(&id, &data) {
        "applied"
    } else {
        "not applied"
    };
    println!("  rt712-vb: {}", state);

    Ok(())
}

fn main() {
    let code = std::env::args()
        .nth(1)
        .ok_or_else(|| {
            "The first argument is required for the path to directory of firmware node."
                .to_string()
        })
        .and_then(|arg| {
            let path = PathBuf::from(&arg);
            if !path.is_dir() {
                let label = format!("{} is not directory.", arg);
                Err(label)
            } else {
                print_node(&FwNodeDir::new(&path))
            }
        })
        .map(|_| 0)
        .unwrap_or_else(|msg| {
            eprintln!("{}", msg);
            print_help();
            1
        });

    std::process::exit(code);
}

fn print_help() {
    print!(
        r###"
Usage:
  sdw-sdca-node-parser PATH

  where:
    PATH:       the path to directory in which firmware node of device in SoundWire bus is
                exported. Each property in the node is file with cells of unsigned 32 bit
                integer in big endian order.
"###
    );
}
