// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! For devices enumerated in SoundWire bus, the module includes structure and scan operation.
//!
//! The export of bus has one child directory per device. The directory carries the property for
//! device address from which the identifiers are decoded, as well as the description for SDCA
//! capabilities. The scan populates the capabilities once per detected device, before the
//! device is published to any consumer.

use {
    super::fwnode::FwNodeDir,
    runtime_core::ServiceError,
    soundwire_sdca_protocols::{properties::*, SdcaData, SdwSlaveId},
    std::{fs, path::Path},
    tracing::debug,
};

/// The name of property for device address assigned by platform firmware.
const DEVICE_ADDRESS_PROP: &str = "reg";

/// The structure to express device enumerated in SoundWire bus with its cached SDCA
/// capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdwSlave {
    pub id: SdwSlaveId,
    pub sdca: SdcaData,
}

/// Scan the given directory of bus export and build the list of detected devices. The entry
/// without device address is not device node and just skipped, while absence of SDCA
/// description leaves the capabilities zero.
pub fn detect_slaves(bus_dir: &Path) -> Result<Vec<SdwSlave>, ServiceError> {
    let mut slaves = Vec::new();

    fs::read_dir(bus_dir)
        .map_err(ServiceError::BusScan)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .for_each(|entry| {
            let node = FwNodeDir::new(&entry.path());
            if let Some(addr) = node.read_u64(DEVICE_ADDRESS_PROP) {
                let id = SdwSlaveId::from(addr);

                let mut sdca = SdcaData::default();
                lookup_interface_revision(&node, &mut sdca);
                lookup_functions(&node, &mut sdca);

                debug!(
                    name = %id,
                    interface_revision = sdca.interface_revision,
                    function_mask = sdca.function_mask,
                );

                slaves.push(SdwSlave { id, sdca });
            }
        });

    Ok(slaves)
}

#[cfg(test)]
mod test {
    use {
        super::*,
        std::{env, io::Write, path::PathBuf},
    };

    fn prepare_bus_dir(label: &str) -> PathBuf {
        let root = env::temp_dir().join(format!("bus-test-{}-{}", label, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        root
    }

    fn write_cells(dir: &Path, name: &str, cells: &[u32]) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        cells
            .iter()
            .for_each(|cell| f.write_all(&cell.to_be_bytes()).unwrap());
    }

    #[test]
    fn slave_detection_and_population() {
        let root = prepare_bus_dir("populate");

        let node_dir = root.join("codec@0");
        fs::create_dir_all(&node_dir).unwrap();
        // Device address for link 0, version 3, manufacturer 0x025d, part 0x0712, class 0x01.
        write_cells(&node_dir, DEVICE_ADDRESS_PROP, &[0x00000302, 0x5d071201]);
        write_cells(&node_dir, SDCA_INTERFACE_REVISION_PROP, &[0x0801]);
        let func_dir = node_dir.join("mipi-sdca-function@1");
        fs::create_dir_all(&func_dir).unwrap();
        write_cells(&func_dir, SDCA_FUNCTION_TYPE_PROP, &[0x03]);

        // The node without device address is not device node.
        fs::create_dir_all(root.join("frame-shape")).unwrap();

        let slaves = detect_slaves(&root).unwrap();
        assert_eq!(1, slaves.len());
        assert_eq!(0x025d, slaves[0].id.mfg_id);
        assert_eq!(0x0712, slaves[0].id.part_id);
        assert_eq!(0x0801, slaves[0].sdca.interface_revision);
        assert_eq!(0x00000008, slaves[0].sdca.function_mask);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn slave_without_sdca_description_keeps_zero() {
        let root = prepare_bus_dir("zero");

        let node_dir = root.join("codec@1");
        fs::create_dir_all(&node_dir).unwrap();
        write_cells(&node_dir, DEVICE_ADDRESS_PROP, &[0x00001001, 0xfa030200]);

        let slaves = detect_slaves(&root).unwrap();
        assert_eq!(1, slaves.len());
        assert_eq!(0, slaves[0].sdca.interface_revision);
        assert_eq!(0, slaves[0].sdca.function_mask);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_bus_dir_is_error() {
        let root = env::temp_dir().join(format!("bus-test-missing-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        assert!(detect_slaves(&root).is_err());
    }
}
