// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

use {
    super::ancillary::{AncillaryDevice, AncillaryDriver},
    runtime_core::ServiceError,
    soundwire_sdca_protocols::quirks::SdcaQuirk,
    tracing::debug,
};

const RT712_MFG_ID: u16 = 0x025d;

const RT712_PART_IDS: &[u16] = &[0x712, 0x713, 0x716, 0x717];

/// The model for smart microphone function of Realtek RT712 family. The VB revision of the
/// silicon requires its own register layout, thus the model selects the layout by quirk
/// evaluation at probe time.
#[derive(Default, Debug)]
pub struct Rt712Model {
    vb_layout: bool,
}

impl AncillaryDriver for Rt712Model {
    fn name(&self) -> &str {
        "rt712-sdca"
    }

    fn id_table(&self) -> &[&str] {
        &["smart-mic"]
    }

    fn probe(&mut self, device: &AncillaryDevice) -> Result<(), ServiceError> {
        let id = &device.slave.id;

        if id.mfg_id != RT712_MFG_ID
            || !RT712_PART_IDS.iter().any(|&part_id| part_id == id.part_id)
        {
            let msg = format!("Device is not for the model: {}", id);
            Err(ServiceError::Probe(msg))
        } else {
            self.vb_layout = SdcaQuirk::Rt712Vb.matches(&device.slave.id, &device.slave.sdca);

            debug!(
                device = device.name.as_str(),
                vb_layout = self.vb_layout,
            );

            Ok(())
        }
    }

    fn remove(&mut self, device: &AncillaryDevice) {
        debug!(device = device.name.as_str(), "removed");
    }
}
