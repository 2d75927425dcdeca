// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! For quirks applied to specific silicon variants, the module includes enumeration and matcher.
//!
//! Each quirk is the conjunction of predicates against the identifiers of device and the cached
//! SDCA capabilities. The set of quirks is closed; any addition is done by extending the
//! enumeration with the corresponding arm in the matcher.

use super::{function::FunctionType, SdcaData, SdwSlaveId};

/// The enumeration to represent quirk for specific silicon variant in SoundWire bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdcaQuirk {
    /// The VB revision of Realtek RT712 conforms to v08r01 draft of SDCA specification and
    /// advertises smart microphone function, while the VA revision conforms to v06r04 draft.
    /// The comparison of interface revision distinguishes them in the shared space of part
    /// identifiers.
    Rt712Vb,
}

const RT712_VB_INTERFACE_REVISION: u32 = 0x0801;

const RT712_VB_MFG_ID: u16 = 0x025d;

const RT712_VB_PART_IDS: &[u16] = &[0x712, 0x713, 0x716, 0x717];

impl SdcaQuirk {
    /// Whether the quirk is applied to the device expressed by the pair of identifiers and
    /// cached capabilities. The evaluation is free from side effects, and any device out of the
    /// conjunction simply goes to the standards-compliant path with negative result.
    pub fn matches(&self, id: &SdwSlaveId, data: &SdcaData) -> bool {
        match self {
            SdcaQuirk::Rt712Vb => {
                data.interface_revision >= RT712_VB_INTERFACE_REVISION
                    && data.function_mask & FunctionType::SmartMic.mask_bit() > 0
                    && id.mfg_id == RT712_VB_MFG_ID
                    && RT712_VB_PART_IDS
                        .iter()
                        .any(|&part_id| part_id == id.part_id)
            }
        }
    }
}
