// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

#![doc = include_str!("../README.md")]

pub mod function;
pub mod properties;
pub mod quirks;

/// The structure to express identifiers of device enumerated in SoundWire bus.
///
/// The fields are fixed at enumeration and never rewritten afterwards. The structure implements
/// std::convert::From<u64> to decode the device address which platform firmware assigns to the
/// device.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdwSlaveId {
    /// The numeric identifier of link to which the device is attached.
    pub link_id: u8,
    /// The version of SoundWire specification supported by the device.
    pub sdw_version: u8,
    /// The identifier to distinguish devices which share the same part identifier in the link.
    pub unique_id: u8,
    /// The identifier of manufacturer assigned by MIPI alliance.
    pub mfg_id: u16,
    /// The identifier of part in scope of the manufacturer.
    pub part_id: u16,
    /// The identifier of device class.
    pub class_id: u8,
}

impl From<u64> for SdwSlaveId {
    fn from(addr: u64) -> Self {
        SdwSlaveId {
            link_id: ((addr >> 48) & 0x0f) as u8,
            sdw_version: ((addr >> 44) & 0x0f) as u8,
            unique_id: ((addr >> 40) & 0x0f) as u8,
            mfg_id: ((addr >> 24) & 0xffff) as u16,
            part_id: ((addr >> 8) & 0xffff) as u16,
            class_id: (addr & 0xff) as u8,
        }
    }
}

impl std::fmt::Display for SdwSlaveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sdw:{:01x}:{:04x}:{:04x}:{:02x}:{:01x}",
            self.link_id, self.mfg_id, self.part_id, self.class_id, self.unique_id
        )
    }
}

/// The structure to express capabilities of SDCA interface advertised by device in SoundWire
/// bus.
///
/// The fields are zero as long as platform firmware attaches no description to the device. They
/// are stored once per device during enumeration, then read-only for later evaluation of quirks.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdcaData {
    /// The revision of SDCA interface implemented by the device, in which the major part is
    /// expressed in the high 16 bits and the minor part is in the low 16 bits. The layout keeps
    /// the order of unsigned integer comparison the same as the order of revisions, thus any
    /// comparison should be done against the whole value instead of the decomposed parts. Zero
    /// is for the case that the device claims no SDCA capability.
    pub interface_revision: u32,
    /// The bit mask in which any set bit stands for the type of SDCA function advertised by the
    /// device. The bit position corresponds to the numeric code of function type.
    pub function_mask: u32,
}
