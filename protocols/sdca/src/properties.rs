// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! For description attached by platform firmware, the module includes trait and helpers.
//!
//! Platform firmware attaches description to device in SoundWire bus. The description has
//! property with unsigned 32 bit integer for the revision of SDCA interface, as well as child
//! entries each of which describes single SDCA function. SdcaFwNode trait expresses the pair of
//! operations required to retrieve them. The lookup helpers store the retrieved capabilities
//! into SdcaData.
//!
//! The helpers propagate no error. When the property is absent or the content is broken, the
//! corresponding field is left at its prior value; the device then claims no SDCA capability.

use super::{function::FunctionType, SdcaData};

/// The name of property for the revision of SDCA interface.
pub const SDCA_INTERFACE_REVISION_PROP: &str = "mipi-sdw-sdca-interface-revision";

/// The name of property for the type of SDCA function in child entry.
pub const SDCA_FUNCTION_TYPE_PROP: &str = "mipi-sdca-function-type";

/// The trait to express capability of description attached to device by platform firmware.
pub trait SdcaFwNode: Sized {
    /// Read value of property with unsigned 32 bit integer by the given name.
    fn read_u32(&self, name: &str) -> Option<u32>;

    /// Enumerate child entries each of which describes single SDCA function.
    fn functions(&self) -> Vec<Self>;
}

/// Read the revision of SDCA interface from the given node and store it into the cache. The
/// operation is idempotent against the same description.
pub fn lookup_interface_revision<T: SdcaFwNode>(node: &T, data: &mut SdcaData) {
    if let Some(revision) = node.read_u32(SDCA_INTERFACE_REVISION_PROP) {
        data.interface_revision = revision;
    }
}

/// Compose the mask of SDCA function types from child entries of the given node and store it
/// into the cache. The operation is idempotent against the same description.
pub fn lookup_functions<T: SdcaFwNode>(node: &T, data: &mut SdcaData) {
    node.functions().iter().for_each(|entry| {
        if let Some(code) = entry.read_u32(SDCA_FUNCTION_TYPE_PROP) {
            data.function_mask |= FunctionType::from(code).mask_bit();
        }
    });
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default, Debug, Clone)]
    struct TestNode {
        scalars: Vec<(&'static str, u32)>,
        entries: Vec<TestNode>,
    }

    impl SdcaFwNode for TestNode {
        fn read_u32(&self, name: &str) -> Option<u32> {
            self.scalars
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, value)| *value)
        }

        fn functions(&self) -> Vec<Self> {
            self.entries.clone()
        }
    }

    fn function_entry(code: u32) -> TestNode {
        TestNode {
            scalars: vec![(SDCA_FUNCTION_TYPE_PROP, code)],
            entries: Default::default(),
        }
    }

    #[test]
    fn interface_revision_lookup() {
        let node = TestNode {
            scalars: vec![(SDCA_INTERFACE_REVISION_PROP, 0x0801)],
            entries: Default::default(),
        };
        let mut data = SdcaData::default();
        lookup_interface_revision(&node, &mut data);
        assert_eq!(0x0801, data.interface_revision);
    }

    #[test]
    fn absent_interface_revision_keeps_prior_value() {
        let node = TestNode::default();
        let mut data = SdcaData::default();
        lookup_interface_revision(&node, &mut data);
        assert_eq!(0, data.interface_revision);
    }

    #[test]
    fn function_mask_composition() {
        let node = TestNode {
            scalars: Default::default(),
            entries: vec![function_entry(0x01), function_entry(0x03)],
        };
        let mut data = SdcaData::default();
        lookup_functions(&node, &mut data);
        assert_eq!(
            FunctionType::SmartAmp.mask_bit() | FunctionType::SmartMic.mask_bit(),
            data.function_mask
        );
    }

    #[test]
    fn function_entry_without_type_is_ignored() {
        let node = TestNode {
            scalars: Default::default(),
            entries: vec![TestNode::default(), function_entry(0x03)],
        };
        let mut data = SdcaData::default();
        lookup_functions(&node, &mut data);
        assert_eq!(FunctionType::SmartMic.mask_bit(), data.function_mask);
    }

    #[test]
    fn population_is_idempotent() {
        let node = TestNode {
            scalars: vec![(SDCA_INTERFACE_REVISION_PROP, 0x0801)],
            entries: vec![function_entry(0x03), function_entry(0x0a)],
        };

        let mut data = SdcaData::default();
        lookup_interface_revision(&node, &mut data);
        lookup_functions(&node, &mut data);
        let populated_once = data;

        lookup_interface_revision(&node, &mut data);
        lookup_functions(&node, &mut data);
        assert_eq!(populated_once, data);
    }
}
