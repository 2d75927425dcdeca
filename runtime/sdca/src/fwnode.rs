// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! For firmware node exported to directory, the module includes structure and trait
//! implementation.
//!
//! Platform firmware describes device in SoundWire bus as node with properties. The node is
//! exported to file system as directory in which each property is file with cells of unsigned
//! 32 bit integer in big endian order, and each SDCA function is child directory. The module
//! interprets the export. Any missing or broken file degrades to absent property.

use {
    soundwire_sdca_protocols::properties::SdcaFwNode,
    std::{
        fs,
        io::Read,
        path::{Path, PathBuf},
    },
};

/// The name prefix of child directory for SDCA function.
const FUNCTION_NODE_PREFIX: &str = "mipi-sdca-function@";

/// The structure for firmware node exported to directory in file system.
#[derive(Debug, Clone)]
pub struct FwNodeDir {
    path: PathBuf,
}

impl FwNodeDir {
    pub fn new(path: &Path) -> Self {
        FwNodeDir {
            path: path.to_path_buf(),
        }
    }

    /// The name of node in file system.
    pub fn name(&self) -> Option<String> {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.to_string())
    }

    fn read_raw(&self, name: &str, len: usize) -> Option<Vec<u8>> {
        let mut raw = Vec::new();
        fs::File::open(self.path.join(name))
            .ok()?
            .read_to_end(&mut raw)
            .ok()?;
        if raw.len() != len {
            None
        } else {
            Some(raw)
        }
    }

    /// Read value of property with unsigned 64 bit integer in two cells, by the given name.
    pub fn read_u64(&self, name: &str) -> Option<u64> {
        self.read_raw(name, 8).map(|raw| {
            let mut octlet = [0; 8];
            octlet.copy_from_slice(&raw[..8]);
            u64::from_be_bytes(octlet)
        })
    }
}

impl SdcaFwNode for FwNodeDir {
    fn read_u32(&self, name: &str) -> Option<u32> {
        self.read_raw(name, 4).map(|raw| {
            let mut quadlet = [0; 4];
            quadlet.copy_from_slice(&raw[..4]);
            u32::from_be_bytes(quadlet)
        })
    }

    fn functions(&self) -> Vec<Self> {
        fs::read_dir(&self.path)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| {
                        entry
                            .file_name()
                            .to_str()
                            .map(|name| name.starts_with(FUNCTION_NODE_PREFIX))
                            .unwrap_or(false)
                    })
                    .filter(|entry| entry.path().is_dir())
                    .map(|entry| FwNodeDir::new(&entry.path()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
