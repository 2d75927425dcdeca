// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

use {super::ServiceError, tracing::error};

/// The structure for sound card to which hardware in SoundWire bus belongs. The card itself is
/// maintained by the sound subsystem; the structure just gives context when reporting failure
/// of operation.
pub struct SoundCard {
    /// The numeric identifier of sound card in Linux sound subsystem.
    pub index: u32,
}

impl SoundCard {
    pub fn new(index: u32) -> Self {
        SoundCard { index }
    }

    /// Print error of operation for the sound card.
    pub fn print_error(&self, msg: &str, err: &ServiceError) {
        error!("card {}: {}: {}", self.index, msg, err);
    }
}
