// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto
use {
    clap::Parser,
    runtime_core::{cmdline::*, LogLevel},
    snd_sdw_sdca_ctl_service::SdcaRuntime,
    std::path::PathBuf,
};

struct SdcaServiceCmd;

#[derive(Parser, Default)]
#[clap(name = "snd-sdw-sdca-ctl-service")]
struct Arguments {
    /// The path to directory in which firmware description of SoundWire bus is exported.
    bus_dir: PathBuf,

    /// The numeric identifier of sound card to which the bus belongs, used to give context when
    /// reporting failure.
    #[clap(long, short)]
    card_id: Option<u32>,

    /// The level to debug runtime, disabled as a default.
    #[clap(long, short, value_enum)]
    log_level: Option<LogLevel>,
}

impl ServiceCmd<Arguments, (PathBuf, Option<u32>), SdcaRuntime> for SdcaServiceCmd {
    fn params(args: &Arguments) -> ((PathBuf, Option<u32>), Option<LogLevel>) {
        ((args.bus_dir.clone(), args.card_id), args.log_level)
    }
}

fn main() {
    SdcaServiceCmd::run()
}
