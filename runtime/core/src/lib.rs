// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto
pub mod card;
pub mod cmdline;
pub mod dispatcher;

use clap::ValueEnum;

/// The level to debug runtime.
#[derive(ValueEnum, Debug, Copy, Clone, Eq, PartialEq)]
pub enum LogLevel {
    Debug,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Debug
    }
}

pub trait RuntimeOperation<T>: Sized {
    fn new(arg: T, log_level: Option<LogLevel>) -> Result<Self, ServiceError>;
    fn listen(&mut self) -> Result<(), ServiceError>;
    fn run(&mut self) -> Result<(), ServiceError>;
}

/// The enumeration to express error cause of service operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Scan of export for SoundWire bus failed.
    BusScan(std::io::Error),
    /// Launch or stop of event dispatcher failed.
    Dispatcher(String),
    /// Probe of ancillary device failed.
    Probe(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::BusScan(cause) => write!(f, "bus scan: {}", cause),
            ServiceError::Dispatcher(msg) => write!(f, "dispatcher: {}", msg),
            ServiceError::Probe(msg) => write!(f, "probe: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}
