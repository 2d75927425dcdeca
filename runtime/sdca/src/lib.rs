// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto
pub mod ancillary;
pub mod bus;
pub mod fwnode;
pub mod rt712_model;

use {
    ancillary::*,
    bus::*,
    nix::sys::signal::Signal,
    rt712_model::*,
    runtime_core::{card::*, dispatcher::*, LogLevel, RuntimeOperation, ServiceError},
    soundwire_sdca_protocols::function::FUNCTION_TYPES,
    std::{path::PathBuf, sync::mpsc, time::Duration},
    tracing::{debug, debug_span, error, Level},
};

enum Event {
    Shutdown,
    Timer,
}

pub struct SdcaRuntime {
    bus_dir: PathBuf,
    card: Option<SoundCard>,
    slaves: Vec<SdwSlave>,
    registry: AncillaryBus,
    rx: mpsc::Receiver<Event>,
    tx: mpsc::SyncSender<Event>,
    dispatchers: Vec<Dispatcher>,
}

impl RuntimeOperation<(PathBuf, Option<u32>)> for SdcaRuntime {
    fn new(
        (bus_dir, card_id): (PathBuf, Option<u32>),
        log_level: Option<LogLevel>,
    ) -> Result<Self, ServiceError> {
        if let Some(level) = log_level {
            let fmt_level = match level {
                LogLevel::Debug => Level::DEBUG,
            };
            tracing_subscriber::fmt().with_max_level(fmt_level).init();
        }

        let card = card_id.map(SoundCard::new);

        let enter = debug_span!("detect").entered();
        let slaves = detect_slaves(&bus_dir)?;
        enter.exit();

        // Use uni-directional channel for communication to child threads.
        let (tx, rx) = mpsc::sync_channel(32);

        Ok(SdcaRuntime {
            bus_dir,
            card,
            slaves,
            registry: Default::default(),
            rx,
            tx,
            dispatchers: Default::default(),
        })
    }

    fn listen(&mut self) -> Result<(), ServiceError> {
        self.launch_system_event_dispatcher()?;
        self.launch_rescan_timer()?;

        let enter = debug_span!("register").entered();
        self.registry
            .register_driver(Box::new(Rt712Model::default()));
        for slave in self.slaves.iter() {
            Self::register_slave(&mut self.registry, slave);
        }
        enter.exit();

        Ok(())
    }

    fn run(&mut self) -> Result<(), ServiceError> {
        let enter = debug_span!("event").entered();
        loop {
            let ev = match self.rx.recv() {
                Ok(ev) => ev,
                Err(_) => continue,
            };

            match ev {
                Event::Shutdown => break,
                Event::Timer => self.rescan(),
            }
        }
        enter.exit();

        Ok(())
    }
}

impl Drop for SdcaRuntime {
    fn drop(&mut self) {
        // At first, stop event loop in all of dispatchers to avoid queueing new events.
        for dispatcher in &mut self.dispatchers {
            dispatcher.stop();
        }

        // Next, consume all events in queue to release blocked thread for sender.
        for _ in self.rx.try_iter() {}

        // Finally, finish the dispatcher threads and the bound models.
        self.dispatchers.clear();
        self.registry.unregister_all();
    }
}

impl SdcaRuntime {
    const SYSTEM_DISPATCHER_NAME: &'static str = "system event dispatcher";
    const RESCAN_DISPATCHER_NAME: &'static str = "bus rescan dispatcher";

    const RESCAN_INTERVAL: Duration = Duration::from_secs(5);

    fn launch_system_event_dispatcher(&mut self) -> Result<(), ServiceError> {
        let name = Self::SYSTEM_DISPATCHER_NAME.to_string();
        let tx = self.tx.clone();
        let dispatcher =
            Dispatcher::run_signal_handler(name, &[Signal::SIGINT, Signal::SIGTERM], move |_| {
                let _ = tx.send(Event::Shutdown);
                false
            })?;
        self.dispatchers.push(dispatcher);

        Ok(())
    }

    fn launch_rescan_timer(&mut self) -> Result<(), ServiceError> {
        let name = Self::RESCAN_DISPATCHER_NAME.to_string();
        let tx = self.tx.clone();
        let dispatcher = Dispatcher::run_interval_handler(name, Self::RESCAN_INTERVAL, move || {
            tx.send(Event::Timer).is_ok()
        })?;
        self.dispatchers.push(dispatcher);

        Ok(())
    }

    fn register_slave(registry: &mut AncillaryBus, slave: &SdwSlave) {
        FUNCTION_TYPES
            .iter()
            .filter(|function| slave.sdca.function_mask & function.mask_bit() > 0)
            .for_each(|&function| {
                registry.register_device(AncillaryDevice::new(slave, function, 0));
            });
    }

    fn rescan(&mut self) {
        let _enter = debug_span!("rescan").entered();

        match detect_slaves(&self.bus_dir) {
            Ok(slaves) => {
                let registry = &mut self.registry;
                let departed = &self.slaves;

                departed
                    .iter()
                    .filter(|slave| !slaves.iter().any(|s| s.id == slave.id))
                    .for_each(|slave| {
                        debug!(departed = %slave.id);
                        registry.unregister_devices_of(&slave.id.to_string());
                    });

                slaves
                    .iter()
                    .filter(|slave| !departed.iter().any(|s| s.id == slave.id))
                    .for_each(|slave| {
                        debug!(arrived = %slave.id);
                        Self::register_slave(registry, slave);
                    });

                self.slaves = slaves;
            }
            Err(err) => {
                if let Some(card) = &self.card {
                    card.print_error("Fail to scan SoundWire bus", &err);
                } else {
                    error!("Fail to scan SoundWire bus: {}", err);
                }
            }
        }
    }
}
