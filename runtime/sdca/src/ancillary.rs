// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! For logical devices split from physical device, the module includes structures and trait.
//!
//! Physical device in SoundWire bus advertises several SDCA functions, while each function is
//! driven by its own logic. The module keeps thin registry in which logical device per function
//! is registered against the physical device, and driver is bound to the device when any name
//! in its table is matched. The registry performs no deferred probe; the driver which refuses
//! the device at probe is left unbound.

use {
    super::bus::SdwSlave,
    runtime_core::ServiceError,
    soundwire_sdca_protocols::function::FunctionType,
    tracing::debug,
};

/// The structure to express logical device registered against physical device in SoundWire bus.
#[derive(Debug, Clone)]
pub struct AncillaryDevice {
    /// The name unique in the registry, in the form of "parent.function.instance".
    pub name: String,
    /// The name matched against table of driver.
    pub match_name: String,
    /// The type of SDCA function for which the device is split.
    pub function: FunctionType,
    /// The physical device with its identifiers and cached SDCA capabilities.
    pub slave: SdwSlave,
}

impl AncillaryDevice {
    pub fn new(slave: &SdwSlave, function: FunctionType, instance: u32) -> Self {
        let match_name = function.name().to_string();
        let name = format!("{}.{}.{}", slave.id, match_name, instance);
        AncillaryDevice {
            name,
            match_name,
            function,
            slave: slave.clone(),
        }
    }
}

/// The trait for driver of logical device.
pub trait AncillaryDriver {
    /// The name of driver.
    fn name(&self) -> &str;

    /// The table of match names to which the driver responds.
    fn id_table(&self) -> &[&str];

    /// Begin to drive the device. The driver is allowed to refuse the device here; then it is
    /// left unbound without error propagation to the registry.
    fn probe(&mut self, device: &AncillaryDevice) -> Result<(), ServiceError>;

    /// Finish driving the device.
    fn remove(&mut self, device: &AncillaryDevice);
}

/// The structure for registry of logical devices and their drivers.
#[derive(Default)]
pub struct AncillaryBus {
    drivers: Vec<Box<dyn AncillaryDriver>>,
    devices: Vec<(AncillaryDevice, Option<usize>)>,
}

impl AncillaryBus {
    /// Register the driver, binding it to any device which is not bound yet and matches the
    /// table.
    pub fn register_driver(&mut self, mut driver: Box<dyn AncillaryDriver>) {
        let index = self.drivers.len();

        self.devices.iter_mut().for_each(|(device, bound)| {
            if bound.is_none() && Self::match_id_table(driver.as_ref(), device) {
                *bound = Self::probe_device(driver.as_mut(), device).map(|_| index);
            }
        });

        self.drivers.push(driver);
    }

    /// Register the device, binding the first registered driver which matches and accepts it.
    pub fn register_device(&mut self, device: AncillaryDevice) {
        let bound = self
            .drivers
            .iter_mut()
            .enumerate()
            .find_map(|(index, driver)| {
                if Self::match_id_table(driver.as_ref(), &device) {
                    Self::probe_device(driver.as_mut(), &device).map(|_| index)
                } else {
                    None
                }
            });

        self.devices.push((device, bound));
    }

    /// Unregister devices of the physical device expressed by the given name, with removal from
    /// bound drivers.
    pub fn unregister_devices_of(&mut self, parent_name: &str) {
        let prefix = format!("{}.", parent_name);
        let drivers = &mut self.drivers;

        self.devices.retain(|(device, bound)| {
            if device.name.starts_with(&prefix) {
                if let Some(index) = bound {
                    drivers[*index].remove(device);
                }
                false
            } else {
                true
            }
        });
    }

    /// Unregister every device, with removal from bound drivers.
    pub fn unregister_all(&mut self) {
        let drivers = &mut self.drivers;

        self.devices.drain(..).for_each(|(device, bound)| {
            if let Some(index) = bound {
                drivers[index].remove(&device);
            }
        });
    }

    /// The count of devices bound to any driver.
    pub fn bound_device_count(&self) -> usize {
        self.devices
            .iter()
            .filter(|(_, bound)| bound.is_some())
            .count()
    }

    fn match_id_table(driver: &dyn AncillaryDriver, device: &AncillaryDevice) -> bool {
        driver
            .id_table()
            .iter()
            .any(|name| *name == device.match_name)
    }

    fn probe_device(driver: &mut dyn AncillaryDriver, device: &AncillaryDevice) -> Option<()> {
        match driver.probe(device) {
            Ok(()) => Some(()),
            Err(err) => {
                debug!(
                    driver = driver.name(),
                    device = device.name.as_str(),
                    "{}",
                    err
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        soundwire_sdca_protocols::{SdcaData, SdwSlaveId},
        std::{cell::RefCell, rc::Rc},
    };

    fn test_slave(part_id: u16) -> SdwSlave {
        SdwSlave {
            id: SdwSlaveId {
                mfg_id: 0x025d,
                part_id,
                ..Default::default()
            },
            sdca: SdcaData::default(),
        }
    }

    struct TestDriver {
        log: Rc<RefCell<Vec<String>>>,
        refuse: bool,
    }

    impl TestDriver {
        fn new(log: &Rc<RefCell<Vec<String>>>, refuse: bool) -> Self {
            TestDriver {
                log: log.clone(),
                refuse,
            }
        }
    }

    impl AncillaryDriver for TestDriver {
        fn name(&self) -> &str {
            "test-driver"
        }

        fn id_table(&self) -> &[&str] {
            &["smart-mic"]
        }

        fn probe(&mut self, device: &AncillaryDevice) -> Result<(), ServiceError> {
            if self.refuse {
                Err(ServiceError::Probe("refused".to_string()))
            } else {
                self.log.borrow_mut().push(format!("probe:{}", device.name));
                Ok(())
            }
        }

        fn remove(&mut self, device: &AncillaryDevice) {
            self.log
                .borrow_mut()
                .push(format!("remove:{}", device.name));
        }
    }

    #[test]
    fn device_bound_to_matched_driver() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = AncillaryBus::default();
        bus.register_driver(Box::new(TestDriver::new(&log, false)));

        bus.register_device(AncillaryDevice::new(
            &test_slave(0x0712),
            FunctionType::SmartMic,
            0,
        ));
        bus.register_device(AncillaryDevice::new(
            &test_slave(0x0712),
            FunctionType::Hid,
            0,
        ));

        assert_eq!(1, bus.bound_device_count());
        assert_eq!(
            vec!["probe:sdw:0:025d:0712:00:0.smart-mic.0".to_string()],
            *log.borrow()
        );
    }

    #[test]
    fn driver_bound_to_registered_devices() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = AncillaryBus::default();
        bus.register_device(AncillaryDevice::new(
            &test_slave(0x0712),
            FunctionType::SmartMic,
            0,
        ));
        assert_eq!(0, bus.bound_device_count());

        bus.register_driver(Box::new(TestDriver::new(&log, false)));
        assert_eq!(1, bus.bound_device_count());
    }

    #[test]
    fn refused_device_left_unbound() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = AncillaryBus::default();
        bus.register_driver(Box::new(TestDriver::new(&log, true)));

        bus.register_device(AncillaryDevice::new(
            &test_slave(0x0712),
            FunctionType::SmartMic,
            0,
        ));

        assert_eq!(0, bus.bound_device_count());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unregistration_removes_bound_devices() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = AncillaryBus::default();
        bus.register_driver(Box::new(TestDriver::new(&log, false)));

        let slave = test_slave(0x0713);
        let parent_name = slave.id.to_string();
        bus.register_device(AncillaryDevice::new(&slave, FunctionType::SmartMic, 0));
        assert_eq!(1, bus.bound_device_count());

        bus.unregister_devices_of(&parent_name);
        assert_eq!(0, bus.bound_device_count());
        assert_eq!(
            vec![
                "probe:sdw:0:025d:0713:00:0.smart-mic.0".to_string(),
                "remove:sdw:0:025d:0713:00:0.smart-mic.0".to_string(),
            ],
            *log.borrow()
        );
    }
}
