// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

use {
    super::ServiceError,
    nix::{
        sys::signal::{kill, SigSet, Signal},
        unistd::Pid,
    },
    std::{
        sync::{
            atomic::{AtomicBool, Ordering},
            mpsc, Arc,
        },
        thread,
        time::Duration,
    },
};

/// The structure to dispatch events from UNIX signal or interval timer to the given callback in
/// own thread. The thread keeps running until the callback returns false or the dispatcher is
/// stopped, and is joined when the dispatcher is dropped.
pub struct Dispatcher {
    name: String,
    th: Option<thread::JoinHandle<()>>,
    state: Arc<AtomicBool>,
    waker: Waker,
}

enum Waker {
    Signal,
    Channel(mpsc::Sender<()>),
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();

        if let Some(th) = self.th.take() {
            if th.join().is_err() {
                println!("Fail to join thread for {}.", self.name);
            }
        }
    }
}

impl Dispatcher {
    /// Launch thread to wait for any of the given UNIX signals. The set of signals is blocked
    /// in the calling thread so that threads spawned afterwards inherit the mask and the wait
    /// is the single consumer.
    pub fn run_signal_handler<F>(
        name: String,
        signals: &[Signal],
        mut cb: F,
    ) -> Result<Dispatcher, ServiceError>
    where
        F: FnMut(Signal) -> bool + Send + 'static,
    {
        let mut sigset = SigSet::empty();
        signals.iter().for_each(|&signum| sigset.add(signum));
        // The internal signal to wake the wait up when stopped.
        sigset.add(Signal::SIGUSR1);

        sigset
            .thread_block()
            .map_err(|err| ServiceError::Dispatcher(err.to_string()))?;

        let state = Arc::new(AtomicBool::new(true));

        let s = state.clone();
        let th = thread::spawn(move || loop {
            let signum = match sigset.wait() {
                Ok(signum) => signum,
                Err(_) => continue,
            };

            if !s.load(Ordering::SeqCst) {
                break;
            }

            if signum != Signal::SIGUSR1 && !cb(signum) {
                break;
            }
        });

        Ok(Dispatcher {
            name,
            th: Some(th),
            state,
            waker: Waker::Signal,
        })
    }

    /// Launch thread to invoke the given callback at the interval.
    pub fn run_interval_handler<F>(
        name: String,
        interval: Duration,
        mut cb: F,
    ) -> Result<Dispatcher, ServiceError>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let state = Arc::new(AtomicBool::new(true));
        let (tx, rx) = mpsc::channel();

        let th = thread::spawn(move || loop {
            match rx.recv_timeout(interval) {
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if !cb() {
                        break;
                    }
                }
                _ => break,
            }
        });

        Ok(Dispatcher {
            name,
            th: Some(th),
            state,
            waker: Waker::Channel(tx),
        })
    }

    pub fn stop(&mut self) {
        self.state.store(false, Ordering::SeqCst);

        match &self.waker {
            Waker::Signal => {
                let _ = kill(Pid::this(), Signal::SIGUSR1);
            }
            Waker::Channel(tx) => {
                let _ = tx.send(());
            }
        }
    }
}
