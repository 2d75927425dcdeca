// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

use {super::*, clap::Parser};

pub trait ServiceCmd<A, T, R>: Sized
where
    A: Parser,
    R: RuntimeOperation<T>,
{
    fn params(args: &A) -> (T, Option<LogLevel>);

    fn run() {
        let code = A::try_parse()
            .map_err(|err| err.to_string())
            .and_then(|args| {
                let (params, log_level) = Self::params(&args);
                R::new(params, log_level)
                    .and_then(|mut runtime| {
                        runtime.listen()?;
                        runtime.run()?;
                        Ok(libc::EXIT_SUCCESS)
                    })
                    .map_err(|err| specific_err_to_string(&err))
            })
            .unwrap_or_else(|msg| {
                eprintln!("{}", msg);
                libc::EXIT_FAILURE
            });

        std::process::exit(code)
    }
}

fn specific_err_to_string(e: &ServiceError) -> String {
    let (domain, cause) = match e {
        ServiceError::BusScan(err) => ("Linux file operation error", err.to_string()),
        ServiceError::Dispatcher(msg) => ("Event dispatch operation error", msg.clone()),
        ServiceError::Probe(msg) => ("Ancillary device operation error", msg.clone()),
    };
    format!("{}: {}", domain, cause)
}
