// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

mod cgi;
mod config;
mod delete;
mod fault;
mod formfields;
mod greet;
mod pagegen;
mod query;
mod reply;
mod request;
mod sidelog;
#[cfg(test)]
mod testutil;
mod upload;

use crate::{
    cgi::{Action, Cgi},
    reply::Reply,
};
use anyhow::{self as ah, Context as _};
use clap::{error::ErrorKind, Parser};
use std::{
    env,
    ffi::OsString,
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser, Debug, Clone)]
struct Opts {
    /// The action to run.
    /// Derived from the executable name, if not given.
    #[arg(value_enum)]
    action: Option<Action>,

    /// The configuration file.
    #[arg(long, default_value = "/opt/fdrop/etc/fdrop.conf")]
    config: PathBuf,
}

/// Handle one invocation with the command line [args].
///
/// A bad command line still produces a reply for the web server.
fn run(args: &[OsString], input: &mut impl Read) -> Reply {
    let opts = match Opts::try_parse_from(args) {
        Ok(opts) => opts,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("Invalid command line: {e}");
            return Reply::internal_error("Invalid command line.");
        }
    };
    let action = opts.action.or_else(|| {
        args.first()
            .and_then(|exe| Action::from_exe_name(Path::new(exe)))
    });

    Cgi::new().run(action, &opts.config, input)
}

fn main() -> ah::Result<()> {
    let args: Vec<OsString> = env::args_os().collect();
    let reply = run(&args, &mut io::stdin().lock());
    reply
        .write_to(&mut io::stdout().lock())
        .context("Write CGI reply")?;
    Ok(())
}


// vim: ts=4 sw=4 expandtab
