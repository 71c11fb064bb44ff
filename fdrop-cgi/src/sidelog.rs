// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use chrono::{Local, SecondsFormat};
use std::{
    fs::OpenOptions,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

/// Best effort error log.
///
/// Appends `<timestamp> <message>` lines.
/// Logging never fails from the caller's point of view.
#[derive(Clone, Debug)]
pub struct SideLog {
    path: PathBuf,
}

impl SideLog {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn log(&self, message: &str) {
        let _ = self.try_log(message);
    }

    fn try_log(&self, message: &str) -> io::Result<()> {
        let stamp = Local::now().to_rfc3339_opts(SecondsFormat::Micros, false);
        // One line per message, even for hostile file names.
        let message = message.replace(['\r', '\n'], " ");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // Single write, so that concurrent requests do not interleave.
        file.write_all(format!("{stamp} {message}\n").as_bytes())
    }
}


// vim: ts=4 sw=4 expandtab
