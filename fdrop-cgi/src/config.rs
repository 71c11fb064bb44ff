// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{self as ah, format_err as err};
use configparser::ini::Ini;
use std::path::{Path, PathBuf};

const SECT: &str = "FDROP";

const DEFAULT_UPLOAD_DIR: &str = "./uploads/";
const DEFAULT_LOG_FILE: &str = "script.log";
const DEFAULT_MAX_NAME_ATTEMPTS: u32 = 1000;

pub struct FdropConfig {
    ini: Ini,
}

impl FdropConfig {
    /// Load the configuration file.
    /// A missing file is the same as an empty one.
    pub fn new(path: &Path) -> ah::Result<Self> {
        let mut ini = Ini::new_cs();
        if path.exists() {
            if let Err(e) = ini.load(path) {
                return Err(err!("Failed to load configuration {path:?}: {e}"));
            }
        }
        Ok(Self { ini })
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.ini
            .get(SECT, key)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.get_or("upload-dir", DEFAULT_UPLOAD_DIR).into()
    }

    pub fn log_file(&self) -> PathBuf {
        self.get_or("log-file", DEFAULT_LOG_FILE).into()
    }

    pub fn max_name_attempts(&self) -> ah::Result<u32> {
        match self.ini.getuint(SECT, "max-name-attempts") {
            Ok(None) => Ok(DEFAULT_MAX_NAME_ATTEMPTS),
            Ok(Some(0)) => Err(err!("max-name-attempts must be at least 1.")),
            Ok(Some(n)) => n
                .try_into()
                .map_err(|_| err!("max-name-attempts is too large.")),
            Err(e) => Err(err!("max-name-attempts: {e}")),
        }
    }

    pub fn stylesheet(&self) -> String {
        self.get_or("stylesheet", "/styles.css")
    }

    pub fn home(&self) -> String {
        self.get_or("home", "/index.html")
    }

    pub fn upload_script(&self) -> String {
        self.get_or("upload-script", "upload")
    }

    pub fn delete_script(&self) -> String {
        self.get_or("delete-script", "delete")
    }
}

/// Request scoped settings.
///
/// Populated once at the start of a request from the
/// configuration file and the CGI environment.
#[derive(Clone, Debug)]
pub struct Settings {
    pub upload_dir: PathBuf,
    pub log_file: PathBuf,
    pub max_name_attempts: u32,
    pub stylesheet: String,
    pub home: String,
    pub upload_script: String,
    pub delete_script: String,
}

impl Settings {
    /// [upload_dir] overrides the configured upload directory.
    pub fn new(config: &FdropConfig, upload_dir: Option<&str>) -> ah::Result<Self> {
        Ok(Self {
            upload_dir: upload_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| config.upload_dir()),
            log_file: config.log_file(),
            max_name_attempts: config.max_name_attempts()?,
            stylesheet: config.stylesheet(),
            home: config.home(),
            upload_script: config.upload_script(),
            delete_script: config.delete_script(),
        })
    }
}


// vim: ts=4 sw=4 expandtab
