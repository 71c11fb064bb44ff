// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    config::{FdropConfig, Settings},
    delete,
    fault::{Fault, FaultKind},
    greet,
    pagegen::PageGen,
    reply::Reply,
    request::CgiRequest,
    sidelog::SideLog,
    upload,
};
use anyhow::{self as ah, format_err as err};
use clap::ValueEnum;
use std::{env, ffi::OsString, io::Read, path::Path};

const MAX_CGIENV_LEN: usize = 1024 * 4;
const MAX_CGIENV_U32_LEN: usize = 10;

fn get_cgienv(name: &str) -> ah::Result<OsString> {
    let value = env::var_os(name).unwrap_or_default();
    if value.len() <= MAX_CGIENV_LEN {
        Ok(value)
    } else {
        Err(err!("Environment variable '{name}' is too long."))
    }
}

fn get_cgienv_str(name: &str) -> ah::Result<String> {
    if let Ok(s) = get_cgienv(name)?.into_string() {
        Ok(s)
    } else {
        Err(err!("Environment variable '{name}' is not valid UTF-8."))
    }
}

fn get_cgienv_u32(name: &str) -> ah::Result<u32> {
    let value = get_cgienv_str(name)?;
    let value = value.trim();
    if value.len() <= MAX_CGIENV_U32_LEN {
        Ok(value.parse::<u32>()?)
    } else {
        Err(err!("Environment variable '{name}' is too long (u32)."))
    }
}

/// An absent or empty CONTENT_LENGTH means no body.
fn get_content_length() -> ah::Result<u32> {
    if get_cgienv_str("CONTENT_LENGTH")?.trim().is_empty() {
        Ok(0)
    } else {
        get_cgienv_u32("CONTENT_LENGTH")
    }
}

/// The operation served by this invocation.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Upload,
    Delete,
    #[value(alias = "ciao")]
    Greet,
}

impl Action {
    /// Derive the action from the name the executable was invoked as.
    /// For example `/usr/lib/cgi-bin/upload.cgi`.
    pub fn from_exe_name(exe: &Path) -> Option<Self> {
        let stem = exe.file_stem()?.to_str()?;
        <Action as ValueEnum>::from_str(stem, true).ok()
    }
}

pub struct Cgi {
    meth: String,
    query: String,
    body_len: ah::Result<u32>,
    body_type: String,
    upload_dir: Option<String>,
}

impl Cgi {
    /// Get the request metadata from the CGI environment.
    pub fn new() -> Self {
        let meth = get_cgienv_str("REQUEST_METHOD").unwrap_or_default();
        let query = get_cgienv_str("QUERY_STRING").unwrap_or_default();
        let body_len = get_content_length();
        let body_type = get_cgienv_str("CONTENT_TYPE").unwrap_or_default();
        let upload_dir = get_cgienv_str("UPLOAD_DIR")
            .ok()
            .filter(|d| !d.trim().is_empty());

        Self {
            meth: meth.trim().to_string(),
            query,
            body_len,
            body_type,
            upload_dir,
        }
    }

    /// Read exactly CONTENT_LENGTH bytes of body from [input].
    fn read_request(&self, input: &mut impl Read) -> Result<CgiRequest, Fault> {
        let read_failed = || Fault::new(FaultKind::ServerFailure, "Request body read failed");

        let body_len = match &self.body_len {
            Ok(body_len) => *body_len,
            Err(e) => {
                return Err(Fault::new(FaultKind::MissingInput, "Invalid CONTENT_LENGTH")
                    .with_detail(format!("{e:#}")));
            }
        };
        let body_len: usize = body_len
            .try_into()
            .map_err(|e| read_failed().with_detail(e))?;
        let mut body = vec![0; body_len];
        input
            .read_exact(&mut body)
            .map_err(|e| read_failed().with_detail(e))?;

        Ok(CgiRequest {
            meth: self.meth.clone(),
            query: self.query.clone(),
            body,
            body_type: self.body_type.clone(),
        })
    }

    /// Process one request and produce the complete reply.
    ///
    /// This never fails. Every error is turned into an error page.
    pub fn run(&self, action: Option<Action>, config_path: &Path, input: &mut impl Read) -> Reply {
        let settings = match FdropConfig::new(config_path)
            .and_then(|config| Settings::new(&config, self.upload_dir.as_deref()))
        {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Configuration error: {e:#}");
                return Reply::internal_error("Server configuration error.");
            }
        };
        let log = SideLog::new(&settings.log_file);
        let pagegen = PageGen::new(&settings);

        let Some(action) = action else {
            let fault = Fault::new(FaultKind::NotFound, "Unknown action");
            log.log(&fault.log_line());
            return pagegen.error_page(&fault);
        };

        let req = match self.read_request(input) {
            Ok(req) => req,
            Err(fault) => {
                log.log(&fault.log_line());
                return pagegen.error_page(&fault);
            }
        };

        match action {
            Action::Upload => upload::handle(&req, &settings, &log, chrono::Utc::now().timestamp()),
            Action::Delete => delete::handle(&req, &settings, &log),
            Action::Greet => greet::handle(&req, &settings),
        }
    }
}


// vim: ts=4 sw=4 expandtab
