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
    config::Settings,
    fault::{Fault, FaultKind},
    formfields::{is_multipart, FormFields},
    pagegen::PageGen,
    reply::Reply,
    request::CgiRequest,
    sidelog::SideLog,
};
use fdrop_ident::UntrustedName;
use fdrop_store::{Stored, UploadDir};

const FILE_FIELD: &str = "file";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing was submitted. Show the form.
    Browse,
    Stored(Stored),
}

fn store_upload(
    req: &CgiRequest,
    dir: &UploadDir,
    settings: &Settings,
    now: i64,
) -> Result<UploadOutcome, Fault> {
    if req.meth != "POST" {
        return Err(Fault::new(
            FaultKind::MethodNotAllowed,
            format!("Invalid request method: {}. Use POST", req.meth),
        ));
    }
    if req.body.is_empty() {
        return Ok(UploadOutcome::Browse);
    }
    if !is_multipart(&req.body_type) {
        return Err(Fault::new(FaultKind::MissingInput, "No file field found"));
    }

    let fields = FormFields::new(&req.body, &req.body_type)
        .map_err(|e| Fault::new(FaultKind::MissingInput, "Malformed form data").with_detail(e))?;
    let Some(field) = fields.get(FILE_FIELD) else {
        return Err(Fault::new(FaultKind::MissingInput, "No file field found"));
    };
    let file_name = field.file_name().unwrap_or_default();
    if file_name.is_empty() {
        return Err(Fault::new(FaultKind::MissingInput, "No file uploaded"));
    }

    let name = UntrustedName::from(file_name).into_upload_name(now);
    let stored = dir.store(&name, field.data(), settings.max_name_attempts)?;
    Ok(UploadOutcome::Stored(stored))
}

/// Handle an upload request.
///
/// [now] is the unix time used for synthesized file names.
pub fn handle(req: &CgiRequest, settings: &Settings, log: &SideLog, now: i64) -> Reply {
    let pagegen = PageGen::new(settings);

    let dir = match UploadDir::open(&settings.upload_dir) {
        Ok(dir) => dir,
        Err(e) => {
            let fault =
                Fault::new(FaultKind::ServerFailure, "Unable to create upload directory")
                    .with_detail(format!("{e:#}"));
            log.log(&fault.log_line());
            return pagegen.upload_page(&Err(fault), &[]);
        }
    };

    let outcome = store_upload(req, &dir, settings, now);
    match &outcome {
        Ok(UploadOutcome::Stored(stored)) => {
            eprintln!("Stored upload '{}' ({} bytes).", stored.name, stored.size);
        }
        Ok(UploadOutcome::Browse) => (),
        Err(fault) => log.log(&fault.log_line()),
    }
    pagegen.upload_page(&outcome, &dir.list())
}


// vim: ts=4 sw=4 expandtab
