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
    formfields::FormFields,
    pagegen::PageGen,
    query::Query,
    reply::Reply,
    request::CgiRequest,
    sidelog::SideLog,
};
use anyhow as ah;
use fdrop_ident::{SafeName, UntrustedName};
use fdrop_store::UploadDir;
use std::fmt;

const FILENAME_FIELD: &str = "filename";
const METHOD_FIELD: &str = "_method";

/// Where the delete target name came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NameSource {
    Query,
    Body,
    FormField,
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query string"),
            Self::Body => write!(f, "request body"),
            Self::FormField => write!(f, "form field"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteTarget {
    pub name: SafeName,
    pub source: NameSource,
}

fn no_filename() -> Fault {
    Fault::new(FaultKind::MissingInput, "No filename provided")
}

fn bad_form(e: ah::Error) -> Fault {
    Fault::new(FaultKind::MissingInput, "Malformed form data").with_detail(e)
}

fn filename_from_query(query: &str) -> Result<Option<String>, Fault> {
    let query = Query::parse(query).map_err(bad_form)?;
    Ok(query
        .get_str(FILENAME_FIELD)
        .filter(|name| !name.is_empty()))
}

/// Get the target name from a raw DELETE body.
///
/// The body is either urlencoded (`filename=...`)
/// or consists of the bare file name.
pub fn name_from_body(body: &[u8]) -> Result<Option<String>, Fault> {
    let Ok(body) = std::str::from_utf8(body) else {
        return Err(Fault::new(FaultKind::MissingInput, "Invalid filename"));
    };
    if body.contains('=') {
        filename_from_query(body)
    } else {
        let name = body.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }
}

fn raw_target_name(req: &CgiRequest) -> Result<(String, NameSource), Fault> {
    match req.meth.as_str() {
        "DELETE" => {
            if let Some(name) = filename_from_query(&req.query)? {
                return Ok((name, NameSource::Query));
            }
            match name_from_body(&req.body)? {
                Some(name) => Ok((name, NameSource::Body)),
                None => Err(no_filename()),
            }
        }
        "POST" => {
            let fields = FormFields::new(&req.body, &req.body_type).map_err(bad_form)?;
            if fields.get_str(METHOD_FIELD).as_deref() != Some("DELETE") {
                return Err(Fault::new(
                    FaultKind::MethodNotAllowed,
                    "Invalid request method: POST without _method=DELETE override",
                ));
            }
            if let Some(name) = fields.get_str(FILENAME_FIELD).filter(|n| !n.is_empty()) {
                return Ok((name, NameSource::FormField));
            }
            match filename_from_query(&req.query)? {
                Some(name) => Ok((name, NameSource::Query)),
                None => Err(no_filename()),
            }
        }
        meth => Err(Fault::new(
            FaultKind::MethodNotAllowed,
            format!("Invalid request method: {meth}. Use DELETE or POST"),
        )),
    }
}

/// Determine and check the file to be deleted.
pub fn select_target(req: &CgiRequest) -> Result<DeleteTarget, Fault> {
    let (raw, source) = raw_target_name(req)?;
    let name = UntrustedName::from(raw)
        .into_existing_name()
        .map_err(|e| Fault::new(FaultKind::MissingInput, "Invalid filename").with_detail(e))?;
    Ok(DeleteTarget { name, source })
}

fn delete_target(req: &CgiRequest, settings: &Settings) -> Result<DeleteTarget, Fault> {
    let target = select_target(req)?;
    let dir = UploadDir::open(&settings.upload_dir).map_err(|e| {
        Fault::new(FaultKind::ServerFailure, "Unable to create upload directory")
            .with_detail(format!("{e:#}"))
    })?;
    dir.remove(&target.name)?;
    Ok(target)
}

/// Handle a delete request.
pub fn handle(req: &CgiRequest, settings: &Settings, log: &SideLog) -> Reply {
    let outcome = delete_target(req, settings);
    match &outcome {
        Ok(target) => {
            eprintln!("Deleted '{}' (name from {}).", target.name, target.source);
        }
        Err(fault) => log.log(&fault.log_line()),
    }
    PageGen::new(settings).delete_page(&req.meth, &outcome)
}


// vim: ts=4 sw=4 expandtab
