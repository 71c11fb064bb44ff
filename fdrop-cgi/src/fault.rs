// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::reply::HttpStatus;
use fdrop_store::StoreError;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FaultKind {
    MethodNotAllowed,
    MissingInput,
    NotFound,
    Forbidden,
    NameExhausted,
    ServerFailure,
}

impl FaultKind {
    pub fn status(&self) -> HttpStatus {
        match self {
            Self::MethodNotAllowed => HttpStatus::MethodNotAllowed,
            Self::MissingInput => HttpStatus::BadRequest,
            Self::NotFound => HttpStatus::NotFound,
            Self::Forbidden => HttpStatus::Forbidden,
            Self::NameExhausted => HttpStatus::Conflict,
            Self::ServerFailure => HttpStatus::BadGateway,
        }
    }
}

/// A failed request.
///
/// The message is shown to the user.
/// The detail only goes to the log.
#[derive(Clone, Debug)]
pub struct Fault {
    kind: FaultKind,
    message: String,
    detail: Option<String>,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl fmt::Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn status(&self) -> HttpStatus {
        self.kind.status()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn log_line(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{}: {detail}", self.message),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<StoreError> for Fault {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Fault::new(FaultKind::NotFound, "File not found"),
            StoreError::NotWritable => Fault::new(FaultKind::Forbidden, "File not writable"),
            StoreError::Exhausted(_) => {
                Fault::new(FaultKind::NameExhausted, "No free file name available").with_detail(err)
            }
            StoreError::Write(_) => {
                Fault::new(FaultKind::ServerFailure, "Unable to save file").with_detail(err)
            }
            StoreError::Unlink(_) => Fault::new(
                FaultKind::ServerFailure,
                "Delete operation failed (server error)",
            )
            .with_detail(err),
        }
    }
}


// vim: ts=4 sw=4 expandtab
