// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::pagegen::html_safe_escape;
use anyhow as ah;
use std::{
    fmt,
    io::{self, Write},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum HttpStatus {
    #[default]
    Ok = 200,
    Created = 201,
    BadRequest = 400,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    Conflict = 409,
    BadGateway = 502,
}

impl From<HttpStatus> for u32 {
    fn from(status: HttpStatus) -> Self {
        status as Self
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let text = match self {
            Self::Ok => "Ok",
            Self::Created => "Created",
            Self::BadRequest => "Bad Request",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Conflict => "Conflict",
            Self::BadGateway => "Bad Gateway",
        };
        write!(f, "{} {}", *self as u16, text)
    }
}

/// A complete CGI response.
#[derive(Clone, Debug, Default)]
pub struct Reply {
    status: HttpStatus,
    body: Vec<u8>,
}

impl Reply {
    pub fn new(status: HttpStatus, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn internal_error(msg: &str) -> Self {
        let status = HttpStatus::BadGateway;
        let msg = html_safe_escape(msg);
        Self {
            status,
            body: format!(
                "<!DOCTYPE html>\n<html lang=\"en\">\n<body>\n<h1>{status}: {msg}</h1>\n</body>\n</html>\n"
            )
            .into_bytes(),
        }
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Emit the response in the host's framing:
    /// The status code line, an empty line and the raw document.
    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        write!(w, "{}\r\n\r\n", u32::from(self.status))?;
        w.write_all(&self.body)?;
        w.flush()
    }
}

impl From<ah::Result<Reply>> for Reply {
    fn from(reply: ah::Result<Reply>) -> Self {
        match reply {
            Ok(reply) => reply,
            Err(err) => Self::internal_error(&format!("{err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing() {
        let reply = Reply::new(HttpStatus::Created, b"<html></html>".to_vec());
        let mut out = Vec::new();
        reply.write_to(&mut out).unwrap();
        assert_eq!(out, b"201\r\n\r\n<html></html>");
    }

    #[test]
    fn test_status() {
        assert_eq!(u32::from(HttpStatus::MethodNotAllowed), 405);
        assert_eq!(u32::from(HttpStatus::BadGateway), 502);
        assert_eq!(HttpStatus::NotFound.to_string(), "404 Not Found");
        assert_eq!(Reply::default().status(), HttpStatus::Ok);
    }

    #[test]
    fn test_internal_error() {
        let reply: Reply = Err(ah::format_err!("broken <pipe>")).into();
        assert_eq!(reply.status(), HttpStatus::BadGateway);
        let body = String::from_utf8(reply.body().to_vec()).unwrap();
        assert!(body.contains("502 Bad Gateway: broken &lt;pipe&gt;"));
        assert!(!body.contains("<pipe>"));
    }
}

// vim: ts=4 sw=4 expandtab
