// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::query::Query;
use anyhow::{self as ah, format_err as err, Context as _};
use multer::{parse_boundary, Multipart};
use std::collections::HashMap;
use tokio::runtime;

const MIME_MULTIPART: &str = "multipart/form-data";
const MIME_URLENCODED: &str = "application/x-www-form-urlencoded";

fn mime_essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn is_multipart(mime: &str) -> bool {
    mime_essence(mime) == MIME_MULTIPART
}

pub fn is_urlencoded(mime: &str) -> bool {
    mime_essence(mime) == MIME_URLENCODED
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormField {
    file_name: Option<String>,
    data: Vec<u8>,
}

impl FormField {
    /// The file name declared by the client, if this is a file field.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Decoded fields of a form submission.
#[derive(Clone, Debug, Default)]
pub struct FormFields {
    items: HashMap<String, FormField>,
}

impl FormFields {
    /// Decode a `multipart/form-data` or urlencoded request body.
    ///
    /// If a field name occurs more than once, the first one wins.
    pub fn new(body: &[u8], body_mime: &str) -> ah::Result<Self> {
        if body.is_empty() {
            return Ok(Default::default());
        }
        if is_multipart(body_mime) {
            runtime::Builder::new_current_thread()
                .build()
                .context("Tokio runtime builder")?
                .block_on(Self::from_multipart(body, body_mime))
        } else if is_urlencoded(body_mime) {
            Self::from_urlencoded(body)
        } else {
            Err(err!("Unsupported form content type '{body_mime}'."))
        }
    }

    async fn from_multipart(body: &[u8], body_mime: &str) -> ah::Result<Self> {
        let boundary = parse_boundary(body_mime).context("Parse form-data boundary")?;
        let mut multipart = Multipart::with_reader(body, boundary);
        let mut items = HashMap::new();
        while let Some(field) = multipart.next_field().await.context("Multipart field")? {
            let Some(name) = field.name() else {
                continue;
            };
            let name = name.to_string();
            let file_name = field.file_name().map(|f| f.to_string());
            let data = field.bytes().await.context("Multipart field data")?;
            let data = data.to_vec();
            items.entry(name).or_insert(FormField { file_name, data });
        }
        Ok(Self { items })
    }

    fn from_urlencoded(body: &[u8]) -> ah::Result<Self> {
        let body = std::str::from_utf8(body).context("Form data UTF-8 encoding")?;
        let items = Query::parse(body)?
            .into_items()
            .into_iter()
            .map(|(name, data)| {
                let field = FormField {
                    file_name: None,
                    data,
                };
                (name, field)
            })
            .collect();
        Ok(Self { items })
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.items.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<String> {
        let field = self.get(name)?;
        String::from_utf8(field.data.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{multipart_body, BOUNDARY_MIME};

    #[test]
    fn test_mime() {
        assert!(is_multipart("multipart/form-data; boundary=abc"));
        assert!(is_multipart("Multipart/Form-Data;boundary=abc"));
        assert!(!is_multipart("text/plain"));
        assert!(is_urlencoded("application/x-www-form-urlencoded"));
        assert!(is_urlencoded("application/x-www-form-urlencoded; charset=UTF-8"));
        assert!(!is_urlencoded(""));
    }

    #[test]
    fn test_multipart() {
        let payload: Vec<u8> = vec![0, 1, 2, 0xFF, b'\r', b'\n', b'-', b'-', 0x80];
        let body = multipart_body(&[
            ("comment", None, b"hello".as_slice()),
            ("file", Some("report.pdf"), payload.as_slice()),
        ]);
        let fields = FormFields::new(&body, BOUNDARY_MIME).unwrap();

        let file = fields.get("file").unwrap();
        assert_eq!(file.file_name(), Some("report.pdf"));
        assert_eq!(file.data(), payload.as_slice());

        let comment = fields.get("comment").unwrap();
        assert_eq!(comment.file_name(), None);
        assert_eq!(fields.get_str("comment").as_deref(), Some("hello"));
        assert!(fields.get("other").is_none());
    }

    #[test]
    fn test_multipart_first_wins() {
        let body = multipart_body(&[
            ("file", Some("a.txt"), b"first".as_slice()),
            ("file", Some("b.txt"), b"second".as_slice()),
        ]);
        let fields = FormFields::new(&body, BOUNDARY_MIME).unwrap();
        let file = fields.get("file").unwrap();
        assert_eq!(file.file_name(), Some("a.txt"));
        assert_eq!(file.data(), b"first");
    }

    #[test]
    fn test_multipart_malformed() {
        assert!(FormFields::new(b"garbage", BOUNDARY_MIME).is_err());
        assert!(FormFields::new(b"garbage", "multipart/form-data").is_err());
    }

    #[test]
    fn test_urlencoded() {
        let fields = FormFields::new(
            b"filename=report.pdf&_method=DELETE",
            "application/x-www-form-urlencoded",
        )
        .unwrap();
        assert_eq!(fields.get_str("filename").as_deref(), Some("report.pdf"));
        assert_eq!(fields.get_str("_method").as_deref(), Some("DELETE"));
        assert_eq!(fields.get("filename").unwrap().file_name(), None);
    }

    #[test]
    fn test_empty_and_unsupported() {
        let fields = FormFields::new(b"", "").unwrap();
        assert!(fields.get("file").is_none());
        assert!(FormFields::new(b"data", "text/plain").is_err());
    }
}

// vim: ts=4 sw=4 expandtab
