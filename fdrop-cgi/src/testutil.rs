// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{config::Settings, request::CgiRequest, sidelog::SideLog};
use std::path::Path;

pub const BOUNDARY: &str = "----fdropTestBoundary7MA4YWxk";
pub const BOUNDARY_MIME: &str = "multipart/form-data; boundary=----fdropTestBoundary7MA4YWxk";
pub const URLENCODED_MIME: &str = "application/x-www-form-urlencoded";

/// Build a multipart/form-data body.
/// Each field is (name, file name, data).
pub fn multipart_body(fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, data) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Settings with the upload directory and the side log below [root].
pub fn test_settings(root: &Path) -> Settings {
    Settings {
        upload_dir: root.join("uploads"),
        log_file: root.join("script.log"),
        max_name_attempts: 1000,
        stylesheet: "styles.css".to_string(),
        home: "index.html".to_string(),
        upload_script: "upload".to_string(),
        delete_script: "delete".to_string(),
    }
}

pub fn test_log(settings: &Settings) -> SideLog {
    SideLog::new(&settings.log_file)
}

pub fn request(meth: &str, query: &str, body: &[u8], body_type: &str) -> CgiRequest {
    CgiRequest {
        meth: meth.to_string(),
        query: query.to_string(),
        body: body.to_vec(),
        body_type: body_type.to_string(),
    }
}

pub fn upload_request(file_name: &str, data: &[u8]) -> CgiRequest {
    request(
        "POST",
        "",
        &multipart_body(&[("file", Some(file_name), data)]),
        BOUNDARY_MIME,
    )
}

pub fn body_str(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

// vim: ts=4 sw=4 expandtab
