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
    delete::DeleteTarget,
    fault::Fault,
    reply::{HttpStatus, Reply},
    upload::UploadOutcome,
};
use anyhow as ah;
use fdrop_store::{format_size, FileRecord, Icon};
use std::{fmt::Write as _, writeln as ln};

const DEFAULT_HTML_ALLOC: usize = 1024 * 16;

const GLYPH_DELETED: &str = "\u{1F5D1}\u{FE0F}";
const GLYPH_FAILED: &str = "\u{274C}";

pub fn html_safe_escape(text: &str) -> String {
    html_escape::encode_safe(text).to_string()
}

pub struct PageGen<'a> {
    settings: &'a Settings,
}

impl<'a> PageGen<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    #[rustfmt::skip]
    fn generate_head(&self, b: &mut String, title: &str) -> ah::Result<()> {
        let css = html_safe_escape(&self.settings.stylesheet);

        ln!(b, r#"<!DOCTYPE html>"#)?;
        ln!(b, r#"<html lang="en">"#)?;
        ln!(b, r#"<head>"#)?;
        ln!(b, r#"    <meta charset="UTF-8" />"#)?;
        ln!(b, r#"    <meta name="viewport" content="width=device-width, initial-scale=1" />"#)?;
        ln!(b, r#"    <title>{title}</title>"#)?;
        ln!(b, r#"    <link rel="stylesheet" href="{css}" />"#)?;
        ln!(b, r#"</head>"#)?;
        ln!(b, r#"<body>"#)?;
        ln!(b, r#"<div class="container">"#)?;
        Ok(())
    }

    #[rustfmt::skip]
    fn generate_tail(&self, b: &mut String) -> ah::Result<()> {
        ln!(b, r#"</div> <!-- class="container" -->"#)?;
        ln!(b, r#"</body>"#)?;
        ln!(b, r#"</html>"#)?;
        Ok(())
    }

    #[rustfmt::skip]
    fn generate_home_link(&self, b: &mut String) -> ah::Result<()> {
        let home = html_safe_escape(&self.settings.home);
        ln!(b, r#"    <a href="{home}" class="button">Back to Home</a>"#)?;
        Ok(())
    }

    #[rustfmt::skip]
    fn generate_upload_form(&self, b: &mut String, fault: Option<&Fault>) -> ah::Result<()> {
        let action = html_safe_escape(&self.settings.upload_script);

        ln!(b, r#"    <h1 class="title">Upload a File</h1>"#)?;
        if let Some(fault) = fault {
            let msg = html_safe_escape(fault.message());
            ln!(b, r#"    <p class="error">{msg}</p>"#)?;
        }
        ln!(b, r#"    <p class="subtitle">Choose a file to upload to the server.</p>"#)?;
        ln!(b, r#"    <form method="POST" action="{action}" enctype="multipart/form-data" class="upload-form">"#)?;
        ln!(b, r#"        <input type="file" name="file" required="required" />"#)?;
        ln!(b, r#"        <button type="submit" class="button">Upload File</button>"#)?;
        ln!(b, r#"    </form>"#)?;
        Ok(())
    }

    #[rustfmt::skip]
    fn generate_listing(&self, b: &mut String, files: &[FileRecord]) -> ah::Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        let action = html_safe_escape(&self.settings.delete_script);

        ln!(b, r#"    <div class="file-list">"#)?;
        ln!(b, r#"        <h2>Files in Upload Directory</h2>"#)?;
        ln!(b, r#"        <div class="file-grid">"#)?;
        for file in files {
            let name = html_safe_escape(&file.name);
            let display_name = html_safe_escape(&file.display_name());
            let icon = file.icon();
            let size = file.human_size();

            ln!(b, r#"            <div class="file-entry">"#)?;
            ln!(b, r#"                <form method="POST" action="{action}" class="delete-form">"#)?;
            ln!(b, r#"                    <input type="hidden" name="filename" value="{name}" />"#)?;
            ln!(b, r#"                    <input type="hidden" name="_method" value="DELETE" />"#)?;
            ln!(b, r#"                    <button type="submit" class="delete-button" title="Delete">&#215;</button>"#)?;
            ln!(b, r#"                </form>"#)?;
            ln!(b, r#"                <div class="file-icon icon-{}">{}</div>"#,
                icon.class(), icon.glyph())?;
            ln!(b, r#"                <div class="file-name" title="{name}">{display_name}</div>"#)?;
            ln!(b, r#"                <div class="file-size">{size}</div>"#)?;
            ln!(b, r#"            </div>"#)?;
        }
        ln!(b, r#"        </div>"#)?; // file-grid
        ln!(b, r#"    </div>"#)?; // file-list
        Ok(())
    }

    #[rustfmt::skip]
    pub fn generate_upload_html(
        &self,
        outcome: &Result<UploadOutcome, Fault>,
        files: &[FileRecord],
    ) -> ah::Result<String> {
        let mut b = String::with_capacity(DEFAULT_HTML_ALLOC);

        self.generate_head(&mut b, "File Upload")?;
        match outcome {
            Ok(UploadOutcome::Stored(stored)) => {
                let name = html_safe_escape(stored.name.as_str());
                let ext = stored.name.extension();
                let icon = Icon::for_extension(&ext);
                let size = format_size(stored.size);
                let typ = if ext.is_empty() {
                    String::new()
                } else {
                    format!(" | Type: {}", html_safe_escape(&ext.to_uppercase()))
                };

                ln!(b, r#"    <div class="file-icon icon-{}">{}</div>"#, icon.class(), icon.glyph())?;
                ln!(b, r#"    <h1 class="title">File "{name}" successfully uploaded!</h1>"#)?;
                ln!(b, r#"    <p class="subtitle">Size: {size}{typ}</p>"#)?;
            }
            Ok(UploadOutcome::Browse) => {
                self.generate_upload_form(&mut b, None)?;
            }
            Err(fault) => {
                self.generate_upload_form(&mut b, Some(fault))?;
            }
        }
        self.generate_listing(&mut b, files)?;
        self.generate_home_link(&mut b)?;
        self.generate_tail(&mut b)?;
        Ok(b)
    }

    #[rustfmt::skip]
    pub fn generate_delete_html(
        &self,
        meth: &str,
        outcome: &Result<DeleteTarget, Fault>,
    ) -> ah::Result<String> {
        let mut b = String::with_capacity(DEFAULT_HTML_ALLOC);
        let upload = html_safe_escape(&self.settings.upload_script);

        match outcome {
            Ok(target) => {
                let name = html_safe_escape(target.name.as_str());

                self.generate_head(&mut b, "File Deleted")?;
                ln!(b, r#"    <div class="status-icon">{GLYPH_DELETED}</div>"#)?;
                ln!(b, r#"    <h1 class="title">File "{name}" successfully deleted!</h1>"#)?;
                ln!(b, r#"    <p class="subtitle">The file has been removed from the server</p>"#)?;
            }
            Err(fault) => {
                let msg = html_safe_escape(fault.message());
                let meth = html_safe_escape(meth);

                self.generate_head(&mut b, "Delete Error")?;
                ln!(b, r#"    <div class="status-icon">{GLYPH_FAILED}</div>"#)?;
                ln!(b, r#"    <h1 class="title">Deletion Failed</h1>"#)?;
                ln!(b, r#"    <p class="subtitle">{msg}</p>"#)?;
                ln!(b, r#"    <p class="method">Method: {meth}</p>"#)?;
            }
        }
        ln!(b, r#"    <form method="POST" action="{upload}" class="back-form">"#)?;
        ln!(b, r#"        <button type="submit" class="button">&#8592; Back to Upload</button>"#)?;
        ln!(b, r#"    </form>"#)?;
        self.generate_tail(&mut b)?;
        Ok(b)
    }

    #[rustfmt::skip]
    pub fn generate_greeting_html(&self, name: &str) -> ah::Result<String> {
        let mut b = String::with_capacity(DEFAULT_HTML_ALLOC);
        let name = html_safe_escape(name);

        self.generate_head(&mut b, "Greeting")?;
        ln!(b, r#"    <h1 class="title">Hello, {name}!</h1>"#)?;
        ln!(b, r#"    <p class="subtitle">Nice to meet you and welcome!</p>"#)?;
        self.generate_home_link(&mut b)?;
        self.generate_tail(&mut b)?;
        Ok(b)
    }

    #[rustfmt::skip]
    pub fn generate_error_html(&self, fault: &Fault) -> ah::Result<String> {
        let mut b = String::with_capacity(DEFAULT_HTML_ALLOC);
        let status = fault.status();
        let msg = html_safe_escape(fault.message());

        self.generate_head(&mut b, "Error")?;
        ln!(b, r#"    <div class="status-icon">{GLYPH_FAILED}</div>"#)?;
        ln!(b, r#"    <h1 class="title">{status}</h1>"#)?;
        ln!(b, r#"    <p class="subtitle">{msg}</p>"#)?;
        self.generate_home_link(&mut b)?;
        self.generate_tail(&mut b)?;
        Ok(b)
    }

    fn reply(status: HttpStatus, html: ah::Result<String>) -> Reply {
        html.map(|b| Reply::new(status, b.into_bytes())).into()
    }

    pub fn upload_page(
        &self,
        outcome: &Result<UploadOutcome, Fault>,
        files: &[FileRecord],
    ) -> Reply {
        let status = match outcome {
            Ok(UploadOutcome::Stored(_)) => HttpStatus::Created,
            Ok(UploadOutcome::Browse) => HttpStatus::Ok,
            Err(fault) => fault.status(),
        };
        Self::reply(status, self.generate_upload_html(outcome, files))
    }

    pub fn delete_page(&self, meth: &str, outcome: &Result<DeleteTarget, Fault>) -> Reply {
        let status = match outcome {
            Ok(_) => HttpStatus::Ok,
            Err(fault) => fault.status(),
        };
        Self::reply(status, self.generate_delete_html(meth, outcome))
    }

    pub fn greeting_page(&self, name: &str) -> Reply {
        Self::reply(HttpStatus::Ok, self.generate_greeting_html(name))
    }

    pub fn error_page(&self, fault: &Fault) -> Reply {
        Self::reply(fault.status(), self.generate_error_html(fault))
    }
}


// vim: ts=4 sw=4 expandtab
