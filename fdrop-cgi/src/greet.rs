// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{config::Settings, pagegen::PageGen, query::Query, reply::Reply, request::CgiRequest};

const GUEST: &str = "Guest";
const MAX_GREET_NAME_LEN: usize = 50;
const GREET_NAME_EXTRA: &str = "_ .'-";

fn is_valid_greet_char(c: char) -> bool {
    c.is_alphanumeric() || GREET_NAME_EXTRA.contains(c)
}

/// Get the visitor's name from the `name` query parameter.
pub fn guest_name(query: &str) -> String {
    let Ok(query) = Query::parse(query) else {
        return GUEST.to_string();
    };
    let Some(name) = query.get_str("name") else {
        return GUEST.to_string();
    };
    let name: String = name.trim().chars().take(MAX_GREET_NAME_LEN).collect();
    if name.is_empty() || !name.chars().all(is_valid_greet_char) {
        GUEST.to_string()
    } else {
        name
    }
}

pub fn handle(req: &CgiRequest, settings: &Settings) -> Reply {
    PageGen::new(settings).greeting_page(&guest_name(&req.query))
}


// vim: ts=4 sw=4 expandtab
