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
use querystrong::QueryStrong;
use std::collections::HashMap;

/// Decoded `name=value` pairs of a query string or urlencoded form body.
#[derive(Clone, Debug, Default)]
pub struct Query {
    items: HashMap<String, Vec<u8>>,
}

impl Query {
    pub fn new(items: HashMap<String, Vec<u8>>) -> Self {
        Self { items }
    }

    pub fn parse(query: &str) -> ah::Result<Self> {
        if query.trim().is_empty() {
            return Ok(Default::default());
        }
        let Ok(q) = QueryStrong::parse(query) else {
            return Err(err!("Invalid query string."));
        };
        let mut items = HashMap::with_capacity(q.len());
        if let Some(q) = q.as_map() {
            for (n, v) in q {
                if let querystrong::Value::String(v) = v {
                    items.insert(n.to_string(), v.as_bytes().to_vec());
                }
            }
        }
        Ok(Self::new(items))
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.items.get(name).cloned()
    }

    pub fn get_str(&self, name: &str) -> Option<String> {
        if let Some(v) = self.get(name) {
            String::from_utf8(v).ok()
        } else {
            None
        }
    }

    pub fn into_items(self) -> HashMap<String, Vec<u8>> {
        self.items
    }
}


// vim: ts=4 sw=4 expandtab
