// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// The data of one CGI request.
#[derive(Clone, Debug, Default)]
pub struct CgiRequest {
    pub meth: String,
    pub query: String,
    pub body: Vec<u8>,
    pub body_type: String,
}

// vim: ts=4 sw=4 expandtab
