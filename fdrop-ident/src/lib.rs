// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

use anyhow::{self as ah, format_err as err};
use std::{
    convert::Infallible,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const NAMEEXTRA: &str = "-_.";

const SEPARATORS: &[char] = &['/', '\\'];

/// Maximum length of a freshly sanitized upload name.
///
/// Leaves room for the collision counter below the usual 255 byte
/// file name limit.
pub const MAX_NAME_LEN: usize = 200;

/// Prefix of synthesized upload names.
pub const SYNTH_PREFIX: &str = "uploaded_file_";

#[inline]
fn is_valid_name_char(c: char) -> bool {
    UPPERCASE.contains(c) || LOWERCASE.contains(c) || NUMBERS.contains(c) || NAMEEXTRA.contains(c)
}

/// Names that can never be a plain entry of a directory.
#[inline]
fn is_special(name: &str) -> bool {
    name.is_empty() || name == "." || name == ".."
}

/// Split a file name into stem and suffix.
///
/// The suffix starts at the last dot and includes it.
/// Leading dots (hidden files) do not start a suffix.
pub fn split_ext(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if !name[..dot].chars().all(|c| c == '.') => name.split_at(dot),
        _ => (name, ""),
    }
}

/// Get the lower case extension of a file name, without the dot.
pub fn extension(name: &str) -> String {
    split_ext(name)
        .1
        .strip_prefix('.')
        .unwrap_or_default()
        .to_lowercase()
}

/// An unchecked file name, as declared by the client.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UntrustedName(String);

impl FromStr for UntrustedName {
    type Err = Infallible;

    /// Create a new name from an untrusted string.
    #[inline]
    fn from_str(name: &str) -> Result<UntrustedName, Infallible> {
        Ok(UntrustedName(name.to_string()))
    }
}

impl From<String> for UntrustedName {
    #[inline]
    fn from(name: String) -> Self {
        UntrustedName(name)
    }
}

impl From<&str> for UntrustedName {
    #[inline]
    fn from(name: &str) -> Self {
        UntrustedName(name.to_string())
    }
}

impl UntrustedName {
    /// Returns a reference to the raw string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the final path element.
    ///
    /// Slash and backslash are both treated as element separators.
    #[inline]
    pub fn basename(&self) -> &str {
        self.0.rsplit(SEPARATORS).next().unwrap_or("")
    }

    /// Convert this name into a [SafeName] for a new upload.
    ///
    /// Directory components and all characters outside of `[A-Za-z0-9._-]`
    /// are removed. If nothing usable remains, a name is synthesized
    /// from the unix time [now].
    pub fn into_upload_name(self, now: i64) -> SafeName {
        let filtered: String = self
            .basename()
            .chars()
            .filter(|c| is_valid_name_char(*c))
            .collect();
        let name = if is_special(&filtered) {
            format!("{SYNTH_PREFIX}{now}")
        } else {
            filtered
        };
        SafeName(name).into_truncated(MAX_NAME_LEN)
    }

    /// Convert this name into a [SafeName] referring to an existing entry.
    ///
    /// Only the directory components are removed.
    /// The characters are not filtered, because the result must match
    /// the stored name exactly.
    pub fn into_existing_name(self) -> ah::Result<SafeName> {
        let name = self.basename();
        if is_special(name) {
            return Err(err!("Invalid filename."));
        }
        if name.contains('\0') {
            return Err(err!("Invalid filename: Contains NUL."));
        }
        Ok(SafeName(name.to_string()))
    }
}

/// A checked file name.
///
/// The name is not empty, is neither `.` nor `..` and contains no
/// path separator. Joining it onto a directory always yields a path
/// directly inside of that directory.
///
/// This can only be constructed via [UntrustedName].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SafeName(String);

impl SafeName {
    /// Returns a reference to the raw string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its extension.
    #[inline]
    pub fn stem(&self) -> &str {
        split_ext(&self.0).0
    }

    /// The extension including its dot, or an empty string.
    #[inline]
    pub fn suffix(&self) -> &str {
        split_ext(&self.0).1
    }

    /// The lower case extension without the dot.
    #[inline]
    pub fn extension(&self) -> String {
        extension(&self.0)
    }

    fn into_truncated(self, max_len: usize) -> SafeName {
        // Only used on filtered names. Those are pure ASCII.
        if self.0.len() <= max_len {
            return self;
        }
        let suffix = self.suffix();
        if suffix.len() >= max_len {
            return SafeName(self.0[..max_len].to_string());
        }
        let keep = max_len - suffix.len();
        SafeName(format!("{}{}", &self.stem()[..keep], suffix))
    }

    /// Get this name with the collision [counter] appended to the stem.
    ///
    /// Counter 0 is the unmodified name.
    pub fn with_counter(&self, counter: u32) -> SafeName {
        if counter == 0 {
            self.clone()
        } else {
            SafeName(format!("{}({counter}){}", self.stem(), self.suffix()))
        }
    }

    /// Iterate over the first [max_attempts] collision candidates.
    pub fn candidates(&self, max_attempts: u32) -> impl Iterator<Item = SafeName> + '_ {
        (0..max_attempts).map(move |counter| self.with_counter(counter))
    }

    /// Convert this name into a path directly below [base].
    ///
    /// Warning: [base] is not checked for safe filesystem access.
    #[inline]
    pub fn to_fs_path(&self, base: &Path) -> PathBuf {
        base.join(&self.0)
    }
}

impl fmt::Display for SafeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


// vim: ts=4 sw=4 expandtab
