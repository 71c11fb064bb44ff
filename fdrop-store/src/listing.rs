// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use fdrop_ident::extension;
use std::{collections::HashMap, fs, path::Path};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

const DISPLAY_NAME_MAX: usize = 15;
const DISPLAY_NAME_KEEP: usize = 12;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Icon {
    Document,
    Text,
    Image,
    Video,
    Audio,
    Archive,
    Web,
    Style,
    Script,
    Php,
    Python,
    Code,
    Java,
    Data,
    Sheet,
    File,
}

lazy_static::lazy_static! {
    static ref ICONS: HashMap<&'static str, Icon> = HashMap::from([
        ("pdf", Icon::Document),
        ("txt", Icon::Document),
        ("doc", Icon::Text),
        ("docx", Icon::Text),
        ("jpg", Icon::Image),
        ("jpeg", Icon::Image),
        ("png", Icon::Image),
        ("gif", Icon::Image),
        ("svg", Icon::Image),
        ("mp4", Icon::Video),
        ("avi", Icon::Video),
        ("mov", Icon::Video),
        ("mp3", Icon::Audio),
        ("wav", Icon::Audio),
        ("zip", Icon::Archive),
        ("rar", Icon::Archive),
        ("tar", Icon::Archive),
        ("gz", Icon::Archive),
        ("html", Icon::Web),
        ("css", Icon::Style),
        ("js", Icon::Script),
        ("php", Icon::Php),
        ("py", Icon::Python),
        ("cpp", Icon::Code),
        ("c", Icon::Code),
        ("java", Icon::Java),
        ("json", Icon::Data),
        ("xml", Icon::Data),
        ("csv", Icon::Sheet),
        ("xls", Icon::Sheet),
        ("xlsx", Icon::Sheet),
    ]);
}

impl Icon {
    /// Look up the icon for a file extension (without dot).
    pub fn for_extension(ext: &str) -> Self {
        ICONS
            .get(ext.to_lowercase().as_str())
            .copied()
            .unwrap_or(Icon::File)
    }

    /// CSS class name.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Archive => "archive",
            Self::Web => "web",
            Self::Style => "style",
            Self::Script => "script",
            Self::Php => "php",
            Self::Python => "python",
            Self::Code => "code",
            Self::Java => "java",
            Self::Data => "data",
            Self::Sheet => "sheet",
            Self::File => "file",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Document => "\u{1F4C4}",
            Self::Text => "\u{1F4DD}",
            Self::Image => "\u{1F5BC}\u{FE0F}",
            Self::Video => "\u{1F3AC}",
            Self::Audio => "\u{1F3B5}",
            Self::Archive => "\u{1F5DC}\u{FE0F}",
            Self::Web => "\u{1F310}",
            Self::Style => "\u{1F3A8}",
            Self::Script => "\u{26A1}",
            Self::Php => "\u{1F418}",
            Self::Python => "\u{1F40D}",
            Self::Code => "\u{2699}\u{FE0F}",
            Self::Java => "\u{2615}",
            Self::Data => "\u{1F4CB}",
            Self::Sheet => "\u{1F4CA}",
            Self::File => "\u{1F4C1}",
        }
    }
}

/// Format a byte count with binary units.
pub fn format_size(size: u64) -> String {
    if size >= GIB {
        format!("{:.2} GB", size as f64 / GIB as f64)
    } else if size >= MIB {
        format!("{:.2} MB", size as f64 / MIB as f64)
    } else if size >= KIB {
        format!("{:.2} KB", size as f64 / KIB as f64)
    } else {
        format!("{size} bytes")
    }
}

/// One regular file in the upload directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub size: u64,
}

impl FileRecord {
    pub fn extension(&self) -> String {
        extension(&self.name)
    }

    pub fn icon(&self) -> Icon {
        Icon::for_extension(&self.extension())
    }

    pub fn human_size(&self) -> String {
        format_size(self.size)
    }

    /// Get the name shortened for display in the listing.
    pub fn display_name(&self) -> String {
        if self.name.chars().count() > DISPLAY_NAME_MAX {
            let mut name: String = self.name.chars().take(DISPLAY_NAME_KEEP).collect();
            name.push_str("...");
            name
        } else {
            self.name.clone()
        }
    }
}

/// Get all regular files directly inside of [dir], sorted by name.
///
/// An unreadable directory results in an empty list.
pub fn list_files(dir: &Path) -> Vec<FileRecord> {
    let mut files = Vec::with_capacity(64);
    if let Ok(dir_reader) = fs::read_dir(dir) {
        for entry in dir_reader {
            let Ok(entry) = entry else {
                continue;
            };
            // Follows symlinks.
            let Ok(meta) = fs::metadata(entry.path()) else {
                continue;
            };
            if !meta.is_file() {
                continue; // Not a regular file.
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue; // Entry name is not a valid str.
            };
            files.push(FileRecord {
                name,
                size: meta.len(),
            });
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(10), "10 bytes");
        assert_eq!(format_size(1023), "1023 bytes");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(MIB), "1.00 MB");
        assert_eq!(format_size(5 * MIB + MIB / 4), "5.25 MB");
        assert_eq!(format_size(GIB), "1.00 GB");
        assert_eq!(format_size(3 * GIB), "3.00 GB");
    }

    #[test]
    fn test_icon() {
        assert_eq!(Icon::for_extension("pdf"), Icon::Document);
        assert_eq!(Icon::for_extension("JPG"), Icon::Image);
        assert_eq!(Icon::for_extension("xlsx"), Icon::Sheet);
        assert_eq!(Icon::for_extension("exe"), Icon::File);
        assert_eq!(Icon::for_extension(""), Icon::File);
        assert_eq!(Icon::File.class(), "file");
        assert_eq!(Icon::Document.glyph(), "📄");
    }

    #[test]
    fn test_record() {
        let r = FileRecord {
            name: "holiday.photo.JPEG".to_string(),
            size: 2048,
        };
        assert_eq!(r.extension(), "jpeg");
        assert_eq!(r.icon(), Icon::Image);
        assert_eq!(r.human_size(), "2.00 KB");
        assert_eq!(r.display_name(), "holiday.phot...");

        let r = FileRecord {
            name: "exactly15chars_".to_string(),
            size: 0,
        };
        assert_eq!(r.display_name(), "exactly15chars_");

        let r = FileRecord {
            name: "sixteen_chars_ab".to_string(),
            size: 0,
        };
        assert_eq!(r.display_name(), "sixteen_char...");
    }

    #[test]
    fn test_list_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), b"0123456789").unwrap();
        fs::write(tmp.path().join("a.pdf"), b"").unwrap();
        fs::create_dir(tmp.path().join("subdir")).unwrap();
        fs::write(tmp.path().join("subdir").join("nested.txt"), b"x").unwrap();

        let files = list_files(tmp.path());
        assert_eq!(
            files,
            vec![
                FileRecord {
                    name: "a.pdf".to_string(),
                    size: 0,
                },
                FileRecord {
                    name: "b.txt".to_string(),
                    size: 10,
                },
            ]
        );
    }

    #[test]
    fn test_list_files_unreadable() {
        let tmp = TempDir::new().unwrap();
        assert!(list_files(&tmp.path().join("does-not-exist")).is_empty());
    }
}

// vim: ts=4 sw=4 expandtab
