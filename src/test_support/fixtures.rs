//! Test fixtures for common test scenarios.
//!
//! The two url map files below are the layouts produced by real
//! documentation builds, one with a descriptive comment and one without.

use std::path::Path;

/// Url map with SPDX header lines only.
pub const URLMAP_PLAIN: &str = "\
// SPDX-FileCopyrightText: 2024 Corentin Noël
// SPDX-License-Identifier: LGPL-2.1-only OR MPL-2.0
baseURLs = [
    [ 'GLib', 'https://docs.gtk.org/glib/' ],
    [ 'GObject', 'https://docs.gtk.org/gobject/' ],
    [ 'Gio', 'https://docs.gtk.org/gio/' ],
]
";

/// Url map with SPDX header lines and a descriptive comment.
pub const URLMAP_COMMENTED: &str = "\
// SPDX-FileCopyrightText: 2021 GNOME Foundation
// SPDX-License-Identifier: LGPL-2.1-or-later

// A map between namespaces and base URLs for their online documentation
baseURLs = [
    [ 'GLib', 'https://docs.gtk.org/glib/' ],
    [ 'GObject', 'https://docs.gtk.org/gobject/' ],
    [ 'Gio', 'https://docs.gtk.org/gio/' ],
]
";

/// Docmap.toml describing both builds above.
pub const MANIFEST_TWO_TARGETS: &str = r#"[project]
name = "libical-glib"

[[namespace]]
name = "GLib"
url = "https://docs.gtk.org/glib/"

[[namespace]]
name = "GObject"
url = "https://docs.gtk.org/gobject/"

[[namespace]]
name = "Gio"
url = "https://docs.gtk.org/gio/"

[target.docs]
output = "docs/reference/libical-glib/urlmap.js"
header = [
    "SPDX-FileCopyrightText: 2024 Corentin Noël",
    "SPDX-License-Identifier: LGPL-2.1-only OR MPL-2.0",
]

[target.v3]
output = "v3/libical-glib/urlmap.js"
header = [
    "SPDX-FileCopyrightText: 2021 GNOME Foundation",
    "SPDX-License-Identifier: LGPL-2.1-or-later",
]
comment = "A map between namespaces and base URLs for their online documentation"
"#;

/// Write the two-target manifest into `dir` and return its path.
pub fn write_two_target_project(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("Docmap.toml");
    std::fs::write(&path, MANIFEST_TWO_TARGETS).unwrap();
    path
}
