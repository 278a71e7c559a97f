//! Test utilities shared by the unit tests.

pub mod fixtures;

pub use fixtures::*;

use crate::core::namespace::{BaseUrl, Namespace};
use crate::core::table::NamespaceUrlEntry;
use crate::core::url_map::RawUrlMap;

/// The GLib / GObject / Gio map used throughout the GNOME docs.
pub fn gnome_map() -> RawUrlMap {
    let mut map = RawUrlMap::new();
    map.push("GLib", "https://docs.gtk.org/glib/");
    map.push("GObject", "https://docs.gtk.org/gobject/");
    map.push("Gio", "https://docs.gtk.org/gio/");
    map
}

/// Build a validated entry, panicking on bad input.
pub fn entry(namespace: &str, url: &str) -> NamespaceUrlEntry {
    NamespaceUrlEntry::new(
        Namespace::new(namespace).unwrap(),
        BaseUrl::parse(url).unwrap(),
    )
}
