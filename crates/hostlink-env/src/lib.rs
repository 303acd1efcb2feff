// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hostlink: User-agent environment detection.
//
// Classifies a user-agent string into an operating system, a browser, a
// device form factor and a webview flag. The bridge only needs the OS name
// to pick a transport; the rest is exposed for front-end code that wants to
// adapt its UI.

pub mod browser;
pub mod device;
pub mod environment;
pub mod os;
mod patterns;
pub mod webview;

pub use browser::{BrowserInfo, BrowserName, detect_browser};
pub use device::{DeviceInfo, DeviceKind, detect_device};
pub use environment::{Environment, get_environment};
pub use os::{OsInfo, OsName, detect_os};
pub use webview::detect_webview;

/// Placeholder for any version or name that could not be determined.
pub const UNKNOWN: &str = "Unknown";
