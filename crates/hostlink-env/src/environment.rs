// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Aggregated environment: everything the detectors can say about one agent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::browser::{BrowserInfo, detect_browser};
use crate::device::{DeviceInfo, DeviceKind, detect_device};
use crate::os::{OsInfo, detect_os};
use crate::webview::detect_webview;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub os: OsInfo,
    pub browser: BrowserInfo,
    pub device: DeviceInfo,
    pub is_webview: bool,
}

impl Environment {
    /// Run every detector against `ua`.
    pub fn new(ua: &str) -> Self {
        Self {
            os: detect_os(ua),
            browser: detect_browser(ua),
            device: detect_device(ua),
            is_webview: detect_webview(ua),
        }
    }

    pub fn is_desktop(&self) -> bool {
        self.device.kind == DeviceKind::Desktop
    }

    /// Phones and tablets.
    pub fn is_mobile(&self) -> bool {
        matches!(self.device.kind, DeviceKind::Mobile | DeviceKind::Tablet)
    }

    pub fn is_web_browser(&self) -> bool {
        !self.is_webview
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Environment(OS: {} {}, Browser: {} {}, Device: {})",
            self.os.name, self.os.version, self.browser.name, self.browser.version, self.device.kind
        )
    }
}

/// Shorthand for [`Environment::new`].
pub fn get_environment(ua: &str) -> Environment {
    Environment::new(ua)
}
