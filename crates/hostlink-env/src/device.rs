// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device form-factor detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::patterns::{ANDROID, MOBILE, TABLET, TV};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Mobile,
    Tablet,
    Desktop,
    Tv,
    Unknown,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Tv => "tv",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub kind: DeviceKind,
}

/// Classify the form factor of `ua`.
///
/// An empty agent is `Unknown`; anything unrecognised is a desktop. Android
/// agents without a `Mobile` token are tablets.
pub fn detect_device(ua: &str) -> DeviceInfo {
    let kind = if ua.trim().is_empty() {
        DeviceKind::Unknown
    } else if TABLET.is_match(ua) {
        DeviceKind::Tablet
    } else if MOBILE.is_match(ua) {
        DeviceKind::Mobile
    } else if TV.is_match(ua) {
        DeviceKind::Tv
    } else if ANDROID.is_match(ua) {
        DeviceKind::Tablet
    } else {
        DeviceKind::Desktop
    };
    DeviceInfo { kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(ua: &str) -> DeviceKind {
        detect_device(ua).kind
    }

    #[test]
    fn iphone_is_mobile() {
        assert_eq!(
            kind("Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1"),
            DeviceKind::Mobile
        );
    }

    #[test]
    fn ipad_is_tablet_despite_mobile_token() {
        assert_eq!(
            kind("Mozilla/5.0 (iPad; CPU OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1"),
            DeviceKind::Tablet
        );
    }

    #[test]
    fn windows_is_desktop() {
        assert_eq!(
            kind("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"),
            DeviceKind::Desktop
        );
    }

    #[test]
    fn smart_tv() {
        assert_eq!(
            kind("Mozilla/5.0 (SMART-TV; Linux; Tizen 5.0) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/2.2 Chrome/63.0.3239.84 TV Safari/537.36"),
            DeviceKind::Tv
        );
    }

    #[test]
    fn android_without_mobile_is_tablet() {
        assert_eq!(
            kind("Mozilla/5.0 (Linux; Android 11; SM-T870) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.120 Safari/537.36"),
            DeviceKind::Tablet
        );
    }

    #[test]
    fn empty_agent_is_unknown() {
        assert_eq!(kind("   "), DeviceKind::Unknown);
    }
}
