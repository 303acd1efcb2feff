// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operating-system detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::UNKNOWN;
use crate::patterns::{
    ANDROID, ANDROID_VERSION, IOS, IOS_VERSION, LINUX, MACOS, MACOS_VERSION, WINDOWS,
    WINDOWS_VERSION, capture,
};

/// Operating systems the bridge can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsName {
    Windows,
    #[serde(rename = "macOS")]
    MacOs,
    #[serde(rename = "iOS")]
    Ios,
    Android,
    Linux,
    Unknown,
}

impl OsName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Linux => "Linux",
            Self::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for OsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: OsName,
    /// Dotted version, or `"Unknown"`.
    pub version: String,
}

/// Classify the operating system of `ua`.
///
/// iOS is checked before macOS (iOS agents also say "like Mac OS X") and
/// Android before Linux.
pub fn detect_os(ua: &str) -> OsInfo {
    let (name, version) = if WINDOWS.is_match(ua) {
        (OsName::Windows, capture(&WINDOWS_VERSION, ua).map(str::to_owned))
    } else if IOS.is_match(ua) {
        (OsName::Ios, capture(&IOS_VERSION, ua).map(dotted))
    } else if MACOS.is_match(ua) {
        (OsName::MacOs, capture(&MACOS_VERSION, ua).map(dotted))
    } else if ANDROID.is_match(ua) {
        (OsName::Android, capture(&ANDROID_VERSION, ua).map(str::to_owned))
    } else if LINUX.is_match(ua) {
        (OsName::Linux, None)
    } else {
        (OsName::Unknown, None)
    };
    OsInfo {
        name,
        version: version.unwrap_or_else(|| UNKNOWN.to_owned()),
    }
}

fn dotted(raw: &str) -> String {
    raw.replace('_', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/93.0.4577.82 Safari/537.36";
    const MAC_CHROME: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/93.0.4577.82 Safari/537.36";
    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_7_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.2 Mobile/15E148 Safari/604.1";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 11; SM-G975F) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/93.0.4577.82 Mobile Safari/537.36";

    #[test]
    fn windows() {
        let os = detect_os(WINDOWS_CHROME);
        assert_eq!(os.name, OsName::Windows);
        assert_eq!(os.version, "10.0");
    }

    #[test]
    fn macos_underscores_become_dots() {
        let os = detect_os(MAC_CHROME);
        assert_eq!(os.name, OsName::MacOs);
        assert_eq!(os.version, "10.15.7");
    }

    #[test]
    fn iphone_is_ios_not_macos() {
        let os = detect_os(IPHONE_SAFARI);
        assert_eq!(os.name, OsName::Ios);
        assert_eq!(os.version, "14.7.1");
    }

    #[test]
    fn ipad_uses_cpu_os_token() {
        let ua = "Mozilla/5.0 (iPad; CPU OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";
        let os = detect_os(ua);
        assert_eq!(os.name, OsName::Ios);
        assert_eq!(os.version, "14.6");
    }

    #[test]
    fn android_is_not_linux() {
        let os = detect_os(ANDROID_CHROME);
        assert_eq!(os.name, OsName::Android);
        assert_eq!(os.version, "11");
    }

    #[test]
    fn linux_and_unknown_have_no_version() {
        let linux =
            detect_os("Mozilla/5.0 (X11; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0");
        assert_eq!(linux.name, OsName::Linux);
        assert_eq!(linux.version, UNKNOWN);

        let unknown = detect_os("curl/8.0.1");
        assert_eq!(unknown.name, OsName::Unknown);
        assert_eq!(unknown.version, UNKNOWN);
    }

    #[test]
    fn names_serialize_as_display_strings() {
        assert_eq!(OsName::MacOs.to_string(), "macOS");
        assert_eq!(
            serde_json::to_string(&OsName::Ios).expect("serialize"),
            "\"iOS\""
        );
    }
}
