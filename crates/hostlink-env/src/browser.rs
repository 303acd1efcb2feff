// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Browser detection.
//
// Most engines copy each other's product tokens (Edge and Opera both claim
// Chrome, Chrome claims Safari), so the checks run from the most specific
// token to the least.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::UNKNOWN;
use crate::patterns::{
    CHROME, CHROME_VERSION, EDGE, FIREFOX, FIREFOX_VERSION, IE, IE_VERSION, OPERA, OPERA_MARKER,
    SAFARI, SAFARI_VERSION, capture,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrowserName {
    Edge,
    Opera,
    Chrome,
    Firefox,
    Safari,
    #[serde(rename = "Internet Explorer")]
    InternetExplorer,
    Unknown,
}

impl BrowserName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edge => "Edge",
            Self::Opera => "Opera",
            Self::Chrome => "Chrome",
            Self::Firefox => "Firefox",
            Self::Safari => "Safari",
            Self::InternetExplorer => "Internet Explorer",
            Self::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for BrowserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    pub name: BrowserName,
    /// `major.minor`, or `"Unknown"`.
    pub version: String,
}

pub fn detect_browser(ua: &str) -> BrowserInfo {
    let (name, version) = if let Some(version) = capture(&EDGE, ua) {
        (BrowserName::Edge, Some(version))
    } else if OPERA_MARKER.is_match(ua) {
        (BrowserName::Opera, capture(&OPERA, ua))
    } else if CHROME.is_match(ua) {
        (BrowserName::Chrome, capture(&CHROME_VERSION, ua))
    } else if FIREFOX.is_match(ua) {
        (BrowserName::Firefox, capture(&FIREFOX_VERSION, ua))
    } else if SAFARI.is_match(ua) {
        (BrowserName::Safari, capture(&SAFARI_VERSION, ua))
    } else if IE.is_match(ua) {
        (BrowserName::InternetExplorer, capture(&IE_VERSION, ua))
    } else {
        (BrowserName::Unknown, None)
    };
    BrowserInfo {
        name,
        version: version.unwrap_or(UNKNOWN).to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(ua: &str, name: BrowserName, version: &str) {
        let browser = detect_browser(ua);
        assert_eq!(browser.name, name, "{ua}");
        assert_eq!(browser.version, version, "{ua}");
    }

    #[test]
    fn chrome_desktop() {
        check(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            BrowserName::Chrome,
            "91.0",
        );
    }

    #[test]
    fn safari_only_without_chrome() {
        check(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
            BrowserName::Safari,
            "14.0",
        );
    }

    #[test]
    fn firefox() {
        check(
            "Mozilla/5.0 (X11; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0",
            BrowserName::Firefox,
            "89.0",
        );
    }

    #[test]
    fn edge_and_opera_win_over_chrome() {
        check(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 Edg/91.0.864.59",
            BrowserName::Edge,
            "91.0",
        );
        check(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 OPR/77.0.4054.203",
            BrowserName::Opera,
            "77.0",
        );
    }

    #[test]
    fn internet_explorer_both_token_styles() {
        check(
            "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.2; Trident/6.0)",
            BrowserName::InternetExplorer,
            "10.0",
        );
        check(
            "Mozilla/5.0 (Windows NT 10.0; Trident/7.0; rv:11.0) like Gecko",
            BrowserName::InternetExplorer,
            "11.0",
        );
    }

    #[test]
    fn unknown_agent() {
        check("curl/8.0.1", BrowserName::Unknown, UNKNOWN);
    }
}
