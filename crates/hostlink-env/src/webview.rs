// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use crate::patterns::{IOS, SAFARI, WEBVIEW};

/// Whether `ua` comes from an embedded webview rather than a browser.
///
/// Android webviews carry a `wv` token; iOS webviews drop the `Safari` token
/// that Mobile Safari always sends.
pub fn detect_webview(ua: &str) -> bool {
    WEBVIEW.is_match(ua) || (IOS.is_match(ua) && !SAFARI.is_match(ua))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_webview_token() {
        assert!(detect_webview(
            "Mozilla/5.0 (Linux; Android 8.0; Pixel 2 Build/OPD3.170816.012) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/88.0.4324.150 Mobile Safari/537.36 WebView"
        ));
    }

    #[test]
    fn ios_without_safari() {
        assert!(detect_webview(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 14_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148"
        ));
    }

    #[test]
    fn android_wv_token() {
        assert!(detect_webview(
            "Mozilla/5.0 (Linux; Android 10; SM-G960U) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/88.0.4324.93 Mobile Safari/537.36 wv"
        ));
        assert!(detect_webview(
            "Mozilla/5.0 (Linux; Android 10; K; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/88.0.4324.93 Mobile Safari/537.36"
        ));
    }

    #[test]
    fn browsers_are_not_webviews() {
        assert!(!detect_webview(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        ));
        assert!(!detect_webview(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1"
        ));
    }
}
