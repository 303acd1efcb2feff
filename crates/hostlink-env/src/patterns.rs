// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compiled user-agent patterns, built once on first use.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    // Patterns are string literals in this file; a failure is a typo here.
    Regex::new(pattern).expect("static user-agent pattern")
}

macro_rules! pattern {
    ($name:ident, $src:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| compile($src));
    };
}

// -- Operating systems --
pattern!(WINDOWS, r"(?i)Windows");
pattern!(IOS, r"iPhone|iPad|iPod|\biOS\b");
pattern!(MACOS, r"(?i)Mac OS X");
pattern!(ANDROID, r"(?i)Android");
pattern!(LINUX, r"(?i)Linux");

pattern!(WINDOWS_VERSION, r"Windows NT (\d+\.\d+)");
pattern!(IOS_VERSION, r"OS (\d+(?:[._]\d+)*)");
pattern!(MACOS_VERSION, r"Mac OS X (\d+(?:[._]\d+)+)");
pattern!(ANDROID_VERSION, r"Android\s+(\d+(?:\.\d+)*)");

// -- Browsers --
pattern!(EDGE, r"Edg(?:e|A|iOS)?/(\d+\.\d+)");
pattern!(OPERA, r"(?:OPR|Opera)[/ ](\d+\.\d+)");
pattern!(OPERA_MARKER, r"(?i)Opera|OPR/");
pattern!(CHROME, r"(?i)Chrome|CriOS");
pattern!(CHROME_VERSION, r"(?:Chrome|CriOS)/(\d+\.\d+)");
pattern!(FIREFOX, r"(?i)Firefox|FxiOS");
pattern!(FIREFOX_VERSION, r"(?:Firefox|FxiOS)/(\d+\.\d+)");
pattern!(SAFARI, r"(?i)Safari");
pattern!(SAFARI_VERSION, r"Version/(\d+\.\d+)");
pattern!(IE, r"(?i)MSIE|Trident");
pattern!(IE_VERSION, r"(?:MSIE |rv:)(\d+\.\d+)");

// -- Devices --
pattern!(TABLET, r"(?i)Tablet|iPad");
pattern!(MOBILE, r"(?i)Mobile");
pattern!(TV, r"\bTV\b|SMART-TV|SmartTV|GoogleTV|AppleTV");

// -- Webviews --
pattern!(WEBVIEW, r"(?i)WebView|\bwv\b");

/// First capture group of `re` in `ua`, if any.
pub(crate) fn capture<'a>(re: &Regex, ua: &'a str) -> Option<&'a str> {
    re.captures(ua)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
