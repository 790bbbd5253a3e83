/*
 * The contents of this file are subject to the terms of the
 * Common Development and Distribution License, Version 1.0 only
 * (the "License").  You may not use this file except in compliance
 * with the License.
 *
 * See the file LICENSE in this distribution for details.
 * A copy of the CDDL is also available via the Internet at
 * http://www.opensource.org/licenses/cddl1.txt
 *
 * When distributing Covered Code, include this CDDL HEADER in each
 * file and include the contents of the LICENSE file from this
 * distribution.
 */

// Yet Another Channel Lister
// - payload.rs file -

// YouTube embeds its page state as JavaScript assignments inside <script>
// tags. This module digs the raw JSON text out of the HTML; decoding it is
// the caller's job so that "not there" and "there but broken" stay distinct
// errors.

use crate::error::ScrapeError;

use scraper::{Html, Selector};

// Assignment prefixes YouTube has used for the bootstrap state over the
// years. Ordered, first match in document order wins.
const INITIAL_DATA_MARKERS: [&str; 4] = [
    "var ytInitialData = ",
    "window['ytInitialData'] = ",
    "window[\"ytInitialData\"] = ",
    "ytInitialData = ",
];

// The configuration dictionary carrying the continuation API key and the
// client context.
const YTCFG_MARKERS: [&str; 1] = ["ytcfg.set("];

// Returns the raw ytInitialData JSON text for one channel page.
pub fn locate_initial_data(html: &Html) -> Result<String, ScrapeError> {
    find_json_in_scripts(html, &INITIAL_DATA_MARKERS)
        .ok_or(ScrapeError::PayloadNotFound("ytInitialData"))
}

// Returns the raw ytcfg JSON text for one channel page.
pub fn locate_ytcfg(html: &Html) -> Result<String, ScrapeError> {
    find_json_in_scripts(html, &YTCFG_MARKERS).ok_or(ScrapeError::PayloadNotFound("ytcfg"))
}

fn find_json_in_scripts(html: &Html, markers: &[&str]) -> Option<String> {
    let script_selector = Selector::parse("script").unwrap();
    for script in html.select(&script_selector) {
        let content: String = script.text().collect();
        if content.is_empty() {
            continue;
        }
        for marker in markers {
            if let Some(blob) = extract_json_object(&content, marker) {
                return Some(blob);
            }
        }
    }
    None
}

// Slices the balanced JSON object following <marker> out of <text>. The scan
// has to be string-aware: YouTube's payloads contain braces inside string
// values, so naive brace counting would cut the object short.
fn extract_json_object(text: &str, marker: &str) -> Option<String> {
    let marker_end = text.find(marker)? + marker.len();
    let open = marker_end + text[marker_end..].find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (pos, ch) in text[open..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[open..open + pos + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
