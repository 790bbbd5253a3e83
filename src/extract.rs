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
// - extract.rs file -

// Turns one decoded page payload into video records plus the continuation
// token for the next page. All the schema knowledge lives in the candidate
// path tables below; extending them must never require touching the callers.

use crate::definitions::{PageKind, VideoRecord};
use crate::error::ScrapeError;
use crate::walker::{find_first, find_key, resolve, text_of, Step};

use serde_json::Value;

// Where one video renderer hides inside a grid item.
const VIDEO_RENDERER_PATHS: &[&[Step]] = &[
    &[
        Step::Key("richItemRenderer"),
        Step::Key("content"),
        Step::Key("videoRenderer"),
    ],
    &[Step::Key("gridVideoRenderer")],
    &[Step::Key("videoRenderer")],
];

// Per-field candidate paths inside a video renderer.
const VIDEO_ID_PATHS: &[&[Step]] = &[&[Step::Key("videoId")]];
const TITLE_PATHS: &[&[Step]] = &[&[Step::Key("title")], &[Step::Key("headline")]];
const PUBLISHED_PATHS: &[&[Step]] = &[&[Step::Key("publishedTimeText")]];
const VIEW_COUNT_PATHS: &[&[Step]] = &[
    &[Step::Key("viewCountText")],
    &[Step::Key("shortViewCountText")],
];

// Where the continuation token hides inside a grid item.
const CONTINUATION_TOKEN_PATHS: &[&[Step]] = &[
    &[
        Step::Key("continuationItemRenderer"),
        Step::Key("continuationEndpoint"),
        Step::Key("continuationCommand"),
        Step::Key("token"),
    ],
    &[
        Step::Key("continuationItemRenderer"),
        Step::Key("reloadContinuationData"),
        Step::Key("continuation"),
    ],
];

// Where the incremental item list hides inside a continuation API response.
const CONTINUATION_ITEMS_PATHS: &[&[Step]] = &[&[
    Step::Key("onResponseReceivedActions"),
    Step::First,
    Step::Key("appendContinuationItemsAction"),
    Step::Key("continuationItems"),
]];

const TABS_PATH: &[Step] = &[
    Step::Key("contents"),
    Step::Key("twoColumnBrowseResultsRenderer"),
    Step::Key("tabs"),
];

// The result of extracting one page, whatever its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    pub videos: Vec<VideoRecord>,
    pub continuation: Option<String>,
    // Item renderers that had to be dropped for lack of a video ID.
    pub skipped: usize,
}

pub fn extract_page(payload: &Value, kind: PageKind) -> Result<PageSlice, ScrapeError> {
    match kind {
        PageKind::Bootstrap => {
            let items = bootstrap_grid(payload)
                .ok_or(ScrapeError::PayloadNotFound("videos grid"))?;
            Ok(scan_items(items))
        }
        PageKind::ContinuationApi => {
            // A response without continuationItems is a terminal page,
            // not an error.
            match continuation_items(payload) {
                Some(items) => Ok(scan_items(items)),
                None => Ok(PageSlice {
                    videos: Vec::new(),
                    continuation: None,
                    skipped: 0,
                }),
            }
        }
    }
}

// Locates the video grid of the selected tab inside the bootstrap payload.
fn bootstrap_grid(payload: &Value) -> Option<&Vec<Value>> {
    if let Some(tabs) = resolve(payload, TABS_PATH).and_then(Value::as_array) {
        for tab in tabs {
            let renderer = match tab.get("tabRenderer") {
                Some(renderer) => renderer,
                None => continue,
            };
            if renderer.get("selected").and_then(Value::as_bool) != Some(true) {
                continue;
            }
            let grid = renderer
                .get("content")
                .and_then(|content| find_key(content, "richGridRenderer"));
            if let Some(items) = grid
                .and_then(|grid| grid.get("contents"))
                .and_then(Value::as_array)
            {
                return Some(items);
            }
        }
    }

    // Last resort for layouts without the two-column envelope.
    find_key(payload, "richGridRenderer")
        .and_then(|grid| grid.get("contents"))
        .and_then(Value::as_array)
}

fn continuation_items(payload: &Value) -> Option<&Vec<Value>> {
    find_first(payload, CONTINUATION_ITEMS_PATHS)
        .or_else(|| find_key(payload, "continuationItems"))
        .and_then(Value::as_array)
}

fn scan_items(items: &[Value]) -> PageSlice {
    let mut videos = Vec::new();
    let mut continuation = None;
    let mut skipped = 0;

    for item in items {
        if let Some(renderer) = find_first(item, VIDEO_RENDERER_PATHS) {
            match parse_video_renderer(renderer) {
                Some(record) => videos.push(record),
                None => skipped += 1,
            }
            continue;
        }
        if continuation.is_none() {
            continuation = find_first(item, CONTINUATION_TOKEN_PATHS)
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        // Anything else (ads, shelf separators) is not ours to care about.
    }

    PageSlice {
        videos,
        continuation,
        skipped,
    }
}

// A renderer without a video ID cannot be linked or deduplicated; it yields
// None and is counted by the caller. Every other field degrades gracefully.
fn parse_video_renderer(renderer: &Value) -> Option<VideoRecord> {
    let video_id = find_first(renderer, VIDEO_ID_PATHS)
        .and_then(Value::as_str)?
        .to_string();
    let title = find_first(renderer, TITLE_PATHS)
        .and_then(text_of)
        .unwrap_or_default();
    let published_at = find_first(renderer, PUBLISHED_PATHS).and_then(text_of);
    let view_count = find_first(renderer, VIEW_COUNT_PATHS)
        .and_then(text_of)
        .and_then(|text| parse_view_count(&text));

    Some(VideoRecord {
        url: VideoRecord::watch_url(&video_id),
        video_id,
        title,
        published_at,
        view_count,
    })
}

// "12,345 views" -> 12345, "1.2M views" -> 1200000. Unparseable text (for
// example "No views") is simply no count. Done in integer arithmetic so that
// "1.2M" comes out as exactly 1200000.
pub fn parse_view_count(text: &str) -> Option<u64> {
    let token = text.split_whitespace().next()?;
    let cleaned = token.replace(',', "");
    let mut digits = cleaned.chars();
    let factor = match digits.next_back()? {
        'K' | 'k' => Some(1_000),
        'M' | 'm' => Some(1_000_000),
        'B' | 'b' => Some(1_000_000_000),
        _ => None,
    };
    match factor {
        Some(factor) => parse_scaled(digits.as_str(), factor),
        None => cleaned.parse().ok(),
    }
}

// Parses "<whole>[.<fraction>]" scaled by <factor>, rounding down.
fn parse_scaled(digits: &str, factor: u64) -> Option<u64> {
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let mut value = whole.checked_mul(factor)?;
    let mut scale = factor;
    for ch in fraction.chars() {
        let digit = ch.to_digit(10)? as u64;
        scale /= 10;
        value += digit * scale;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rich_item(id: &str, title: &str, views: &str, published: &str) -> Value {
        json!({
            "richItemRenderer": {
                "content": {
                    "videoRenderer": {
                        "videoId": id,
                        "title": {"runs": [{"text": title}]},
                        "viewCountText": {"simpleText": views},
                        "publishedTimeText": {"simpleText": published},
                    }
                }
            }
        })
    }

    fn continuation_item(token: &str) -> Value {
        json!({
            "continuationItemRenderer": {
                "continuationEndpoint": {
                    "continuationCommand": {"token": token}
                }
            }
        })
    }

    fn bootstrap_payload(items: Vec<Value>) -> Value {
        json!({
            "contents": {
                "twoColumnBrowseResultsRenderer": {
                    "tabs": [
                        {"tabRenderer": {"selected": false, "title": "Home"}},
                        {
                            "tabRenderer": {
                                "selected": true,
                                "content": {
                                    "richGridRenderer": {"contents": items}
                                }
                            }
                        }
                    ]
                }
            }
        })
    }

    #[test]
    fn view_count_parsing() {
        assert_eq!(parse_view_count("12,345 views"), Some(12_345));
        assert_eq!(parse_view_count("1.2M views"), Some(1_200_000));
        assert_eq!(parse_view_count("883K views"), Some(883_000));
        assert_eq!(parse_view_count("3.5B views"), Some(3_500_000_000));
        assert_eq!(parse_view_count("1 view"), Some(1));
        assert_eq!(parse_view_count("No views"), None);
        assert_eq!(parse_view_count(""), None);
        assert_eq!(parse_view_count("   "), None);
    }

    #[test]
    fn extracts_records_and_token_from_bootstrap_page() {
        let payload = bootstrap_payload(vec![
            rich_item("vid-1", "First video", "1.2M views", "2 years ago"),
            rich_item("vid-2", "Second video", "No views", "3 weeks ago"),
            continuation_item("token-a"),
        ]);

        let slice = extract_page(&payload, PageKind::Bootstrap).unwrap();
        assert_eq!(slice.videos.len(), 2);
        assert_eq!(slice.continuation.as_deref(), Some("token-a"));
        assert_eq!(slice.skipped, 0);

        let first = &slice.videos[0];
        assert_eq!(first.video_id, "vid-1");
        assert_eq!(first.title, "First video");
        assert_eq!(first.url, "https://www.youtube.com/watch?v=vid-1");
        assert_eq!(first.view_count, Some(1_200_000));
        assert_eq!(first.published_at.as_deref(), Some("2 years ago"));

        // "No views" degrades to no count, not to an error.
        assert_eq!(slice.videos[1].view_count, None);
    }

    #[test]
    fn extraction_is_idempotent() {
        let payload = bootstrap_payload(vec![
            rich_item("vid-1", "First video", "12 views", "1 day ago"),
            continuation_item("token-a"),
        ]);
        let first = extract_page(&payload, PageKind::Bootstrap).unwrap();
        let second = extract_page(&payload, PageKind::Bootstrap).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn items_without_video_id_are_skipped_and_counted() {
        let payload = bootstrap_payload(vec![
            json!({
                "richItemRenderer": {
                    "content": {"videoRenderer": {"title": {"simpleText": "id-less"}}}
                }
            }),
            rich_item("vid-1", "Kept", "1 view", "today"),
        ]);

        let slice = extract_page(&payload, PageKind::Bootstrap).unwrap();
        assert_eq!(slice.videos.len(), 1);
        assert_eq!(slice.videos[0].video_id, "vid-1");
        assert_eq!(slice.skipped, 1);
    }

    #[test]
    fn missing_title_becomes_empty_string() {
        let payload = bootstrap_payload(vec![json!({
            "richItemRenderer": {
                "content": {"videoRenderer": {"videoId": "vid-1"}}
            }
        })]);

        let slice = extract_page(&payload, PageKind::Bootstrap).unwrap();
        assert_eq!(slice.videos[0].title, "");
        assert_eq!(slice.videos[0].published_at, None);
        assert_eq!(slice.videos[0].view_count, None);
    }

    #[test]
    fn reload_continuation_shape_is_understood() {
        let payload = bootstrap_payload(vec![json!({
            "continuationItemRenderer": {
                "reloadContinuationData": {"continuation": "token-b"}
            }
        })]);

        let slice = extract_page(&payload, PageKind::Bootstrap).unwrap();
        assert_eq!(slice.continuation.as_deref(), Some("token-b"));
    }

    #[test]
    fn bootstrap_without_grid_is_payload_not_found() {
        let payload = json!({"contents": {"somethingElse": {}}});
        match extract_page(&payload, PageKind::Bootstrap) {
            Err(ScrapeError::PayloadNotFound(what)) => assert_eq!(what, "videos grid"),
            other => panic!("expected PayloadNotFound, got {:?}", other),
        }
    }

    #[test]
    fn continuation_api_page_is_extracted() {
        let payload = json!({
            "onResponseReceivedActions": [{
                "appendContinuationItemsAction": {
                    "continuationItems": [
                        rich_item("vid-9", "Ninth", "9 views", "9 days ago"),
                        continuation_item("token-c"),
                    ]
                }
            }]
        });

        let slice = extract_page(&payload, PageKind::ContinuationApi).unwrap();
        assert_eq!(slice.videos.len(), 1);
        assert_eq!(slice.videos[0].video_id, "vid-9");
        assert_eq!(slice.continuation.as_deref(), Some("token-c"));
    }

    #[test]
    fn continuation_api_without_items_is_terminal_not_fatal() {
        let payload = json!({"responseContext": {}});
        let slice = extract_page(&payload, PageKind::ContinuationApi).unwrap();
        assert!(slice.videos.is_empty());
        assert_eq!(slice.continuation, None);
    }
}
