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
// - definitions.rs file -

use crate::error::ScrapeError;

use serde::Serialize;
use serde_json::Value;

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

// The same headers a regular browser session would send. YouTube serves a
// different (script-free) page to clients it does not recognize.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

// Consecutive pages without a single new video before the pagination loop
// gives up. Continuation tokens are opaque, so this is the only termination
// bound we can enforce ourselves.
pub const STALL_THRESHOLD: usize = 3;

// One video as found on the channel's /videos tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub url: String,
    pub published_at: Option<String>,
    pub view_count: Option<u64>,
}

impl VideoRecord {
    // The canonical watch URL is fully determined by the video ID.
    pub fn watch_url(video_id: &str) -> String {
        format!("{}/watch?v={}", YOUTUBE_BASE_URL, video_id)
    }
}

// YouTube nests the same video data differently depending on whether it
// arrives embedded in the initial HTML or from the continuation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Bootstrap,
    ContinuationApi,
}

// Define the public interface for page fetchers:
pub trait PageFetcher {
    // returns the body of <url> as text.
    fn get(&self, url: &str) -> Result<String, ScrapeError>;

    // POSTs <payload> as a JSON body to <url> and returns the response text.
    fn post_json(&self, url: &str, payload: &Value) -> Result<String, ScrapeError>;
}
