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
// - channel.rs file -

// The pagination driver. Fetches the channel's /videos page, extracts the
// bootstrap slice, then follows continuation tokens through YouTube's
// internal browse API until the channel is exhausted, a limit is reached, or
// the token chain goes nowhere.

use crate::definitions::{PageFetcher, PageKind, VideoRecord, STALL_THRESHOLD, YOUTUBE_BASE_URL};
use crate::error::{ScrapeError, ScrapeFailure};
use crate::extract::{extract_page, PageSlice};
use crate::payload;

use regex::Regex;
use scraper::Html;
use serde_json::{json, Value};
use std::collections::HashSet;

// Derives the /videos listing URL from whatever the user gave us: a full
// URL, an @handle (with or without the @), or a raw channel ID.
pub fn listing_url(channel: &str) -> String {
    let trimmed = channel.trim().trim_end_matches('/');
    let base = if Regex::new(r"^https?://").unwrap().is_match(trimmed) {
        trimmed.to_string()
    } else if Regex::new(r"^UC[0-9A-Za-z_-]{22}$").unwrap().is_match(trimmed) {
        format!("{}/channel/{}", YOUTUBE_BASE_URL, trimmed)
    } else {
        format!("{}/@{}", YOUTUBE_BASE_URL, trimmed.trim_start_matches('@'))
    };

    if base.ends_with("/videos") {
        base
    } else {
        format!("{}/videos", base)
    }
}

pub struct ChannelScraper<F: PageFetcher> {
    fetcher: F,
    listing_url: String,
    verbose: bool,
    // Continuation API credentials, read from the bootstrap page's ytcfg.
    api_key: Option<String>,
    api_context: Option<Value>,
}

impl<F: PageFetcher> ChannelScraper<F> {
    pub fn new(fetcher: F, channel: &str, verbose: bool) -> Self {
        ChannelScraper {
            fetcher,
            listing_url: listing_url(channel),
            verbose,
            api_key: None,
            api_context: None,
        }
    }

    // Collects every video on the channel, most recent first, each video ID
    // exactly once. On a fatal error after the first page the records
    // gathered so far travel along in the failure.
    pub fn scrape(&mut self, limit: Option<usize>) -> Result<Vec<VideoRecord>, ScrapeFailure> {
        let mut collected: Vec<VideoRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 1usize;

        if self.verbose {
            println!("Fetching {}.", self.listing_url);
        }

        let html = self
            .fetcher
            .get(&self.listing_url)
            .map_err(|error| ScrapeFailure::new(page, error, Vec::new()))?;
        let document = Html::parse_document(&html);
        let raw = payload::locate_initial_data(&document)
            .map_err(|error| ScrapeFailure::new(page, error, Vec::new()))?;
        let initial: Value = serde_json::from_str(&raw)
            .map_err(|error| ScrapeFailure::new(page, error.into(), Vec::new()))?;
        self.load_api_config(&document);

        let slice = extract_page(&initial, PageKind::Bootstrap)
            .map_err(|error| ScrapeFailure::new(page, error, Vec::new()))?;
        let (_, mut token) = self.absorb(slice, &mut collected, &mut seen);

        if let Some(limit) = limit {
            if collected.len() >= limit {
                collected.truncate(limit);
                return Ok(collected);
            }
        }

        let mut stalled_pages = 0usize;
        while let Some(current) = token {
            page += 1;
            let response = match self.fetch_continuation(&current) {
                Ok(response) => response,
                Err(error) => return Err(ScrapeFailure::new(page, error, collected)),
            };
            let slice = match extract_page(&response, PageKind::ContinuationApi) {
                Ok(slice) => slice,
                Err(error) => return Err(ScrapeFailure::new(page, error, collected)),
            };
            let (fresh, next) = self.absorb(slice, &mut collected, &mut seen);

            if let Some(limit) = limit {
                if collected.len() >= limit {
                    collected.truncate(limit);
                    return Ok(collected);
                }
            }

            // Tokens are opaque; a chain that keeps promising more pages
            // without delivering new videos has to be cut off by us.
            if fresh == 0 {
                stalled_pages += 1;
                if stalled_pages >= STALL_THRESHOLD {
                    return Err(ScrapeFailure::new(
                        page,
                        ScrapeError::StalledPagination(stalled_pages),
                        collected,
                    ));
                }
            } else {
                stalled_pages = 0;
            }

            token = next;
        }

        Ok(collected)
    }

    // Appends the slice's unseen videos and reports how many were new plus
    // the follow-up token. Boundary videos resent across pages drop out here.
    fn absorb(
        &self,
        slice: PageSlice,
        collected: &mut Vec<VideoRecord>,
        seen: &mut HashSet<String>,
    ) -> (usize, Option<String>) {
        let mut fresh = 0usize;
        for record in slice.videos {
            if seen.insert(record.video_id.clone()) {
                collected.push(record);
                fresh += 1;
            }
        }

        if self.verbose {
            if slice.skipped > 0 {
                println!("Skipped {} item(s) without a video ID.", slice.skipped);
            }
            println!(
                "{} new video(s), {} collected in total.",
                fresh,
                collected.len()
            );
        }

        (fresh, slice.continuation)
    }

    fn fetch_continuation(&self, token: &str) -> Result<Value, ScrapeError> {
        let (key, context) = match (&self.api_key, &self.api_context) {
            (Some(key), Some(context)) => (key, context),
            _ => return Err(ScrapeError::PayloadNotFound("API configuration (ytcfg)")),
        };

        let url = format!("{}/youtubei/v1/browse?key={}", YOUTUBE_BASE_URL, key);
        let body = json!({
            "context": context,
            "continuation": token,
        });
        let raw = self.fetcher.post_json(&url, &body)?;
        Ok(serde_json::from_str(&raw)?)
    }

    // Pulls the browse API key and client context out of the page's ytcfg.
    // Missing config only becomes an error once a continuation has to be
    // followed; a single-page channel works without it.
    fn load_api_config(&mut self, document: &Html) {
        let raw = match payload::locate_ytcfg(document) {
            Ok(raw) => raw,
            Err(_) => return,
        };
        let config: Value = match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(_) => return,
        };
        if let Some(key) = config.get("INNERTUBE_API_KEY").and_then(Value::as_str) {
            self.api_key = Some(key.to_string());
        }
        if let Some(context) = config.get("INNERTUBE_CONTEXT") {
            if context.is_object() {
                self.api_context = Some(context.clone());
            }
        }
    }
}
