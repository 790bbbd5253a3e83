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
// - error.rs file -

use crate::definitions::VideoRecord;

use thiserror::Error;

// Everything that can kill a scrape. Missing fields on individual videos are
// never errors; they degrade the record instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    // The page HTML carries no usable embedded payload. The parameter names
    // what was searched for ("ytInitialData", "ytcfg", "videos grid").
    #[error("could not locate {0} in the page")]
    PayloadNotFound(&'static str),

    // The payload text exists but is not parseable JSON.
    #[error("could not decode page data: {0}")]
    Decode(#[from] serde_json::Error),

    // The network fetch itself failed. No retries.
    #[error("network error while contacting YouTube: {0}")]
    Transport(String),

    // Loop-termination guard: several pages in a row yielded nothing new.
    #[error("pagination stalled: {0} consecutive pages without new videos")]
    StalledPagination(usize),
}

impl ScrapeError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ScrapeError::Transport(_))
    }
}

// A failed session still reports what it collected before dying. The page
// index is 1-based; page 1 is the bootstrap HTML page.
#[derive(Debug, Error)]
#[error("page {page}: {error}")]
pub struct ScrapeFailure {
    pub page: usize,
    #[source]
    pub error: ScrapeError,
    pub partial: Vec<VideoRecord>,
}

impl ScrapeFailure {
    pub fn new(page: usize, error: ScrapeError, partial: Vec<VideoRecord>) -> Self {
        ScrapeFailure {
            page,
            error,
            partial,
        }
    }
}
