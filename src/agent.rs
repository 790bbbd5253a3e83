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
// - agent.rs file -

use crate::definitions::{PageFetcher, ACCEPT_LANGUAGE, USER_AGENT};
use crate::error::ScrapeError;

use serde_json::Value;
use ureq::{Agent, AgentBuilder, Proxy};
use url::Url;

pub trait AgentBase {
    fn init(url: Url) -> Agent;
}

pub struct YaclAgent;
impl AgentBase for YaclAgent {
    // Default fetch agent for yacl. Sets a proxy or not.
    fn init(url: Url) -> Agent {
        let mut builder = AgentBuilder::new().user_agent(USER_AGENT);

        if let Some(env_proxy) = env_proxy::for_url(&url).host_port() {
            // Use a proxy:
            let proxy = Proxy::new(format!("{}:{}", env_proxy.0, env_proxy.1).as_str()).unwrap();
            builder = builder.proxy(proxy);
        }
        builder.build()
    }
}

// The one real network implementation of the fetch capability. Everything
// above this struct is oblivious to how pages are retrieved.
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    pub fn new(url: Url) -> Self {
        HttpFetcher {
            agent: YaclAgent::init(url),
        }
    }
}

impl PageFetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<String, ScrapeError> {
        self.agent
            .get(url)
            .set("Accept-Language", ACCEPT_LANGUAGE)
            .call()
            .map_err(|e| ScrapeError::Transport(e.to_string()))?
            .into_string()
            .map_err(|e| ScrapeError::Transport(e.to_string()))
    }

    fn post_json(&self, url: &str, payload: &Value) -> Result<String, ScrapeError> {
        self.agent
            .post(url)
            .set("Accept-Language", ACCEPT_LANGUAGE)
            .set("Content-Type", "application/json")
            .send_string(&payload.to_string())
            .map_err(|e| ScrapeError::Transport(e.to_string()))?
            .into_string()
            .map_err(|e| ScrapeError::Transport(e.to_string()))
    }
}
