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
// - main.rs file -

use anyhow::Result;
use clap::Parser;
use std::{fs, process::ExitCode};
use url::Url;

mod agent;
mod channel;
mod definitions;
mod error;
mod extract;
mod payload;
mod walker;

use agent::HttpFetcher;
use channel::ChannelScraper;
use definitions::VideoRecord;

#[derive(Parser)]
#[clap(version, about = "Yet Another Channel Lister", long_about = None)]
struct Args {
    #[clap(long, short = 'v', help = "Talks more while the channel is processed")]
    verbose: bool,

    #[clap(
        long = "limit",
        short = 'n',
        help = "Stops after collecting this many videos"
    )]
    limit: Option<usize>,

    #[clap(
        long = "output",
        short = 'o',
        help = "Sets the output file name (default: stdout)"
    )]
    outputfile: Option<String>,

    #[clap(help = "Sets the channel URL or handle to use", index = 1)]
    channel: String,
}

fn write_output(videos: &[VideoRecord], outputfile: &Option<String>) -> Result<()> {
    let json = serde_json::to_string_pretty(videos)?;
    match outputfile {
        Some(path) => {
            fs::write(path, json)?;
            println!("Wrote {} video(s) to \"{}\".", videos.len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    // Argument parsing:
    let args = Args::parse();

    let listing_url = channel::listing_url(&args.channel);
    let parsed_url = Url::parse(&listing_url)?;

    let fetcher = HttpFetcher::new(parsed_url);
    let mut scraper = ChannelScraper::new(fetcher, &args.channel, args.verbose);

    match scraper.scrape(args.limit) {
        Ok(videos) => {
            write_output(&videos, &args.outputfile)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            eprintln!("yacl could not finish scraping: {}", failure);

            // Whatever was collected before the failure is still worth
            // handing over.
            if !failure.partial.is_empty() {
                eprintln!(
                    "Writing the {} video(s) collected so far.",
                    failure.partial.len()
                );
                write_output(&failure.partial, &args.outputfile)?;
            }

            let code = if failure.error.is_transport() { 2 } else { 1 };
            Ok(ExitCode::from(code))
        }
    }
}
