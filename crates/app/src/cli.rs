//! Command-line arguments.
//!
//! ```text
//! screening <config.json> <feed.json>
//! screening <config.json> --synthetic <seed>
//! ```

use std::path::PathBuf;

pub const USAGE: &str =
    "usage: screening <config.json> <feed.json>\n       screening <config.json> --synthetic <seed>";

/// Where the emission records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    File(PathBuf),
    /// A seeded synthetic day over the configured lanes.
    Synthetic(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub config: PathBuf,
    pub feed: FeedSource,
}

impl Args {
    /// Parses everything after the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match args.as_slice() {
            [config, flag, seed] if flag == "--synthetic" => {
                let seed = seed
                    .parse::<u64>()
                    .map_err(|e| format!("invalid seed '{seed}': {e}"))?;
                Ok(Self {
                    config: PathBuf::from(config),
                    feed: FeedSource::Synthetic(seed),
                })
            }
            [config, feed] if !feed.starts_with("--") => Ok(Self {
                config: PathBuf::from(config),
                feed: FeedSource::File(PathBuf::from(feed)),
            }),
            _ => Err(USAGE.to_string()),
        }
    }
}
