//! run parameters
use {
    crate::{
        cli::Cli,
        error::{Error, Result},
    },
    std::{collections::HashSet, path::PathBuf},
};

/// maximum number of search tags the api accepts per anonymous query
pub const MAX_SEARCH_TAGS: usize = 2;

/// immutable parameters for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// search tags, between one and [`MAX_SEARCH_TAGS`]
    pub search_tags: Vec<String>,
    /// tags prepended to every caption, in configured order
    pub trigger_tags: Vec<String>,
    /// when non-empty, keep posts with at least one of these general tags
    pub include_tags: HashSet<String>,
    /// when non-empty, drop posts with any of these general tags
    pub exclude_tags: HashSet<String>,
    /// destination directory for image/caption pairs
    pub output_directory: PathBuf,
    /// bounded worker count for the download phase
    pub jobs: usize,
    /// write images at their original resolution
    pub no_resize: bool,
    /// base url of the imageboard
    pub base_url: String,
}

impl RunConfig {
    /// validate the cli surface into an immutable run configuration
    ///
    /// the search-tag count rule is enforced here, before any network call.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if cli.tags.is_empty() {
            return Err(Error::Config(
                "at least one search tag is required".into(),
            ));
        }
        if cli.tags.len() > MAX_SEARCH_TAGS {
            return Err(Error::Config(format!(
                "at most {MAX_SEARCH_TAGS} search tags are allowed, got {}",
                cli.tags.len()
            )));
        }

        Ok(Self {
            search_tags: cli.tags,
            trigger_tags: cli.trigger_tags,
            include_tags: cli.include_tags.into_iter().collect(),
            exclude_tags: cli.exclude_tags.into_iter().collect(),
            output_directory: cli.output_directory,
            jobs: cli.jobs.max(1),
            no_resize: cli.no_resize,
            base_url: cli.base_url.trim_end_matches('/').to_string(),
        })
    }
}
