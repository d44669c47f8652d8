//! imageboard api client
use {
    crate::{
        config::RunConfig,
        error::Result,
        models::{PostRecord, RawPost},
        tags::encode_tag,
    },
    async_trait::async_trait,
    reqwest::Client,
    std::time::Duration,
    tracing::{debug, info},
};

/// user agent sent with every request; danbooru rejects anonymous clients
pub static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// request timeout in seconds
const TIMEOUT_SECS: u64 = 30;

/// connection timeout in seconds
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// a source of post metadata pages
///
/// the fetch loop needs exactly one operation, which keeps its empty-page
/// stop condition testable against a scripted source.
#[async_trait]
pub trait PostSource {
    /// fetch one 1-based page of raw posts
    async fn fetch_page(&self, page: u32) -> Result<Vec<RawPost>>;
}

/// the http client
#[derive(Clone, Debug)]
pub struct BooruClient {
    /// the shared http client
    client: Client,
    /// base url for api requests
    base_url: String,
    /// percent-encoded search tags, ready for url embedding
    encoded_tags: Vec<String>,
}

impl BooruClient {
    /// make a new api client for the configured imageboard
    pub fn new(config: &RunConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            encoded_tags: config.search_tags.iter().map(|t| encode_tag(t)).collect(),
        })
    }

    /// compose the paginated search url
    ///
    /// tags are joined with `+` as the and-separator; `page` is 1-based.
    pub fn search_url(&self, page: u32) -> String {
        format!(
            "{}/posts.json?tags={}&page={}",
            self.base_url,
            self.encoded_tags.join("+"),
            page
        )
    }

    /// fetch the raw bytes of an image
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl PostSource for BooruClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<RawPost>> {
        let url = self.search_url(page);
        debug!(url, "fetching metadata page");
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// paginate a post source to exhaustion
///
/// pages are fetched sequentially from page 1 and accumulated in fetch
/// order; the first empty page ends the loop and contributes nothing. any
/// network or decode failure is fatal to the whole run. the loop carries no
/// page bound: a source that never returns an empty page is fetched
/// forever.
pub async fn fetch_all_posts<S: PostSource>(source: &S) -> Result<Vec<PostRecord>> {
    let mut records = Vec::new();
    let mut page = 1u32;

    loop {
        let raw_posts = source.fetch_page(page).await?;
        if raw_posts.is_empty() {
            break;
        }
        records.extend(raw_posts.into_iter().filter_map(PostRecord::from_raw));
        page += 1;
    }

    info!(count = records.len(), "parsed post metadata");
    Ok(records)
}
