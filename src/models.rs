//! api payload models and the in-memory post record
use {crate::tags::split_tag_string, serde::Deserialize, tracing::debug};

/// one post object from the posts.json endpoint
///
/// only the fields the pipeline consumes are mapped. restricted posts omit
/// `file_url` entirely, so it stays optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    /// direct url to the full-resolution file
    #[serde(default)]
    pub file_url: Option<String>,

    /// space-delimited general tags
    #[serde(default)]
    pub tag_string_general: String,

    /// space-delimited character tags
    #[serde(default)]
    pub tag_string_character: String,

    /// width of the original file in pixels
    #[serde(default)]
    pub image_width: i64,

    /// height of the original file in pixels
    #[serde(default)]
    pub image_height: i64,
}

/// aspect ratio rounded to two decimals, the bucket grouping key
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    (width as f64 / height as f64 * 100.0).round() / 100.0
}

/// an immutable record of one fetched post
///
/// dimensions are those of the original remote image, never the resized
/// output. tag lists keep api order and are never deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    /// remote location of the full-resolution image
    pub source_url: String,
    /// normalized general tags
    pub general_tags: Vec<String>,
    /// normalized character tags
    pub character_tags: Vec<String>,
    /// original width in pixels
    pub width: u32,
    /// original height in pixels
    pub height: u32,
    /// width/height rounded to two decimals, computed once at construction
    pub aspect_ratio: f64,
}

impl PostRecord {
    /// build a record from a raw payload
    ///
    /// returns `None` when the payload names no downloadable file or
    /// carries non-positive dimensions.
    pub fn from_raw(raw: RawPost) -> Option<Self> {
        let Some(source_url) = raw.file_url else {
            debug!("skipping post without a file url");
            return None;
        };
        if raw.image_width <= 0 || raw.image_height <= 0 {
            debug!(url = %source_url, "skipping post with degenerate dimensions");
            return None;
        }

        let width = raw.image_width as u32;
        let height = raw.image_height as u32;
        Some(Self {
            source_url,
            general_tags: split_tag_string(&raw.tag_string_general),
            character_tags: split_tag_string(&raw.tag_string_character),
            width,
            height,
            aspect_ratio: aspect_ratio(width, height),
        })
    }

    /// original pixel area, the bucket-selection minimization key
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(url: Option<&str>, width: i64, height: i64) -> RawPost {
        RawPost {
            file_url: url.map(String::from),
            tag_string_general: "long_hair blue sky".into(),
            tag_string_character: "ganyu_(genshin_impact)".into(),
            image_width: width,
            image_height: height,
        }
    }

    #[test]
    fn record_is_built_once_from_the_payload() {
        let record = PostRecord::from_raw(raw(Some("https://cdn/x.jpg"), 800, 600)).unwrap();
        assert_eq!(record.source_url, "https://cdn/x.jpg");
        assert_eq!(record.width, 800);
        assert_eq!(record.height, 600);
        assert_eq!(record.aspect_ratio, 1.33);
        assert_eq!(record.general_tags, vec!["long_hair", "blue", "sky"]);
        assert_eq!(record.character_tags, vec!["ganyu_\\(genshin_impact\\)"]);
    }

    #[test]
    fn posts_without_a_file_url_are_skipped() {
        assert!(PostRecord::from_raw(raw(None, 800, 600)).is_none());
    }

    #[test]
    fn degenerate_dimensions_are_skipped() {
        assert!(PostRecord::from_raw(raw(Some("https://cdn/x.jpg"), 0, 600)).is_none());
        assert!(PostRecord::from_raw(raw(Some("https://cdn/x.jpg"), 800, -1)).is_none());
    }

    #[test]
    fn aspect_ratio_rounds_to_two_decimals() {
        assert_eq!(aspect_ratio(800, 600), 1.33);
        assert_eq!(aspect_ratio(1000, 750), 1.33);
        assert_eq!(aspect_ratio(1920, 1080), 1.78);
        assert_eq!(aspect_ratio(100, 100), 1.0);
    }

    #[test]
    fn raw_post_tolerates_missing_fields() {
        let raw: RawPost = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(raw.file_url.is_none());
        assert_eq!(raw.image_width, 0);
    }
}
