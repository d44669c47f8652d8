//! aspect-ratio bucketing and bucket selection
use {
    crate::{
        config::RunConfig,
        error::{Error, Result},
        models::PostRecord,
    },
    std::collections::HashMap,
    tracing::debug,
};

/// bucket key: the 2-decimal aspect ratio scaled to an integer
///
/// `1.33` is stored as `133`, keeping the key `Eq + Hash` without
/// comparing floats.
pub type RatioKey = i64;

/// turn a rounded ratio into its bucket key
fn ratio_key(aspect_ratio: f64) -> RatioKey {
    (aspect_ratio * 100.0).round() as RatioKey
}

/// whether a record survives the include/exclude tag rules
///
/// include is an OR: one matching general tag keeps the record. both rules
/// examine general tags only, never character tags.
fn survives_filters(record: &PostRecord, config: &RunConfig) -> bool {
    if !config.include_tags.is_empty()
        && !record
            .general_tags
            .iter()
            .any(|t| config.include_tags.contains(t))
    {
        return false;
    }
    if !config.exclude_tags.is_empty()
        && record
            .general_tags
            .iter()
            .any(|t| config.exclude_tags.contains(t))
    {
        return false;
    }
    true
}

/// records grouped by rounded aspect ratio, rebuilt per run
#[derive(Debug, Default)]
pub struct RatioBuckets {
    /// bucket members in filtered order
    buckets: HashMap<RatioKey, Vec<PostRecord>>,
    /// records fetched before filtering
    fetched: usize,
    /// records surviving the filters
    survived: usize,
}

/// the winning bucket and the resolution its members are resized to
#[derive(Debug)]
pub struct SelectedBucket {
    /// rounded aspect ratio the members share
    pub ratio: f64,
    /// members in filtered order
    pub records: Vec<PostRecord>,
    /// common output width, from the smallest-area member
    pub target_width: u32,
    /// common output height, from the smallest-area member
    pub target_height: u32,
}

impl RatioBuckets {
    /// filter fetched records and group the survivors by rounded ratio
    pub fn build(records: Vec<PostRecord>, config: &RunConfig) -> Self {
        let fetched = records.len();
        let mut buckets: HashMap<RatioKey, Vec<PostRecord>> = HashMap::new();
        let mut survived = 0;

        for record in records {
            if !survives_filters(&record, config) {
                continue;
            }
            survived += 1;
            buckets
                .entry(ratio_key(record.aspect_ratio))
                .or_default()
                .push(record);
        }

        debug!(fetched, survived, buckets = buckets.len(), "bucketized records");
        Self {
            buckets,
            fetched,
            survived,
        }
    }

    /// select the most populous bucket and fix its target resolution
    ///
    /// ties between equally sized buckets fall to map iteration order,
    /// which is arbitrary between runs. the target resolution comes from
    /// the smallest-area member's original dimensions.
    pub fn select(self) -> Result<SelectedBucket> {
        let Self {
            buckets,
            fetched,
            survived,
        } = self;

        let (key, records) = buckets
            .into_iter()
            .max_by_key(|(_, records)| records.len())
            .ok_or(Error::EmptyResult { fetched, survived })?;

        let smallest = records
            .iter()
            .min_by_key(|r| r.area())
            .expect("selected bucket is never empty");
        let (target_width, target_height) = (smallest.width, smallest.height);

        Ok(SelectedBucket {
            ratio: key as f64 / 100.0,
            records,
            target_width,
            target_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::models::aspect_ratio};

    fn record(name: &str, general: &[&str], width: u32, height: u32) -> PostRecord {
        PostRecord {
            source_url: format!("https://cdn.example/{name}.jpg"),
            general_tags: general.iter().map(|t| t.to_string()).collect(),
            character_tags: Vec::new(),
            width,
            height,
            aspect_ratio: aspect_ratio(width, height),
        }
    }

    fn config(include: &[&str], exclude: &[&str]) -> RunConfig {
        RunConfig {
            search_tags: vec!["a".into()],
            trigger_tags: Vec::new(),
            include_tags: include.iter().map(|t| t.to_string()).collect(),
            exclude_tags: exclude.iter().map(|t| t.to_string()).collect(),
            output_directory: "out".into(),
            jobs: 1,
            no_resize: false,
            base_url: "https://danbooru.donmai.us".into(),
        }
    }

    #[test]
    fn include_filter_keeps_any_match() {
        let records = vec![
            record("a", &["x"], 800, 600),
            record("b", &["y"], 800, 600),
            record("c", &["x", "y"], 800, 600),
        ];

        let bucket = RatioBuckets::build(records, &config(&["x"], &[]))
            .select()
            .unwrap();
        let names: Vec<_> = bucket.records.iter().map(|r| r.source_url.clone()).collect();
        assert_eq!(
            names,
            vec!["https://cdn.example/a.jpg", "https://cdn.example/c.jpg"]
        );
    }

    #[test]
    fn exclude_filter_drops_any_match() {
        let records = vec![
            record("a", &["x"], 800, 600),
            record("b", &["y"], 800, 600),
            record("c", &["x", "y"], 800, 600),
        ];

        let bucket = RatioBuckets::build(records, &config(&[], &["y"]))
            .select()
            .unwrap();
        assert_eq!(bucket.records.len(), 1);
        assert_eq!(bucket.records[0].source_url, "https://cdn.example/a.jpg");
    }

    #[test]
    fn the_most_populous_bucket_wins() {
        // sizes 1, 5, 2 across ratios 1.0, 1.33, 1.78
        let mut records = vec![record("square", &[], 500, 500)];
        for i in 0..5 {
            records.push(record(&format!("wide{i}"), &[], 800, 600));
        }
        records.push(record("ultra0", &[], 1920, 1080));
        records.push(record("ultra1", &[], 1920, 1080));

        let bucket = RatioBuckets::build(records, &config(&[], &[]))
            .select()
            .unwrap();
        assert_eq!(bucket.ratio, 1.33);
        assert_eq!(bucket.records.len(), 5);
    }

    #[test]
    fn the_smallest_area_member_fixes_the_target_resolution() {
        let records = vec![
            record("big", &[], 1000, 750),
            record("small", &[], 800, 600),
        ];

        let bucket = RatioBuckets::build(records, &config(&[], &[]))
            .select()
            .unwrap();
        assert_eq!((bucket.target_width, bucket.target_height), (800, 600));
    }

    #[test]
    fn bucket_membership_keeps_filtered_order() {
        let records = vec![
            record("first", &[], 1000, 750),
            record("second", &[], 800, 600),
        ];

        let bucket = RatioBuckets::build(records, &config(&[], &[]))
            .select()
            .unwrap();
        assert_eq!(bucket.records[0].source_url, "https://cdn.example/first.jpg");
    }

    #[test]
    fn zero_fetched_records_is_an_empty_result() {
        let err = RatioBuckets::build(Vec::new(), &config(&[], &[]))
            .select()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyResult {
                fetched: 0,
                survived: 0
            }
        ));
    }

    #[test]
    fn fully_filtered_records_are_an_empty_result() {
        let records = vec![
            record("a", &["y"], 800, 600),
            record("b", &["y"], 800, 600),
        ];

        let err = RatioBuckets::build(records, &config(&[], &["y"]))
            .select()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyResult {
                fetched: 2,
                survived: 0
            }
        ));
    }
}
