use queuedash_core::{BucketSecs, JobsQuery};
use url::Url;

use crate::{FailureKind, FetchError};

/// Builds the backend URLs the dashboard reads from.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let mut base = Url::parse(base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        // Joining relative paths drops the last segment unless it ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `/api/jobs?limit=..&state=..&sort_by=..&sort_order=..`; `state` is empty when unfiltered.
    pub fn jobs(&self, query: &JobsQuery) -> Result<Url, FetchError> {
        let mut url = self.join("api/jobs")?;
        url.query_pairs_mut()
            .append_pair("limit", &query.limit.to_string())
            .append_pair("state", query.state.as_ref().map_or("", |s| s.as_str()))
            .append_pair("sort_by", query.sort_by)
            .append_pair("sort_order", query.sort_order.as_str());
        Ok(url)
    }

    pub fn job(&self, id: &str) -> Result<Url, FetchError> {
        let mut url = self.join("api/jobs")?;
        url.path_segments_mut()
            .map_err(|()| FetchError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .push(id);
        Ok(url)
    }

    /// `/api/stats/queues?ts=300,600,...`
    pub fn queue_stats(&self, buckets: &[BucketSecs]) -> Result<Url, FetchError> {
        let mut url = self.join("api/stats/queues")?;
        let ts = buckets
            .iter()
            .map(|bucket| bucket.to_string())
            .collect::<Vec<_>>()
            .join(",");
        url.query_pairs_mut().append_pair("ts", &ts);
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use queuedash_core::{JobState, JobsQuery, SortOrder};

    use super::Endpoints;

    fn query(state: Option<JobState>) -> JobsQuery {
        JobsQuery {
            limit: 20,
            state,
            sort_by: "modification_time",
            sort_order: SortOrder::Desc,
        }
    }

    #[test]
    fn jobs_url_has_empty_state_when_unfiltered() {
        let endpoints = Endpoints::new("http://localhost:8080").unwrap();
        let url = endpoints.jobs(&query(None)).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/jobs?limit=20&state=&sort_by=modification_time&sort_order=desc"
        );
    }

    #[test]
    fn jobs_url_carries_filter() {
        let endpoints = Endpoints::new("http://localhost:8080/").unwrap();
        let url = endpoints.jobs(&query(Some(JobState::Working))).unwrap();
        assert!(url.as_str().contains("state=working"));
    }

    #[test]
    fn jobs_url_carries_sort_order() {
        let endpoints = Endpoints::new("http://localhost:8080").unwrap();
        let mut oldest_first = query(None);
        oldest_first.sort_order = SortOrder::Asc;
        let url = endpoints.jobs(&oldest_first).unwrap();
        assert!(url.as_str().ends_with("sort_order=asc"));
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let endpoints = Endpoints::new("http://host/admin").unwrap();
        assert_eq!(endpoints.base().as_str(), "http://host/admin/");
        let url = endpoints.job("a b").unwrap();
        assert_eq!(url.as_str(), "http://host/admin/api/jobs/a%20b");
    }

    #[test]
    fn stats_url_joins_buckets() {
        let endpoints = Endpoints::new("http://host").unwrap();
        let url = endpoints.queue_stats(&[300, 600]).unwrap();
        let ts: Vec<_> = url
            .query_pairs()
            .filter(|(key, _)| key == "ts")
            .map(|(_, value)| value.into_owned())
            .collect();
        assert_eq!(ts, vec!["300,600".to_string()]);
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(Endpoints::new("mailto:someone@example.com").is_err());
        assert!(Endpoints::new("not a url").is_err());
    }
}
