//! Relation id discovery via the Overpass API

use anyhow::{Context, Result};
use countrymeta_core::Transport;
use countrymeta_store::RelationId;
use serde::Deserialize;

use crate::config::Config;

/// Overpass `out ids;` response
#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    id: Option<RelationId>,
}

/// Extract every element id from an Overpass JSON response body.
///
/// Elements without an id are skipped.
pub fn parse_overpass_ids(body: &[u8]) -> Result<Vec<RelationId>> {
    let response: OverpassResponse =
        serde_json::from_slice(body).context("Invalid Overpass response JSON")?;
    Ok(response.elements.into_iter().filter_map(|e| e.id).collect())
}

/// Query the Overpass API for country relations.
///
/// Any failure here is fatal: without the seed set the run is meaningless.
/// The configured supplementary ids are appended after the discovered ones.
pub fn discover_relation_ids<T: Transport + ?Sized>(
    transport: &T,
    config: &Config,
) -> Result<Vec<RelationId>> {
    log::info!("Querying Overpass API for country relations...");
    let response = transport
        .post(&config.overpass_url, &config.id_query)
        .with_context(|| format!("Overpass request failed [{}]", config.overpass_url))?;

    anyhow::ensure!(
        response.is_ok(),
        "error while fetching from the Overpass API (HTTP {})",
        response.status
    );

    let mut ids = parse_overpass_ids(&response.body)?;
    log::info!("Overpass returned {} relation ids", ids.len());

    ids.extend_from_slice(&config.supplementary_ids);
    log::debug!(
        "Added {} supplementary ids: {:?}",
        config.supplementary_ids.len(),
        config.supplementary_ids
    );
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use countrymeta_core::{HttpError, HttpResponse};

    struct FixedTransport(Result<HttpResponse, ()>);

    impl Transport for FixedTransport {
        fn get(&self, _url: &str) -> Result<HttpResponse, HttpError> {
            unreachable!("discovery only posts")
        }

        fn post(&self, _url: &str, body: &str) -> Result<HttpResponse, HttpError> {
            assert!(body.starts_with("[out:json]"));
            self.0
                .clone()
                .map_err(|_| HttpError::Connect("refused".to_string()))
        }
    }

    #[test]
    fn parse_ids() {
        let body = br#"{"version":0.6,"elements":[{"type":"relation","id":51477},{"type":"relation","id":2202162}]}"#;
        assert_eq!(parse_overpass_ids(body).unwrap(), vec![51477, 2202162]);
    }

    #[test]
    fn parse_keeps_duplicates() {
        let body = br#"{"elements":[{"id":5},{"id":5}]}"#;
        assert_eq!(parse_overpass_ids(body).unwrap(), vec![5, 5]);
    }

    #[test]
    fn parse_skips_elements_without_id() {
        let body = br#"{"elements":[{"id":51477},{"type":"relation"},{"id":null},{"id":7}]}"#;
        assert_eq!(parse_overpass_ids(body).unwrap(), vec![51477, 7]);
    }

    #[test]
    fn parse_rejects_missing_elements() {
        assert!(parse_overpass_ids(br#"{"remark":"timeout"}"#).is_err());
    }

    #[test]
    fn appends_supplementary_ids() {
        let transport = FixedTransport(Ok(HttpResponse::new(200, r#"{"elements":[{"id":51477}]}"#)));
        let ids = discover_relation_ids(&transport, &Config::default()).unwrap();
        assert_eq!(ids, vec![51477, 2186646, 1703814]);
    }

    #[test]
    fn empty_result_still_has_supplementary() {
        let transport = FixedTransport(Ok(HttpResponse::new(200, r#"{"elements":[]}"#)));
        let ids = discover_relation_ids(&transport, &Config::default()).unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn non_200_is_fatal() {
        let transport = FixedTransport(Ok(HttpResponse::new(504, "Gateway Timeout")));
        let err = discover_relation_ids(&transport, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("HTTP 504"));
    }

    #[test]
    fn transport_error_is_fatal() {
        let transport = FixedTransport(Err(()));
        assert!(discover_relation_ids(&transport, &Config::default()).is_err());
    }
}
