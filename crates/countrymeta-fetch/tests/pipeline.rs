//! Integration tests for countrymeta-fetch
//!
//! The pipeline runs against a scripted in-memory transport, so these tests
//! need no network access. The live-API test is marked #[ignore].
//! Run it with: cargo test -p countrymeta-fetch --test pipeline -- --ignored

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use countrymeta_core::{
    HttpConfig, HttpError, HttpResponse, ProgressContext, Transport, set_http_config,
};
use countrymeta_fetch::{Config, run};
use countrymeta_store::RelationStore;
use tempfile::TempDir;

const MAX_RETRIES: u32 = 3;

/// Every test installs the same settings; whichever runs first wins.
fn init() {
    set_http_config(HttpConfig {
        request_delay: Duration::ZERO,
        max_retries: MAX_RETRIES,
        ..Default::default()
    });
}

/// Transport answering from per-URL scripts; the last answer repeats.
#[derive(Default)]
struct ScriptedTransport {
    overpass: Option<HttpResponse>,
    scripts: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    calls: Mutex<Vec<String>>,
    /// Relation whose request panics inside the transport
    panic_on: Option<u64>,
}

impl ScriptedTransport {
    fn with_overpass(ids: &[u64]) -> Self {
        let elements: Vec<String> = ids
            .iter()
            .map(|id| format!(r#"{{"type":"relation","id":{id}}}"#))
            .collect();
        let body = format!(r#"{{"version":0.6,"elements":[{}]}}"#, elements.join(","));
        Self {
            overpass: Some(HttpResponse::new(200, body)),
            ..Default::default()
        }
    }

    fn script(self, id: u64, responses: Vec<HttpResponse>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(relation_url(id), responses.into());
        self
    }

    fn calls_to(&self, id: u64) -> usize {
        let url = relation_url(id);
        self.calls.lock().unwrap().iter().filter(|u| **u == url).count()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.panic_on.is_some_and(|id| relation_url(id) == url) {
            panic!("transport failure on {url}");
        }
        let mut scripts = self.scripts.lock().unwrap();
        let Some(script) = scripts.get_mut(url) else {
            return Ok(HttpResponse::new(404, "not found"));
        };
        if script.len() > 1 {
            Ok(script.pop_front().unwrap())
        } else {
            Ok(script.front().cloned().unwrap())
        }
    }

    fn post(&self, _url: &str, body: &str) -> Result<HttpResponse, HttpError> {
        assert!(body.contains("ISO3166-1"));
        self.overpass
            .clone()
            .ok_or_else(|| HttpError::Connect("connection refused".to_string()))
    }
}

fn relation_url(id: u64) -> String {
    format!("https://osm.test/relation/{id}.json")
}

fn config() -> Config {
    Config {
        overpass_url: "https://overpass.test/api/interpreter".to_string(),
        relation_url: "https://osm.test/relation/{id}.json".to_string(),
        supplementary_ids: vec![],
        workers: 4,
        ..Default::default()
    }
}

fn relation(id: u64, alpha3: &str, extra: &str) -> HttpResponse {
    HttpResponse::new(
        200,
        format!(
            r#"{{"version":"0.6","elements":[{{"type":"relation","id":{id},"tags":{{"ISO3166-1:alpha3":"{alpha3}"{extra}}}}}]}}"#
        ),
    )
}

#[test]
fn end_to_end_france() {
    init();
    let dir = TempDir::new().unwrap();
    let store = RelationStore::open(&dir.path().join(".build")).unwrap();
    let transport = ScriptedTransport::with_overpass(&[51477]).script(
        51477,
        vec![relation(
            51477,
            "fra",
            r#","name":"France","capital":"Paris","name:UN:fr":"France""#,
        )],
    );

    let summary = run(&config(), &transport, &store, &ProgressContext::hidden()).unwrap();
    let index = summary.outcome.index;
    assert_eq!(index.len(), 1);
    assert_eq!(index["FRA"], 51477);

    let metadata = countrymeta_reshape::run(&index, &store, &Default::default()).unwrap();
    let out = dir.path().join("out");
    let index_path = countrymeta_reshape::write_relation_index(&out, &index).unwrap();
    let metadata_path = countrymeta_reshape::write_metadata(&out, &metadata).unwrap();

    assert_eq!(
        std::fs::read_to_string(index_path).unwrap(),
        "{\n\t\"FRA\": 51477\n}"
    );

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(metadata_path).unwrap()).unwrap();
    let fra = &written["FRA"];
    assert_eq!(fra["relation_id"], 51477);
    assert_eq!(fra["name"], "France");
    assert_eq!(fra["capital"], "Paris");
    assert_eq!(fra["lang"], serde_json::json!({"name:UN": {"fr": "France"}}));
    assert_eq!(fra["tags"], serde_json::json!({}));
    assert_eq!(fra["ISO3166-1"]["alpha3"], "FRA");
    assert!(fra["website"].is_null());
}

#[test]
fn server_error_is_resubmitted() {
    init();
    let dir = TempDir::new().unwrap();
    let store = RelationStore::open(dir.path()).unwrap();
    let transport = ScriptedTransport::with_overpass(&[51477]).script(
        51477,
        vec![
            HttpResponse::new(500, "Internal Server Error"),
            relation(51477, "DEU", ""),
        ],
    );

    let summary = run(&config(), &transport, &store, &ProgressContext::hidden()).unwrap();

    assert_eq!(transport.calls_to(51477), 2);
    assert_eq!(summary.outcome.retried, 1);
    assert_eq!(summary.outcome.index["DEU"], 51477);
    assert!(store.contains(51477));
}

#[test]
fn empty_body_is_dropped() {
    init();
    let dir = TempDir::new().unwrap();
    let store = RelationStore::open(dir.path()).unwrap();
    let transport = ScriptedTransport::with_overpass(&[7, 51477])
        .script(7, vec![HttpResponse::new(200, "")])
        .script(51477, vec![relation(51477, "DEU", "")]);

    let summary = run(&config(), &transport, &store, &ProgressContext::hidden()).unwrap();

    assert_eq!(transport.calls_to(7), 1);
    assert_eq!(summary.outcome.empty, 1);
    assert!(!summary.outcome.index.values().any(|&id| id == 7));
    assert!(!store.contains(7));
    assert_eq!(summary.outcome.index.len(), 1);
}

#[test]
fn persistent_failure_exhausts_retries() {
    init();
    let dir = TempDir::new().unwrap();
    let store = RelationStore::open(dir.path()).unwrap();
    let transport = ScriptedTransport::with_overpass(&[9])
        .script(9, vec![HttpResponse::new(503, "Service Unavailable")]);

    let summary = run(&config(), &transport, &store, &ProgressContext::hidden()).unwrap();

    assert_eq!(transport.calls_to(9), MAX_RETRIES as usize + 1);
    assert_eq!(summary.outcome.exhausted, 1);
    assert!(summary.outcome.index.is_empty());
}

#[test]
fn discovery_failure_aborts() {
    init();
    let dir = TempDir::new().unwrap();
    let store = RelationStore::open(dir.path()).unwrap();
    let transport = ScriptedTransport {
        overpass: Some(HttpResponse::new(429, "Too Many Requests")),
        ..Default::default()
    };

    assert!(run(&config(), &transport, &store, &ProgressContext::hidden()).is_err());
    assert!(transport.calls.lock().unwrap().is_empty());
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn supplementary_ids_are_fetched() {
    init();
    let dir = TempDir::new().unwrap();
    let store = RelationStore::open(dir.path()).unwrap();
    let transport = ScriptedTransport::with_overpass(&[])
        .script(2186646, vec![relation(2186646, "ATA", r#","name":"Antarctica""#)])
        .script(1703814, vec![relation(1703814, "PSE", "")]);
    let config = Config {
        supplementary_ids: vec![2186646, 1703814],
        ..config()
    };

    let summary = run(&config, &transport, &store, &ProgressContext::hidden()).unwrap();

    assert_eq!(summary.discovered, 2);
    assert_eq!(
        summary.outcome.index.keys().collect::<Vec<_>>(),
        vec!["ATA", "PSE"]
    );
}

#[test]
fn many_relations_all_indexed() {
    init();
    let dir = TempDir::new().unwrap();
    let store = RelationStore::open(dir.path()).unwrap();
    let ids: Vec<u64> = (1..=60).collect();
    let mut transport = ScriptedTransport::with_overpass(&ids);
    for &id in &ids {
        // every third relation fails once before succeeding
        let mut responses = vec![];
        if id % 3 == 0 {
            responses.push(HttpResponse::new(502, "Bad Gateway"));
        }
        responses.push(relation(id, &format!("C{id:02}"), ""));
        transport = transport.script(id, responses);
    }
    let config = Config {
        workers: 8,
        ..config()
    };

    let summary = run(&config, &transport, &store, &ProgressContext::hidden()).unwrap();

    assert_eq!(summary.outcome.index.len(), 60);
    assert_eq!(summary.outcome.retried, 20);
    assert_eq!(summary.outcome.dropped(), 0);
    let keys: Vec<&String> = summary.outcome.index.keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(store.list().unwrap(), ids);
}

#[test]
fn store_write_failure_aborts() {
    init();
    let dir = TempDir::new().unwrap();
    let store = RelationStore::open(dir.path()).unwrap();
    // A regular file where the relations directory should be
    std::fs::remove_dir_all(store.dir()).unwrap();
    std::fs::write(store.dir(), b"").unwrap();

    let ids: Vec<u64> = (1..=40).collect();
    let mut transport = ScriptedTransport::with_overpass(&ids);
    for &id in &ids {
        transport = transport.script(id, vec![relation(id, &format!("C{id:02}"), "")]);
    }

    let err = run(&config(), &transport, &store, &ProgressContext::hidden()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to write"));
    assert!(store.dir().is_file());
}

#[test]
fn panicking_transport_drops_request() {
    init();
    let dir = TempDir::new().unwrap();
    let store = RelationStore::open(dir.path()).unwrap();
    let ids: Vec<u64> = (1..=12).collect();
    let mut transport = ScriptedTransport::with_overpass(&ids);
    for &id in &ids {
        transport = transport.script(id, vec![relation(id, &format!("C{id:02}"), "")]);
    }
    transport.panic_on = Some(5);

    let summary = run(&config(), &transport, &store, &ProgressContext::hidden()).unwrap();

    assert_eq!(transport.calls_to(5), 1);
    assert_eq!(summary.outcome.rejected, 1);
    assert_eq!(summary.outcome.index.len(), 11);
    assert!(!store.contains(5));
}

/// Fetch the real relation for Germany.
/// Run with: cargo test -p countrymeta-fetch --test pipeline -- --ignored live_relation
#[test]
#[ignore]
fn live_relation() {
    let transport = countrymeta_core::ReqwestTransport;
    let response = transport
        .get("https://api.openstreetmap.org/api/0.6/relation/51477.json")
        .expect("request should succeed");
    assert_eq!(response.status, 200);
    let doc = countrymeta_store::RawRelationDocument::from_slice(&response.body).unwrap();
    assert_eq!(doc.alpha3().as_deref(), Some("DEU"));
}
