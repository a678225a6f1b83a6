use countrymeta_reshape::{TagRules, reshape, to_pretty_json};
use countrymeta_store::{RawRelationDocument, RelationElement};

/// Relation shaped like a large country: a few hundred name translations.
fn synthetic_document() -> RawRelationDocument {
    let mut tags = std::collections::BTreeMap::new();
    for (k, v) in [
        ("ISO3166-1:alpha2", "fr"),
        ("ISO3166-1:alpha3", "fra"),
        ("ISO3166-1:numeric", "250"),
        ("admin_level", "2"),
        ("boundary", "administrative"),
        ("capital", "Paris"),
        ("name", "France"),
        ("type", "boundary"),
        ("wikidata", "Q142"),
    ] {
        tags.insert(k.to_string(), v.to_string());
    }
    for i in 0..300 {
        tags.insert(format!("name:l{i}"), format!("France {i}"));
        tags.insert(format!("official_name:l{i}"), format!("République {i}"));
    }
    RawRelationDocument {
        elements: vec![RelationElement {
            kind: Some("relation".to_string()),
            id: Some(2202162),
            tags,
        }],
    }
}

#[divan::bench]
fn reshape_country(bencher: divan::Bencher) {
    let doc = synthetic_document();
    let rules = TagRules::default();
    bencher.bench(|| reshape("FRA", &doc, &rules).unwrap());
}

#[divan::bench]
fn reshape_and_serialize(bencher: divan::Bencher) {
    let doc = synthetic_document();
    let rules = TagRules::default();
    bencher.bench(|| {
        let record = reshape("FRA", &doc, &rules).unwrap();
        to_pretty_json(&record).unwrap()
    });
}

fn main() {
    divan::main();
}
