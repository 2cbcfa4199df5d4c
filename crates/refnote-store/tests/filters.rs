use refnote_core::domain::{BibRef, TagName};
use refnote_core::parse_filter;
use refnote_store::query::EntryQuery;
use refnote_store::repo::EntryNew;
use refnote_store::Store;

fn bib(raw: &str) -> BibRef {
    BibRef::new(raw).expect("bib ref")
}

fn tags(names: &[&str]) -> Vec<TagName> {
    names
        .iter()
        .map(|name| TagName::new(name).expect("tag"))
        .collect()
}

fn store_with_entries() -> Store {
    let store = Store::open_in_memory().expect("open");
    store.migrate().expect("migrate");

    store
        .sources()
        .ensure(&bib("Alpha01"))
        .expect("ensure source");

    for (info, tag_names) in [
        ("first", vec!["alpha"]),
        ("second", vec!["beta"]),
        ("third", vec!["alphabeta"]),
    ] {
        store
            .entries()
            .create(EntryNew {
                source: bib("Alpha01"),
                at: None,
                info: info.to_string(),
                label: None,
                tags: tags(&tag_names),
            })
            .expect("create entry");
    }

    store
}

fn list_infos(store: &Store, filter: &str) -> Vec<String> {
    let parsed = parse_filter(filter).expect("parse filter");
    let query = EntryQuery {
        sources: Vec::new(),
        filter: Some(parsed.expr),
    };
    store
        .entries()
        .list(&query)
        .expect("list entries")
        .into_iter()
        .map(|entry| entry.info)
        .collect()
}

#[test]
fn exact_tag_match_excludes_lookalikes() {
    let store = store_with_entries();
    assert_eq!(list_infos(&store, "alpha | beta"), vec!["first", "second"]);
}

#[test]
fn negation_complements_the_scanned_set() {
    let store = store_with_entries();
    assert_eq!(list_infos(&store, "/alpha"), vec!["second", "third"]);
}

#[test]
fn negation_includes_untagged_entries() {
    let store = store_with_entries();
    store
        .entries()
        .create(EntryNew {
            source: bib("Alpha01"),
            at: None,
            info: "untagged".to_string(),
            label: None,
            tags: Vec::new(),
        })
        .expect("create entry");

    assert_eq!(
        list_infos(&store, "/alpha"),
        vec!["second", "third", "untagged"]
    );
}

#[test]
fn wildcard_directionality_in_sql() {
    let store = store_with_entries();
    assert_eq!(list_infos(&store, "alpha*"), vec!["first", "third"]);
    assert_eq!(list_infos(&store, "*beta"), vec!["second", "third"]);
}

#[test]
fn and_applies_per_entry_across_tags() {
    let store = store_with_entries();
    store
        .entries()
        .create(EntryNew {
            source: bib("Alpha01"),
            at: None,
            info: "both".to_string(),
            label: None,
            tags: tags(&["alpha", "beta"]),
        })
        .expect("create entry");

    assert_eq!(list_infos(&store, "alpha & beta"), vec!["both"]);
    assert_eq!(list_infos(&store, "alpha & /beta"), vec!["first"]);
}

#[test]
fn grouping_overrides_precedence_in_sql() {
    let store = store_with_entries();
    // Without parens: alpha | (beta & alphabeta) -> first only matches alpha.
    assert_eq!(
        list_infos(&store, "alpha | beta & alphabeta"),
        vec!["first"]
    );
    // With parens: (alpha | beta) & alphabeta -> nothing carries both.
    assert!(list_infos(&store, "(alpha | beta) & alphabeta").is_empty());
}

#[test]
fn source_restriction_composes_with_filter() {
    let store = store_with_entries();
    store
        .sources()
        .ensure(&bib("Beta02"))
        .expect("ensure source");
    store
        .entries()
        .create(EntryNew {
            source: bib("Beta02"),
            at: None,
            info: "other-source".to_string(),
            label: None,
            tags: tags(&["alpha"]),
        })
        .expect("create entry");

    let parsed = parse_filter("alpha").expect("parse filter");
    let query = EntryQuery {
        sources: vec![bib("Beta02")],
        filter: Some(parsed.expr),
    };
    let results = store.entries().list(&query).expect("list entries");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].info, "other-source");

    // Negation stays inside the restricted set.
    let parsed = parse_filter("/alpha").expect("parse filter");
    let query = EntryQuery {
        sources: vec![bib("Beta02")],
        filter: Some(parsed.expr),
    };
    assert!(store.entries().list(&query).expect("list").is_empty());
}

#[test]
fn underscore_in_tag_is_not_a_like_wildcard() {
    let store = store_with_entries();
    store
        .entries()
        .create(EntryNew {
            source: bib("Alpha01"),
            at: None,
            info: "underscored".to_string(),
            label: None,
            tags: tags(&["v2_final"]),
        })
        .expect("create entry");
    store
        .entries()
        .create(EntryNew {
            source: bib("Alpha01"),
            at: None,
            info: "decoy".to_string(),
            label: None,
            tags: tags(&["v2xfinal"]),
        })
        .expect("create entry");

    assert_eq!(list_infos(&store, "v2_final*"), vec!["underscored"]);
}
