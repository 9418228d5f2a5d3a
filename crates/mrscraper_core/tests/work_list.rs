use mrscraper_core::{build_work_list, is_accepted, CatalogEntry, RunConfiguration};
use pretty_assertions::assert_eq;

const LISTING: [&str; 4] = [
    "../",
    "a(USA).zip",
    "b(Europe).zip",
    "c(Europe)(Demo).zip",
];

fn config(region_filter: bool, smart_filter: bool) -> RunConfiguration {
    RunConfiguration {
        region: "Europe".to_string(),
        region_filter_enabled: region_filter,
        smart_filter_enabled: smart_filter,
        ..RunConfiguration::new("https://myrient.erista.me/files/No-Intro/x/", "/tmp")
    }
}

#[test]
fn both_filters_keep_only_final_regional_release() {
    let list = build_work_list(LISTING, &config(true, true));
    assert_eq!(list.names(), vec!["b(Europe).zip"]);
    assert_eq!(list.total_count(), 1);
}

#[test]
fn no_filters_keep_everything_but_parent_link() {
    let list = build_work_list(LISTING, &config(false, false));
    assert_eq!(
        list.names(),
        vec!["a(USA).zip", "b(Europe).zip", "c(Europe)(Demo).zip"]
    );
}

#[test]
fn first_anchor_is_dropped_even_when_acceptable() {
    let hrefs = ["b(Europe).zip", "d(Europe).zip"];
    let list = build_work_list(hrefs, &config(true, true));
    assert_eq!(list.names(), vec!["d(Europe).zip"]);
}

#[test]
fn total_count_matches_accepted_candidates() {
    let hrefs = [
        "../",
        "x (Europe).zip",
        "y (World).zip",
        "z (Japan).zip",
        "w (Europe) (Beta).zip",
        "v%20(Europe).zip",
    ];
    let cfg = config(true, true);
    let expected = hrefs
        .iter()
        .skip(1)
        .filter(|href| is_accepted(&CatalogEntry::from_href(**href), &cfg))
        .count();

    let list = build_work_list(hrefs, &cfg);
    assert_eq!(list.total_count(), expected);
    assert_eq!(list.examined_count(), hrefs.len() - 1);
    assert_eq!(
        list.names(),
        vec!["x (Europe).zip", "y (World).zip", "v (Europe).zip"]
    );
}

#[test]
fn entry_limit_bounds_examined_candidates() {
    let cfg = RunConfiguration {
        entry_limit: Some(2),
        ..config(false, false)
    };
    let list = build_work_list(LISTING, &cfg);
    assert_eq!(list.names(), vec!["a(USA).zip", "b(Europe).zip"]);
    assert_eq!(list.examined_count(), 2);

    let cfg = RunConfiguration {
        entry_limit: Some(0),
        ..config(false, false)
    };
    assert!(build_work_list(LISTING, &cfg).is_empty());
}

#[test]
fn empty_listing_yields_empty_work_list() {
    let list = build_work_list(Vec::<String>::new(), &config(false, false));
    assert!(list.is_empty());
    assert_eq!(list.examined_count(), 0);

    let list = build_work_list(["../"], &config(false, false));
    assert!(list.is_empty());
}

#[test]
fn hrefs_are_kept_verbatim() {
    let list = build_work_list(["../", "b%20(Europe).zip"], &config(true, true));
    let entry = list.iter().next().unwrap();
    assert_eq!(entry.href, "b%20(Europe).zip");
    assert_eq!(entry.display_name, "b (Europe).zip");
}
