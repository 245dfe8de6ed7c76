// tests/parse_page.rs
//
// Offline parse of a saved evaluate page.
//
use chrono::{NaiveDate, NaiveDateTime};

use price_watch::Error;
use price_watch::progress::{NullProgress, RecordingProgress};
use price_watch::specs::evaluate::parse_page;
use price_watch::specs::filter::CategoryFilter;

fn sample() -> String {
    std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/evaluate_sample.html"))
        .expect("read tests/fixtures/evaluate_sample.html")
}

fn t1() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
}

#[test]
fn extracts_in_scope_listings() {
    let doc = sample();
    let (recs, stats) = parse_page(&doc, &CategoryFilter::default(), t1(), &mut NullProgress).unwrap();

    let got: Vec<(&str, &str, &str, &str, u32)> = recs
        .iter()
        .map(|r| (r.category.as_str(), r.vendor.as_str(), r.product.as_str(), r.note.as_str(), r.price))
        .collect();
    assert_eq!(got, vec![
        ("nvidia gt series", "ASUS", "GT1030(2G)", "靜音版", 2490),
        ("nvidia gt series", "MSI", "GT730(2G)", "低階", 1590),
        ("nvidia rtx4070 系列", "ASUS", "RTX4070(OC)", "Dual", 17999),
        ("nvidia rtx4070 系列", "GIGABYTE", "RTX4070 WINDFORCE(12G)(Rev 2.0)", "三年保", 17490),
        ("amd rx 7000 系列", "SAPPHIRE", "RX7600(8G)", "PULSE", 8990),
    ]);
    assert!(recs.iter().all(|r| r.captured_at == t1()));

    assert_eq!(stats.groups_seen, 5);
    assert_eq!(stats.groups_accepted, 3);
    assert_eq!(stats.items_skipped, 3);
}

#[test]
fn parsing_is_deterministic() {
    let doc = sample();
    let f = CategoryFilter::default();
    let a = parse_page(&doc, &f, t1(), &mut NullProgress).unwrap();
    let b = parse_page(&doc, &f, t1(), &mut NullProgress).unwrap();
    assert_eq!(a, b);
}

#[test]
fn progress_sees_groups_and_records() {
    let doc = sample();
    let mut p = RecordingProgress::default();
    let (recs, _) = parse_page(&doc, &CategoryFilter::default(), t1(), &mut p).unwrap();
    assert_eq!(p.records, recs);
    assert_eq!(p.lines, vec!["Group: nvidia gt series", "Group: nvidia rtx4070 系列", "Group: amd rx 7000 系列"]);
}

#[test]
fn layout_drift_fails_the_whole_page() {
    // one in-scope listing lost its closing parenthesis
    let doc = sample().replace("SAPPHIRE RX7600(8G) PULSE", "SAPPHIRE RX7600 8G PULSE");
    match parse_page(&doc, &CategoryFilter::default(), t1(), &mut NullProgress) {
        Err(Error::MalformedRecord { field, text }) => {
            assert_eq!(field, "')' ending product");
            assert!(text.contains("SAPPHIRE"));
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn truncated_page_is_malformed_markup() {
    let doc = sample();
    let cut = doc.find("<option value=\"401\">").unwrap();
    let truncated = &doc[..cut];
    let err = parse_page(truncated, &CategoryFilter::default(), t1(), &mut NullProgress).unwrap_err();
    assert!(matches!(err, Error::MalformedMarkup { ref tag, .. } if tag == "optgroup"));
    assert_eq!(err.stage(), "scan");
}
