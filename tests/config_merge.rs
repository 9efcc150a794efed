use glucotv::config::{self, Insets};
use glucotv::viz::compute_regions;
use glucotv::{ChartConfig, PartialChartConfig};

#[test]
fn json_override_merges_per_group() {
    let o: PartialChartConfig = serde_json::from_str(
        r##"{
            "size": {"width": 480},
            "range": {"goodMin": 80, "goodMax": 180},
            "style": {"line": "#00ffff"},
            "generateMockData": true
        }"##,
    )
    .unwrap();
    let c = config::merge(&ChartConfig::default(), &o);

    assert_eq!(c.size.width, 480);
    assert_eq!(c.size.height, 240);
    assert_eq!(c.size.header_height, 90);
    assert_eq!(c.range.min, 40.0);
    assert_eq!(c.range.good_min, 80.0);
    assert_eq!(c.range.good_max, 180.0);
    assert_eq!(c.style.line, "#00ffff");
    assert_eq!(c.style.background, "black");
    assert_eq!(c.margin, Insets::new(5, 5, 15, 25));
    assert!(c.generate_mock_data);
}

#[test]
fn invalid_ranges_are_accepted_as_is() {
    let o: PartialChartConfig =
        serde_json::from_str(r#"{"range": {"goodMin": 250, "goodMax": 100}}"#).unwrap();
    let c = ChartConfig::with_overrides(&o);
    assert_eq!(c.range.good_min, 250.0);
    assert_eq!(c.range.good_max, 100.0);
}

#[test]
fn effective_config_round_trips_through_json() {
    let c = ChartConfig::default();
    let text = serde_json::to_string(&c).unwrap();
    assert!(text.contains("\"shownSpanHours\":3.0"));
    let back: ChartConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, c);
}

#[test]
fn regions_follow_merged_margins() {
    let o: PartialChartConfig = serde_json::from_str(r#"{"margin": {"left": 35}}"#).unwrap();
    let r = compute_regions(&ChartConfig::with_overrides(&o));
    assert_eq!(r.content.x, 35);
    assert_eq!(r.content.width, 200);
    assert_eq!(r.graph.x, 35);
    assert_eq!(r.plot.x, 40);
}
