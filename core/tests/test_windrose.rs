use std::f64::consts::PI;

use downwind_core::windrose::{
    bin_wind, RosePatch, SpeedField, WindRose, WindRoseConfig, WindRoseOptions,
};
use downwind_core::{CoreError, WindReading};

fn reading(wdir: Option<f64>, wavg: Option<f64>) -> WindReading {
    WindReading { ts: None, wavg, wdir, wgust: wavg.map(|w| w + 5.0), wlull: None }
}

fn sample() -> Vec<WindReading> {
    vec![
        reading(Some(0.0), Some(3.0)),    // N, 0-5
        reading(Some(90.0), Some(7.0)),   // E, 5-10
        reading(Some(95.0), Some(12.0)),  // E, 10-15
        reading(Some(180.0), Some(30.0)), // S, 25+
        reading(Some(-90.0), Some(2.0)),  // W, 0-5
        reading(Some(f64::NAN), Some(5.0)),
        reading(None, Some(5.0)),
        reading(Some(45.0), Some(-1.0)), // under første grense
    ]
}

fn four_way() -> WindRoseConfig {
    WindRoseConfig { n_directions: 4, ..WindRoseConfig::default() }
}

#[test]
fn normalized_shares_sum_to_one() {
    let bins = bin_wind(&sample(), &four_way());
    assert_eq!(bins.total, 5);
    assert_eq!(bins.dropped, 3);

    let sum: f64 = bins.cells.iter().map(|c| c.value).sum();
    assert!((sum - 1.0).abs() < 1e-12, "sum={sum}");

    let east: Vec<_> = bins.cells.iter().filter(|c| c.sector == 1).collect();
    assert_eq!(east.len(), 2);
    assert_eq!(east[0].label, "5-10");
    assert_eq!(east[1].label, "10-15");
    // stablet fra 0 og utover
    assert_eq!(east[0].r0, 0.0);
    assert!((east[0].r1 - 0.2).abs() < 1e-12);
    assert!((east[1].r0 - 0.2).abs() < 1e-12);
    assert!((east[1].r1 - 0.4).abs() < 1e-12);

    let south = bins.cells.iter().find(|c| c.sector == 2).unwrap();
    assert_eq!(south.label, "25+");
}

#[test]
fn raw_counts_without_normalize() {
    let cfg = WindRoseConfig { normalize: false, ..four_way() };
    let bins = bin_wind(&sample(), &cfg);
    assert_eq!(bins.sector_totals, vec![1.0, 2.0, 1.0, 1.0]);
    assert_eq!(bins.max_sector_total(), 2.0);
    assert!(bins.cells.iter().all(|c| c.value == c.count as f64));
}

#[test]
fn empty_readings_give_empty_rose() {
    let rose = WindRose::new(&[], WindRoseConfig::default());
    assert!(rose.bins().cells.is_empty());
    assert_eq!(rose.bins().total, 0);
    assert!(rose.arcs().is_empty());
}

#[test]
fn geometry_scales_to_radius_and_sector_angles() {
    let rose = WindRose::new(&sample(), four_way());
    let arcs = rose.arcs();

    let outer = arcs.iter().map(|a| a.outer_radius).fold(0.0, f64::max);
    assert!((outer - 80.0).abs() < 1e-9, "største sektor fyller radius");

    let north = arcs.iter().find(|a| a.sector == 0).unwrap();
    assert!((north.start_angle + PI / 4.0).abs() < 1e-12);
    assert!((north.end_angle - PI / 4.0).abs() < 1e-12);
    assert_eq!(north.inner_radius, 0.0);
}

#[test]
fn update_reprojects_without_rebinning() {
    let mut rose = WindRose::new(&sample(), four_way());
    let bins_before = rose.bins() as *const _;
    let angles_before: Vec<_> = rose.arcs().iter().map(|a| (a.start_angle, a.end_angle)).collect();

    rose.update(RosePatch { x: Some(10.0), y: Some(20.0), radius: Some(40.0) });
    assert_eq!(rose.center(), (10.0, 20.0));
    let outer = rose.arcs().iter().map(|a| a.outer_radius).fold(0.0, f64::max);
    assert!((outer - 40.0).abs() < 1e-9);

    // vinkler uendret, binning gjenbrukt
    let angles_after: Vec<_> = rose.arcs().iter().map(|a| (a.start_angle, a.end_angle)).collect();
    assert_eq!(angles_before, angles_after);
    assert!(std::ptr::eq(bins_before, rose.bins()));

    // samme patch igjen => samme tilstand
    let snap1 = rose.snapshot();
    rose.update(RosePatch { x: Some(10.0), y: Some(20.0), radius: Some(40.0) });
    assert_eq!(snap1, rose.snapshot());
}

#[test]
fn update_ignores_radius_inside_hole() {
    let cfg = WindRoseConfig { inner_hole: 10.0, ..four_way() };
    let mut rose = WindRose::new(&sample(), cfg);
    rose.update(RosePatch { radius: Some(5.0), ..Default::default() });
    assert_eq!(rose.config().radius, 80.0);

    let inner = rose.arcs().iter().map(|a| a.inner_radius).fold(f64::INFINITY, f64::min);
    assert!((inner - 10.0).abs() < 1e-9);
}

#[test]
fn options_fall_back_to_defaults_and_accept_camel_case() {
    let opts: WindRoseOptions = serde_json::from_str(
        r#"{"nDirections": 8, "speedBreaks": [10, 0, 5, 5], "speedAccessor": "gust", "bogus": 1}"#,
    )
    .unwrap();
    let cfg = WindRoseConfig::from_options(&opts).unwrap();

    assert_eq!(cfg.n_directions, 8);
    assert_eq!(cfg.speed_breaks, vec![0.0, 5.0, 10.0]);
    assert_eq!(cfg.speed_field, SpeedField::Gust);
    assert!(cfg.normalize);
    assert_eq!(cfg.radius, 80.0);

    let defaults = WindRoseConfig::from_options(&WindRoseOptions::default()).unwrap();
    assert_eq!(defaults, WindRoseConfig::default());
}

#[test]
fn unusable_options_are_rejected() {
    let zero = WindRoseOptions { n_directions: Some(0), ..Default::default() };
    assert!(matches!(WindRoseConfig::from_options(&zero), Err(CoreError::InvalidConfig(_))));

    let no_breaks = WindRoseOptions { speed_breaks: Some(vec![f64::NAN]), ..Default::default() };
    assert!(WindRoseConfig::from_options(&no_breaks).is_err());

    let hole = WindRoseOptions { radius: Some(10.0), inner_hole: Some(10.0), ..Default::default() };
    assert!(WindRoseConfig::from_options(&hole).is_err());
}

#[test]
fn gust_field_bins_differently() {
    let cfg = WindRoseConfig { speed_field: SpeedField::Gust, ..four_way() };
    let bins = bin_wind(&sample(), &cfg);
    // -1 + 5 = 4 blir bindbar med kast
    assert_eq!(bins.total, 6);
}

#[test]
fn compass_labels_and_colors() {
    let rose = WindRose::new(&sample(), WindRoseConfig::default());
    assert_eq!(rose.sector_label(0), "N");
    assert_eq!(rose.sector_label(4), "E");
    assert_eq!(rose.sector_label(15), "NNW");
    assert_eq!(rose.band_color(0), "#1f77b4");
    assert_eq!(rose.band_color(10), "#1f77b4"); // palett sykles

    let odd = WindRose::new(&[], WindRoseConfig { n_directions: 12, ..WindRoseConfig::default() });
    assert_eq!(odd.sector_label(3), "90°");
}

#[test]
fn new_cleans_hand_built_breaks() {
    let cfg = WindRoseConfig {
        n_directions: 4,
        speed_breaks: vec![10.0, f64::NAN, 0.0, 5.0, 5.0],
        ..WindRoseConfig::default()
    };
    let rose = WindRose::new(&[reading(Some(0.0), Some(7.0))], cfg);
    assert_eq!(rose.config().speed_breaks, vec![0.0, 5.0, 10.0]);

    let cell = &rose.bins().cells[0];
    assert_eq!(cell.label, "5-10", "7 kn hører til 5-10 også med usortert input");
}
