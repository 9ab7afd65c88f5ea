use downwind_core::chord::{build_chord, NodeOrder};
use downwind_core::{chord_json, TripEdge};

#[test]
fn trip_log_gives_directed_matrix() {
    let edges = vec![TripEdge::new("A", "B"), TripEdge::new("A", "B"), TripEdge::new("B", "A")];
    let m = build_chord(&edges, NodeOrder::Alphabetical);

    assert_eq!(m.names, vec!["A", "B"]);
    assert_eq!(m.matrix, vec![vec![0.0, 2.0], vec![1.0, 0.0]]);
}

#[test]
fn direction_is_never_collapsed() {
    let edges = vec![
        TripEdge { value: Some(3.0), ..TripEdge::new("Hookipa", "Kanaha") },
        TripEdge { value: Some(1.0), ..TripEdge::new("Kanaha", "Hookipa") },
    ];
    let m = build_chord(&edges, NodeOrder::Alphabetical);
    let a = m.index_of("Hookipa").unwrap();
    let b = m.index_of("Kanaha").unwrap();
    assert_eq!(m.matrix[a][b], 3.0);
    assert_eq!(m.matrix[b][a], 1.0);
}

#[test]
fn self_loops_land_on_the_diagonal() {
    let edges = vec![TripEdge::new("Kihei", "Kihei"), TripEdge::new("Kihei", "Kihei")];
    let m = build_chord(&edges, NodeOrder::Alphabetical);
    assert_eq!(m.names, vec!["Kihei"]);
    assert_eq!(m.matrix, vec![vec![2.0]]);
    assert_eq!(m.sources_by_target, vec![vec![0]]);
}

#[test]
fn popularity_orders_by_total_trips_then_name() {
    let edges = vec![
        TripEdge::new("A", "C"),
        TripEdge::new("B", "C"),
        TripEdge::new("C", "D"),
        TripEdge::new("D", "B"),
    ];
    // C: 3, B: 2, D: 2, A: 1
    let m = build_chord(&edges, NodeOrder::Popularity);
    assert_eq!(m.names, vec!["C", "B", "D", "A"]);

    let c = m.index_of("C").unwrap();
    let a = m.index_of("A").unwrap();
    assert_eq!(m.matrix[a][c], 1.0);
}

#[test]
fn sources_titles_and_totals() {
    let edges = vec![TripEdge::new("A", "B"), TripEdge::new("A", "B"), TripEdge::new("B", "A")];
    let m = build_chord(&edges, NodeOrder::Alphabetical);

    assert_eq!(m.sources_by_target, vec![vec![1], vec![0]]);
    assert_eq!(m.launches, vec![2.0, 1.0]);
    assert_eq!(m.landings, vec![1.0, 2.0]);
    assert_eq!(m.node_title(0), "2 launches 1 landing");
    assert_eq!(m.node_title(1), "1 launch 2 landings");
}

#[test]
fn empty_edge_list_gives_empty_matrix() {
    let m = build_chord(&[], NodeOrder::Popularity);
    assert!(m.names.is_empty());
    assert!(m.matrix.is_empty());
}

#[test]
fn json_accepts_beach_aliases_and_order() {
    let json = r#"[
        {"start_beach": "Sprecks", "end_beach": "Kanaha"},
        {"source": "Sprecks", "target": "Kanaha", "value": 2}
    ]"#;
    let out = chord_json(json, Some("popularity")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(v["names"], serde_json::json!(["Kanaha", "Sprecks"]));
    assert_eq!(v["matrix"][1][0], serde_json::json!(3.0));

    assert!(chord_json(json, Some("random")).is_err(), "ukjent rekkefølge skal feile");
}

#[test]
fn trip_log_csv_to_matrix() {
    let csv = "start_beach,end_beach\nKanaha,Kihei\nKanaha,Kihei\nKihei,Kihei\n";
    let edges = downwind_core::source::read_trips(csv.as_bytes()).unwrap();
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[0].weight(), 1.0);

    let m = build_chord(&edges, NodeOrder::Alphabetical);
    assert_eq!(m.matrix, vec![vec![0.0, 2.0], vec![0.0, 1.0]]);
    assert_eq!(m.sources_by_target[1], vec![0, 1]);
}
