mod common;

use common::TestEnv;
use predicates::str::contains;
use serde_json::Value;

#[test]
fn extract_strips_census_prefix() {
    let env = TestEnv::new();
    env.run(&["extract"]);
    let population = env.read("data/processed/postcode_population.csv");
    let lines: Vec<&str> = population.lines().collect();
    assert_eq!(
        lines,
        ["POSTCODE,POPULATION", "2000,9000", "2500,0", "2600,1000", "3000,2000"]
    );
}

#[test]
fn combine_joins_in_firearms_order() {
    let env = TestEnv::new();
    env.run(&["extract"]);
    let stdout = env.run(&["combine"]);
    assert!(stdout.contains("Total postcodes: 5"));
    assert!(stdout.contains("Postcodes with population data: 4"));
    assert!(stdout.contains("Postcodes without population data: 1"));

    let combined = env.read("data/processed/postcode_population_firearms.csv");
    let lines: Vec<&str> = combined.lines().collect();
    assert_eq!(
        lines,
        [
            "POSTCODE,POPULATION,FIREARMS,FIREARMS_PER_1000",
            "2000,9000,45,5.00",
            "2999,N/A,10,",
            "2500,0,3,N/A",
            "2600,1000,20,20.00",
            "3000,2000,7,3.50",
        ]
    );
}

#[test]
fn rerunning_is_byte_identical() {
    let env = TestEnv::new();
    env.run(&["extract"]);
    env.run(&["combine"]);
    let first = env.read("data/processed/postcode_population_firearms.csv");
    env.run(&["extract"]);
    env.run(&["combine"]);
    assert_eq!(env.read("data/processed/postcode_population_firearms.csv"), first);
}

#[test]
fn missing_census_is_fatal() {
    let env = TestEnv::new();
    std::fs::remove_dir_all(env.root.join("data/raw/2021_GCP_POA_for_NSW_short-header"))
        .expect("remove census");
    env.cmd().arg("extract").assert().failure();
}

#[test]
fn choropleth_only_maps_region_with_rates() {
    let env = TestEnv::new();
    env.run(&["extract"]);
    env.run(&["combine"]);
    let stdout = env.run(&["choropleth"]);
    assert!(stdout.contains("Min rate: 5.00 per 1000"));
    assert!(stdout.contains("Max rate: 20.00 per 1000"));

    let html = env.read("output/nsw_firearms_choropleth.html");
    assert!(html.contains("\"POA_CODE21\":\"2000\""));
    assert!(html.contains("\"POA_CODE21\":\"2600\""));
    assert!(!html.contains("\"POA_CODE21\":\"2500\""));
    assert!(!html.contains("\"POA_CODE21\":\"2999\""));
    assert!(!html.contains("\"POA_CODE21\":\"3000\""));
    assert!(html.contains("#FFEDA0"));
    assert!(html.contains("#800026"));
}

#[test]
fn pages_writes_topology_pair() {
    let env = TestEnv::new();
    env.run(&["extract"]);
    env.run(&["combine"]);
    env.run(&["pages"]);

    let topology: Value = serde_json::from_str(&env.read("data.topojson")).expect("topojson");
    assert_eq!(topology["type"], "Topology");
    let geometries = topology["objects"]["data"]["geometries"]
        .as_array()
        .expect("geometries");
    assert_eq!(geometries.len(), 2);
    for geometry in geometries {
        let code = geometry["properties"]["POA_CODE21"].as_str().expect("code");
        assert!(code.starts_with('2'));
        assert!(geometry["properties"]["firearms_rate"].is_f64());
    }

    let html = env.read("map.html");
    assert!(html.contains("fetch(\"data.topojson\")"));
    assert!(html.contains("function getColor(rate)"));
}

#[test]
fn optimized_and_markers_render() {
    let env = TestEnv::new();
    env.run(&["extract"]);
    env.run(&["combine"]);
    env.run(&["optimized", "--tolerance", "0.05"]);
    assert!(env.read("map.html").contains("\"fill_color\""));

    env.run(&["markers"]);
    let html = env.read("output/nsw_firearms_heatmap.html");
    assert!(html.contains("circleMarker"));
    assert!(html.contains("#00ff00"));
    assert!(html.contains("#ff0000"));
    assert!(html.contains("\"POA_CODE21\":\"2000\""));
    assert!(html.contains("\"POA_CODE21\":\"2600\""));
    assert!(!html.contains("\"POA_CODE21\":\"3000\""));
    assert!(!html.contains("\"POA_CODE21\":\"2999\""));
}

#[test]
fn nothing_to_map_fails() {
    let env = TestEnv::with_firearms("POSTCODE,FIREARMS\n3000,7\n");
    env.run(&["extract"]);
    env.run(&["combine"]);
    env.cmd()
        .arg("choropleth")
        .assert()
        .failure()
        .stderr(contains("no boundary with prefix 2"));
}

#[test]
fn all_runs_every_stage() {
    let env = TestEnv::new();
    env.run(&["all"]);
    for file in [
        "data/processed/postcode_population.csv",
        "data/processed/postcode_population_firearms.csv",
        "output/nsw_firearms_choropleth.html",
        "output/nsw_firearms_heatmap.html",
        "data.topojson",
        "map.html",
    ] {
        assert!(env.root.join(file).exists(), "{file} missing");
    }
}
