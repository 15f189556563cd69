#![forbid(unsafe_code)]
use duty_roster::{
    enumerate, export_config_json, io, is_valid, load_config_from_file, ConfigError, FacilitySpec,
    RosterConfig,
};
use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;

#[test]
fn even_split_hands_remainder_to_first_facilities() {
    let names = ["North", "South", "East", "West", "Harbour", "Central", "Hill", "Bay"];
    let config = RosterConfig::even_split(2025, 10, &names).unwrap();
    let counts: Vec<u32> = config.facilities.iter().map(|f| f.required).collect();
    assert_eq!(counts, vec![4, 4, 4, 4, 4, 4, 4, 3]);
    assert_eq!(config.max_patterns, 10);
    assert_eq!(config.time_budget_secs, 20);
    assert_eq!(config.spacing, 4);

    let feb = RosterConfig::even_split(2025, 2, &names[..6]).unwrap();
    let total: u32 = feb.facilities.iter().map(|f| f.required).sum();
    assert_eq!(total, 28);
}

#[test]
fn save_and_load_config_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = RosterConfig::even_split(2025, 10, &["A", "B", "C", "D", "E", "F", "G", "H"]).unwrap();
    config.facilities[2].excluded_days = BTreeSet::from([1, 2, 31]);
    config.max_patterns = 3;
    export_config_json(&path, &config).unwrap();

    let loaded = load_config_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn defaults_apply_to_minimal_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"year": 2024, "month": 2, "facilities": [
            {"name": "A", "required": 8}, {"name": "B", "required": 7},
            {"name": "C", "required": 7}, {"name": "D", "required": 7}
        ]}"#,
    )
    .unwrap();
    let config = load_config_from_file(&path).unwrap();
    assert_eq!(config.max_patterns, 10);
    assert_eq!(config.spacing, 4);
    assert!(config.facilities.iter().all(|f| f.excluded_days.is_empty()));
    assert_eq!(config.build_model().unwrap().days(), 29);
}

#[test]
fn load_rejects_sum_mismatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = RosterConfig::even_split(2025, 10, &["A", "B", "C", "D", "E", "F"]).unwrap();
    config.facilities[0].required += 1;
    export_config_json(&path, &config).unwrap();

    let err = load_config_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("sum to 32"), "{err}");
}

#[test]
fn excluded_days_are_one_indexed() {
    let mut config = RosterConfig::even_split(2025, 10, &["A", "B", "C", "D", "E", "F", "G", "H"]).unwrap();
    config.facilities[0].excluded_days = BTreeSet::from([1, 31]);
    let model = config.build_model().unwrap();
    assert!(!model.is_allowed(0, 0));
    assert!(!model.is_allowed(30, 0));
    assert!(model.is_allowed(1, 0));

    config.facilities[0].excluded_days = BTreeSet::from([0]);
    assert!(matches!(
        config.build_model().unwrap_err(),
        ConfigError::ExcludedDayOutOfRange { day: 0, .. }
    ));
    config.facilities[0].excluded_days = BTreeSet::from([32]);
    assert!(matches!(
        config.build_model().unwrap_err(),
        ConfigError::ExcludedDayOutOfRange { day: 32, days: 31, .. }
    ));
}

#[test]
fn config_drives_search() {
    let mut config = RosterConfig::even_split(2025, 10, &["A", "B", "C", "D", "E", "F", "G", "H"]).unwrap();
    config.max_patterns = 4;
    let model = config.build_model().unwrap();
    let set = enumerate(&model, &config.search_options()).unwrap();
    assert_eq!(set.len(), 4);
    assert!(set.solutions.iter().all(|a| is_valid(&model, a)));

    config.max_patterns = 0;
    assert_eq!(config.validate().unwrap_err(), ConfigError::ZeroSolutionCap);
}

#[test]
fn import_facilities_from_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("facilities.csv");
    fs::write(
        &path,
        "name,required,excluded\nNorth,5,1;3-5\nSouth,5,\nEast,5,10 - 12 ; 20\n",
    )
    .unwrap();

    let specs = io::import_facilities_csv(&path).unwrap();
    assert_eq!(
        specs,
        vec![
            FacilitySpec {
                name: "North".into(),
                required: 5,
                excluded_days: BTreeSet::from([1, 3, 4, 5]),
            },
            FacilitySpec {
                name: "South".into(),
                required: 5,
                excluded_days: BTreeSet::new(),
            },
            FacilitySpec {
                name: "East".into(),
                required: 5,
                excluded_days: BTreeSet::from([10, 11, 12, 20]),
            },
        ]
    );

    fs::write(&path, "name,required,excluded\nNorth,five,\n").unwrap();
    assert!(io::import_facilities_csv(&path).is_err());
}

#[test]
fn excluded_ranges_are_bounded_to_a_month() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("facilities.csv");
    for bad in ["1-4000000000", "32", "0-3", "5-40"] {
        fs::write(&path, format!("name,required,excluded\nNorth,5,{bad}\n")).unwrap();
        let err = io::import_facilities_csv(&path).unwrap_err();
        assert!(format!("{err:#}").contains("outside 1..=31"), "{bad}: {err:#}");
    }

    fs::write(&path, "name,required,excluded\nNorth,5,1-31\n").unwrap();
    let specs = io::import_facilities_csv(&path).unwrap();
    assert_eq!(specs[0].excluded_days.len(), 31);
}
