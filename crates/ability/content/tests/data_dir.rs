use std::fs;

use ability_content::{AbilityCatalog, CatalogLoader, ContentFactory, starter_definitions};
use ability_core::{AbilityId, EngineConfig, FormulaRegistry};

const CATALOG: &str = r#"(
    abilities: [
        (
            id: "smite",
            timings: (
                cast_time: (value: (base: 1.0)),
                cooldown: (value: (base: 3.0)),
            ),
        ),
        (
            id: "ancient",
            timings: (
                cast_time: (
                    value: (base: 2.0),
                    formula: "float Forgotten::scale(float, int)",
                ),
            ),
        ),
    ],
)"#;

#[test]
fn factory_loads_catalog_and_falls_back_to_default_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(ContentFactory::CATALOG_FILE), CATALOG).unwrap();

    let factory = ContentFactory::new(dir.path());
    let catalog = factory.load_catalog().unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(factory.load_config().unwrap(), EngineConfig::default());

    fs::write(
        dir.path().join(ContentFactory::CONFIG_FILE),
        "global_cooldown = 0.75\nqueue_while_casting = false\n",
    )
    .unwrap();
    let config = factory.load_config().unwrap();
    assert_eq!(config.global_cooldown, 0.75);
    assert!(!config.queue_while_casting);
}

#[test]
fn bind_report_lists_unknown_signatures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abilities.ron");
    fs::write(&path, CATALOG).unwrap();

    let catalog = CatalogLoader::load(&path).unwrap();
    let report = catalog.bind_report(&FormulaRegistry::with_builtins());
    assert_eq!(report.bound, 0);
    assert_eq!(report.unresolved, vec!["float Forgotten::scale(float, int)"]);
}

#[test]
fn missing_catalog_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
    assert!(err.to_string().contains("abilities.ron"));
}

#[test]
fn starter_set_survives_a_ron_round_trip() {
    let catalog = AbilityCatalog::new(starter_definitions());
    let text = ron::ser::to_string_pretty(&catalog, ron::ser::PrettyConfig::default()).unwrap();

    let loaded = CatalogLoader::from_str(&text).unwrap();
    assert_eq!(loaded.abilities, catalog.abilities);
    assert!(loaded.get(&AbilityId::new("drain_life")).is_some());
    assert!(loaded.bind_report(&FormulaRegistry::with_builtins()).is_clean());
}
