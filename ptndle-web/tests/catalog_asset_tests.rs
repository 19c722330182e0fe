use std::collections::HashSet;

use ptndle_web::game::{
    ATTRIBUTE_KEYS, AttributeKey, CHARACTERS_JSON, DataLoader, WebDataLoader,
    calculate_thresholds, evaluate_guess,
};
use serde_json::Value;

#[test]
fn bundled_catalog_loads() {
    let catalog = WebDataLoader.load_catalog().unwrap();
    assert_eq!(catalog.len(), 16);
    let names: HashSet<&str> = catalog.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names.len(), catalog.len());
}

#[test]
fn every_entry_carries_all_scored_attributes() {
    let raw: Vec<Value> = serde_json::from_str(CHARACTERS_JSON).unwrap();
    for entry in &raw {
        let object = entry.as_object().unwrap();
        for key in ATTRIBUTE_KEYS {
            assert!(object.contains_key(key), "{entry} missing {key}");
        }
        assert!(object["height"].as_u64().unwrap() > 0);
    }
}

#[test]
fn every_entry_has_artwork() {
    let catalog = WebDataLoader.load_catalog().unwrap();
    for character in catalog.iter() {
        assert!(character.image_full.ends_with("_full.png"), "{}", character.name);
        assert!(character.image_icon.ends_with("_icon.png"), "{}", character.name);
    }
}

#[test]
fn self_guess_is_exact_for_every_entry() {
    let catalog = WebDataLoader.load_catalog().unwrap();
    for character in catalog.iter() {
        let thresholds = calculate_thresholds(character);
        let hint = evaluate_guess(character, character, &thresholds);
        assert!(hint.is_correct(), "{}", character.name);
        assert!(hint.attribute(AttributeKey::Height).is_some());
    }
}
