//! Tests für den persistenten Match-Cache

use roomtype_matcher::resolver::cache::MatchCache;
use roomtype_matcher::resolver::RoomtypeGuess;
use std::collections::HashMap;
use tempfile::tempdir;

fn guess(nr: &str, roomtype: &str, confidence: f64, rationale: &str) -> RoomtypeGuess {
    RoomtypeGuess {
        nr: nr.into(),
        roomtype: roomtype.into(),
        confidence,
        rationale: rationale.into(),
    }
}

/// Fehlende Datei ergibt einen leeren Cache
#[test]
fn test_cache_missing_file_is_empty() {
    let dir = tempdir().expect("Tempdir fehlgeschlagen");
    let cache = MatchCache::load(&dir.path().join("cache.json"));

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
}

/// Speichern und Wiederladen
#[test]
fn test_cache_save_and_load() {
    let dir = tempdir().expect("Tempdir fehlgeschlagen");
    let path = dir.path().join("cache.json");

    let mut cache = MatchCache::load(&path);
    cache.insert("buero 101".into(), guess("1", "Büro", 0.9, "llm"));
    cache.save(&path).expect("Cache-Speichern fehlgeschlagen");

    let loaded = MatchCache::load(&path);
    assert_eq!(loaded.len(), 1);

    let entry = loaded.get("buero 101").expect("Eintrag fehlt");
    assert_eq!(entry.nr, "1");
    assert_eq!(entry.roomtype, "Büro");
    assert!((entry.confidence - 0.9).abs() < f64::EPSILON);
}

/// Das Dateiformat ist die flache JSON-Map aus den Bestandsläufen
#[test]
fn test_cache_reads_flat_json_map() {
    let dir = tempdir().expect("Tempdir fehlgeschlagen");
    let path = dir.path().join("cache.json");
    std::fs::write(
        &path,
        r#"{"buero": {"nr": "1", "roomtype": "Büro", "confidence": 0.95, "rationale": "fts"}}"#,
    )
    .unwrap();

    let cache = MatchCache::load(&path);
    let entry = cache.get("buero").expect("Eintrag fehlt");
    assert_eq!(entry.nr, "1");
    assert_eq!(entry.rationale, "fts");
}

/// Korrupte Datei wird als leerer Cache behandelt, nie als Fehler
#[test]
fn test_cache_corrupted_file() {
    let dir = tempdir().expect("Tempdir fehlgeschlagen");
    let path = dir.path().join("cache.json");
    std::fs::write(&path, "{ kein json }").unwrap();

    let cache = MatchCache::load(&path);
    assert!(cache.is_empty());
}

/// Elternverzeichnisse werden beim Speichern angelegt
#[test]
fn test_cache_save_creates_parent_dirs() {
    let dir = tempdir().expect("Tempdir fehlgeschlagen");
    let path = dir.path().join("tief/verschachtelt/cache.json");

    let mut cache = MatchCache::default();
    cache.insert("wc".into(), guess("2", "WC", 1.0, "fts"));
    cache.save(&path).expect("Cache-Speichern fehlgeschlagen");

    assert!(path.exists());
}

/// Neuere Einträge überschreiben ältere
#[test]
fn test_cache_overwrite() {
    let mut cache = MatchCache::default();
    cache.insert("buero".into(), guess("1", "Büro", 0.5, "fts"));
    cache.insert("buero".into(), guess("1", "Büro", 0.95, "llm"));

    assert_eq!(cache.len(), 1);
    let entry = cache.get("buero").unwrap();
    assert_eq!(entry.rationale, "llm");
}

/// extend mischt eine Ergebnis-Map ein (letzter Schreiber gewinnt)
#[test]
fn test_cache_extend() {
    let mut cache = MatchCache::default();
    cache.insert("buero".into(), guess("1", "Büro", 0.5, "fts"));

    let mut updates = HashMap::new();
    updates.insert("wc".to_string(), guess("2", "WC", 0.9, "llm"));
    updates.insert("buero".to_string(), guess("1", "Büro", 0.99, "llm"));
    cache.extend(updates);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("buero").unwrap().rationale, "llm");
    assert_eq!(cache.get("wc").unwrap().nr, "2");
}

/// Gespeicherter Cache ist eine Obermenge des geladenen
#[test]
fn test_cache_roundtrip_preserves_existing_entries() {
    let dir = tempdir().expect("Tempdir fehlgeschlagen");
    let path = dir.path().join("cache.json");

    let mut cache = MatchCache::default();
    cache.insert("alt".into(), guess("1", "Büro", 0.8, "llm"));
    cache.save(&path).unwrap();

    let mut reloaded = MatchCache::load(&path);
    reloaded.insert("neu".into(), guess("2", "WC", 0.9, "llm"));
    reloaded.save(&path).unwrap();

    let final_cache = MatchCache::load(&path);
    assert_eq!(final_cache.len(), 2);
    assert!(final_cache.get("alt").is_some());
    assert!(final_cache.get("neu").is_some());
}
