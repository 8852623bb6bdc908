//! Tests für Fehlerdarstellung und -konvertierung

use roomtype_matcher::error::MatchError;

/// Jede Variante liefert eine nicht-leere Meldung
#[test]
fn test_error_display() {
    let errors = vec![
        MatchError::Config("Testfehler".to_string()),
        MatchError::FileNotFound("mapping.csv".to_string()),
        MatchError::InvalidMapping("Spalte fehlt".to_string()),
        MatchError::ExcelRead("kaputt.xlsx".to_string()),
        MatchError::ExcelWrite("voll".to_string()),
        MatchError::ApiCall("CLI nicht gefunden".to_string()),
        MatchError::ApiParse("kein JSON".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "Fehlermeldung ist leer: {:?}", err);
    }
}

#[test]
fn test_error_debug() {
    let err = MatchError::Config("Test".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("Test"));
}

/// IO-Fehler werden transparent konvertiert
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "fehlt");
    let err: MatchError = io_err.into();

    assert!(matches!(err, MatchError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ ungültig }").unwrap_err();
    let err: MatchError = json_err.into();

    assert!(matches!(err, MatchError::JsonParse(_)));
}

#[test]
fn test_file_not_found_message_contains_path() {
    let err = MatchError::FileNotFound("/pfad/zur/mappe.xlsx".to_string());
    assert!(format!("{}", err).contains("/pfad/zur/mappe.xlsx"));
}
