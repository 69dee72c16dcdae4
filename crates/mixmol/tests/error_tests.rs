//! Tests for core error types

use mixmol::core::MoleculeError;
use mixmol::LayoutOptions;

#[test]
fn test_parse_error() {
    let error = MoleculeError::parse_error("expected ':'".to_string(), 5, 10);
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Parse error"));
    assert!(error_msg.contains("expected ':'"));
    assert!(error_msg.contains("line 5"));
    assert!(error_msg.contains("column 10"));
}

#[test]
fn test_invalid_options_error() {
    let error = MoleculeError::invalid_options("width too small".to_string());
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Invalid layout options"));
    assert!(error_msg.contains("width too small"));
}

#[test]
fn test_input_error() {
    let error = MoleculeError::input_error("empty name".to_string());
    assert_eq!(error.to_string(), "Input error: empty name");
}

#[test]
fn test_io_error() {
    use std::io;
    let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
    let error: MoleculeError = io_err.into();
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("IO error"));
    assert!(error_msg.contains("File not found"));
}

#[test]
fn test_serialization_error() {
    let json_err = serde_json::from_str::<Vec<u8>>("nope").unwrap_err();
    let error: MoleculeError = json_err.into();
    assert!(error.to_string().starts_with("Serialization error"));
}

#[test]
fn test_options_validation() {
    assert!(LayoutOptions::default().validate().is_ok());

    let cases = [
        LayoutOptions::new(40.0, 300.0),
        LayoutOptions::new(400.0, 40.0),
        LayoutOptions::new(f64::NAN, 300.0),
        LayoutOptions::new(400.0, 300.0).with_base_radius(0.0),
        LayoutOptions::new(400.0, 300.0).with_base_radius(f64::INFINITY),
        LayoutOptions::new(400.0, 300.0).with_padding(-1.0),
    ];
    for options in cases {
        let err = options.validate().unwrap_err();
        assert!(matches!(err, MoleculeError::InvalidOptions { .. }), "{:?}", options);
    }
}

#[test]
fn test_errors_convert_to_anyhow() {
    fn fails() -> anyhow::Result<()> {
        LayoutOptions::new(10.0, 10.0).validate()?;
        Ok(())
    }
    assert!(fails().unwrap_err().to_string().contains("no room"));
}
