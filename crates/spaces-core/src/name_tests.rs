use super::*;
use proptest::prelude::*;

#[test]
fn trims_and_collapses_internal_whitespace() {
    assert_eq!(normalize_name("  Dev   Space\t\n").unwrap(), "Dev Space");
}

#[test]
fn rejects_whitespace_only() {
    assert_eq!(normalize_name("   \t\n  "), Err(ValidationError::EmptyName));
}

#[test]
fn rejects_empty_string() {
    assert_eq!(normalize_name(""), Err(ValidationError::EmptyName));
}

#[test]
fn accepts_long_name_quickly() {
    let long = "a".repeat(10_000);
    assert_eq!(normalize_name(&long).unwrap().len(), 10_000);
}

#[test]
fn derive_name_uses_host_of_first_url() {
    let urls = vec!["https://example.com/page".to_string(), "https://other.com".to_string()];
    assert_eq!(derive_name(&urls), "example.com");
}

#[test]
fn derive_name_falls_back_when_empty() {
    assert_eq!(derive_name(&[]), "Workspace");
}

#[test]
fn derive_name_falls_back_when_unparseable() {
    let urls = vec!["not a url".to_string()];
    assert_eq!(derive_name(&urls), "Workspace");
}

#[test]
fn validate_url_accepts_well_formed() {
    assert!(validate_url("https://example.com").is_ok());
}

#[test]
fn validate_url_rejects_malformed() {
    assert!(validate_url("not a url").is_err());
}

proptest! {
    #[test]
    fn normalize_name_is_idempotent(raw in ".{0,40}") {
        if let Ok(once) = normalize_name(&raw) {
            let twice = normalize_name(&once).unwrap();
            prop_assert_eq!(twice, once);
        }
    }

    #[test]
    fn normalize_name_collapses_padding_regardless_of_width(core in "[a-zA-Z0-9]{1,10}", pad in 0usize..6) {
        let padded = format!("{}{}{}", " ".repeat(pad), core, "\t\n".repeat(pad));
        prop_assert_eq!(normalize_name(&padded).unwrap(), core);
    }
}
