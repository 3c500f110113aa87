use std::collections::HashMap;

use testease_core::kinds::{self, BUILTIN_KINDS};

#[test]
fn kind_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, usize> = HashMap::new();

    for (idx, kind) in BUILTIN_KINDS.iter().enumerate() {
        assert_eq!(
            kinds::from_str(kind.name()).map(|k| k.name()),
            Some(kind.name()),
            "kind canonical spelling not resolvable: {}",
            kind.name()
        );

        if let Some(prev) = seen.insert(kind.name(), idx) {
            panic!("duplicate kind spelling {:?} at {} and {}", kind.name(), prev, idx);
        }
    }
}

#[test]
fn every_builtin_kind_descends_from_error() {
    for kind in BUILTIN_KINDS {
        assert!(kind.is(&kinds::ERROR), "{} is not rooted at Error", kind.name());
    }
}

#[test]
fn parents_are_registered() {
    for kind in BUILTIN_KINDS {
        if let Some(parent) = kind.parent() {
            assert!(
                kinds::from_str(parent.name()).is_some(),
                "parent {} of {} is not a registered builtin",
                parent.name(),
                kind.name()
            );
        }
    }
}

#[test]
fn descriptions_are_sentences() {
    for kind in BUILTIN_KINDS {
        let desc = kind.description();
        assert!(!desc.is_empty(), "{} has no description", kind.name());
        assert!(desc.ends_with('.'), "{} description should end with a period", kind.name());
    }
}

#[test]
fn lookup_is_case_sensitive() {
    assert!(kinds::from_str("DivideByZeroError").is_some());
    assert!(kinds::from_str("dividebyzeroerror").is_none());
}
