use super::*;
use screen_core::{cancel_primary, ScreenController};
use shared::domain::OperationKind;

fn noop(_: &mut ScreenController) {}

#[test]
fn builtin_covers_every_screen_once_in_catalog_order() {
    let registry = Registry::builtin();
    let ids = registry.iter().map(|def| def.id).collect::<Vec<_>>();
    assert_eq!(ids, ScreenId::ALL.to_vec());
}

#[test]
fn continuous_screens_are_the_never_ending_ones() {
    let registry = Registry::builtin();
    let continuous = registry
        .iter()
        .filter(|def| def.kind() == OperationKind::Continuous)
        .map(|def| def.id)
        .collect::<Vec<_>>();
    assert_eq!(
        continuous,
        vec![
            ScreenId::IntervalOperator,
            ScreenId::ThrottleOperator,
            ScreenId::EventBusTicker,
        ]
    );
}

#[test]
fn every_definition_has_title_and_description() {
    for def in Registry::builtin().iter() {
        assert!(!def.title.is_empty(), "{} has no title", def.id);
        assert!(
            def.description.contains("Press start"),
            "{} lacks usage instructions",
            def.id
        );
    }
}

#[test]
fn register_rejects_duplicates() {
    let mut registry = Registry::new();
    assert!(registry.is_empty());

    let def = OperationDef::one_shot(ScreenId::JustOperator, "Just", "desc", noop);
    registry.register(def).expect("first registration");
    assert_eq!(
        registry.register(def),
        Err(RegistryError::Duplicate(ScreenId::JustOperator))
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn lookups_report_unknown_and_unregistered_screens() {
    let mut registry = Registry::new();
    registry
        .register(OperationDef::continuous(
            ScreenId::IntervalOperator,
            "Interval",
            "desc",
            noop,
            cancel_primary,
        ))
        .expect("register");

    assert_eq!(
        registry.find("intervaloperator").map(|def| def.id),
        Ok(ScreenId::IntervalOperator)
    );
    assert_eq!(
        registry.get(ScreenId::MapOperator).map(|def| def.id),
        Err(RegistryError::Unregistered(ScreenId::MapOperator))
    );
    assert!(matches!(
        registry.find("Bogus"),
        Err(RegistryError::UnknownScreen(_))
    ));
}
