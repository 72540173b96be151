use std::sync::Arc;

use kiosk_core::{Catalog, ConfigurationEngine, LayerProjector, Money, RecordingSurface};
use proptest::prelude::*;

const FEATURES: &[&str] = &[
    "sos_standard",
    "emergency_siren",
    "fire_ex_service",
    "first_aid_service",
    "common_request_btn",
    "aed_kit",
    "sos_extra",
    "led_28",
    "led_56_dual",
    "backlight_boards",
    "front_dome",
    "side_domes",
    "ptz_camera",
    "not_in_catalog",
];

const VERSIONS: &[Option<&str>] = &[None, Some("v4"), Some("V5"), Some("v5"), Some("")];

#[derive(Debug, Clone)]
enum Event {
    Version(Option<&'static str>),
    Toggle(&'static str, bool),
    Reset,
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        2 => prop::sample::select(VERSIONS).prop_map(Event::Version),
        6 => (prop::sample::select(FEATURES), any::<bool>()).prop_map(|(f, s)| Event::Toggle(f, s)),
        1 => Just(Event::Reset),
    ]
}

fn apply(engine: &mut ConfigurationEngine, event: &Event) {
    match event {
        Event::Version(v) => engine.set_version(*v).expect("known version"),
        Event::Toggle(f, s) => {
            engine.toggle_feature(f, *s);
        }
        Event::Reset => engine.reset(),
    }
}

fn engine() -> ConfigurationEngine {
    ConfigurationEngine::new(Arc::new(Catalog::builtin()))
}

proptest! {
    #[test]
    fn no_version_means_nothing_priced_or_shown(events in prop::collection::vec(event(), 0..40)) {
        let mut engine = engine();
        for e in &events {
            apply(&mut engine, e);
        }
        engine.set_version(None).expect("clear");

        prop_assert_eq!(engine.breakdown().total, Money::zero());
        prop_assert!(engine.breakdown().items.is_empty());
        prop_assert_eq!(engine.layer_plan().visible_count(), 0);
    }

    #[test]
    fn total_is_base_plus_enabled_selected_prices(events in prop::collection::vec(event(), 0..40)) {
        let mut engine = engine();
        for e in &events {
            apply(&mut engine, e);
        }

        let breakdown = engine.breakdown();
        match engine.active_version() {
            None => prop_assert_eq!(breakdown.total, Money::zero()),
            Some(version) => {
                let expected: Money = engine
                    .catalog()
                    .features()
                    .iter()
                    .filter(|f| engine.selection().is_feature_selected(&f.id))
                    .filter(|f| f.is_available_for(&version.id))
                    .map(|f| f.price)
                    .sum();
                prop_assert_eq!(breakdown.options_total, expected);
                prop_assert_eq!(breakdown.total, version.base_price + expected);
                prop_assert_eq!(engine.layer_plan().visible_count(), breakdown.items.len() + 1);
            }
        }
        prop_assert_eq!(breakdown, &engine.compute_price_breakdown());
    }

    #[test]
    fn repeated_toggle_is_a_no_op(
        events in prop::collection::vec(event(), 0..20),
        feature in prop::sample::select(FEATURES),
        selected in any::<bool>()
    ) {
        let mut engine = engine();
        for e in &events {
            apply(&mut engine, e);
        }

        engine.toggle_feature(feature, selected);
        let selection = engine.selection().clone();
        let breakdown = engine.breakdown().clone();
        let plan = engine.layer_plan().clone();

        engine.toggle_feature(feature, selected);
        prop_assert_eq!(engine.selection(), &selection);
        prop_assert_eq!(engine.breakdown(), &breakdown);
        prop_assert_eq!(engine.layer_plan(), &plan);
    }

    #[test]
    fn version_round_trip_is_stable(events in prop::collection::vec(event(), 0..40)) {
        let mut engine = engine();
        for e in &events {
            apply(&mut engine, e);
        }

        // The first visit to each version may clear unsupported selections;
        // afterwards switching back and forth must not change anything.
        engine.set_version(Some("v4")).expect("v4");
        engine.set_version(Some("v5")).expect("v5");
        engine.set_version(Some("v4")).expect("v4");
        let v4 = (engine.breakdown().clone(), engine.layer_plan().clone());
        engine.set_version(Some("v5")).expect("v5");
        let v5 = (engine.breakdown().clone(), engine.layer_plan().clone());

        engine.set_version(Some("v4")).expect("v4");
        prop_assert_eq!(&(engine.breakdown().clone(), engine.layer_plan().clone()), &v4);
        engine.set_version(Some("v5")).expect("v5");
        prop_assert_eq!(&(engine.breakdown().clone(), engine.layer_plan().clone()), &v5);
    }

    #[test]
    fn surface_matches_plan_after_any_sequence(events in prop::collection::vec(event(), 1..40)) {
        let mut engine = engine();
        let mut projector = LayerProjector::new();
        let mut surface = RecordingSurface::default();
        for e in &events {
            apply(&mut engine, e);
            projector.apply(engine.layer_plan(), &mut surface);
        }

        let plan = engine.layer_plan();
        prop_assert_eq!(surface.stage_visible, Some(plan.is_active()));
        prop_assert_eq!(surface.visible_count(), plan.visible_count());
        if plan.is_active() {
            for layer in plan.all() {
                prop_assert_eq!(surface.source(&layer.slot), layer.source.as_deref());
            }
        }
    }
}
