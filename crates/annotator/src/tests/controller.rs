use super::modeler;
use crate::clock::with_fixed_now;
use crate::controller::{PanelController, PanelState, SubmitOutcome, TargetOutcome};
use crate::features::{EmojiAnnotation, SuitabilityScore};
use crate::router::{Gesture, Routed, Router};
use annotator_model::{ElementId, Modeler};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;

fn score_controller(modeler: &Modeler) -> PanelController<SuitabilityScore> {
    PanelController::new(SuitabilityScore::default(), Arc::clone(modeler.moddle()))
}

fn emoji_controller(modeler: &Modeler) -> PanelController<EmojiAnnotation> {
    PanelController::new(
        EmojiAnnotation::new(vec!["😀".to_string(), "👍".to_string()]),
        Arc::clone(modeler.moddle()),
    )
}

fn id(s: &str) -> ElementId {
    ElementId::new(s)
}

#[test]
fn targeting_populates_the_view() {
    let modeler = modeler();
    let mut controller = score_controller(&modeler);
    let doc = modeler.document().unwrap();

    assert_eq!(controller.targeted(doc, &id("Scored")), TargetOutcome::Bound);
    let view = controller.view();
    assert!(view.visible);
    assert_eq!(view.field, "3");
    assert_eq!(view.detail, "2015-01-20T14:23:21.000Z");
    assert!(view.submit_enabled);
    assert!(!view.warning_visible);
    assert!(view.focused);

    assert_eq!(controller.targeted(doc, &id("n1")), TargetOutcome::Bound);
    assert_eq!(controller.view().field, "");
    assert_eq!(controller.view().detail, "-");
    assert!(controller.view().warning_visible);
    assert!(!controller.view().submit_enabled);
}

#[test]
fn root_shows_the_panel_but_binds_nothing() {
    let mut modeler = modeler();
    let mut controller = score_controller(&modeler);
    let doc = modeler.document().unwrap();

    controller.targeted(doc, &id("n1"));
    controller.input_changed("5");
    assert_eq!(
        controller.targeted(doc, &id("Process_1")),
        TargetOutcome::RootIgnored
    );
    assert!(controller.view().visible);
    assert_eq!(controller.target(), None);
    assert_eq!(controller.state(), &PanelState::Closed);
    assert_eq!(controller.submit(&mut modeler), SubmitOutcome::Ignored);
    assert!(!modeler.can_undo());
}

#[test]
fn invalid_input_never_commits() {
    let mut modeler = modeler();
    let mut controller = score_controller(&modeler);
    controller.targeted(modeler.document().unwrap(), &id("n1"));

    for bad in ["abc", "", "12x"] {
        assert!(!controller.input_changed(bad));
        assert!(controller.view().warning_visible);
        assert!(!controller.view().submit_enabled);
        assert_eq!(controller.submit(&mut modeler), SubmitOutcome::Invalid);
        assert!(controller.is_open());
    }
    assert!(!modeler.can_undo());

    assert!(controller.input_changed("4"));
    assert!(!controller.view().warning_visible);
    assert!(controller.view().submit_enabled);
}

#[test]
fn submit_creates_one_record_then_reuses_it() {
    let mut modeler = modeler();
    let mut controller = score_controller(&modeler);
    let first = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 2, 1, 8, 30, 0).unwrap();

    controller.targeted(modeler.document().unwrap(), &id("n1"));
    controller.input_changed("7.5");
    let outcome = with_fixed_now(Some(first), || controller.submit(&mut modeler));
    assert_eq!(outcome, SubmitOutcome::Committed);
    assert!(!controller.view().visible);

    let bo = modeler.business_object("n1").unwrap();
    assert_eq!(bo.get("suitable"), Some(&json!(7.5)));
    let records = &bo.extension_elements().unwrap().values;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].type_name(), "qa:AnalysisDetails");
    assert_eq!(records[0].get_str("lastChecked"), Some("2024-01-01T12:00:00.000Z"));

    controller.targeted(modeler.document().unwrap(), &id("n1"));
    assert_eq!(controller.view().field, "7.5");
    assert_eq!(controller.view().detail, "2024-01-01T12:00:00.000Z");
    let outcome = with_fixed_now(Some(second), || controller.submit(&mut modeler));
    assert_eq!(outcome, SubmitOutcome::Committed);

    let records = &modeler
        .business_object("n1")
        .unwrap()
        .extension_elements()
        .unwrap()
        .values;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get_str("lastChecked"), Some("2024-02-01T08:30:00.000Z"));
}

#[test]
fn submit_keeps_foreign_records_in_place() {
    let mut modeler = modeler();
    let mut controller = score_controller(&modeler);
    controller.targeted(modeler.document().unwrap(), &id("Scored"));
    controller.input_changed("8");
    controller.submit(&mut modeler);

    let records = &modeler
        .business_object("Scored")
        .unwrap()
        .extension_elements()
        .unwrap()
        .values;
    let types: Vec<&str> = records.iter().map(|r| r.type_name()).collect();
    assert_eq!(types, vec!["camunda:properties", "qa:AnalysisDetails"]);
    assert_ne!(records[1].get_str("lastChecked"), Some("2015-01-20T14:23:21.000Z"));
}

#[test]
fn one_submit_is_one_undo_step() {
    let mut modeler = modeler();
    let mut controller = score_controller(&modeler);
    controller.targeted(modeler.document().unwrap(), &id("n1"));
    controller.input_changed("2");
    controller.submit(&mut modeler);

    assert!(modeler.undo().unwrap());
    let bo = modeler.business_object("n1").unwrap();
    assert_eq!(bo.get("suitable"), None);
    assert_eq!(bo.extension_elements(), None);
    assert!(!modeler.can_undo());
}

#[test]
fn stale_target_aborts_with_a_notice() {
    let mut modeler = modeler();
    let mut controller = score_controller(&modeler);
    controller.targeted(modeler.document().unwrap(), &id("n1"));
    controller.input_changed("2");
    modeler.remove_element(&id("n1")).unwrap();

    assert_eq!(controller.submit(&mut modeler), SubmitOutcome::Stale);
    assert_eq!(controller.state(), &PanelState::Closed);
    assert!(!controller.view().visible);
    assert!(controller.take_notice().is_some());
    assert!(controller.take_notice().is_none());
}

#[test]
fn dismiss_discards_edits() {
    let mut modeler = modeler();
    let before = modeler.save_xml().unwrap();
    let mut controller = score_controller(&modeler);
    controller.targeted(modeler.document().unwrap(), &id("Scored"));
    controller.input_changed("10");
    assert!(controller.dismiss());
    assert!(!controller.dismiss());
    assert_eq!(controller.submit(&mut modeler), SubmitOutcome::Ignored);
    assert_eq!(modeler.save_xml().unwrap(), before);
}

#[test]
fn emoji_picker_only_opens_for_emoji_tasks() {
    let mut modeler = modeler();
    let mut controller = emoji_controller(&modeler);
    let doc = modeler.document().unwrap();

    assert_eq!(controller.targeted(doc, &id("n1")), TargetOutcome::Declined);
    assert!(!controller.view().visible);
    assert_eq!(controller.targeted(doc, &id("Process_1")), TargetOutcome::Declined);
    assert_eq!(controller.targeted(doc, &id("Smiley")), TargetOutcome::Bound);
    assert_eq!(controller.view().field, "😀");
    assert!(!controller.view().focused);

    assert!(!controller.input_changed("🐱"));
    assert_eq!(controller.submit(&mut modeler), SubmitOutcome::Invalid);
    assert!(controller.input_changed("👍"));
    assert_eq!(controller.submit(&mut modeler), SubmitOutcome::Committed);
    assert_eq!(
        modeler.business_object("Smiley").unwrap().get_str("emoji"),
        Some("👍")
    );
}

#[test]
fn router_pre_empts_the_host_menu() {
    let mut modeler = modeler();
    let controller = score_controller(&modeler);
    let router = Router::attach(&mut modeler, controller, 1500);

    let routed = router
        .handle(&mut modeler, Gesture::ContextMenu(id("n1")))
        .unwrap();
    assert_eq!(routed, Routed::ContextMenu { default_prevented: true });
    assert_eq!(modeler.native_menu(), None);
    assert_eq!(router.controller().target(), Some(&id("n1")));

    assert_eq!(
        router.handle(&mut modeler, Gesture::Input("x".into())).unwrap(),
        Routed::Edited { valid: false }
    );
    assert_eq!(
        router.handle(&mut modeler, Gesture::KeyDown("a".into())).unwrap(),
        Routed::Unhandled
    );
    assert_eq!(
        router.handle(&mut modeler, Gesture::KeyDown("Escape".into())).unwrap(),
        Routed::Dismissed
    );

    router.handle(&mut modeler, Gesture::ContextMenu(id("n1"))).unwrap();
    assert_eq!(
        router
            .handle(&mut modeler, Gesture::PointerDown { inside_panel: true })
            .unwrap(),
        Routed::Unhandled
    );
    assert_eq!(
        router
            .handle(&mut modeler, Gesture::PointerDown { inside_panel: false })
            .unwrap(),
        Routed::Dismissed
    );

    assert!(router.detach(&mut modeler));
    router.handle(&mut modeler, Gesture::ContextMenu(id("n1"))).unwrap();
    assert_eq!(modeler.native_menu(), Some(&id("n1")));
}

#[test]
fn declined_targets_fall_through_to_lower_priorities() {
    let mut modeler = modeler();
    let (emoji, score) = (emoji_controller(&modeler), score_controller(&modeler));
    let emoji = Router::attach(&mut modeler, emoji, 100000);
    let score = Router::attach(&mut modeler, score, 1500);

    emoji
        .handle(&mut modeler, Gesture::ContextMenu(id("Smiley")))
        .unwrap();
    assert!(emoji.controller().is_open());
    assert!(!score.controller().view().visible);

    score
        .handle(&mut modeler, Gesture::ContextMenu(id("n1")))
        .unwrap();
    assert!(!emoji.controller().is_open());
    assert_eq!(score.controller().target(), Some(&id("n1")));

    assert_eq!(
        emoji.handle(&mut modeler, Gesture::Pick("👍".into())).unwrap(),
        Routed::Submitted(SubmitOutcome::Ignored)
    );
}

#[test]
fn a_router_that_missed_the_event_releases_its_panel() {
    let mut modeler = modeler();
    let (emoji, score) = (emoji_controller(&modeler), score_controller(&modeler));
    let emoji = Router::attach(&mut modeler, emoji, 100000);
    let score = Router::attach(&mut modeler, score, 1500);

    score
        .handle(&mut modeler, Gesture::ContextMenu(id("n1")))
        .unwrap();
    assert!(score.controller().is_open());

    emoji
        .handle(&mut modeler, Gesture::ContextMenu(id("Smiley")))
        .unwrap();
    assert!(score.release_if_unclaimed());
    assert!(!score.controller().is_open());
    assert!(emoji.controller().is_open());
}
