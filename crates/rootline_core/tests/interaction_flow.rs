use rootline_core::layout::Point;
use rootline_core::seed::demo_archive;
use rootline_core::{
    ClickTarget, CollapseState, InteractionController, InteractionOutcome, LayoutEngine, Person,
    PersonForm, PersonLookup, Selection, TreeBuilder,
};

#[test]
fn clicks_route_through_the_layout() {
    let archive = demo_archive();
    let forest = TreeBuilder::default().build_selected(archive.lookup(), Some("1"));
    let mut controller = InteractionController::new();
    let layout = LayoutEngine::default().layout_forest(&forest, controller.collapse());

    let bhakta = layout.card("3").unwrap().rect;
    assert_eq!(
        controller.click_at(&layout, Point::new(bhakta.x + 4.0, bhakta.y + 4.0)),
        InteractionOutcome::Selected("3".to_string())
    );

    let toggle = layout.toggle("1").unwrap().rect.center();
    assert_eq!(
        controller.click_at(&layout, toggle),
        InteractionOutcome::Toggled {
            person_id: "1".to_string(),
            collapsed: true
        }
    );
    assert_eq!(controller.active_person(), Some("3"));

    let collapsed = LayoutEngine::default().layout_forest(&forest, controller.collapse());
    assert_eq!(collapsed.cards.len(), 2);
    assert_eq!(collapsed.toggle("1").unwrap().glyph(), '+');

    let outside = Point::new(collapsed.size.width + 50.0, collapsed.size.height + 50.0);
    assert_eq!(
        controller.click_at(&collapsed, outside),
        InteractionOutcome::Deselected
    );
    assert_eq!(controller.selection(), &Selection::None);
}

#[test]
fn edit_cancel_leaves_record_untouched() {
    let mut archive = demo_archive();
    let mut controller = InteractionController::new();
    controller.click(ClickTarget::Card("7".to_string()));
    assert_eq!(
        controller.toggle_edit(),
        InteractionOutcome::EditStarted("7".to_string())
    );
    assert_eq!(
        controller.click(ClickTarget::Card("7".to_string())),
        InteractionOutcome::Unchanged
    );

    let mut form = PersonForm::from_person(archive.persons().get("7").unwrap());
    form.occupation = "Surgeon".to_string();
    assert_eq!(
        controller.cancel_edit(),
        InteractionOutcome::EditCancelled("7".to_string())
    );
    assert_eq!(controller.save(&mut archive, &form), InteractionOutcome::Unchanged);
    assert_eq!(
        archive.persons().get("7").unwrap().occupation.as_deref(),
        Some("Doctor")
    );
}

#[test]
fn save_with_blank_name_keeps_name_and_clears_blank_fields() {
    let mut archive = demo_archive();
    let mut controller = InteractionController::new();
    controller.click(ClickTarget::Card("11".to_string()));
    controller.toggle_edit();

    let before = archive.persons().get("11").unwrap().updated_at;
    let mut form = PersonForm::from_person(archive.persons().get("11").unwrap());
    form.name = "   ".to_string();
    form.birth_year = "1971".to_string();
    form.location = "  ".to_string();
    assert_eq!(
        controller.save(&mut archive, &form),
        InteractionOutcome::Saved("11".to_string())
    );

    let saved = archive.persons().get("11").unwrap();
    assert_eq!(saved.display_name(), "Manoj Karki");
    assert_eq!(saved.birth_year, Some(1971));
    assert_eq!(saved.location, None);
    assert_eq!(saved.occupation.as_deref(), Some("Engineer"));
    assert!(saved.updated_at >= before);
}

#[test]
fn save_after_external_delete_drops_selection() {
    let mut archive = demo_archive();
    let mut controller = InteractionController::new();
    controller.click(ClickTarget::Card("9".to_string()));
    controller.toggle_edit();
    let form = PersonForm::from_person(archive.persons().get("9").unwrap());

    archive.delete_person("9");
    assert_eq!(
        controller.save(&mut archive, &form),
        InteractionOutcome::SaveDropped("9".to_string())
    );
    assert_eq!(controller.selection(), &Selection::None);
}

#[test]
fn confirmed_delete_cleans_relationships_records_and_state() {
    let mut archive = demo_archive();
    let mut controller = InteractionController::new();
    controller.set_root(Some("2".to_string()));
    controller.click(ClickTarget::Toggle("2".to_string()));
    controller.click(ClickTarget::Card("2".to_string()));

    let mut asked = Vec::new();
    let mut confirm = |person: &Person| {
        asked.push(person.id.clone());
        true
    };
    let outcome = controller.delete(&mut archive, &mut confirm);
    assert_eq!(asked, vec!["2".to_string()]);

    let report = match outcome {
        InteractionOutcome::Deleted(report) => report,
        other => panic!("expected a delete report, got {other:?}"),
    };
    assert_eq!(report.unlinked_events, 1);
    assert_eq!(report.unlinked_documents, 1);
    assert_eq!(controller.selection(), &Selection::None);
    assert_eq!(controller.preferred_root(), None);
    assert!(!controller.collapse().is_collapsed("2"));

    let lookup = archive.lookup();
    assert!(lookup.person("2").is_none());
    assert_eq!(lookup.person("1").unwrap().spouse_id, None);
    assert!(lookup.person("20").unwrap().children.is_empty());
    assert_eq!(archive.timeline().len(), 3);
}

#[test]
fn sync_drops_state_for_vanished_persons() {
    let mut archive = demo_archive();
    let mut controller = InteractionController::new();
    controller.click(ClickTarget::Toggle("3".to_string()));
    controller.click(ClickTarget::Toggle("5".to_string()));
    controller.click(ClickTarget::Card("3".to_string()));

    archive.delete_person("3");
    controller.sync_with(archive.lookup());
    assert_eq!(controller.selection(), &Selection::None);
    assert!(!controller.collapse().is_collapsed("3"));
    assert!(controller.collapse().is_collapsed("5"));
    assert_eq!(controller.collapse().collapsed_count(), 1);
}

#[test]
fn zoom_controls_clamp() {
    let mut controller = InteractionController::new();
    for _ in 0..20 {
        controller.zoom_in();
    }
    assert_eq!(controller.zoom().percent(), 200);
    for _ in 0..30 {
        controller.zoom_out();
    }
    assert_eq!(controller.zoom().percent(), 50);
    controller.reset_zoom();
    assert_eq!(controller.zoom().percent(), 100);
}

#[test]
fn empty_collapse_state_is_default() {
    assert_eq!(InteractionController::new().collapse(), &CollapseState::new());
}
