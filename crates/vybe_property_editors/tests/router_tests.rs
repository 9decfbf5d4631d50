use std::cell::RefCell;
use std::rc::Rc;
use vybe_properties::*;
use vybe_property_editors::*;

fn connected() -> (VariantPropertyManager, VariantEditorFactory) {
    let bridge = VariantPropertyManager::new();
    let mut router = VariantEditorFactory::new();
    router.connect_property_manager(&bridge);
    (bridge, router)
}

#[test]
fn test_int_facade_gets_spin_box() {
    let (mut bridge, mut router) = connected();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    bridge.set_attribute(width, "maximum", 50);
    bridge.set_value(width, 12);

    let mut host = EditorHost::new();
    let parent = host.new_parent();
    let editor = router.create_editor(&bridge, width, Some(parent)).expect("editor");
    assert_eq!(editor.kind, EditorKind::SpinBox);
    assert_eq!(editor.parent, Some(parent));
    assert_eq!(Some(editor.property), bridge.wrapped_property(width));
    assert_eq!(editor.value, Variant::Int(12));
    assert_eq!(editor.constraint("maximum"), Some(&Variant::Int(50)));
}

#[test]
fn test_unconnected_router_creates_nothing() {
    let mut bridge = VariantPropertyManager::new();
    let mut router = VariantEditorFactory::new();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    assert!(router.create_editor(&bridge, width, None).is_none());
}

#[test]
fn test_composites_are_edited_through_children() {
    let (mut bridge, mut router) = connected();
    let geometry = bridge.add_property(TypeId::RECT, "Geometry").expect("rect");
    assert!(router.create_editor(&bridge, geometry, None).is_none());

    let x = bridge.sub_properties(geometry)[0];
    let editor = router.create_editor(&bridge, x, None).expect("x editor");
    assert_eq!(editor.kind, EditorKind::SpinBox);

    let group = bridge
        .add_property(VariantPropertyManager::group_type_id(), "Group")
        .expect("group");
    assert!(router.create_editor(&bridge, group, None).is_none());
}

#[test]
fn test_font_contributes_itself_and_its_leaves() {
    let (mut bridge, mut router) = connected();
    let font = bridge.add_property(TypeId::FONT, "Font").expect("font");
    let editor = router.create_editor(&bridge, font, None).expect("font editor");
    assert_eq!(editor.kind, EditorKind::FontEdit);

    let children = bridge.sub_properties(font).to_vec();
    let family = router.create_editor(&bridge, children[0], None).expect("family");
    assert_eq!(family.kind, EditorKind::ComboBox);
    assert!(family.choices().contains(&"Arial".to_string()));
    let bold = router.create_editor(&bridge, children[2], None).expect("bold");
    assert_eq!(bold.kind, EditorKind::CheckBox);
}

#[test]
fn test_commit_writes_internal_property() {
    let (mut bridge, mut router) = connected();
    let geometry = bridge.add_property(TypeId::RECT, "Geometry").expect("rect");
    let width = bridge.sub_properties(geometry)[2];
    let editor = router.create_editor(&bridge, width, None).expect("editor");

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    bridge.connect(move |event| sink.borrow_mut().push(event.clone()));

    router.commit(&mut bridge, editor.id, 40).expect("commit");
    assert_eq!(bridge.value(geometry), Variant::Rect(Rect::new(0, 0, 40, 0)));
    assert!(events.borrow().iter().any(|e| e.property() == geometry));
    assert_eq!(router.editor(editor.id).expect("tracked").value, Variant::Int(40));
}

#[test]
fn test_commit_errors() {
    let (mut bridge, mut router) = connected();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    let editor = router.create_editor(&bridge, width, None).expect("editor");

    let err = router.commit(&mut bridge, editor.id, "wide").expect_err("mismatch");
    assert!(matches!(err, EditorError::TypeMismatch { expected, .. } if expected == TypeId::INT));

    assert!(router.release_editor(editor.id));
    let err = router.commit(&mut bridge, editor.id, 3).expect_err("released");
    assert!(matches!(err, EditorError::Released));
}

#[test]
fn test_events_refresh_editors() {
    let (mut bridge, mut router) = connected();
    let align = bridge
        .add_property(VariantPropertyManager::enum_type_id(), "Align")
        .expect("align");
    let editor = router.create_editor(&bridge, align, None).expect("editor");
    assert!(editor.choices().is_empty());

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    bridge.connect(move |event| sink.borrow_mut().push(event.clone()));
    bridge.set_attribute(align, "enumNames", vec!["Left".to_string(), "Right".to_string()]);
    bridge.set_value(align, 1);
    for event in events.borrow_mut().drain(..) {
        router.handle_event(&bridge, &event);
    }

    let internal = bridge.wrapped_property(align).expect("internal");
    let refreshed = router.editors_for(internal);
    assert_eq!(refreshed.len(), 1);
    assert_eq!(refreshed[0].choices(), vec!["Left", "Right"]);
    assert_eq!(refreshed[0].value, Variant::Int(1));
    assert_eq!(refreshed[0].text, "Right");
}

#[test]
fn test_disconnect_is_exact_inverse() {
    let (mut bridge, mut router) = connected();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    let editor = router.create_editor(&bridge, width, None).expect("editor");
    let registered = router.factory(TypeId::INT).expect("spin box").managers().len();
    assert!(registered > 1);

    router.disconnect_property_manager(&bridge);
    for property_type in router.supported_types() {
        assert!(router.factory(property_type).expect("factory").managers().is_empty());
    }
    assert!(router.editor(editor.id).is_none());
    assert!(router.create_editor(&bridge, width, None).is_none());
}
