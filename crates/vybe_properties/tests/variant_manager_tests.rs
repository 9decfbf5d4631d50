use std::cell::RefCell;
use std::rc::Rc;
use vybe_properties::*;

fn record(bridge: &mut VariantPropertyManager) -> Rc<RefCell<Vec<VariantEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    bridge.connect(move |event| sink.borrow_mut().push(event.clone()));
    events
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_every_registered_type_creates_a_facade() {
    let mut bridge = VariantPropertyManager::new();
    for property_type in bridge.supported_types() {
        assert!(bridge.is_property_type_supported(property_type));
        let facade = bridge.add_property(property_type, "p").expect("facade");
        assert_eq!(bridge.property_type(facade), property_type);
        assert_eq!(bridge.property_value_type(facade), bridge.value_type(property_type));
    }
}

#[test]
fn test_unsupported_type_yields_none() {
    let mut bridge = VariantPropertyManager::new();
    let unknown = TypeId::from_raw(999);
    assert!(!bridge.is_property_type_supported(unknown));
    assert!(bridge.add_property(unknown, "x").is_none());
    assert!(bridge.properties().is_empty());
}

#[test]
fn test_width_int_example() {
    let mut bridge = VariantPropertyManager::new();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    bridge.set_attribute(width, "minimum", 0);
    bridge.set_attribute(width, "maximum", 10);
    bridge.set_value(width, 5);
    assert_eq!(bridge.value(width), Variant::Int(5));

    bridge.set_value(width, "not an int");
    assert_eq!(bridge.value(width), Variant::Int(5));

    bridge.set_value(width, 42);
    assert_eq!(bridge.value(width), Variant::Int(10));
    assert_eq!(bridge.attribute_value(width, "maximum"), Variant::Int(10));
}

#[test]
fn test_string_values_convert_to_int() {
    let mut bridge = VariantPropertyManager::new();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    bridge.set_value(width, "7");
    assert_eq!(bridge.value(width), Variant::Int(7));
}

#[test]
fn test_align_enum_example() {
    let mut bridge = VariantPropertyManager::new();
    let align = bridge
        .add_property(VariantPropertyManager::enum_type_id(), "Align")
        .expect("align");
    bridge.set_attribute(align, "enumNames", names(&["Left", "Right"]));
    assert_eq!(
        bridge.attribute_value(align, "enumNames"),
        Variant::StringList(names(&["Left", "Right"]))
    );
    bridge.set_value(align, 1);
    assert_eq!(bridge.value(align), Variant::Int(1));
    assert_eq!(bridge.value_text(align), "Right");
}

#[test]
fn test_unknown_attribute_reads_invalid_and_ignores_writes() {
    let mut bridge = VariantPropertyManager::new();
    let flag = bridge.add_property(TypeId::BOOL, "Visible").expect("flag");
    assert_eq!(bridge.attribute_value(flag, "minimum"), Variant::Invalid);
    let events = record(&mut bridge);
    bridge.set_attribute(flag, "minimum", 3);
    assert!(events.borrow().is_empty());
}

#[test]
fn test_attribute_value_must_convert() {
    let mut bridge = VariantPropertyManager::new();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    bridge.set_attribute(width, "maximum", "ten");
    assert_eq!(bridge.attribute_value(width, "maximum"), Variant::Int(i32::MAX));
    bridge.set_attribute(width, "maximum", "20");
    assert_eq!(bridge.attribute_value(width, "maximum"), Variant::Int(20));
}

#[test]
fn test_range_change_raises_minimum_and_maximum_events() {
    let mut bridge = VariantPropertyManager::new();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    let events = record(&mut bridge);
    bridge.set_attribute(width, "minimum", 3);

    let events = events.borrow();
    let attributes: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            VariantEvent::AttributeChanged { attribute, .. } => Some(attribute.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(attributes, vec!["minimum", "maximum"]);
    assert!(events.contains(&VariantEvent::ValueChanged {
        property: width,
        value: Variant::Int(3),
    }));
}

#[test]
fn test_rect_has_four_int_children() {
    let mut bridge = VariantPropertyManager::new();
    let geometry = bridge.add_property(TypeId::RECT, "Geometry").expect("rect");
    let children = bridge.sub_properties(geometry).to_vec();
    assert_eq!(children.len(), 4);
    let child_names: Vec<&str> = children.iter().map(|c| bridge.property_name(*c)).collect();
    assert_eq!(child_names, vec!["X", "Y", "Width", "Height"]);
    for child in &children {
        assert_eq!(bridge.property_type(*child), TypeId::INT);
        assert_eq!(bridge.parent(*child), Some(geometry));
    }

    bridge.set_value(children[2], 30);
    assert_eq!(bridge.value(geometry), Variant::Rect(Rect::new(0, 0, 30, 0)));
}

#[test]
fn test_internal_write_surfaces_on_parent_facade() {
    let mut bridge = VariantPropertyManager::new();
    let geometry = bridge.add_property(TypeId::RECT, "Geometry").expect("rect");
    let x = bridge.sub_properties(geometry)[0];
    let internal = bridge.wrapped_property(x).expect("internal x");
    let events = record(&mut bridge);

    bridge.set_internal_value(internal, &Variant::Int(7));

    let events = events.borrow();
    assert!(events.contains(&VariantEvent::ValueChanged {
        property: x,
        value: Variant::Int(7),
    }));
    assert!(events.contains(&VariantEvent::ValueChanged {
        property: geometry,
        value: Variant::Rect(Rect::new(7, 0, 0, 0)),
    }));
}

#[test]
fn test_removing_facade_clears_mapping() {
    let mut bridge = VariantPropertyManager::new();
    let point = bridge.add_property(TypeId::POINT, "Pos").expect("point");
    let internal = bridge.wrapped_property(point).expect("internal");
    let x = bridge.sub_properties(point)[0];
    let internal_x = bridge.wrapped_property(x).expect("internal x");

    assert!(bridge.remove_property(point));
    assert!(!bridge.contains(point));
    assert!(!bridge.contains(x));
    assert_eq!(bridge.wrapped_property(point), None);
    assert_eq!(bridge.facade_for(internal), None);
    assert_eq!(bridge.facade_for(internal_x), None);
    assert!(!bridge.property_tree().contains(internal));
}

#[test]
fn test_removing_structural_child_only_unwraps() {
    let mut bridge = VariantPropertyManager::new();
    let point = bridge.add_property(TypeId::POINT, "Pos").expect("point");
    let x = bridge.sub_properties(point)[0];
    let internal_x = bridge.wrapped_property(x).expect("internal x");

    assert!(bridge.remove_property(x));
    assert_eq!(bridge.sub_properties(point).len(), 1);
    assert!(bridge.property_tree().contains(internal_x));
    assert_eq!(bridge.facade_for(internal_x), None);
}

#[test]
fn test_flag_children_follow_flag_names() {
    let mut bridge = VariantPropertyManager::new();
    let style = bridge
        .add_property(VariantPropertyManager::flag_type_id(), "Style")
        .expect("flag");
    assert!(bridge.sub_properties(style).is_empty());

    let events = record(&mut bridge);
    bridge.set_attribute(style, "flagNames", names(&["Bold", "Italic"]));
    let first = bridge.sub_properties(style).to_vec();
    assert_eq!(first.len(), 2);
    assert_eq!(bridge.property_name(first[1]), "Italic");
    assert_eq!(bridge.property_type(first[0]), TypeId::BOOL);
    assert!(events.borrow().iter().any(|e| matches!(
        e,
        VariantEvent::PropertyInserted { parent, .. } if *parent == style
    )));

    bridge.set_value(style, 3);
    assert_eq!(bridge.value(first[1]), Variant::Bool(true));
    bridge.set_value(first[0], false);
    assert_eq!(bridge.value(style), Variant::Int(2));

    bridge.set_attribute(style, "flagNames", names(&["Underline"]));
    let second = bridge.sub_properties(style).to_vec();
    assert_eq!(second.len(), 1);
    assert!(!bridge.contains(first[0]));
    assert!(!bridge.contains(first[1]));
    assert_eq!(bridge.value(style), Variant::Int(0));
}

#[test]
fn test_group_has_no_value() {
    let mut bridge = VariantPropertyManager::new();
    let group = VariantPropertyManager::group_type_id();
    assert_eq!(bridge.value_type(group), TypeId::INVALID);
    let layout = bridge.add_property(group, "Layout").expect("group");
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    assert!(!bridge.has_value(layout));
    bridge.set_value(layout, 3);
    assert_eq!(bridge.value(layout), Variant::Invalid);

    assert!(bridge.add_sub_property(layout, width));
    assert_eq!(bridge.sub_properties(layout), &[width]);
    assert!(bridge.remove_sub_property(layout, width));
    assert_eq!(bridge.parent(width), None);
}

#[test]
fn test_locale_territory_renames_keep_facades() {
    let mut bridge = VariantPropertyManager::new();
    let locale = bridge.add_property(TypeId::LOCALE, "Locale").expect("locale");
    let children = bridge.sub_properties(locale).to_vec();
    assert_eq!(children.len(), 2);
    assert_eq!(bridge.property_type(children[1]), VariantPropertyManager::enum_type_id());

    let german = Locale::new("German", "Germany").expect("german");
    bridge.set_value(locale, german.clone());
    assert_eq!(bridge.value(locale), Variant::Locale(german));
    assert_eq!(
        bridge.attribute_value(children[1], "enumNames"),
        Variant::StringList(Locale::territory_names("German"))
    );
}

#[test]
fn test_metadata_changes_raise_property_changed() {
    let mut bridge = VariantPropertyManager::new();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    let events = record(&mut bridge);
    bridge.set_tool_tip(width, "Control width");
    bridge.set_tool_tip(width, "Control width");
    bridge.set_enabled(width, false);
    assert_eq!(bridge.tool_tip(width), "Control width");
    assert!(!bridge.is_enabled(width));
    assert_eq!(
        *events.borrow(),
        vec![
            VariantEvent::PropertyChanged { property: width },
            VariantEvent::PropertyChanged { property: width },
        ]
    );
}

#[test]
fn test_disconnected_listener_stops_receiving() {
    let mut bridge = VariantPropertyManager::new();
    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    let events = Rc::new(RefCell::new(0));
    let sink = events.clone();
    let id = bridge.connect(move |_| *sink.borrow_mut() += 1);
    bridge.set_value(width, 1);
    assert!(bridge.disconnect(id));
    bridge.set_value(width, 2);
    assert_eq!(*events.borrow(), 1);
    assert!(!bridge.disconnect(id));
}

#[test]
fn test_bridges_are_isolated() {
    let mut first = VariantPropertyManager::new();
    let mut second = VariantPropertyManager::new();
    let a = first.add_property(TypeId::INT, "a").expect("a");
    let internal = first.wrapped_property(a).expect("internal");
    assert_eq!(second.facade_for(internal), None);
    let b = second.add_property(TypeId::INT, "b").expect("b");
    assert!(!first.contains(b));
}

#[test]
fn test_clear_removes_everything() {
    let mut bridge = VariantPropertyManager::new();
    bridge.add_property(TypeId::FONT, "Font").expect("font");
    bridge.add_property(TypeId::SIZE_POLICY, "Policy").expect("policy");
    bridge.add_property(VariantPropertyManager::group_type_id(), "Group").expect("group");
    assert!(bridge.properties().len() > 3);
    bridge.clear();
    assert!(bridge.properties().is_empty());
    assert_eq!(bridge.property_tree().len(), 0);
}

#[test]
fn test_double_attributes_and_text() {
    let mut bridge = VariantPropertyManager::new();
    let opacity = bridge.add_property(TypeId::DOUBLE, "Opacity").expect("opacity");
    assert_eq!(
        bridge.attributes(TypeId::DOUBLE),
        vec!["minimum", "maximum", "singleStep", "decimals"]
    );
    assert_eq!(bridge.attribute_type(TypeId::DOUBLE, "decimals"), TypeId::INT);
    bridge.set_attribute(opacity, "decimals", 1);
    bridge.set_value(opacity, 0.26);
    assert_eq!(bridge.value_text(opacity), "0.3");
}

#[test]
fn test_rect_with_extreme_extent_is_normalized() {
    let mut bridge = VariantPropertyManager::new();
    let geometry = bridge.add_property(TypeId::RECT, "Geometry").expect("rect");
    bridge.set_value(geometry, Rect::new(0, 0, i32::MIN, 5));
    assert_eq!(bridge.value(geometry), Variant::Rect(Rect::new(i32::MIN, 0, i32::MAX, 5)));
    let width = bridge.sub_properties(geometry)[2];
    assert_eq!(bridge.value(width), Variant::Int(i32::MAX));

    bridge.set_value(geometry, Rect::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX));
    assert_eq!(
        bridge.value(geometry),
        Variant::Rect(Rect::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX))
    );
}

#[test]
fn test_constrained_rect_near_integer_limit() {
    let mut bridge = VariantPropertyManager::new();
    let geometry = bridge.add_property(TypeId::RECT, "Geometry").expect("rect");
    bridge.set_attribute(geometry, "constraint", Rect::new(0, 0, 100, 100));
    bridge.set_value(geometry, Rect::new(10, 10, 20, 20));

    bridge.set_value(geometry, Rect::new(i32::MAX - 1, 0, 10, 10));
    assert_eq!(bridge.value(geometry), Variant::Rect(Rect::new(10, 10, 20, 20)));

    bridge.set_attribute(geometry, "constraint", Rect::new(i32::MAX - 5, 0, 100, 100));
    bridge.set_value(geometry, Rect::new(i32::MAX - 3, 0, 2, 2));
    assert_eq!(bridge.value(geometry), Variant::Rect(Rect::new(i32::MAX - 3, 0, 2, 2)));
}

#[test]
fn test_flag_with_more_names_than_bits() {
    let mut bridge = VariantPropertyManager::new();
    let style = bridge
        .add_property(VariantPropertyManager::flag_type_id(), "Style")
        .expect("flag");
    let many: Vec<String> = (0..33).map(|i| format!("f{i}")).collect();
    bridge.set_attribute(style, "flagNames", many);
    let children = bridge.sub_properties(style).to_vec();
    assert_eq!(children.len(), 33);

    bridge.set_value(style, 1);
    assert_eq!(bridge.value(style), Variant::Int(1));
    assert_eq!(bridge.value_text(style), "f0");

    bridge.set_value(style, i32::MAX);
    assert_eq!(bridge.value(children[30]), Variant::Bool(true));
    assert_eq!(bridge.value(children[31]), Variant::Bool(false));
    assert_eq!(bridge.value(children[32]), Variant::Bool(false));

    bridge.set_value(children[32], true);
    assert_eq!(bridge.value(style), Variant::Int(i32::MAX));
    assert_eq!(bridge.value(children[32]), Variant::Bool(false));

    bridge.set_value(children[0], false);
    assert_eq!(bridge.value(style), Variant::Int(i32::MAX - 1));
}

#[test]
fn test_composite_attribute_writes_raise_facade_events() {
    let date = chrono::NaiveDate::from_ymd_opt(2001, 2, 3).expect("date");
    let cases: Vec<(TypeId, &str, Variant)> = vec![
        (TypeId::DATE, "minimum", Variant::Date(date)),
        (TypeId::STRING, "regExp", Variant::RegExp(RegExp::new("[0-9]+").expect("pattern"))),
        (TypeId::POINT_F, "decimals", Variant::Int(4)),
        (TypeId::SIZE, "maximum", Variant::Size(Size::new(200, 100))),
        (TypeId::SIZE_F, "decimals", Variant::Int(4)),
        (TypeId::RECT, "constraint", Variant::Rect(Rect::new(0, 0, 100, 100))),
        (TypeId::RECT_F, "constraint", Variant::RectF(RectF::new(0.0, 0.0, 50.0, 50.0))),
    ];
    for (property_type, attribute, value) in cases {
        let mut bridge = VariantPropertyManager::new();
        let facade = bridge.add_property(property_type, "p").expect("facade");
        let events = record(&mut bridge);
        bridge.set_attribute(facade, attribute, value.clone());

        assert_eq!(bridge.attribute_value(facade, attribute), value, "{attribute} on {property_type}");
        assert!(
            events.borrow().contains(&VariantEvent::AttributeChanged {
                property: facade,
                attribute: attribute.to_string(),
                value,
            }),
            "{attribute} on {property_type}"
        );
    }
}

#[test]
fn test_enum_value_icon_follows_current_entry() {
    let mut bridge = VariantPropertyManager::new();
    let align = bridge
        .add_property(VariantPropertyManager::enum_type_id(), "Align")
        .expect("align");
    bridge.set_attribute(align, "enumNames", names(&["Left", "Right"]));
    let mut icons = IconMap::new();
    icons.insert(1, Icon("icons/align-right.png".into()));
    bridge.set_attribute(align, "enumIcons", icons);

    bridge.set_value(align, 1);
    assert_eq!(bridge.value_icon(align), Some(Icon("icons/align-right.png".into())));
    bridge.set_value(align, 0);
    assert_eq!(bridge.value_icon(align), None);

    let width = bridge.add_property(TypeId::INT, "Width").expect("width");
    assert_eq!(bridge.value_icon(width), None);
}
