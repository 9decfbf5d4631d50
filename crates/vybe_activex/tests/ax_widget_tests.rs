use std::any::Any;
use std::path::Path;
use std::rc::Rc;
use vybe_activex::*;
use vybe_properties::{Size, Variant};

const PROGRESS_BAR: &str = "{35053A22-8589-11D1-B16A-00C0F0283628}";

fn widget() -> DesignerAxWidget {
    let registry = ControlRegistry::with_common_controls().expect("registry");
    DesignerAxWidget::new(Rc::new(registry))
}

struct PlainObject;

impl DesignerObject for PlainObject {
    fn class_name(&self) -> &str {
        "Label"
    }

    fn property_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn property(&self, _name: &str) -> Option<Variant> {
        None
    }

    fn set_property(&mut self, _name: &str, _value: &Variant) -> bool {
        false
    }

    fn reset_property(&mut self, _name: &str) -> bool {
        false
    }

    fn is_property_changed(&self, _name: &str) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn test_bogus_class_fails_to_load() {
    let mut widget = widget();
    assert!(!widget.load_control("bogus-clsid"));
    assert!(!widget.loaded());
    assert_eq!(widget.class_name(), PLACEHOLDER_CLASS_NAME);
    assert_eq!(widget.property_names(), vec!["control"]);
    assert!(ax_widget_cast(&widget).is_some());
}

#[test]
fn test_load_then_reset_returns_to_placeholder() {
    let mut widget = widget();
    assert!(widget.load_control("MSComctlLib.ProgCtrl.2"));
    assert!(widget.loaded());
    assert_eq!(widget.class_name(), HOST_CLASS_NAME);
    assert_eq!(widget.control(), PROGRESS_BAR);
    assert_eq!(widget.control_class_name(), Some("ProgressBar"));
    assert!(ax_widget_cast(&widget).is_some());
    assert_eq!(widget.property_names(), vec!["control", "Min", "Max", "Value", "Enabled"]);

    widget.reset_control();
    assert!(!widget.loaded());
    assert_eq!(widget.control(), "");
    assert_eq!(widget.class_name(), PLACEHOLDER_CLASS_NAME);
    assert!(ax_widget_cast(&widget).is_some());
}

#[test]
fn test_cast_rejects_other_objects() {
    let mut plain = PlainObject;
    assert!(ax_widget_cast(&plain).is_none());
    assert!(ax_widget_cast_mut(&mut plain).is_none());

    let mut widget = widget();
    let object: &mut dyn DesignerObject = &mut widget;
    let cast = ax_widget_cast_mut(object).expect("cast");
    assert!(cast.load_control(PROGRESS_BAR));
}

#[test]
fn test_failed_load_keeps_current_control() {
    let mut widget = widget();
    assert!(widget.load_control(PROGRESS_BAR));
    assert!(!widget.load_control("{00000000-0000-0000-0000-000000000001}"));
    assert_eq!(widget.control(), PROGRESS_BAR);
}

#[test]
fn test_faulting_controls_never_escape() {
    let mut registry = ControlRegistry::new();
    let boom = ClassId::parse("{11111111-2222-3333-4444-555555555555}").expect("boom");
    registry
        .register(boom, "Boom", Some("Boom.Ctrl"), Box::new(|_| panic!("constructor blew up")))
        .expect("register boom");
    let faulty = ClassId::parse("{66666666-7777-8888-9999-000000000000}").expect("faulty");
    registry
        .register(
            faulty,
            "Faulty",
            None,
            Box::new(|id| Err(ControlError::Faulted(id.to_string(), "no license".into()))),
        )
        .expect("register faulty");

    let mut widget = DesignerAxWidget::new(Rc::new(registry));
    assert!(!widget.load_control("Boom.Ctrl"));
    assert!(!widget.load_control(&faulty.to_string()));
    assert!(!widget.loaded());
}

#[test]
fn test_out_of_range_values_are_staged() {
    let mut widget = widget();
    assert!(widget.load_control(PROGRESS_BAR));
    assert!(widget.set_property("Value", &Variant::Double(250.0)));
    assert_eq!(widget.property("value"), Some(Variant::Double(250.0)));
    assert!(widget.is_property_changed("Value"));
    assert!(!widget.is_property_changed("Max"));

    assert!(widget.reset_property("Value"));
    assert!(!widget.is_property_changed("Value"));
    assert_eq!(widget.property("Value"), Some(Variant::Double(0.0)));

    assert!(!widget.set_property("NoSuchProperty", &Variant::Int(1)));
}

#[test]
fn test_control_property_drives_loading() {
    let mut widget = widget();
    assert!(widget.set_property("control", &Variant::from("Shell.Explorer.2")));
    assert!(widget.loaded());
    assert!(widget.set_property("Silent", &Variant::Bool(true)));

    widget.set_control("{8856f961-340a-11d0-a96b-00c04fd705a2}");
    assert_eq!(widget.property("Silent"), Some(Variant::Bool(true)));

    widget.set_control("");
    assert!(!widget.loaded());
    assert_eq!(widget.property("control"), Some(Variant::String(String::new())));
}

#[test]
fn test_size_hints() {
    let mut widget = widget();
    assert_eq!(widget.size_hint(), Size::new(80, 70));
    assert_eq!(widget.minimum_size_hint(), Size::new(80, 70));
    assert!(widget.load_control(PROGRESS_BAR));
    assert_eq!(widget.size_hint(), Size::new(150, 24));
    assert_eq!(widget.minimum_size_hint(), Size::new(20, 10));
    assert!(widget.load_control("WMPlayer.OCX"));
    assert_eq!(widget.size_hint(), Size::new(80, 70));
}

#[test]
fn test_paint_placeholder() {
    let mut widget = widget();
    widget.resize(Size::new(100, 60));
    let mut painter = RecordingPainter::new();
    widget.paint(&mut painter);
    assert_eq!(painter.ops.len(), 2);
    assert!(matches!(painter.ops[0], PaintOp::Frame(..)));
    assert!(matches!(painter.ops[1], PaintOp::Indicator(r) if r.x == 42 && r.y == 22));

    widget.set_draw_flags(DrawFlags::FRAME);
    let mut painter = RecordingPainter::new();
    widget.paint(&mut painter);
    assert_eq!(painter.ops.len(), 1);
}

#[test]
fn test_paint_snapshot_follows_size_and_properties() {
    let mut widget = widget();
    assert!(widget.load_control(PROGRESS_BAR));
    widget.resize(Size::new(150, 24));

    let mut painter = RecordingPainter::new();
    widget.paint(&mut painter);
    let [PaintOp::Snapshot(_, first)] = painter.ops.as_slice() else {
        panic!("expected one snapshot, got {:?}", painter.ops);
    };
    assert_eq!(first.class_name, "ProgressBar");
    assert_eq!(first.size, Size::new(150, 24));

    widget.set_property("Value", &Variant::Double(40.0));
    widget.resize(Size::new(200, 30));
    let mut painter = RecordingPainter::new();
    widget.paint(&mut painter);
    let [PaintOp::Snapshot(_, second)] = painter.ops.as_slice() else {
        panic!("expected one snapshot, got {:?}", painter.ops);
    };
    assert_eq!(second.size, Size::new(200, 30));
    assert!(second.lines.iter().any(|(name, _)| name == "Value"));
    assert_ne!(first, second);
}

#[test]
fn test_registry_file_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("controls/common_controls.json");
    let registry = ControlRegistry::load_from_file(path).expect("registry file");
    assert_eq!(registry.len(), 4);
    let calendar = registry.resolve("MSCAL.Calendar.7").expect("calendar");
    assert_eq!(registry.class_name(calendar), Some("Calendar"));

    let missing = ControlRegistry::load_from_file("does/not/exist.json").expect_err("missing");
    assert!(matches!(missing, RegistryError::Io(_)));
}
