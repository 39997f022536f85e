use std::cell::RefCell;
use std::collections::HashSet;

use fxshader_wasm::marshal::{self, clamp_to_i32, declaration, declarations, UniformSink};
use fxshader_wasm::{Color, ParameterValue, Parameters};

#[derive(Debug, Clone, PartialEq)]
enum Upload {
    Float(String, f32),
    Vec4(String, [f32; 4]),
    Int(String, i32),
}

/// Pretends to be a linked program exposing `uniforms`.
struct RecordingSink {
    uniforms: HashSet<String>,
    uploads: RefCell<Vec<Upload>>,
}

impl RecordingSink {
    fn with_uniforms(names: &[&str]) -> Self {
        Self {
            uniforms: names.iter().map(|n| n.to_string()).collect(),
            uploads: RefCell::new(Vec::new()),
        }
    }

    fn uploads(&self) -> Vec<Upload> {
        self.uploads.borrow().clone()
    }
}

impl UniformSink for RecordingSink {
    type Location = String;

    fn location(&self, name: &str) -> Option<String> {
        self.uniforms.contains(name).then(|| name.to_owned())
    }

    fn set_float(&self, location: &String, value: f32) {
        self.uploads.borrow_mut().push(Upload::Float(location.clone(), value));
    }

    fn set_vec4(&self, location: &String, value: [f32; 4]) {
        self.uploads.borrow_mut().push(Upload::Vec4(location.clone(), value));
    }

    fn set_int(&self, location: &String, value: i32) {
        self.uploads.borrow_mut().push(Upload::Int(location.clone(), value));
    }
}

fn float_literal(line: &str) -> f64 {
    let literal = line
        .split(" = ")
        .nth(1)
        .and_then(|rest| rest.strip_suffix(';'))
        .expect("declaration has a value");
    literal.parse().expect("literal parses as f64")
}

#[test]
fn numbers_round_trip_through_float_literals() {
    let samples = [
        0.0,
        1.0,
        -2.0,
        3.5,
        std::f64::consts::PI,
        0.1,
        1e-7,
        123_456_789.125,
        -9_007_199_254_740_991.0,
        1e21,
    ];
    for v in samples {
        let line = declaration("n", &ParameterValue::Number(v)).expect("finite numbers declare");
        assert!(line.starts_with("float fx_n = "), "{line}");
        let literal = line.trim_start_matches("float fx_n = ").trim_end_matches(';');
        assert!(
            literal.contains('.') || literal.contains('e'),
            "not a GLSL float literal: {literal}"
        );
        assert_eq!(float_literal(&line), v);
    }
}

#[test]
fn non_finite_numbers_are_skipped() {
    assert_eq!(declaration("n", &ParameterValue::Number(f64::NAN)), None);
    assert_eq!(declaration("n", &ParameterValue::Number(f64::INFINITY)), None);
}

#[test]
fn booleans_are_literals_inline_and_floats_as_uniforms() {
    assert_eq!(
        declaration("b", &ParameterValue::Boolean(true)).as_deref(),
        Some("bool fx_b = true;")
    );
    assert_eq!(
        declaration("b", &ParameterValue::Boolean(false)).as_deref(),
        Some("bool fx_b = false;")
    );

    let sink = RecordingSink::with_uniforms(&["u_on", "u_off"]);
    let params = Parameters::new()
        .with("on", ParameterValue::Boolean(true))
        .with("off", ParameterValue::Boolean(false));
    marshal::assign_uniforms(&sink, &params);
    assert_eq!(
        sink.uploads(),
        vec![
            Upload::Float("u_on".into(), 1.0),
            Upload::Float("u_off".into(), 0.0)
        ]
    );
}

#[test]
fn bigints_saturate_to_glsl_int() {
    assert_eq!(clamp_to_i32(2_147_483_648), i32::MAX);
    assert_eq!(clamp_to_i32(i128::MAX), i32::MAX);
    assert_eq!(clamp_to_i32(-2_147_483_649), i32::MIN);
    assert_eq!(clamp_to_i32(i128::MIN), i32::MIN);
    for v in [0, 1, -1, 42, i32::MAX as i128, i32::MIN as i128] {
        assert_eq!(i128::from(clamp_to_i32(v)), v);
    }

    assert_eq!(
        declaration("big", &ParameterValue::BigInt(18_014_398_509_481_982)).as_deref(),
        Some("int fx_big = 2147483647;")
    );
    assert_eq!(
        declaration("small", &ParameterValue::BigInt(-36_028_797_018_963_964)).as_deref(),
        Some("int fx_small = -2147483648;")
    );

    let sink = RecordingSink::with_uniforms(&["u_big", "u_mid"]);
    let params = Parameters::new()
        .with("big", ParameterValue::BigInt(1 << 40))
        .with("mid", ParameterValue::BigInt(-7));
    marshal::assign_uniforms(&sink, &params);
    assert_eq!(
        sink.uploads(),
        vec![
            Upload::Int("u_big".into(), i32::MAX),
            Upload::Int("u_mid".into(), -7)
        ]
    );
}

#[test]
fn colors_round_inline_but_upload_exactly() {
    let color = Color::new(0.24, 0.66, 1.0, 0.04);
    assert_eq!(
        declaration("c", &ParameterValue::Color(color)).as_deref(),
        Some("vec4 fx_c = vec4(0.2, 0.7, 1.0, 0.0);")
    );

    let sink = RecordingSink::with_uniforms(&["u_c"]);
    let params = Parameters::new().with("c", ParameterValue::Color(color));
    marshal::assign_uniforms(&sink, &params);
    assert_eq!(sink.uploads(), vec![Upload::Vec4("u_c".into(), [0.24, 0.66, 1.0, 0.04])]);
}

#[test]
fn out_of_range_color_channels_are_clamped() {
    let color = Color {
        r: 2.0,
        g: -1.0,
        b: 0.5,
        a: 1.5,
    };
    assert_eq!(
        declaration("c", &ParameterValue::Color(color)).as_deref(),
        Some("vec4 fx_c = vec4(1.0, 0.0, 0.5, 1.0);")
    );

    let sink = RecordingSink::with_uniforms(&["u_c"]);
    marshal::assign_uniforms(&sink, &Parameters::new().with("c", ParameterValue::Color(color)));
    assert_eq!(sink.uploads(), vec![Upload::Vec4("u_c".into(), [1.0, 0.0, 0.5, 1.0])]);
}

#[test]
fn unsupported_kinds_do_not_disturb_their_neighbours() {
    let with_unsupported = Parameters::new()
        .with("a", ParameterValue::Number(1.5))
        .with("b", ParameterValue::Unsupported("string".into()))
        .with("c", ParameterValue::BigInt(3));
    let without = Parameters::new()
        .with("a", ParameterValue::Number(1.5))
        .with("c", ParameterValue::BigInt(3));

    assert_eq!(declarations(&with_unsupported), declarations(&without));
    assert_eq!(declarations(&without).len(), 2);

    let names = ["u_a", "u_b", "u_c"];
    let first = RecordingSink::with_uniforms(&names);
    let second = RecordingSink::with_uniforms(&names);
    let report = marshal::assign_uniforms(&first, &with_unsupported);
    marshal::assign_uniforms(&second, &without);

    assert_eq!(first.uploads(), second.uploads());
    assert_eq!(report.uploaded, vec!["a", "c"]);
    assert_eq!(report.skipped, vec!["b"]);
}

#[test]
fn missing_uniform_is_a_silent_no_op() {
    let sink = RecordingSink::with_uniforms(&["u_y"]);
    let params = Parameters::new()
        .with("x", ParameterValue::Number(4.0))
        .with("y", ParameterValue::Number(2.0));
    let report = marshal::assign_uniforms(&sink, &params);

    assert_eq!(sink.uploads(), vec![Upload::Float("u_y".into(), 2.0)]);
    assert_eq!(report.missing, vec!["x"]);
    assert!(report.skipped.is_empty());
}

#[test]
fn invalid_identifiers_are_skipped_in_both_modes() {
    let params = Parameters::new()
        .with("bad-key", ParameterValue::Number(1.0))
        .with("1st", ParameterValue::Boolean(true))
        .with("ok_2", ParameterValue::Boolean(true));

    assert_eq!(declarations(&params), vec!["bool fx_ok_2 = true;".to_owned()]);

    let sink = RecordingSink::with_uniforms(&["u_bad-key", "u_ok_2"]);
    let report = marshal::assign_uniforms(&sink, &params);
    assert_eq!(report.uploaded, vec!["ok_2"]);
    assert_eq!(report.skipped, vec!["bad-key", "1st"]);
}

#[test]
fn keys_that_would_contain_a_double_underscore_are_skipped() {
    assert!(!marshal::is_parameter_key("_lead"));
    assert!(!marshal::is_parameter_key("a__b"));
    assert!(marshal::is_parameter_key("a_b"));
    assert!(marshal::is_glsl_identifier("_lead"));

    let params = Parameters::new()
        .with("_lead", ParameterValue::Boolean(true))
        .with("a__b", ParameterValue::Number(1.0))
        .with("a_b", ParameterValue::Number(2.0));
    assert_eq!(declarations(&params), vec!["float fx_a_b = 2.0;".to_owned()]);

    let sink = RecordingSink::with_uniforms(&["u__lead", "u_a__b", "u_a_b"]);
    let report = marshal::assign_uniforms(&sink, &params);
    assert_eq!(sink.uploads(), vec![Upload::Float("u_a_b".into(), 2.0)]);
    assert_eq!(report.skipped, vec!["_lead", "a__b"]);
}

#[test]
fn declarations_follow_parameter_order() {
    let params = Parameters::new()
        .with("z", ParameterValue::Boolean(false))
        .with("a", ParameterValue::Number(2.0))
        .with("m", ParameterValue::BigInt(5));
    assert_eq!(
        declarations(&params),
        vec!["bool fx_z = false;", "float fx_a = 2.0;", "int fx_m = 5;"]
    );
}
