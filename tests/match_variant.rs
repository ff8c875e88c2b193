#![cfg(feature = "macros")]

use tvariant::{Blank, Variant, match_variant};

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq)]
struct Label(String);

type Shape = Variant![Blank, Point, Label, i32];

fn describe(shape: Shape) -> String {
    match_variant!(shape {
        Blank => "blank".to_string(),
        Point { x: 0, y: 0 } => "origin".to_string(),
        Point { x, y } => format!("({x}, {y})"),
        Label(text) if text.is_empty() => "empty label".to_string(),
        Label(text) => text,
        n: i32 => n.to_string(),
    })
}

#[test]
fn exhaustive_arms() {
    assert_eq!(describe(Variant::new(Blank)), "blank");
    assert_eq!(describe(Variant::new(Point { x: 0, y: 0 })), "origin");
    assert_eq!(describe(Variant::new(Point { x: 1, y: -2 })), "(1, -2)");
    assert_eq!(describe(Variant::new(Label(String::new()))), "empty label");
    assert_eq!(describe(Variant::new(Label("tag".into()))), "tag");
    assert_eq!(describe(Variant::new(42i32)), "42");
}

#[test]
fn wildcard_takes_the_rest() {
    let is_point = |shape: Shape| match_variant!(shape {
        Point { .. } => true,
        _ => false,
    });

    assert!(is_point(Variant::new(Point { x: 3, y: 4 })));
    assert!(!is_point(Variant::new(7i32)));
    assert!(!is_point(Variant::default()));
}

#[test]
fn literal_arms() {
    let classify = |v: Variant![char, bool]| match_variant!(v {
        'x' => 1,
        c: char => c as u32,
        true => 100,
        _ => 0,
    });

    assert_eq!(classify(Variant::new('x')), 1);
    assert_eq!(classify(Variant::new('a')), 97);
    assert_eq!(classify(Variant::new(true)), 100);
    assert_eq!(classify(Variant::new(false)), 0);
}

#[test]
fn root_binding_keeps_the_whole_value() {
    let v: Shape = Variant::new(Point { x: 5, y: 6 });
    let point = match_variant!(v {
        p @ Point { .. } => Some(p),
        _ => None,
    });
    assert_eq!(point, Some(Point { x: 5, y: 6 }));
}

#[test]
#[should_panic(expected = "visited a valueless variant")]
fn valueless_panics() {
    let mut shape: Shape = Variant::new(Blank);
    drop(shape.take());
    let _ = describe(shape);
}
