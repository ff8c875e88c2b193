use std::{cell::Cell, fmt::Display, rc::Rc};

use tvariant::{Blank, EmptyVariantAccess, Variant, Visitor, t, visit_all};

#[derive(Debug, Clone, PartialEq, PartialOrd)]
struct Neg(Expr);

#[derive(Debug, Clone, PartialEq, PartialOrd)]
struct Bin(char, Expr, Expr);

type Expr = Variant![i64, rec Neg, rec Bin];

fn num(n: i64) -> Expr {
    Variant::new(n)
}

fn bin(op: char, l: Expr, r: Expr) -> Expr {
    Variant::new(Bin(op, l, r))
}

struct Eval;

impl Visitor<&i64> for Eval {
    type Output = i64;

    fn visit(&mut self, n: &i64) -> i64 {
        *n
    }
}

impl Visitor<&Neg> for Eval {
    type Output = i64;

    fn visit(&mut self, Neg(e): &Neg) -> i64 {
        -e.visit(self).unwrap_or_default()
    }
}

impl Visitor<&Bin> for Eval {
    type Output = i64;

    fn visit(&mut self, Bin(op, l, r): &Bin) -> i64 {
        apply(*op, l.visit(self).unwrap_or_default(), r.visit(self).unwrap_or_default())
    }
}

fn apply(op: char, l: i64, r: i64) -> i64 {
    match op {
        '+' => l + r,
        '-' => l - r,
        '*' => l * r,
        _ => unreachable!("unknown operator {op}"),
    }
}

/// Evaluates with every literal capped at the trailing argument.
struct Capped;

impl Visitor<(&i64, (i64, ()))> for Capped {
    type Output = i64;

    fn visit(&mut self, (n, (cap, ())): (&i64, (i64, ()))) -> i64 {
        (*n).min(cap)
    }
}

impl Visitor<(&Neg, (i64, ()))> for Capped {
    type Output = i64;

    fn visit(&mut self, (Neg(e), (cap, ())): (&Neg, (i64, ()))) -> i64 {
        -e.visit_with(t![cap], self).unwrap_or_default()
    }
}

impl Visitor<(&Bin, (i64, ()))> for Capped {
    type Output = i64;

    fn visit(&mut self, (Bin(op, l, r), (cap, ())): (&Bin, (i64, ()))) -> i64 {
        let l = l.visit_with(t![cap], self).unwrap_or_default();
        let r = r.visit_with(t![cap], self).unwrap_or_default();
        apply(*op, l, r)
    }
}

/// Replaces every literal with its double.
struct Double;

impl Visitor<&mut i64> for Double {
    type Output = ();

    fn visit(&mut self, n: &mut i64) {
        *n *= 2;
    }
}

impl Visitor<&mut Neg> for Double {
    type Output = ();

    fn visit(&mut self, Neg(e): &mut Neg) {
        let _ = e.visit_mut(self);
    }
}

impl Visitor<&mut Bin> for Double {
    type Output = ();

    fn visit(&mut self, Bin(_, l, r): &mut Bin) {
        let _ = l.visit_mut(self);
        let _ = r.visit_mut(self);
    }
}

#[test]
fn evaluate_tree() {
    let expr = bin('-', bin('*', num(6), num(7)), Variant::new(Neg(num(8))));
    assert_eq!(expr.visit(&mut Eval), Ok(50));

    let mut doubled = expr.clone();
    doubled.visit_mut(&mut Double).unwrap();
    assert_eq!(doubled.visit(&mut Eval), Ok(184));
    assert_eq!(expr.visit(&mut Eval), Ok(50));
    assert_ne!(expr, doubled);
}

#[test]
fn trailing_argument_reaches_every_level() {
    let mut expr = bin('+', num(4), Variant::new(Neg(bin('*', num(9), num(2)))));
    assert_eq!(expr.visit(&mut Eval), Ok(-14));
    assert_eq!(expr.visit_with(t![3i64], &mut Capped), Ok(-2));
    assert_eq!(expr.visit_with(t![100i64], &mut Capped), Ok(-14));

    drop(expr.take());
    assert_eq!(expr.visit_with(t![3i64], &mut Capped), Err(EmptyVariantAccess));
}

#[test]
fn deep_copy_is_independent() {
    let mut a = bin('+', num(1), num(2));
    let b = a.clone();
    assert_eq!(a, b);

    if let Some(Bin(_, l, _)) = a.get_mut::<Bin, _>() {
        l.assign(10i64);
    }
    assert_eq!(a.visit(&mut Eval), Ok(12));
    assert_eq!(b.visit(&mut Eval), Ok(3));
    assert!(b < a);
}

#[test]
fn replace_subtree_with_child() {
    let mut expr: Expr = Variant::new(Neg(bin('+', num(2), num(3))));
    let inner = expr.get_mut::<Neg, _>().map(|Neg(e)| e.take());
    if let Some(inner) = inner {
        expr = inner;
    }
    assert_eq!(expr.visit(&mut Eval), Ok(5));

    let partial = expr.get_mut::<Bin, _>().map(|Bin(_, l, _)| l.take());
    assert_eq!(partial, Some(num(2)));
    assert_eq!(expr.visit(&mut Eval), Ok(3));
}

struct Node {
    _token: Token,
    next: List,
}

struct Token(Rc<Cell<usize>>);

impl Drop for Token {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

type List = Variant![Blank, rec Node];

fn list(len: usize, drops: &Rc<Cell<usize>>) -> List {
    (0..len).fold(Variant::default(), |next, _| {
        Variant::new(Node {
            _token: Token(drops.clone()),
            next,
        })
    })
}

#[test]
fn long_list_drops_every_node_once() {
    let drops = Rc::new(Cell::new(0));
    drop(list(200, &drops));
    assert_eq!(drops.get(), 200);

    let mut l = list(10, &drops);
    let tail = l.get_mut::<Node, _>().map(|node| node.next.replace(Variant::new(Blank)));
    drop(l);
    assert_eq!(drops.get(), 201);
    drop(tail);
    assert_eq!(drops.get(), 210);
}

type Num = Variant![i64, f64];

struct Add;

impl Visitor<(&i64, (&i64, ()))> for Add {
    type Output = Num;

    fn visit(&mut self, (a, (b, ())): (&i64, (&i64, ()))) -> Num {
        Variant::new(a + b)
    }
}

impl Visitor<(&i64, (&f64, ()))> for Add {
    type Output = Num;

    fn visit(&mut self, (a, (b, ())): (&i64, (&f64, ()))) -> Num {
        Variant::new(*a as f64 + b)
    }
}

impl Visitor<(&f64, (&i64, ()))> for Add {
    type Output = Num;

    fn visit(&mut self, (a, (b, ())): (&f64, (&i64, ()))) -> Num {
        Variant::new(a + *b as f64)
    }
}

impl Visitor<(&f64, (&f64, ()))> for Add {
    type Output = Num;

    fn visit(&mut self, (a, (b, ())): (&f64, (&f64, ()))) -> Num {
        Variant::new(a + b)
    }
}

#[test]
fn visit_all_promotes_numbers() {
    let one: Num = Variant::new(1i64);
    let half: Num = Variant::new(0.5f64);

    let sum = visit_all(t![&one, &one], &mut Add).unwrap();
    assert_eq!(sum.get::<i64, _>(), Some(&2));

    let sum = visit_all(t![&one, &half], &mut Add).unwrap();
    assert_eq!(sum.get::<f64, _>(), Some(&1.5));
    assert_eq!(sum.to_string(), "1.5");

    let sum = visit_all(t![&half, &half], &mut Add).unwrap();
    assert_eq!(format!("{sum:?}"), "1.0");
}

struct Triple;

impl<A: Display, B: Display, C: Display> Visitor<(&A, (&B, (&C, ())))> for Triple {
    type Output = String;

    fn visit(&mut self, (a, (b, (c, ()))): (&A, (&B, (&C, ())))) -> String {
        format!("{a} {b} {c}")
    }
}

#[test]
fn visit_all_three() {
    let a: Variant![i32, String] = Variant::new(1i32);
    let b: Variant![bool, char] = Variant::new('b');
    let mut c: Num = Variant::new(2.5f64);
    assert_eq!(visit_all(t![&a, &b, &c], &mut Triple).as_deref(), Ok("1 b 2.5"));

    drop(c.take());
    assert_eq!(visit_all(t![&a, &b, &c], &mut Triple), Err(EmptyVariantAccess));
}
