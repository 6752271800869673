//! Property tests for the composition operators.

use proptest::prelude::*;
use quilt::compose::{overlay, repeat, rotate, rotate_design, sequence, Anchor, Axis, Turn};
use quilt::{Color, Design, ErrorKind, Patch, Value};

fn color_strategy() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::PALETTE.to_vec())
}

fn patch_strategy() -> impl Strategy<Value = Patch> {
    (1u32..20, 1u32..20, color_strategy())
        .prop_map(|(w, h, c)| Patch::new(f64::from(w), f64::from(h), c))
}

fn turn_strategy() -> impl Strategy<Value = Turn> {
    prop::sample::select(vec![Turn::Zero, Turn::Quarter, Turn::Half, Turn::ThreeQuarter])
}

/// A small design: a row of same-height patches stacked on a matching row.
fn design_strategy() -> impl Strategy<Value = Design> {
    (1u32..6, prop::collection::vec((1u32..6, color_strategy()), 1..5)).prop_map(|(h, row)| {
        let top: Vec<Value> = row
            .iter()
            .map(|(w, c)| Value::Patch(Patch::new(f64::from(*w), f64::from(h), c.clone())))
            .collect();
        let top = sequence(Axis::Horizontal, top).unwrap();
        let bottom = Value::Patch(Patch::new(top.width, 1.0, Color::Grey));
        sequence(Axis::Vertical, [Value::Design(top), bottom]).unwrap()
    })
}

proptest! {
    #[test]
    fn hor_adds_widths(a in patch_strategy(), w in 1u32..20, c in color_strategy()) {
        let b = Patch::new(f64::from(w), a.height, c);
        let d = sequence(Axis::Horizontal, [Value::Patch(a.clone()), Value::Patch(b.clone())]).unwrap();
        prop_assert_eq!(d.width, a.width + b.width);
        prop_assert_eq!(d.height, a.height);
        prop_assert_eq!(d.patches[1].x, a.width);
        prop_assert!(d.is_contained());
    }

    #[test]
    fn mismatched_cross_axis_never_composes(a in patch_strategy(), b in patch_strategy()) {
        prop_assume!(a.height != b.height);
        let err = sequence(Axis::Horizontal, [Value::Patch(a.clone()), Value::Patch(b.clone())]).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::DimensionMismatchError);
        prop_assume!(a.width != b.width);
        let err = sequence(Axis::Vertical, [Value::Patch(a), Value::Patch(b)]).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::DimensionMismatchError);
    }

    #[test]
    fn rotation_swaps_only_on_quarter_turns(p in patch_strategy(), turn in turn_strategy()) {
        let (w, h) = match rotate(turn, Value::Patch(p.clone())).unwrap() {
            Value::Patch(r) => (r.width, r.height),
            other => panic!("expected patch, got {other:?}"),
        };
        if turn.swaps() {
            prop_assert_eq!((w, h), (p.height, p.width));
        } else {
            prop_assert_eq!((w, h), (p.width, p.height));
        }
    }

    #[test]
    fn rotated_designs_stay_in_bounds(d in design_strategy(), turn in turn_strategy()) {
        let r = rotate_design(turn, &d);
        prop_assert_eq!(r.patches.len(), d.patches.len());
        prop_assert!(r.is_contained(), "{:?} escaped its box after {:?}", r, turn);
        let area = |d: &Design| d.patches.iter().map(|p| p.width * p.height).sum::<f64>();
        prop_assert_eq!(area(&r), area(&d));
    }

    #[test]
    fn four_quarter_turns_return_home(d in design_strategy()) {
        let mut r = d.clone();
        for _ in 0..4 {
            r = rotate_design(Turn::Quarter, &r);
        }
        prop_assert_eq!((r.width, r.height), (d.width, d.height));
        for (a, b) in r.patches.iter().zip(&d.patches) {
            prop_assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
            prop_assert_eq!((a.width, a.height), (b.width, b.height));
        }
    }

    #[test]
    fn rep_tiles_n_copies(p in patch_strategy(), n in 1usize..12) {
        let d = repeat(n, Value::Patch(p.clone())).unwrap();
        prop_assert_eq!(d.patches.len(), n);
        prop_assert_eq!(d.width, p.width * n as f64);
        let right = d.patches.iter().map(|q| q.x + q.width).fold(0.0, f64::max);
        prop_assert_eq!(right, p.width * n as f64);
        prop_assert!(d.is_contained());
    }

    #[test]
    fn top_left_overlay_shares_origin(a in patch_strategy(), b in patch_strategy()) {
        let d = overlay(Anchor::TopLeft, [Value::Patch(a.clone()), Value::Patch(b)]).unwrap();
        prop_assert_eq!((d.patches[1].x, d.patches[1].y), (a.x, a.y));
        prop_assert_eq!((d.width, d.height), (a.width, a.height));
    }

    #[test]
    fn centered_overlay_is_symmetric(a in patch_strategy(), b in patch_strategy()) {
        let d = overlay(Anchor::Center, [Value::Patch(a.clone()), Value::Patch(b.clone())]).unwrap();
        let inner = &d.patches[1];
        let left = inner.x;
        let right = a.width - (inner.x + inner.width);
        let top = inner.y;
        let bottom = a.height - (inner.y + inner.height);
        prop_assert!((left - right).abs() < 1e-9);
        prop_assert!((top - bottom).abs() < 1e-9);
    }
}

#[test]
fn rep_zero_is_invalid() {
    let err = repeat(0, Value::Patch(Patch::new(1.0, 1.0, Color::Red))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgumentError);
}
