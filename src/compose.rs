//! Structural operators that combine patches and designs into larger designs.
//!
//! Every operator consumes or borrows its inputs and builds fresh values;
//! nothing here mutates a patch that another design could still hold.

use std::f64::consts::PI;
use std::str::FromStr;

use crate::error::EvalError;
use crate::value::{Design, Patch, Value};

/// Composition axis for `hor` and `vert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn op_name(self) -> &'static str {
        match self {
            Axis::Horizontal => "hor",
            Axis::Vertical => "vert",
        }
    }

    /// (extent along the axis, extent across it)
    fn split(self, width: f64, height: f64) -> (f64, f64) {
        match self {
            Axis::Horizontal => (width, height),
            Axis::Vertical => (height, width),
        }
    }

    fn delta(self, offset: f64) -> (f64, f64) {
        match self {
            Axis::Horizontal => (offset, 0.0),
            Axis::Vertical => (0.0, offset),
        }
    }
}

fn drawable(op: &str, value: Value) -> Result<Design, EvalError> {
    let kind = value.kind_name();
    value
        .into_design()
        .ok_or_else(|| EvalError::type_error(format!("{op} expects patches or designs, got {kind}")))
}

/// Incremental side-by-side layout. The first element fixes the cross-axis
/// size; each later element must match it exactly and is shifted by the
/// running offset along the axis.
#[derive(Debug)]
pub struct Sequence {
    axis: Axis,
    cross: f64,
    offset: f64,
    patches: Vec<Patch>,
}

impl Sequence {
    pub fn start(axis: Axis, first: Value) -> Result<Self, EvalError> {
        let first = drawable(axis.op_name(), first)?;
        let (along, cross) = axis.split(first.width, first.height);
        Ok(Self {
            axis,
            cross,
            offset: along,
            patches: first.patches,
        })
    }

    pub fn push(&mut self, item: Value) -> Result<(), EvalError> {
        let item = drawable(self.axis.op_name(), item)?;
        let (along, cross) = self.axis.split(item.width, item.height);
        if cross != self.cross {
            let msg = match self.axis {
                Axis::Horizontal => format!(
                    "heights must match for horizontal composition (expected {}, got {})",
                    self.cross, cross
                ),
                Axis::Vertical => format!(
                    "widths must match for vertical composition (expected {}, got {})",
                    self.cross, cross
                ),
            };
            return Err(EvalError::DimensionMismatch(msg));
        }
        let (dx, dy) = self.axis.delta(self.offset);
        self.patches.extend(item.translated(dx, dy));
        self.offset += along;
        Ok(())
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    pub fn finish(self) -> Design {
        let (width, height) = match self.axis {
            Axis::Horizontal => (self.offset, self.cross),
            Axis::Vertical => (self.cross, self.offset),
        };
        Design::new(width, height, self.patches)
    }
}

/// Lay out all `items` along `axis`.
pub fn sequence(axis: Axis, items: impl IntoIterator<Item = Value>) -> Result<Design, EvalError> {
    let mut items = items.into_iter();
    let first = items.next().ok_or_else(|| {
        EvalError::InvalidArgument(format!("{} needs at least one element", axis.op_name()))
    })?;
    let mut seq = Sequence::start(axis, first)?;
    for item in items {
        seq.push(item)?;
    }
    Ok(seq.finish())
}

/// Alignment used by `over`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl FromStr for Anchor {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TL" => Ok(Anchor::TopLeft),
            "TR" => Ok(Anchor::TopRight),
            "BL" => Ok(Anchor::BottomLeft),
            "BR" => Ok(Anchor::BottomRight),
            "C" => Ok(Anchor::Center),
            other => Err(EvalError::UnsupportedAnchor(other.to_string())),
        }
    }
}

impl Anchor {
    /// Where an inner frame of size `(w, h)` lands inside an outer `(ow, oh)`.
    pub fn offset(self, (ow, oh): (f64, f64), (w, h): (f64, f64)) -> (f64, f64) {
        match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopRight => (ow - w, 0.0),
            Anchor::BottomLeft => (0.0, oh - h),
            Anchor::BottomRight => (ow - w, oh - h),
            Anchor::Center => (ow / 2.0 - w / 2.0, oh / 2.0 - h / 2.0),
        }
    }
}

/// Incremental overlay. The first element's box is the result's box; later
/// elements are positioned by the anchor and drawn after earlier ones.
#[derive(Debug)]
pub struct Overlay {
    anchor: Anchor,
    base: Design,
}

impl Overlay {
    pub fn start(anchor: Anchor, first: Value) -> Result<Self, EvalError> {
        Ok(Self {
            anchor,
            base: drawable("over", first)?,
        })
    }

    pub fn push(&mut self, item: Value) -> Result<(), EvalError> {
        let item = drawable("over", item)?;
        let (dx, dy) = self.anchor.offset(
            (self.base.width, self.base.height),
            (item.width, item.height),
        );
        self.base.patches.extend(item.translated(dx, dy));
        Ok(())
    }

    pub fn patch_count(&self) -> usize {
        self.base.patches.len()
    }

    pub fn finish(self) -> Design {
        self.base
    }
}

pub fn overlay(anchor: Anchor, items: impl IntoIterator<Item = Value>) -> Result<Design, EvalError> {
    let mut items = items.into_iter();
    let first = items
        .next()
        .ok_or_else(|| EvalError::InvalidArgument("over needs at least one element".into()))?;
    let mut over = Overlay::start(anchor, first)?;
    for item in items {
        over.push(item)?;
    }
    Ok(over.finish())
}

/// Clockwise cardinal rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Zero,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Turn {
    pub fn from_degrees(degrees: i64) -> Result<Turn, EvalError> {
        match degrees {
            0 => Ok(Turn::Zero),
            90 => Ok(Turn::Quarter),
            180 => Ok(Turn::Half),
            270 => Ok(Turn::ThreeQuarter),
            other => Err(EvalError::UnsupportedAngle(other.to_string())),
        }
    }

    pub fn degrees(self) -> i64 {
        match self {
            Turn::Zero => 0,
            Turn::Quarter => 90,
            Turn::Half => 180,
            Turn::ThreeQuarter => 270,
        }
    }

    /// Whether width and height trade places.
    pub fn swaps(self) -> bool {
        matches!(self, Turn::Quarter | Turn::ThreeQuarter)
    }

    // Screen y points down, so the standard rotation matrix turns clockwise.
    fn apply(self, x: f64, y: f64) -> (f64, f64) {
        let theta = self.degrees() as f64 * (PI / 180.0);
        let (sin, cos) = theta.sin_cos();
        (cos * x - sin * y, sin * x + cos * y)
    }
}

/// A lone patch keeps its position; only its shape turns.
pub fn rotate_patch(turn: Turn, patch: &Patch) -> Patch {
    if turn.swaps() {
        patch.transposed()
    } else {
        patch.clone()
    }
}

/// Rotate every patch about the design origin, then translate the result
/// back into the non-negative quadrant of the new bounding box.
pub fn rotate_design(turn: Turn, design: &Design) -> Design {
    let (width, height) = if turn.swaps() {
        (design.height, design.width)
    } else {
        (design.width, design.height)
    };
    let patches = design
        .patches
        .iter()
        .map(|p| match turn {
            Turn::Zero => p.clone(),
            Turn::Quarter => {
                let (x, y) = turn.apply(p.x, p.y + p.height);
                Patch::at(x + width, y, p.height, p.width, p.color.clone())
            }
            Turn::Half => {
                let (x, y) = turn.apply(p.x + p.width, p.y + p.height);
                Patch::at(x + width, y + height, p.width, p.height, p.color.clone())
            }
            Turn::ThreeQuarter => {
                let (x, y) = turn.apply(p.x + p.width, p.y);
                Patch::at(x, y + height, p.height, p.width, p.color.clone())
            }
        })
        .collect();
    Design::new(width, height, patches)
}

pub fn rotate(turn: Turn, target: Value) -> Result<Value, EvalError> {
    match target {
        Value::Patch(p) => Ok(Value::Patch(rotate_patch(turn, &p))),
        Value::Design(d) => Ok(Value::Design(rotate_design(turn, &d))),
        other => Err(EvalError::type_error(format!(
            "rotation target must be a patch or design, got {}",
            other.kind_name()
        ))),
    }
}

/// Tile `target` `count` times along x. Each copy is built fresh.
pub fn repeat(count: usize, target: Value) -> Result<Design, EvalError> {
    if count == 0 {
        return Err(EvalError::InvalidArgument(
            "repetition count must be positive".into(),
        ));
    }
    let original = match target {
        Value::Patch(p) => {
            // Tiles start where the patch already sits.
            let patches = (0..count)
                .map(|i| p.translated(i as f64 * p.width, 0.0))
                .collect();
            return Ok(Design::new(p.width * count as f64, p.height, patches));
        }
        Value::Design(d) => d,
        other => {
            return Err(EvalError::type_error(format!(
                "rep expects a patch or design, got {}",
                other.kind_name()
            )))
        }
    };
    let mut patches = Vec::with_capacity(original.patches.len() * count);
    for i in 0..count {
        patches.extend(original.translated(i as f64 * original.width, 0.0));
    }
    Ok(Design::new(
        original.width * count as f64,
        original.height,
        patches,
    ))
}
