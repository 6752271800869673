use std::fmt;

use serde::{Serialize, Serializer};

use crate::parser::Expr;

/// Display color of a patch: one of the fixed palette entries, or a raw
/// CSS color string for names the palette does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Black,
    Pink,
    Brown,
    Grey,
    Css(String),
}

impl Color {
    pub const PALETTE: [Color; 10] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::Black,
        Color::Pink,
        Color::Brown,
        Color::Grey,
    ];

    /// Palette lookup by lowercase name.
    pub fn from_palette(name: &str) -> Option<Color> {
        Some(match name {
            "red" => Color::Red,
            "orange" => Color::Orange,
            "yellow" => Color::Yellow,
            "green" => Color::Green,
            "blue" => Color::Blue,
            "purple" => Color::Purple,
            "black" => Color::Black,
            "pink" => Color::Pink,
            "brown" => Color::Brown,
            "grey" => Color::Grey,
            _ => return None,
        })
    }

    /// Resolve a literal color name, falling back to a CSS string.
    pub fn resolve(name: &str) -> Color {
        Color::from_palette(name).unwrap_or_else(|| Color::Css(name.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Black => "black",
            Color::Pink => "pink",
            Color::Brown => "brown",
            Color::Grey => "grey",
            Color::Css(s) => s,
        }
    }

    /// Muted fill used when painting.
    pub fn fill(&self) -> &str {
        match self {
            Color::Red => "#b57c7c",
            Color::Orange => "#d9a078",
            Color::Yellow => "#c8b77a",
            Color::Green => "#85a586",
            Color::Blue => "#6a8caf",
            Color::Purple => "#9e86a6",
            Color::Black => "#4d4d4d",
            Color::Pink => "#d8a6b8",
            Color::Brown => "#a58c72",
            Color::Grey => "#b0b0b0",
            Color::Css(s) => s,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A single axis-aligned colored rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patch {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

impl Patch {
    /// A patch at the origin; placement happens in composition.
    pub fn new(width: f64, height: f64, color: Color) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            color,
        }
    }

    pub fn at(x: f64, y: f64, width: f64, height: f64, color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Patch {
        Patch {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Same position and color with width and height exchanged.
    pub fn transposed(&self) -> Patch {
        Patch {
            width: self.height,
            height: self.width,
            ..self.clone()
        }
    }
}

/// A bounding box plus patches positioned in the design's own frame
/// (origin top-left, x right, y down).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Design {
    pub width: f64,
    pub height: f64,
    pub patches: Vec<Patch>,
}

impl Design {
    pub fn new(width: f64, height: f64, patches: Vec<Patch>) -> Self {
        Self {
            width,
            height,
            patches,
        }
    }

    /// One-patch design whose frame is the patch itself.
    pub fn from_patch(patch: Patch) -> Self {
        let (width, height) = (patch.width, patch.height);
        let placed = Patch {
            x: 0.0,
            y: 0.0,
            ..patch
        };
        Self::new(width, height, vec![placed])
    }

    /// Every patch moved by `(dx, dy)`; the bounding box is unchanged.
    pub fn translated(&self, dx: f64, dy: f64) -> impl Iterator<Item = Patch> + '_ {
        self.patches.iter().map(move |p| p.translated(dx, dy))
    }

    /// True when every patch lies inside `[0,width]x[0,height]`.
    pub fn is_contained(&self) -> bool {
        const EPS: f64 = 1e-9;
        self.patches.iter().all(|p| {
            p.x >= -EPS
                && p.y >= -EPS
                && p.x + p.width <= self.width + EPS
                && p.y + p.height <= self.height + EPS
        })
    }
}

impl From<Patch> for Design {
    fn from(patch: Patch) -> Self {
        Design::from_patch(patch)
    }
}

/// A stored dependent function: argument names plus unevaluated body.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Angle(i64),
    Color(Color),
    Patch(Patch),
    Design(Design),
    Function(Function),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Angle(_) => "angle",
            Value::Color(_) => "color",
            Value::Patch(_) => "patch",
            Value::Design(_) => "design",
            Value::Function(_) => "function",
        }
    }

    /// Drawable values as a design; a lone patch becomes a one-patch design.
    pub fn into_design(self) -> Option<Design> {
        match self {
            Value::Patch(p) => Some(Design::from_patch(p)),
            Value::Design(d) => Some(d),
            _ => None,
        }
    }
}
