use crate::config::{DEFAULT_MAX_DEPTH, STACK_GROWTH, STACK_RED_ZONE};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::value::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    NatNum(i64),
    Rotation(i64),
    /// Literal color name or CSS string, resolved at evaluation.
    Color(String),
    VarCall(String),
    Apply {
        name: String,
        args: Vec<Expr>,
    },
    Rect {
        width: Box<Expr>,
        height: Box<Expr>,
        color: Box<Expr>,
    },
    Over {
        anchor: String,
        designs: Vec<Expr>,
    },
    Rot {
        angle: Box<Expr>,
        design: Box<Expr>,
    },
    Rep {
        count: Box<Expr>,
        design: Box<Expr>,
    },
    Hor(Vec<Expr>),
    Vert(Vec<Expr>),
    Plus(Box<Expr>, Box<Expr>),
    Times(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::NatNum(_) => "NatNum",
            Expr::Rotation(_) => "Rotation",
            Expr::Color(_) => "Color",
            Expr::VarCall(_) => "VarCall",
            Expr::Apply { .. } => "Apply",
            Expr::Rect { .. } => "Rect",
            Expr::Over { .. } => "Over",
            Expr::Rot { .. } => "Rot",
            Expr::Rep { .. } => "Rep",
            Expr::Hor(_) => "Hor",
            Expr::Vert(_) => "Vert",
            Expr::Plus(_, _) => "Plus",
            Expr::Times(_, _) => "Times",
        }
    }
}

/// Declared kind in a variable definition such as `rect x = ...;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Rect,
    Design,
    Num,
    Color,
    Angle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Variable {
        ty: VarType,
        name: String,
        value: Expr,
    },
    Assignment {
        name: String,
        value: Expr,
    },
    DependentFunc {
        name: String,
        args: Vec<String>,
        body: Expr,
    },
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Variable { name, .. }
            | Definition::Assignment { name, .. }
            | Definition::DependentFunc { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub definitions: Vec<Definition>,
    pub quilt: Expr,
}

pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    parse_with_depth(tokens, DEFAULT_MAX_DEPTH)
}

/// Parse, rejecting expressions nested more than `max_depth` atoms deep.
pub fn parse_with_depth(tokens: Vec<Token>, max_depth: usize) -> Result<Program, ParseError> {
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };
    p.parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }
    fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }
    fn peek_is(&self, k: TokenKind) -> bool {
        self.peek().map(|t| &t.kind) == Some(&k)
    }
    fn peek_n_is(&self, n: usize, k: TokenKind) -> bool {
        self.tokens.get(self.pos + n).map(|t| &t.kind) == Some(&k)
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        let (line, col) = match self.peek().or_else(|| self.tokens.last()) {
            Some(t) => (t.line, t.col),
            None => (1, 1),
        };
        ParseError::new(line, col, message)
    }

    fn describe_next(&self) -> String {
        self.peek()
            .map(|t| format!("'{}'", t.text))
            .unwrap_or_else(|| "end of input".to_string())
    }

    fn eat(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.peek_is(kind.clone()) {
            if let Some(t) = self.bump() {
                return Ok(t);
            }
        }
        Err(self.error_here(format!("expected {:?}, found {}", kind, self.describe_next())))
    }

    /// A name being bound. Palette names always read back as colors, so
    /// they cannot be bound.
    fn eat_binding_name(&mut self) -> Result<String, ParseError> {
        let tok = self.eat(TokenKind::Ident)?;
        if Color::from_palette(&tok.text).is_some() {
            return Err(ParseError::new(
                tok.line,
                tok.col,
                format!("'{}' is a color and cannot be used as a name", tok.text),
            ));
        }
        Ok(tok.text)
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut definitions = Vec::new();
        while let Some(def) = self.parse_definition()? {
            definitions.push(def);
        }
        if self.peek().is_none() {
            return Err(self.error_here("expected a design expression"));
        }
        let quilt = self.parse_expr()?;
        if self.peek_is(TokenKind::Semicolon) {
            self.bump();
        }
        if self.peek().is_some() {
            return Err(self.error_here(format!(
                "unexpected {} after design expression",
                self.describe_next()
            )));
        }
        Ok(Program { definitions, quilt })
    }

    fn var_type(&self) -> Option<VarType> {
        // `rect(` is a constructor; `rect name` starts a definition
        if !self.peek_n_is(1, TokenKind::Ident) {
            return None;
        }
        Some(match self.peek()?.kind {
            TokenKind::Rect => VarType::Rect,
            TokenKind::Design => VarType::Design,
            TokenKind::Num => VarType::Num,
            TokenKind::Color => VarType::Color,
            TokenKind::Angle => VarType::Angle,
            _ => return None,
        })
    }

    fn parse_definition(&mut self) -> Result<Option<Definition>, ParseError> {
        let def = if self.peek_is(TokenKind::Fun) {
            self.bump();
            let name = self.eat_binding_name()?;
            self.eat(TokenKind::LParen)?;
            let mut args = Vec::new();
            if !self.peek_is(TokenKind::RParen) {
                args.push(self.eat_binding_name()?);
                while self.peek_is(TokenKind::Comma) {
                    self.bump();
                    args.push(self.eat_binding_name()?);
                }
            }
            self.eat(TokenKind::RParen)?;
            self.eat(TokenKind::Equal)?;
            let body = self.parse_expr()?;
            Definition::DependentFunc { name, args, body }
        } else if let Some(ty) = self.var_type() {
            self.bump();
            let name = self.eat_binding_name()?;
            self.eat(TokenKind::Equal)?;
            let value = self.parse_expr()?;
            Definition::Variable { ty, name, value }
        } else if self.peek_is(TokenKind::Ident) && self.peek_n_is(1, TokenKind::Equal) {
            let name = self.eat_binding_name()?;
            self.eat(TokenKind::Equal)?;
            let value = self.parse_expr()?;
            Definition::Assignment { name, value }
        } else {
            return Ok(None);
        };
        self.eat(TokenKind::Semicolon)?;
        Ok(Some(def))
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_term()?;
        while self.peek_is(TokenKind::Plus) {
            self.bump();
            let rhs = self.parse_term()?;
            node = Expr::Plus(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_atom()?;
        while self.peek_is(TokenKind::Star) {
            self.bump();
            let rhs = self.parse_atom()?;
            node = Expr::Times(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut items = vec![self.parse_expr()?];
        while self.peek_is(TokenKind::Comma) {
            self.bump();
            items.push(self.parse_expr()?);
        }
        Ok(items)
    }

    /// `op(a, b)` or the prefix form `op a b`.
    fn parse_pair(&mut self) -> Result<(Expr, Expr), ParseError> {
        if self.peek_is(TokenKind::LParen) {
            self.bump();
            let first = self.parse_expr()?;
            if self.peek_is(TokenKind::Comma) {
                self.bump();
                let second = self.parse_expr()?;
                self.eat(TokenKind::RParen)?;
                return Ok((first, second));
            }
            // `op (a) b`: the parenthesis only grouped the first operand
            self.eat(TokenKind::RParen)?;
            let second = self.parse_atom()?;
            return Ok((first, second));
        }
        let first = self.parse_atom()?;
        let second = self.parse_atom()?;
        Ok((first, second))
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= self.max_depth {
            return Err(self.error_here(format!(
                "nesting too deep (more than {} levels)",
                self.max_depth
            )));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.parse_atom_inner());
        self.depth -= 1;
        result
    }

    fn parse_atom_inner(&mut self) -> Result<Expr, ParseError> {
        let tok = match self.peek() {
            Some(t) => t.clone(),
            None => return Err(self.error_here("unexpected end of input")),
        };
        match tok.kind {
            TokenKind::Int => {
                self.bump();
                let n = tok.text.parse::<i64>().map_err(|_| {
                    ParseError::new(tok.line, tok.col, format!("number '{}' is too large", tok.text))
                })?;
                Ok(Expr::NatNum(n))
            }
            TokenKind::String => {
                self.bump();
                Ok(Expr::Color(tok.text.trim_matches('"').to_string()))
            }
            TokenKind::Hex => {
                self.bump();
                Ok(Expr::Color(tok.text))
            }
            TokenKind::Ident => {
                self.bump();
                if Color::from_palette(&tok.text).is_some() {
                    return Ok(Expr::Color(tok.text));
                }
                if self.peek_is(TokenKind::LParen) {
                    self.bump();
                    let args = if self.peek_is(TokenKind::RParen) {
                        Vec::new()
                    } else {
                        self.parse_list()?
                    };
                    self.eat(TokenKind::RParen)?;
                    return Ok(Expr::Apply {
                        name: tok.text,
                        args,
                    });
                }
                Ok(Expr::VarCall(tok.text))
            }
            TokenKind::LParen => {
                self.bump();
                let e = self.parse_expr()?;
                self.eat(TokenKind::RParen)?;
                Ok(e)
            }
            TokenKind::Rect => {
                self.bump();
                self.eat(TokenKind::LParen)?;
                let width = self.parse_expr()?;
                self.eat(TokenKind::Comma)?;
                let height = self.parse_expr()?;
                self.eat(TokenKind::Comma)?;
                let color = self.parse_expr()?;
                self.eat(TokenKind::RParen)?;
                Ok(Expr::Rect {
                    width: Box::new(width),
                    height: Box::new(height),
                    color: Box::new(color),
                })
            }
            TokenKind::Hor | TokenKind::Vert => {
                self.bump();
                self.eat(TokenKind::LParen)?;
                let items = self.parse_list()?;
                self.eat(TokenKind::RParen)?;
                Ok(if tok.kind == TokenKind::Hor {
                    Expr::Hor(items)
                } else {
                    Expr::Vert(items)
                })
            }
            TokenKind::Over => {
                self.bump();
                self.eat(TokenKind::LParen)?;
                let anchor = match self.peek() {
                    Some(t) if matches!(t.kind, TokenKind::Ident | TokenKind::String) => {
                        t.text.trim_matches('"').to_string()
                    }
                    _ => return Err(self.error_here("expected an anchor (TL, TR, BL, BR or C)")),
                };
                self.bump();
                self.eat(TokenKind::Comma)?;
                let designs = self.parse_list()?;
                self.eat(TokenKind::RParen)?;
                Ok(Expr::Over { anchor, designs })
            }
            TokenKind::Rot => {
                self.bump();
                let (angle, design) = self.parse_pair()?;
                let angle = match angle {
                    Expr::NatNum(n) => Expr::Rotation(n),
                    other => other,
                };
                Ok(Expr::Rot {
                    angle: Box::new(angle),
                    design: Box::new(design),
                })
            }
            TokenKind::Rep => {
                self.bump();
                let (count, design) = self.parse_pair()?;
                Ok(Expr::Rep {
                    count: Box::new(count),
                    design: Box::new(design),
                })
            }
            _ => Err(ParseError::new(
                tok.line,
                tok.col,
                format!("unexpected '{}'", tok.text),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use pretty_assertions::assert_eq;

    fn parse_src(src: &str) -> Result<Program, ParseError> {
        parse(lex(src)?)
    }

    fn rect(w: i64, h: i64, c: &str) -> Expr {
        Expr::Rect {
            width: Box::new(Expr::NatNum(w)),
            height: Box::new(Expr::NatNum(h)),
            color: Box::new(Expr::Color(c.to_string())),
        }
    }

    #[test]
    fn bare_design_expression() {
        let p = parse_src("vert(rect(2, 2, red), rect(2, 2, blue))").unwrap();
        assert!(p.definitions.is_empty());
        assert_eq!(p.quilt, Expr::Vert(vec![rect(2, 2, "red"), rect(2, 2, "blue")]));
    }

    #[test]
    fn definitions_precede_the_quilt() {
        let p = parse_src("rect x = rect(3,2,blue);rect y = rect(3,2,red);vert(x, y);").unwrap();
        assert_eq!(
            p.definitions,
            vec![
                Definition::Variable {
                    ty: VarType::Rect,
                    name: "x".into(),
                    value: rect(3, 2, "blue"),
                },
                Definition::Variable {
                    ty: VarType::Rect,
                    name: "y".into(),
                    value: rect(3, 2, "red"),
                },
            ]
        );
        assert_eq!(
            p.quilt,
            Expr::Vert(vec![Expr::VarCall("x".into()), Expr::VarCall("y".into())])
        );
    }

    #[test]
    fn prefix_and_call_forms_of_rot_and_rep_agree() {
        let a = parse_src("rot 90 rep 4 rect(1, 2, red)").unwrap();
        let b = parse_src("rot(90, rep(4, rect(1, 2, red)))").unwrap();
        assert_eq!(a, b);
        match a.quilt {
            Expr::Rot { angle, .. } => assert_eq!(*angle, Expr::Rotation(90)),
            other => panic!("expected rot, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_precedence() {
        let p = parse_src("num n = 1 + 2 * 3; rect(n, n, grey)").unwrap();
        match &p.definitions[0] {
            Definition::Variable { value, .. } => assert_eq!(
                *value,
                Expr::Plus(
                    Box::new(Expr::NatNum(1)),
                    Box::new(Expr::Times(
                        Box::new(Expr::NatNum(2)),
                        Box::new(Expr::NatNum(3))
                    ))
                )
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn functions_assignments_and_over() {
        let p = parse_src(
            "fun square(s, c) = rect(s, s, c);\nn = 2;\nover(C, square(4, grey), square(n, \"#ff00ff\"))",
        )
        .unwrap();
        assert_eq!(p.definitions.len(), 2);
        assert_eq!(p.definitions[0].name(), "square");
        assert_eq!(
            p.definitions[1],
            Definition::Assignment {
                name: "n".into(),
                value: Expr::NatNum(2)
            }
        );
        match p.quilt {
            Expr::Over { anchor, designs } => {
                assert_eq!(anchor, "C");
                assert_eq!(
                    designs[1],
                    Expr::Apply {
                        name: "square".into(),
                        args: vec![Expr::VarCall("n".into()), Expr::Color("#ff00ff".into())],
                    }
                );
            }
            other => panic!("expected over, got {other:?}"),
        }
    }

    #[test]
    fn syntax_errors_carry_locations() {
        let err = parse_src("hor(rect(1, 2, red)\n  rect(1, 2, blue))").unwrap_err();
        assert_eq!((err.line, err.column), (2, 3));

        let err = parse_src("rect x = rect(1, 1, red);").unwrap_err();
        assert!(err.message.contains("expected a design expression"));

        let err = parse_src("rect(1, 1, red) rect(1, 1, red)").unwrap_err();
        assert!(err.message.contains("after design expression"));
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let err = parse_src(&"(".repeat(10_000)).unwrap_err();
        assert!(err.message.contains("nesting too deep"), "{}", err);

        let src = format!("rect({}1{}, 1, red)", "(".repeat(2000), ")".repeat(2000));
        assert!(parse_src(&src).is_err());
    }

    #[test]
    fn nesting_below_the_limit_parses() {
        let depth = 200;
        let src = format!("{}rect(1, 2, red){}", "rot(90, ".repeat(depth), ")".repeat(depth));
        let mut node = &parse_src(&src).unwrap().quilt;
        let mut rots = 0;
        while let Expr::Rot { design, .. } = node {
            rots += 1;
            node = &**design;
        }
        assert_eq!(rots, depth);

        let tokens = lex(&src).unwrap();
        assert!(parse_with_depth(tokens, 50).is_err());
    }

    #[test]
    fn palette_names_cannot_be_bound() {
        for src in [
            "color red = blue; rect(1, 1, red)",
            "red = 2; rect(1, 1, red)",
            "fun grey(w) = rect(w, w, red); rect(1, 1, red)",
            "fun f(pink) = rect(pink, 1, red); rect(1, 1, red)",
        ] {
            let err = parse_src(src).unwrap_err();
            assert!(err.message.contains("is a color"), "{src}: {err}");
        }
        let err = parse_src("num x = 1;\ncolor red = blue; rect(1, 1, red)").unwrap_err();
        assert_eq!((err.line, err.column), (2, 7));
    }
}
