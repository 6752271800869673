use std::collections::HashMap;

use tracing::{debug, trace};

use crate::compose::{self, Anchor, Axis, Overlay, Sequence, Turn};
use crate::config::{EvalConfig, STACK_GROWTH, STACK_RED_ZONE};
use crate::env::Env;
use crate::error::EvalError;
use crate::parser::{Definition, Expr, Program, VarType};
use crate::value::{Color, Design, Function, Patch, Value};

/// Evaluate `program` against a fresh environment.
pub fn execute(program: &Program, config: EvalConfig) -> Result<Design, EvalError> {
    Interpreter::new(config).run(program)
}

/// One evaluation session. Holds the environment for the duration of a
/// single pass and is dropped afterwards.
pub struct Interpreter {
    env: Env,
    config: EvalConfig,
    depth: usize,
}

impl Interpreter {
    pub fn new(config: EvalConfig) -> Self {
        Self {
            env: Env::new(),
            config,
            depth: 0,
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Bind every definition in order, then evaluate the quilt expression.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, program: &Program) -> Result<Design, EvalError> {
        debug!(definitions = program.definitions.len(), "start");
        for def in &program.definitions {
            self.bind(def)?;
        }
        let value = self.eval(&program.quilt)?;
        let kind = value.kind_name();
        let design = value.into_design().ok_or_else(|| {
            EvalError::type_error(format!(
                "a quilt must evaluate to a patch or design, got {kind}"
            ))
        })?;
        debug!(
            width = design.width,
            height = design.height,
            patches = design.patches.len(),
            "done"
        );
        Ok(design)
    }

    pub fn bind(&mut self, def: &Definition) -> Result<(), EvalError> {
        match def {
            Definition::Variable { ty, name, value } => {
                let v = self.eval(value)?;
                check_declared(*ty, name, &v)?;
                debug!(name = %name, kind = v.kind_name(), "define");
                self.env.define(name.clone(), v);
            }
            Definition::Assignment { name, value } => {
                let v = self.eval(value)?;
                debug!(name = %name, kind = v.kind_name(), "assign");
                self.env.define(name.clone(), v);
            }
            Definition::DependentFunc { name, args, body } => {
                debug!(name = %name, arity = args.len(), "define function");
                self.env.define(
                    name.clone(),
                    Value::Function(Function {
                        params: args.clone(),
                        body: body.clone(),
                    }),
                );
            }
        }
        Ok(())
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        if self.depth >= self.config.max_depth {
            return Err(EvalError::ResourceLimit(format!(
                "evaluation nested deeper than {} levels",
                self.config.max_depth
            )));
        }
        self.depth += 1;
        trace!(node = expr.kind_name(), depth = self.depth, "eval");
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.eval_node(expr));
        self.depth -= 1;
        result
    }

    fn eval_node(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::NatNum(n) => Ok(Value::Number(*n as f64)),
            Expr::Rotation(deg) => Ok(Value::Angle(*deg)),
            Expr::Color(name) => Ok(Value::Color(Color::resolve(name))),
            Expr::VarCall(name) => self.env.lookup(name).cloned(),
            Expr::Apply { name, args } => self.apply(name, args),
            Expr::Plus(l, r) => {
                let a = self.number(l, "+")?;
                let b = self.number(r, "+")?;
                Ok(Value::Number(a + b))
            }
            Expr::Times(l, r) => {
                let a = self.number(l, "*")?;
                let b = self.number(r, "*")?;
                Ok(Value::Number(a * b))
            }
            Expr::Rect {
                width,
                height,
                color,
            } => {
                let w = self.number(width, "rect width")?;
                let h = self.number(height, "rect height")?;
                if !(w > 0.0 && w.is_finite()) || !(h > 0.0 && h.is_finite()) {
                    return Err(EvalError::InvalidArgument(format!(
                        "rect dimensions must be positive, got {w} x {h}"
                    )));
                }
                let color = match self.eval(color)? {
                    Value::Color(c) => c,
                    other => {
                        return Err(EvalError::type_error(format!(
                            "rect color must be a color, got {}",
                            other.kind_name()
                        )))
                    }
                };
                Ok(Value::Patch(Patch::new(w, h, color)))
            }
            Expr::Hor(items) => self.sequence(Axis::Horizontal, items),
            Expr::Vert(items) => self.sequence(Axis::Vertical, items),
            Expr::Over { anchor, designs } => {
                let anchor: Anchor = anchor.parse()?;
                let (first, rest) = split_first(designs, "over")?;
                let mut over = Overlay::start(anchor, self.eval(first)?)?;
                for item in rest {
                    over.push(self.eval(item)?)?;
                    self.check_patches(over.patch_count())?;
                }
                Ok(Value::Design(over.finish()))
            }
            Expr::Rot { angle, design } => {
                let turn = match self.eval(angle)? {
                    Value::Angle(deg) => Turn::from_degrees(deg)?,
                    Value::Number(n) if n.fract() == 0.0 => Turn::from_degrees(n as i64)?,
                    Value::Number(n) => return Err(EvalError::UnsupportedAngle(n.to_string())),
                    other => {
                        return Err(EvalError::type_error(format!(
                            "rotation angle must be a number, got {}",
                            other.kind_name()
                        )))
                    }
                };
                let target = self.eval(design)?;
                compose::rotate(turn, target)
            }
            Expr::Rep { count, design } => {
                let n = self.number(count, "rep count")?;
                if !(n > 0.0 && n.is_finite()) || n.fract() != 0.0 {
                    return Err(EvalError::InvalidArgument(format!(
                        "repetition count must be a positive integer, got {n}"
                    )));
                }
                let target = self.eval(design)?;
                let per_copy = match &target {
                    Value::Design(d) => d.patches.len(),
                    _ => 1,
                };
                if n * per_copy as f64 > self.config.max_patches as f64 {
                    return Err(self.too_many_patches());
                }
                compose::repeat(n as usize, target).map(Value::Design)
            }
        }
    }

    fn number(&mut self, expr: &Expr, what: &str) -> Result<f64, EvalError> {
        match self.eval(expr)? {
            Value::Number(n) => Ok(n),
            other => Err(EvalError::type_error(format!(
                "{what} expects a number, got {}",
                other.kind_name()
            ))),
        }
    }

    fn sequence(&mut self, axis: Axis, items: &[Expr]) -> Result<Value, EvalError> {
        let op = match axis {
            Axis::Horizontal => "hor",
            Axis::Vertical => "vert",
        };
        let (first, rest) = split_first(items, op)?;
        let mut seq = Sequence::start(axis, self.eval(first)?)?;
        for item in rest {
            seq.push(self.eval(item)?)?;
            self.check_patches(seq.patch_count())?;
        }
        Ok(Value::Design(seq.finish()))
    }

    fn apply(&mut self, name: &str, args: &[Expr]) -> Result<Value, EvalError> {
        let func = match self.env.lookup(name)? {
            Value::Function(f) => f.clone(),
            other => {
                return Err(EvalError::type_error(format!(
                    "'{name}' is a {}, not a function",
                    other.kind_name()
                )))
            }
        };
        if func.params.len() != args.len() {
            return Err(EvalError::InvalidArgument(format!(
                "'{name}' takes {} argument(s), got {}",
                func.params.len(),
                args.len()
            )));
        }
        let mut frame = HashMap::with_capacity(args.len());
        for (param, arg) in func.params.iter().zip(args) {
            frame.insert(param.clone(), self.eval(arg)?);
        }
        self.env.push_frame(frame);
        let result = self.eval(&func.body);
        self.env.pop_frame();
        result
    }

    fn check_patches(&self, count: usize) -> Result<(), EvalError> {
        if count > self.config.max_patches {
            return Err(self.too_many_patches());
        }
        Ok(())
    }

    fn too_many_patches(&self) -> EvalError {
        EvalError::ResourceLimit(format!(
            "design would exceed {} patches",
            self.config.max_patches
        ))
    }
}

fn split_first<'a>(items: &'a [Expr], op: &str) -> Result<(&'a Expr, &'a [Expr]), EvalError> {
    items
        .split_first()
        .ok_or_else(|| EvalError::InvalidArgument(format!("{op} needs at least one element")))
}

fn check_declared(ty: VarType, name: &str, value: &Value) -> Result<(), EvalError> {
    let ok = match ty {
        VarType::Rect | VarType::Design => matches!(value, Value::Patch(_) | Value::Design(_)),
        VarType::Num => matches!(value, Value::Number(_)),
        VarType::Color => matches!(value, Value::Color(_)),
        VarType::Angle => matches!(value, Value::Angle(_) | Value::Number(_)),
    };
    if ok {
        Ok(())
    } else {
        Err(EvalError::type_error(format!(
            "'{name}' is declared {ty:?} but bound to a {}",
            value.kind_name()
        )))
    }
}
