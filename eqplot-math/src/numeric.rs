//! Numeric evaluation of expressions.
//!
//! [`SymExpr::eval_with`] walks the expression tree and looks up every variable by name, which
//! is fine for a handful of evaluations but far too slow for a dense sampling grid. A
//! [`NumericExpr`] is compiled once from a [`SymExpr`], with variables resolved to argument
//! positions and function names resolved to [`Func`]s, and can then be evaluated from many
//! threads at once.

use crate::{
    error::SymbolicFailure,
    expr::{Primary, SymExpr},
};

/// A built-in function that can be evaluated numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Log,
    Abs,
}

impl Func {
    /// Returns the function with the given (normalized) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "sec" => Self::Sec,
            "csc" => Self::Csc,
            "cot" => Self::Cot,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "log" => Self::Log,
            "abs" => Self::Abs,
            _ => return None,
        })
    }

    /// Applies the function to the given arguments.
    ///
    /// Every function takes exactly one argument; any other number of arguments produces `NaN`.
    /// Arguments outside the domain of the function also produce `NaN`.
    pub fn apply(self, args: &[f64]) -> f64 {
        let x = match args {
            [x] => *x,
            _ => return f64::NAN,
        };

        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Sec => x.cos().recip(),
            Self::Csc => x.sin().recip(),
            Self::Cot => x.tan().recip(),
            Self::Asin => x.asin(),
            Self::Acos => x.acos(),
            Self::Atan => x.atan(),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Log => x.ln(),
            Self::Abs => x.abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Const(f64),
    Var(usize),
    Add(Vec<Node>),
    Mul(Vec<Node>),
    PowI(Box<Node>, i32),
    Pow(Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

impl Node {
    fn eval(&self, args: &[f64]) -> f64 {
        match self {
            Self::Const(value) => *value,
            Self::Var(idx) => args.get(*idx).copied().unwrap_or(f64::NAN),
            Self::Add(terms) => terms.iter().map(|term| term.eval(args)).sum(),
            Self::Mul(factors) => factors.iter().map(|factor| factor.eval(args)).product(),
            Self::PowI(base, exp) => base.eval(args).powi(*exp),
            Self::Pow(base, exp) => base.eval(args).powf(exp.eval(args)),
            Self::Call(func, arg) => func.apply(&[arg.eval(args)]),
        }
    }
}

/// An expression compiled for fast numeric evaluation.
///
/// Evaluation never panics: domain errors produce `NaN`, and division by zero produces an
/// infinity, following IEEE 754.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericExpr {
    root: Node,
    vars: Vec<String>,
}

impl NumericExpr {
    /// Compiles an expression. The variables of the expression are bound, in order, to the
    /// values passed to [`NumericExpr::eval`].
    ///
    /// Returns an error if the expression contains a variable not listed in `vars`, or a function
    /// that cannot be evaluated numerically.
    pub fn compile(expr: &SymExpr, vars: &[&str]) -> Result<Self, SymbolicFailure> {
        Ok(Self {
            root: compile_node(expr, vars)?,
            vars: vars.iter().map(|var| var.to_string()).collect(),
        })
    }

    /// Returns the names of the variables, in the order their values are expected.
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// Evaluates the expression with the given variable values.
    pub fn eval(&self, args: &[f64]) -> f64 {
        self.root.eval(args)
    }
}

fn compile_node(expr: &SymExpr, vars: &[&str]) -> Result<Node, SymbolicFailure> {
    Ok(match expr {
        SymExpr::Primary(Primary::Number(num)) => Node::Const(num.to_f64()),
        SymExpr::Primary(Primary::Const(c)) => Node::Const(c.value()),
        SymExpr::Primary(Primary::Symbol(sym)) => match vars.iter().position(|var| *var == sym.as_str()) {
            Some(idx) => Node::Var(idx),
            None => return Err(SymbolicFailure::new(
                "compile",
                format!("`{}` is not one of the variables {}", sym, vars.join(", ")),
            )),
        },
        SymExpr::Primary(Primary::Call(name, args)) => {
            let func = Func::from_name(name).ok_or_else(|| SymbolicFailure::new(
                "compile",
                format!("`{}` cannot be evaluated numerically", name),
            ))?;
            match args.as_slice() {
                [arg] => Node::Call(func, Box::new(compile_node(arg, vars)?)),
                _ => return Err(SymbolicFailure::new(
                    "compile",
                    format!("`{}` takes exactly one argument", name),
                )),
            }
        },
        SymExpr::Add(terms) => Node::Add(
            terms.iter().map(|term| compile_node(term, vars)).collect::<Result<_, _>>()?,
        ),
        SymExpr::Mul(factors) => Node::Mul(
            factors.iter().map(|factor| compile_node(factor, vars)).collect::<Result<_, _>>()?,
        ),
        SymExpr::Exp(base, exp) => {
            let base = Box::new(compile_node(base, vars)?);
            match exp.as_small_integer().and_then(|n| i32::try_from(n).ok()) {
                Some(n) => Node::PowI(base, n),
                None => Node::Pow(base, Box::new(compile_node(exp, vars)?)),
            }
        },
    })
}
