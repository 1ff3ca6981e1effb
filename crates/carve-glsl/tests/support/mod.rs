//! Interpreter for the GLSL subset the generator emits
//!
//! Supports float and vec3 values, `+ - * /`, unary minus, swizzles of a
//! single component, and the builtins `length`, `abs`, `min`, `max` and
//! `vec3`. Function bodies may declare and assign floats and `return`.

#![allow(dead_code)]

use std::collections::HashMap;

use glam::DVec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Float(f64),
    Vec3(DVec3),
}

impl Value {
    fn float(self) -> Result<f64, String> {
        match self {
            Self::Float(f) => Ok(f),
            Self::Vec3(v) => Err(format!("expected float, got {v:?}")),
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Self::Float(x) => Self::Float(f(x)),
            Self::Vec3(v) => Self::Vec3(DVec3::new(f(v.x), f(v.y), f(v.z))),
        }
    }

    fn zip(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => Self::Float(f(a, b)),
            (Self::Vec3(a), Self::Float(b)) => {
                Self::Vec3(DVec3::new(f(a.x, b), f(a.y, b), f(a.z, b)))
            }
            (Self::Float(a), Self::Vec3(b)) => {
                Self::Vec3(DVec3::new(f(a, b.x), f(a, b.y), f(a, b.z)))
            }
            (Self::Vec3(a), Self::Vec3(b)) => {
                Self::Vec3(DVec3::new(f(a.x, b.x), f(a.y, b.y), f(a.z, b.z)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Symbol(char),
}

fn tokenize(src: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit)) {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let value = text.parse().map_err(|e| format!("bad number {text}: {e}"))?;
            tokens.push(Token::Number(value));
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
        } else if "()+-*/,.=".contains(c) {
            tokens.push(Token::Symbol(c));
            i += 1;
        } else {
            return Err(format!("unexpected character {c:?}"));
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    vars: &'a HashMap<String, Value>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, symbol: char) -> bool {
        if self.peek() == Some(&Token::Symbol(symbol)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, symbol: char) -> Result<(), String> {
        if self.eat(symbol) {
            Ok(())
        } else {
            Err(format!("expected '{symbol}' at token {}", self.pos))
        }
    }

    fn expr(&mut self) -> Result<Value, String> {
        let mut lhs = self.term()?;
        loop {
            if self.eat('+') {
                lhs = lhs.zip(self.term()?, |a, b| a + b);
            } else if self.eat('-') {
                lhs = lhs.zip(self.term()?, |a, b| a - b);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn term(&mut self) -> Result<Value, String> {
        let mut lhs = self.unary()?;
        loop {
            if self.eat('*') {
                lhs = lhs.zip(self.unary()?, |a, b| a * b);
            } else if self.eat('/') {
                lhs = lhs.zip(self.unary()?, |a, b| a / b);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Value, String> {
        if self.eat('-') {
            return Ok(self.unary()?.map(|x| -x));
        }
        let mut value = self.primary()?;
        while self.eat('.') {
            let Some(Token::Ident(component)) = self.next() else {
                return Err("expected swizzle".into());
            };
            let Value::Vec3(v) = value else {
                return Err("swizzle on float".into());
            };
            value = Value::Float(match component.as_str() {
                "x" => v.x,
                "y" => v.y,
                "z" => v.z,
                other => return Err(format!("unsupported swizzle {other}")),
            });
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<Value, String> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Value::Float(n)),
            Some(Token::Symbol('(')) => {
                let value = self.expr()?;
                self.expect(')')?;
                Ok(value)
            }
            Some(Token::Ident(name)) if self.eat('(') => {
                let mut args = vec![self.expr()?];
                while self.eat(',') {
                    args.push(self.expr()?);
                }
                self.expect(')')?;
                call(&name, &args)
            }
            Some(Token::Ident(name)) => self
                .vars
                .get(&name)
                .copied()
                .ok_or_else(|| format!("unknown variable {name}")),
            other => Err(format!("unexpected token {other:?}")),
        }
    }
}

fn call(name: &str, args: &[Value]) -> Result<Value, String> {
    match (name, args) {
        ("length", [Value::Vec3(v)]) => Ok(Value::Float(v.length())),
        ("abs", [x]) => Ok(x.map(f64::abs)),
        ("min", [a, b]) => Ok(a.zip(*b, f64::min)),
        ("max", [a, b]) => Ok(a.zip(*b, f64::max)),
        ("vec3", [x]) => Ok(Value::Vec3(DVec3::splat(x.float()?))),
        ("vec3", [x, y, z]) => Ok(Value::Vec3(DVec3::new(x.float()?, y.float()?, z.float()?))),
        _ => Err(format!("unsupported call {name}/{}", args.len())),
    }
}

fn eval_with(src: &str, vars: &HashMap<String, Value>) -> Result<Value, String> {
    let mut parser = Parser {
        tokens: tokenize(src)?,
        pos: 0,
        vars,
    };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(format!("trailing tokens in {src}"));
    }
    Ok(value)
}

/// Evaluate a distance expression at `p`
pub fn eval_expr(src: &str, p: DVec3) -> Result<f64, String> {
    let vars = HashMap::from([("p".to_string(), Value::Vec3(p))]);
    eval_with(src, &vars)?.float()
}

/// Evaluate `float <name>(vec3 p)` from assembled source at `p`
pub fn eval_function(source: &str, name: &str, p: DVec3) -> Result<f64, String> {
    let header = format!("float {name}(vec3 p) {{");
    let start = source
        .find(&header)
        .ok_or_else(|| format!("no function {name}"))?
        + header.len();
    let end = start
        + source[start..]
            .find("\n}")
            .ok_or_else(|| format!("unterminated function {name}"))?;

    let mut vars = HashMap::from([("p".to_string(), Value::Vec3(p))]);
    for statement in source[start..end].split(';').map(str::trim) {
        if statement.is_empty() {
            continue;
        }
        if let Some(expr) = statement.strip_prefix("return ") {
            return eval_with(expr, &vars)?.float();
        }
        let statement = statement.strip_prefix("float ").unwrap_or(statement);
        let (var, expr) = statement
            .split_once('=')
            .ok_or_else(|| format!("unsupported statement {statement}"))?;
        let value = eval_with(expr, &vars)?;
        vars.insert(var.trim().to_string(), value);
    }

    Err(format!("function {name} does not return"))
}

/// Deterministic sample points around the default primitive position
pub fn sample_points() -> Vec<DVec3> {
    let steps = [-2.5, -1.0, -0.3, 0.0, 0.45, 1.2, 3.0];
    let mut points = Vec::new();
    for &x in &steps {
        for &y in &steps {
            for &z in &steps {
                points.push(DVec3::new(x, y, z + 4.0));
            }
        }
    }
    points
}
