use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::errors::ParseError;
use crate::scanner::Scanner;
use crate::value::Value;

/// A parsed property path such as `.people[].name` or `.items[2].id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),          // .foo
    Index(String, usize), // .foo[3]
    FanOut(String),       // .foo[]
}

impl Segment {
    fn name(&self) -> &str {
        match self {
            Segment::Key(n) | Segment::Index(n, _) | Segment::FanOut(n) => n,
        }
    }
}

impl FromStr for PropertyPath {
    type Err = ParseError;

    /// Accepts exactly `(\.[A-Za-z0-9]+(\[[0-9]*\])?)+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s).map_err(|reason| ParseError::InvalidPath(s.to_string(), reason))
    }
}

fn parse_path(input: &str) -> Result<PropertyPath, String> {
    let mut p = Scanner::new(input);
    let mut segments = Vec::new();
    while !p.eof() {
        p.expect('.')?;
        let name = p.parse_name()?.to_string();
        if !p.consume_char('[') {
            segments.push(Segment::Key(name));
            continue;
        }
        let digits = p.take_digits();
        p.expect(']')?;
        if digits.is_empty() {
            segments.push(Segment::FanOut(name));
        } else {
            let idx = digits
                .parse::<usize>()
                .map_err(|_| format!("index '{digits}' is out of range"))?;
            segments.push(Segment::Index(name, idx));
        }
    }
    if segments.is_empty() {
        return Err("path has no segments".into());
    }
    Ok(PropertyPath { segments })
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .segments
            .iter()
            .map(|seg| match seg {
                Segment::Key(n) => format!(".{n}"),
                Segment::Index(n, i) => format!(".{n}[{i}]"),
                Segment::FanOut(n) => format!(".{n}[]"),
            })
            .join("");
        f.write_str(&s)
    }
}

impl Serialize for PropertyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolves `path` against `root`.
///
/// Starts from `{root}` and folds the segments left to right. A key missing
/// from any element of the working set makes the whole lookup `Absent`, as
/// does an index past the end, or a lookup/index/fan-out on the wrong shape.
/// The result is the single element if the working set never held more than
/// one value, otherwise the list of everything collected.
pub fn resolve(root: &Value, path: &PropertyPath) -> Value {
    let folded = path
        .segments
        .iter()
        .try_fold((vec![root], false), |(set, grew), seg| {
            let next = set
                .into_iter()
                .map(|v| step(v, seg))
                .collect::<Option<Vec<_>>>()?
                .into_iter()
                .flatten()
                .collect::<Vec<_>>();
            let grew = grew || next.len() > 1;
            Some((next, grew))
        });

    match folded {
        None => {
            trace!(%path, "path resolved to absent");
            Value::Absent
        }
        Some((set, false)) if set.len() == 1 => set[0].clone(),
        Some((set, _)) => Value::List(set.into_iter().cloned().collect()),
    }
}

fn step<'a>(v: &'a Value, seg: &Segment) -> Option<Vec<&'a Value>> {
    let found = match v {
        Value::Object(map) => map.get(seg.name())?,
        _ => return None,
    };
    match seg {
        Segment::Key(_) => Some(vec![found]),
        Segment::Index(_, i) => match found {
            Value::List(items) => items.get(*i).map(|x| vec![x]),
            _ => None,
        },
        Segment::FanOut(_) => match found {
            Value::List(items) => Some(items.iter().collect()),
            _ => None,
        },
    }
}
