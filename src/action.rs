use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result};

/// Upper bound on simultaneously open nonterminals, guards runaway recursion
pub const MAX_OPEN_NONTERMINALS: usize = 100;

/// A parser transition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
  /// Move the next input word onto the stack
  Shift,
  /// Close the innermost open nonterminal over everything pushed since it opened
  Reduce,
  /// Open a new constituent with the given label
  OpenNonterminal(String),
}

impl Action {
  pub fn is_reduce(&self) -> bool {
    matches!(self, Self::Reduce)
  }

  pub fn is_open_nonterminal(&self) -> bool {
    matches!(self, Self::OpenNonterminal(_))
  }

  pub fn label(&self) -> Option<&str> {
    match self {
      Self::OpenNonterminal(label) => Some(label),
      _ => None,
    }
  }
}

/// What action legality depends on, read off a parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
  pub started: bool,
  pub finished: bool,
  pub buffer_len: usize,
  pub open_nonterminals: usize,
  /// The previous action opened a nonterminal, so the stack top has no children
  pub last_was_open: bool,
}

impl Action {
  /// Ok if the action may be applied in a state of this shape, otherwise an
  /// `IllegalAction` error saying why not
  pub fn verify(&self, shape: &Shape) -> Result<()> {
    if !shape.started {
      return Err(Error::illegal("parser is not started yet, please call `start` first"));
    }
    if shape.finished {
      return Err(Error::illegal("cannot do action when parser is finished"));
    }

    match self {
      Self::OpenNonterminal(_) => {
        if shape.buffer_len == 0 {
          return Err(Error::illegal("cannot do NT(X) when input buffer is empty"));
        }
        if shape.open_nonterminals >= MAX_OPEN_NONTERMINALS {
          return Err(Error::illegal("max number of open nonterminals reached"));
        }
      }
      Self::Shift => {
        if shape.buffer_len == 0 {
          return Err(Error::illegal("cannot SHIFT when input buffer is empty"));
        }
        if shape.open_nonterminals == 0 {
          return Err(Error::illegal("cannot SHIFT when no open nonterminal exists"));
        }
      }
      Self::Reduce => {
        if shape.last_was_open {
          return Err(Error::illegal(
            "cannot REDUCE when top of stack is an open nonterminal",
          ));
        }
        if shape.open_nonterminals == 0 {
          return Err(Error::illegal("cannot REDUCE when no open nonterminal exists"));
        }
        if shape.open_nonterminals < 2 && shape.buffer_len > 0 {
          return Err(Error::illegal(
            "cannot REDUCE because there are words not SHIFT-ed yet",
          ));
        }
      }
    }

    Ok(())
  }

  pub fn can_apply(&self, shape: &Shape) -> bool {
    self.verify(shape).is_ok()
  }
}

/// Canonical string form, used to look actions up in the action mapping
impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Shift => write!(f, "SHIFT"),
      Self::Reduce => write!(f, "REDUCE"),
      Self::OpenNonterminal(label) => write!(f, "NT({})", label),
    }
  }
}

impl FromStr for Action {
  type Err = Error;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    lazy_static! {
      static ref OPEN_NT: Regex = Regex::new(r"^NT\((.+)\)$").unwrap();
    }

    match s {
      "SHIFT" => Ok(Self::Shift),
      "REDUCE" => Ok(Self::Reduce),
      _ => OPEN_NT
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|label| Self::OpenNonterminal(label.as_str().to_string()))
        .ok_or_else(|| Error::config(format!("'{}' is not a valid action string", s))),
    }
  }
}

#[cfg(test)]
fn shape(buffer_len: usize, open_nonterminals: usize, last_was_open: bool) -> Shape {
  Shape {
    started: true,
    finished: false,
    buffer_len,
    open_nonterminals,
    last_was_open,
  }
}

#[test]
fn test_legality() {
  let nt = Action::OpenNonterminal("S".into());

  // fresh parser: only NT(X)
  let s = shape(3, 0, false);
  assert!(nt.can_apply(&s));
  assert!(!Action::Shift.can_apply(&s));
  assert!(!Action::Reduce.can_apply(&s));

  // just opened: no empty constituents
  let s = shape(3, 1, true);
  assert!(Action::Shift.can_apply(&s));
  assert!(!Action::Reduce.can_apply(&s));

  // outermost constituent waits for the whole input
  assert!(!Action::Reduce.can_apply(&shape(1, 1, false)));
  assert!(Action::Reduce.can_apply(&shape(0, 1, false)));
  assert!(Action::Reduce.can_apply(&shape(1, 2, false)));

  // nothing left to shift or open over
  assert!(!nt.can_apply(&shape(0, 1, false)));
  assert!(!Action::Shift.can_apply(&shape(0, 1, false)));

  // the open nonterminal cap
  assert!(nt.can_apply(&shape(1, MAX_OPEN_NONTERMINALS - 1, true)));
  assert!(!nt.can_apply(&shape(1, MAX_OPEN_NONTERMINALS, true)));

  let unstarted = Shape {
    started: false,
    ..shape(3, 0, false)
  };
  let finished = Shape {
    finished: true,
    ..shape(0, 0, false)
  };
  for action in [nt, Action::Shift, Action::Reduce] {
    assert!(!action.can_apply(&unstarted));
    assert!(action.verify(&finished).unwrap_err().is_illegal_action());
  }
}

#[test]
fn test_action_strings() {
  assert_eq!(Action::Shift.to_string(), "SHIFT");
  assert_eq!(Action::Reduce.to_string(), "REDUCE");
  assert_eq!(Action::OpenNonterminal("NP".into()).to_string(), "NT(NP)");

  for s in ["SHIFT", "REDUCE", "NT(S)", "NT(-NONE-)", "NT(WHNP(x))"] {
    assert_eq!(s.parse::<Action>().unwrap().to_string(), s);
  }

  assert_eq!(
    "NT(PP-LOC)".parse::<Action>().unwrap().label(),
    Some("PP-LOC")
  );
  assert!("NT()".parse::<Action>().is_err());
  assert!("shift".parse::<Action>().is_err());
  assert!("NT(S".parse::<Action>().is_err());
}
