use std::fmt;

use crate::action::{Action, Shape};
use crate::errors::{Error, Result};

#[derive(Debug, PartialEq, Clone)]
pub struct Constituent<T> {
  pub value: T,
  pub span: (usize, usize),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Word<U> {
  pub value: U,
  pub span: (usize, usize),
}

/// A constituency tree. While its nonterminal is still open on the parser
/// stack a branch has no children and an empty span at the position it was
/// opened; `close` fills both in.
#[derive(Debug, PartialEq, Clone)]
pub enum SynTree<T, U> {
  Branch(Constituent<T>, Vec<SynTree<T, U>>),
  Leaf(Word<U>),
}

/// Labels and words as plain strings, what the parser builds
pub type ParseTree = SynTree<String, String>;

impl<T, U> SynTree<T, U> {
  pub fn leaf(value: U, position: usize) -> Self {
    Self::Leaf(Word {
      value,
      span: (position, position + 1),
    })
  }

  /// A branch with no children yet, opened before the word at `position`
  pub fn open(value: T, position: usize) -> Self {
    Self::Branch(
      Constituent {
        value,
        span: (position, position),
      },
      Vec::new(),
    )
  }

  pub fn get_branch(&self) -> Option<(&Constituent<T>, &Vec<SynTree<T, U>>)> {
    match self {
      Self::Branch(c, cs) => Some((c, cs)),
      _ => None,
    }
  }

  pub fn span(&self) -> (usize, usize) {
    match self {
      Self::Branch(c, _) => c.span,
      Self::Leaf(w) => w.span,
    }
  }

  /// Attach `children` (left to right) to an open branch and stretch its span
  /// over them. Closing a leaf, or a branch that already has children, is an
  /// error: closed subtrees are never reopened.
  pub fn close(&mut self, children: Vec<SynTree<T, U>>) -> Result<()> {
    match self {
      Self::Branch(cons, existing) if existing.is_empty() => {
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
          cons.span = (first.span().0, last.span().1);
        }
        *existing = children;
        Ok(())
      }
      _ => Err(Error::illegal("only an open nonterminal can be closed")),
    }
  }

  pub fn leaves(&self) -> Vec<&U> {
    match self {
      Self::Leaf(w) => vec![&w.value],
      Self::Branch(_, children) => children.iter().flat_map(|c| c.leaves()).collect(),
    }
  }
}

impl<T, U> SynTree<T, U>
where
  T: fmt::Display,
{
  /// The top-down derivation of this tree: NT(X) on entering a branch, SHIFT per
  /// leaf, REDUCE on leaving a branch.
  pub fn oracle_actions(&self) -> Vec<Action> {
    let mut actions = Vec::new();
    self.push_oracle_actions(&mut actions);
    actions
  }

  fn push_oracle_actions(&self, actions: &mut Vec<Action>) {
    match self {
      Self::Leaf(_) => actions.push(Action::Shift),
      Self::Branch(cons, children) => {
        actions.push(Action::OpenNonterminal(cons.value.to_string()));
        for child in children {
          child.push_oracle_actions(actions);
        }
        actions.push(Action::Reduce);
      }
    }
  }
}

impl ParseTree {
  /// Rebuild the tree an action sequence derives over `words`, checking each
  /// action with the same rules the parser uses. Fails if an action is illegal
  /// or the sequence stops before the parse is finished.
  pub fn from_actions<S: AsRef<str>>(words: &[S], actions: &[Action]) -> Result<Self> {
    if words.is_empty() {
      return Err(Error::config("words cannot be empty"));
    }

    let mut stack: Vec<(ParseTree, bool)> = Vec::new();
    let mut shifted = 0;
    let mut open = 0;
    let mut last: Option<&Action> = None;

    for action in actions {
      let shape = Shape {
        started: true,
        finished: is_finished(&stack, shifted == words.len()),
        buffer_len: words.len() - shifted,
        open_nonterminals: open,
        last_was_open: last.is_some_and(Action::is_open_nonterminal),
      };
      action.verify(&shape)?;

      match action {
        Action::OpenNonterminal(label) => {
          stack.push((SynTree::open(label.clone(), shifted), true));
          open += 1;
        }
        Action::Shift => {
          stack.push((SynTree::leaf(words[shifted].as_ref().to_string(), shifted), false));
          shifted += 1;
        }
        Action::Reduce => {
          let mut children = Vec::new();
          while let Some((tree, false)) = stack.last() {
            children.push(tree.clone());
            stack.pop();
          }
          children.reverse();
          let (mut parent, _) = stack
            .pop()
            .ok_or_else(|| Error::illegal("no open nonterminal to reduce"))?;
          parent.close(children)?;
          stack.push((parent, false));
          open -= 1;
        }
      }
      last = Some(action);
    }

    if !is_finished(&stack, shifted == words.len()) {
      return Err(Error::illegal("action sequence ends before the parse is finished"));
    }
    stack
      .pop()
      .map(|(tree, _)| tree)
      .ok_or_else(|| Error::illegal("empty parse"))
  }
}

fn is_finished(stack: &[(ParseTree, bool)], buffer_empty: bool) -> bool {
  buffer_empty && stack.len() == 1 && !stack[0].1
}

/// Bracketed form: `(S (NP the dog) ran)`
impl<T, U> fmt::Display for SynTree<T, U>
where
  T: fmt::Display,
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(w) => write!(f, "{}", w.value),
      Self::Branch(cons, children) => {
        write!(f, "({}", cons.value)?;
        for child in children.iter() {
          write!(f, " {}", child)?;
        }
        write!(f, ")")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn nt(label: &str) -> Action {
    Action::OpenNonterminal(label.to_string())
  }

  #[test]
  fn test_from_actions() {
    let words = ["the", "dog", "ran"];
    let actions = vec![
      nt("S"),
      nt("NP"),
      Action::Shift,
      Action::Shift,
      Action::Reduce,
      Action::Shift,
      Action::Reduce,
    ];
    let tree = ParseTree::from_actions(&words, &actions).unwrap();
    assert_eq!(tree.to_string(), "(S (NP the dog) ran)");
    assert_eq!(tree.span(), (0, 3));

    let (_, children) = tree.get_branch().unwrap();
    assert_eq!(children[0].span(), (0, 2));
    assert_eq!(children[1].span(), (2, 3));
    assert_eq!(tree.leaves(), vec!["the", "dog", "ran"]);

    assert_eq!(tree.oracle_actions(), actions);
  }

  #[test]
  fn test_from_actions_rejects_bad_sequences() {
    let words = ["a", "b"];
    // shift without an open nonterminal
    assert!(ParseTree::from_actions(&words, &[Action::Shift]).is_err());
    // empty constituent
    assert!(ParseTree::from_actions(&words, &[nt("S"), Action::Reduce]).is_err());
    // closing the outermost constituent before the input is consumed
    assert!(
      ParseTree::from_actions(&words, &[nt("S"), Action::Shift, Action::Reduce]).is_err()
    );
    // incomplete
    assert!(
      ParseTree::from_actions(&words, &[nt("S"), Action::Shift, Action::Shift]).is_err()
    );
    // anything after finishing
    let done = [nt("S"), Action::Shift, Action::Shift, Action::Reduce];
    assert!(ParseTree::from_actions(&words, &done).is_ok());
    let extra = [nt("S"), Action::Shift, Action::Shift, Action::Reduce, Action::Reduce];
    assert!(ParseTree::from_actions(&words, &extra).is_err());
  }

  #[test]
  fn test_close_only_open_branches() {
    let mut leaf: ParseTree = SynTree::leaf("x".to_string(), 0);
    assert!(leaf.close(vec![]).is_err());

    let mut branch: ParseTree = SynTree::open("X".to_string(), 0);
    branch.close(vec![SynTree::leaf("x".to_string(), 0)]).unwrap();
    assert!(branch.close(vec![SynTree::leaf("y".to_string(), 1)]).is_err());
    assert_eq!(branch.to_string(), "(X x)");
  }
}
