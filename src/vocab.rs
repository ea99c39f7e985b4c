use std::collections::HashMap;
use std::hash::Hash;
use std::str::FromStr;

use crate::action::Action;
use crate::errors::{Error, Result};

/// A dense bidirectional mapping between symbols and small integer ids.
/// Ids always cover exactly `0..len()`, since they index embedding tables.
#[derive(Debug, Clone)]
pub struct Vocab<T> {
  ids: HashMap<T, usize>,
  symbols: Vec<T>,
}

impl<T> Vocab<T>
where
  T: Eq + Hash + Clone,
{
  /// Build from explicit (symbol, id) pairs, as handed over by whatever built the
  /// vocabulary. Fails unless the ids are exactly 0..n with no symbol repeated.
  pub fn from_pairs<I>(pairs: I) -> Result<Self>
  where
    I: IntoIterator<Item = (T, usize)>,
  {
    let pairs = pairs.into_iter().collect::<Vec<_>>();
    let mut slots: Vec<Option<T>> = vec![None; pairs.len()];
    let mut ids = HashMap::new();
    for (symbol, id) in pairs {
      if id >= slots.len() {
        return Err(Error::config(format!("ids are not dense, {} is out of range", id)));
      }
      if slots[id].is_some() {
        return Err(Error::config(format!("id {} mapped more than once", id)));
      }
      if ids.insert(symbol.clone(), id).is_some() {
        return Err(Error::config("symbol mapped to more than one id"));
      }
      slots[id] = Some(symbol);
    }

    // n pairs with distinct ids below n fill every slot
    let symbols = slots.into_iter().flatten().collect();

    Ok(Self { ids, symbols })
  }

  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn id<Q>(&self, symbol: &Q) -> Option<usize>
  where
    T: std::borrow::Borrow<Q>,
    Q: Eq + Hash + ?Sized,
  {
    self.ids.get(symbol).copied()
  }

  pub fn contains<Q>(&self, symbol: &Q) -> bool
  where
    T: std::borrow::Borrow<Q>,
    Q: Eq + Hash + ?Sized,
  {
    self.ids.contains_key(symbol)
  }

  pub fn symbol(&self, id: usize) -> Option<&T> {
    self.symbols.get(id)
  }

  pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
    self.symbols.iter().enumerate()
  }
}

/// Ids are assigned in first-occurrence order, later duplicates are ignored.
impl<T> FromIterator<T> for Vocab<T>
where
  T: Eq + Hash + Clone,
{
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut ids = HashMap::new();
    let mut symbols = Vec::new();
    for symbol in iter {
      if !ids.contains_key(&symbol) {
        ids.insert(symbol.clone(), symbols.len());
        symbols.push(symbol);
      }
    }
    Self { ids, symbols }
  }
}

/// The four id mappings a parser is built over
#[derive(Debug, Clone)]
pub struct Vocabularies {
  words: Vocab<String>,
  pos_tags: Vocab<String>,
  nonterminals: Vocab<String>,
  actions: Vocab<String>,
  /// Parsed form of every action string, indexed by action id
  parsed_actions: Vec<Action>,
}

impl Vocabularies {
  /// Checks the action mapping: SHIFT, REDUCE and at least one NT(X) must be
  /// present, every entry must be a canonical action string, and every NT(X)
  /// must name a known label.
  pub fn new(
    words: Vocab<String>,
    pos_tags: Vocab<String>,
    nonterminals: Vocab<String>,
    actions: Vocab<String>,
  ) -> Result<Self> {
    for required in [Action::Shift, Action::Reduce] {
      if !actions.contains(required.to_string().as_str()) {
        return Err(Error::config(format!(
          "no {} action found in the action mapping",
          required
        )));
      }
    }

    let mut parsed_actions = Vec::with_capacity(actions.len());
    for (_, s) in actions.iter() {
      let action = Action::from_str(s)?;
      if let Action::OpenNonterminal(label) = &action {
        if !nonterminals.contains(label.as_str()) {
          return Err(Error::config(format!(
            "action {} names a nonterminal missing from the label mapping",
            s
          )));
        }
      }
      parsed_actions.push(action);
    }
    if !parsed_actions.iter().any(Action::is_open_nonterminal) {
      return Err(Error::config("no NT(X) action found in the action mapping"));
    }

    Ok(Self {
      words,
      pos_tags,
      nonterminals,
      actions,
      parsed_actions,
    })
  }

  /// Convenience constructor: derives the action mapping as SHIFT, REDUCE, then
  /// one NT(X) per nonterminal label in label-id order.
  pub fn with_standard_actions(
    words: Vocab<String>,
    pos_tags: Vocab<String>,
    nonterminals: Vocab<String>,
  ) -> Result<Self> {
    let actions = [Action::Shift, Action::Reduce]
      .into_iter()
      .chain(
        nonterminals
          .iter()
          .map(|(_, label)| Action::OpenNonterminal(label.clone())),
      )
      .map(|a| a.to_string())
      .collect();
    Self::new(words, pos_tags, nonterminals, actions)
  }

  pub fn words(&self) -> &Vocab<String> {
    &self.words
  }

  pub fn pos_tags(&self) -> &Vocab<String> {
    &self.pos_tags
  }

  pub fn nonterminals(&self) -> &Vocab<String> {
    &self.nonterminals
  }

  pub fn actions(&self) -> &Vocab<String> {
    &self.actions
  }

  pub fn num_actions(&self) -> usize {
    self.parsed_actions.len()
  }

  pub fn action(&self, id: usize) -> Option<&Action> {
    self.parsed_actions.get(id)
  }

  pub fn parsed_actions(&self) -> &[Action] {
    &self.parsed_actions
  }

  pub fn action_id(&self, action: &Action) -> Result<usize> {
    let s = action.to_string();
    self.actions.id(s.as_str()).ok_or(Error::UnknownSymbol {
      kind: "action",
      symbol: s,
    })
  }

  pub fn word_id(&self, word: &str) -> Result<usize> {
    self.words.id(word).ok_or_else(|| Error::UnknownSymbol {
      kind: "word",
      symbol: word.to_string(),
    })
  }

  pub fn pos_id(&self, pos: &str) -> Result<usize> {
    self.pos_tags.id(pos).ok_or_else(|| Error::UnknownSymbol {
      kind: "POS tag",
      symbol: pos.to_string(),
    })
  }

  pub fn nonterminal_id(&self, label: &str) -> Result<usize> {
    self.nonterminals.id(label).ok_or_else(|| Error::UnknownSymbol {
      kind: "nonterminal",
      symbol: label.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn strings(v: &[&str]) -> Vocab<String> {
    v.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn test_from_iter_dedups_in_order() {
    let v = strings(&["b", "a", "b", "c"]);
    assert_eq!(v.len(), 3);
    assert_eq!(v.id("b"), Some(0));
    assert_eq!(v.id("c"), Some(2));
    assert_eq!(v.symbol(1).map(String::as_str), Some("a"));
  }

  #[test]
  fn test_from_pairs_requires_dense_ids() {
    let ok = Vocab::from_pairs(vec![("x".to_string(), 1), ("y".to_string(), 0)]).unwrap();
    assert_eq!(ok.symbol(0).map(String::as_str), Some("y"));

    let gap = Vocab::from_pairs(vec![("x".to_string(), 0), ("y".to_string(), 2)]);
    assert!(matches!(gap, Err(Error::Configuration(_))));

    let dup = Vocab::from_pairs(vec![("x".to_string(), 0), ("y".to_string(), 0)]);
    assert!(matches!(dup, Err(Error::Configuration(_))));

    let same = Vocab::from_pairs(vec![("x".to_string(), 0), ("x".to_string(), 1)]);
    assert!(matches!(same, Err(Error::Configuration(_))));

    // sparse ids are rejected without allocating up to them
    for id in [1, 1 << 40, usize::MAX] {
      let sparse = Vocab::from_pairs(vec![("x".to_string(), id)]);
      assert!(matches!(sparse, Err(Error::Configuration(_))));
    }

    let empty = Vocab::<String>::from_pairs(vec![]).unwrap();
    assert!(empty.is_empty());
  }

  #[test]
  fn test_missing_required_actions() {
    let no_reduce = Vocabularies::new(
      strings(&["the"]),
      strings(&["DT"]),
      strings(&["S"]),
      strings(&["SHIFT", "NT(S)"]),
    );
    assert!(matches!(no_reduce, Err(Error::Configuration(_))));

    let no_shift = Vocabularies::new(
      strings(&["the"]),
      strings(&["DT"]),
      strings(&["S"]),
      strings(&["REDUCE", "NT(S)"]),
    );
    assert!(matches!(no_shift, Err(Error::Configuration(_))));

    // without any NT(X) no action is legal in a fresh state
    let no_open = Vocabularies::new(
      strings(&["the"]),
      strings(&["DT"]),
      strings(&["S"]),
      strings(&["SHIFT", "REDUCE"]),
    );
    assert!(matches!(no_open, Err(Error::Configuration(_))));

    let no_labels =
      Vocabularies::with_standard_actions(strings(&["the"]), strings(&["DT"]), strings(&[]));
    assert!(matches!(no_labels, Err(Error::Configuration(_))));
  }

  #[test]
  fn test_unknown_label_in_action() {
    let v = Vocabularies::new(
      strings(&["the"]),
      strings(&["DT"]),
      strings(&["S"]),
      strings(&["SHIFT", "REDUCE", "NT(VP)"]),
    );
    assert!(matches!(v, Err(Error::Configuration(_))));
  }

  #[test]
  fn test_standard_actions() {
    let v = Vocabularies::with_standard_actions(
      strings(&["the"]),
      strings(&["DT"]),
      strings(&["S", "NP"]),
    )
    .unwrap();
    assert_eq!(v.num_actions(), 4);
    assert_eq!(v.action(0), Some(&Action::Shift));
    assert_eq!(v.action(3), Some(&Action::OpenNonterminal("NP".to_string())));
    assert_eq!(v.action_id(&Action::Reduce), Ok(1));
    assert!(v.word_id("dog").is_err());
  }

  #[test]
  fn test_action_ids_agree() {
    let v = Vocabularies::new(
      strings(&["the"]),
      strings(&["DT"]),
      strings(&["S", "NP"]),
      strings(&["NT(NP)", "REDUCE", "NT(S)", "SHIFT"]),
    )
    .unwrap();
    assert_eq!(v.actions().len(), v.num_actions());
    for (id, s) in v.actions().iter() {
      let action = v.action(id).unwrap();
      assert_eq!(&action.to_string(), s);
      assert_eq!(v.action_id(action), Ok(id));
    }
    assert_eq!(v.words().len(), 1);
    assert_eq!(v.pos_tags().id("DT"), Some(0));
    assert_eq!(v.nonterminals().symbol(1).map(String::as_str), Some("NP"));
  }
}
