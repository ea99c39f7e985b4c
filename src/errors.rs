use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
  /// Bad sizes, dropout rates, vocabularies or sentence inputs. Never recovered.
  Configuration(String),
  /// A sequence encoder was popped with only its sentinel left
  EmptyStack,
  /// The action can't be applied in the current parser state
  IllegalAction(String),
  /// The parser state was used before `start`
  NotStarted,
  /// A symbol that isn't in its id mapping
  UnknownSymbol { kind: &'static str, symbol: String },
}

impl Error {
  pub fn config(msg: impl Into<String>) -> Self {
    Self::Configuration(msg.into())
  }

  pub fn illegal(msg: impl Into<String>) -> Self {
    Self::IllegalAction(msg.into())
  }

  pub fn is_illegal_action(&self) -> bool {
    matches!(self, Self::IllegalAction(_))
  }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Configuration(s) => write!(f, "configuration error: {}", s),
      Self::EmptyStack => write!(f, "stack is already empty"),
      Self::IllegalAction(s) => write!(f, "illegal action: {}", s),
      Self::NotStarted => write!(f, "parser is not started yet, please call `start` first"),
      Self::UnknownSymbol { kind, symbol } => write!(f, "unknown {} '{}'", kind, symbol),
    }
  }
}
