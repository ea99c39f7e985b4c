//! A transition-based recurrent neural network grammar (RNNG) constituency
//! parser.
//!
//! A sentence is parsed one action at a time: open a constituent, shift a word,
//! or reduce (close) the innermost open constituent. The partial stack, the
//! remaining input and the action history are each mirrored by an undoable
//! incremental encoder, and the three summaries score the next action.

#[macro_use]
extern crate lazy_static;

pub mod action;
pub mod composer;
pub mod config;
pub mod encoder;
pub mod errors;
pub mod model;
pub mod nn;
pub mod parser;
pub mod scorer;
pub mod state;
pub mod syntree;
pub mod transition;
pub mod utils;
pub mod vocab;

pub use crate::action::{Action, MAX_OPEN_NONTERMINALS};
pub use crate::config::{GoldPolicy, ParserConfig};
pub use crate::errors::{Error, Result};
pub use crate::nn::Mode;
pub use crate::parser::Parser;
pub use crate::state::{ParserState, StackElement};
pub use crate::syntree::{ParseTree, SynTree};
pub use crate::utils::Err;
pub use crate::vocab::{Vocab, Vocabularies};
