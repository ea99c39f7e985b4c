use std::env;
use std::io;
use std::io::Write;
use std::process;

use rnng::{Err, Parser, ParserConfig, Vocab, Vocabularies};
use tracing_subscriber::EnvFilter;

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} --labels S,NP,VP [options]

Reads sentences from stdin, one per line, as space-separated word/TAG tokens,
and prints the tree chosen by greedy decoding with freshly initialized weights.

Options:
  -h, --help          Print this message
  -l, --labels LIST   Comma-separated nonterminal labels (required)
  -s, --seed N        Seed for weight initialization (defaults to 0)
  -a, --actions       Also print the chosen action sequence",
    prog_name
  )
}

/// Splits `word/TAG` tokens on their last slash
fn split_tokens(line: &str) -> Result<(Vec<&str>, Vec<&str>), Err> {
  line
    .split_whitespace()
    .map(|token| {
      token
        .rsplit_once('/')
        .filter(|(w, t)| !w.is_empty() && !t.is_empty())
        .ok_or_else(|| -> Err { format!("expected word/TAG, got '{}'", token).into() })
    })
    .collect::<Result<Vec<_>, Err>>()
    .map(|pairs| pairs.into_iter().unzip())
}

fn parse(labels: &[String], seed: u64, line: &str, print_actions: bool) -> Result<(), Err> {
  let (words, tags) = split_tokens(line)?;

  let vocab = Vocabularies::with_standard_actions(
    words.iter().map(|w| w.to_string()).collect(),
    tags.iter().map(|t| t.to_string()).collect(),
    labels.iter().cloned().collect::<Vocab<String>>(),
  )?;
  let config = ParserConfig {
    seed,
    ..Default::default()
  };
  let parser = Parser::new(config, vocab)?;

  let (tree, ids) = parser.parse(&words, &tags)?;
  println!("{}", tree);

  if print_actions {
    let actions = ids
      .iter()
      .filter_map(|&id| parser.action(id))
      .map(|a| a.to_string())
      .collect::<Vec<_>>();
    println!("{}", actions.join(" "));
  }

  Ok(())
}

struct Args {
  labels: Vec<String>,
  seed: u64,
  print_actions: bool,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    let mut iter = v.into_iter();
    let prog_name = match iter.next() {
      Some(name) => name,
      None => return Err(Self::make_error_message("bad argument vector", "rnng")),
    };

    let mut labels: Option<Vec<String>> = None;
    let mut seed = 0;
    let mut print_actions = false;

    while let Some(o) = iter.next() {
      if o == "-h" || o == "--help" {
        println!("{}", usage(&prog_name));
        process::exit(0);
      } else if o == "-a" || o == "--actions" {
        print_actions = true;
      } else if o == "-l" || o == "--labels" {
        let list = iter
          .next()
          .ok_or_else(|| Self::make_error_message("missing label list", &prog_name))?;
        labels = Some(
          list
            .split(',')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        );
      } else if o == "-s" || o == "--seed" {
        seed = iter
          .next()
          .and_then(|s| s.parse().ok())
          .ok_or_else(|| Self::make_error_message("seed must be a number", &prog_name))?;
      } else {
        return Err(Self::make_error_message("invalid arguments", prog_name));
      }
    }

    match labels {
      Some(labels) if !labels.is_empty() => Ok(Self {
        labels,
        seed,
        print_actions,
      }),
      _ => Err(Self::make_error_message("missing nonterminal labels", prog_name)),
    }
  }
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let mut input = String::new();
  loop {
    print!("> ");
    io::stdout().flush()?;

    match io::stdin().read_line(&mut input) {
      Ok(_) => {
        if input.is_empty() {
          // ctrl+d
          return Ok(());
        }
        if !input.trim().is_empty() {
          if let Err(e) = parse(&opts.labels, opts.seed, input.trim(), opts.print_actions) {
            tracing::error!(error = %e, "could not parse sentence");
          }
        }
        input.clear();
      }
      Err(error) => return Err(error.into()),
    }
  }
}
