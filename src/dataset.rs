//! Loading the poem dataset (bundled JSON, optionally overridden by DATA_PATH).
//!
//! The dataset is startup reference data: it is read exactly once, validated,
//! and never mutated afterwards. Any failure here is fatal — the process has
//! nothing to serve without poems, so `main` propagates the error and exits.

use tracing::info;

use crate::domain::PoemRecord;

/// Bundled default dataset, compiled into the binary.
const BUNDLED_DATA: &str = include_str!("../data/hyakunin_isshu.json");

/// Errors that abort startup.
#[derive(Debug)]
pub enum DatasetError {
  /// DATA_PATH was set but the file could not be read.
  Io(std::io::Error),
  /// The JSON did not parse into a list of poem records.
  Parse(serde_json::Error),
  /// The records parsed but violate a dataset invariant.
  Invalid(String),
}

impl std::fmt::Display for DatasetError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DatasetError::Io(e) => write!(f, "failed to read dataset file: {}", e),
      DatasetError::Parse(e) => write!(f, "failed to parse dataset JSON: {}", e),
      DatasetError::Invalid(msg) => write!(f, "invalid dataset: {}", msg),
    }
  }
}

impl std::error::Error for DatasetError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      DatasetError::Io(e) => Some(e),
      DatasetError::Parse(e) => Some(e),
      DatasetError::Invalid(_) => None,
    }
  }
}

/// Load the poem dataset: DATA_PATH if set, else the bundled file.
pub fn load_poems() -> Result<Vec<PoemRecord>, DatasetError> {
  match std::env::var("DATA_PATH") {
    Ok(path) => {
      let raw = std::fs::read_to_string(&path).map_err(DatasetError::Io)?;
      let poems = parse_poems(&raw)?;
      info!(target: "hyakunin_backend", %path, count = poems.len(), "Loaded poem dataset from file");
      Ok(poems)
    }
    Err(_) => {
      let poems = parse_poems(BUNDLED_DATA)?;
      info!(target: "hyakunin_backend", count = poems.len(), "Loaded bundled poem dataset");
      Ok(poems)
    }
  }
}

/// Parse and validate a JSON array of poem records.
pub fn parse_poems(raw: &str) -> Result<Vec<PoemRecord>, DatasetError> {
  let poems: Vec<PoemRecord> = serde_json::from_str(raw).map_err(DatasetError::Parse)?;
  validate(&poems)?;
  Ok(poems)
}

/// Dataset invariants: non-empty, unique ids, no empty text fields.
fn validate(poems: &[PoemRecord]) -> Result<(), DatasetError> {
  if poems.is_empty() {
    return Err(DatasetError::Invalid("dataset contains no poems".into()));
  }
  let mut seen = std::collections::HashSet::new();
  for p in poems {
    if !seen.insert(p.id) {
      return Err(DatasetError::Invalid(format!("duplicate poem id {}", p.id)));
    }
    let fields = [
      ("author", &p.author),
      ("upper", &p.first_half),
      ("lower", &p.second_half),
      ("reading_upper", &p.reading_first),
      ("reading_lower", &p.reading_second),
      ("author_info", &p.author_info),
      ("description", &p.explanation),
    ];
    for (name, value) in fields {
      if value.trim().is_empty() {
        return Err(DatasetError::Invalid(format!("poem {}: empty field '{}'", p.id, name)));
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundled_dataset_is_valid() {
    let poems = parse_poems(BUNDLED_DATA).unwrap();
    assert!(poems.len() > 1);
  }

  #[test]
  fn rejects_duplicate_ids() {
    let raw = r#"[
      {"id":1,"author":"a","upper":"u","lower":"l","reading_upper":"ru","reading_lower":"rl","author_info":"ai","description":"d"},
      {"id":1,"author":"b","upper":"u","lower":"l","reading_upper":"ru","reading_lower":"rl","author_info":"ai","description":"d"}
    ]"#;
    match parse_poems(raw) {
      Err(DatasetError::Invalid(msg)) => assert!(msg.contains("duplicate")),
      other => panic!("expected Invalid, got {:?}", other.map(|p| p.len())),
    }
  }

  #[test]
  fn rejects_empty_fields() {
    let raw = r#"[
      {"id":1,"author":"","upper":"u","lower":"l","reading_upper":"ru","reading_lower":"rl","author_info":"ai","description":"d"}
    ]"#;
    assert!(matches!(parse_poems(raw), Err(DatasetError::Invalid(_))));
  }

  #[test]
  fn rejects_empty_dataset() {
    assert!(matches!(parse_poems("[]"), Err(DatasetError::Invalid(_))));
  }

  #[test]
  fn rejects_malformed_json() {
    assert!(matches!(parse_poems("{not json"), Err(DatasetError::Parse(_))));
  }
}
