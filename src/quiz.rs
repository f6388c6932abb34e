//! Quiz core: question selection and answer evaluation.
//!
//! Both operations are plain functions over the immutable poem list and one
//! session's state, with an explicit randomness source so tests can seed it.
//! Transport handlers never reach into poems directly; they go through here.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{AnswerOutcome, PoemRecord, QuizMode, SessionState};
use crate::util::normalize_answer;

/// Errors from the quiz core. `NoActiveQuestion` and `AlreadyAnswered` are
/// caller-contract violations; the rest are defensive.
#[derive(Debug, PartialEq, Eq)]
pub enum QuizError {
  /// Evaluation requested while no question is active.
  NoActiveQuestion,
  /// The active question was already scored; ask for the next one.
  AlreadyAnswered,
  /// No session stored under this id.
  UnknownSession(String),
  /// current_poem_id does not resolve against the dataset.
  UnknownPoem(u32),
  /// The poem list is empty. Load validation rules this out.
  EmptyDataset,
}

impl std::fmt::Display for QuizError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      QuizError::NoActiveQuestion => write!(f, "no question is currently active"),
      QuizError::AlreadyAnswered => write!(f, "the current question was already answered"),
      QuizError::UnknownSession(id) => write!(f, "unknown session id: {}", id),
      QuizError::UnknownPoem(id) => write!(f, "poem id {} not found in dataset", id),
      QuizError::EmptyDataset => write!(f, "the poem dataset is empty"),
    }
  }
}

impl std::error::Error for QuizError {}

/// Rendered question view. `choices` is empty in second-half mode
/// (free-text capture) and holds the shuffled option set in author mode.
#[derive(Clone, Debug)]
pub struct Question {
  pub poem_id: u32,
  pub mode: QuizMode,
  pub prompt: String,
  pub reading: String,
  pub choices: Vec<String>,
}

/// Everything revealed after a submission, regardless of correctness.
#[derive(Clone, Debug)]
pub struct Evaluation {
  pub outcome: AnswerOutcome,
  pub correct_answer: String,
  pub poem: PoemRecord,
}

/// Select the next poem and render its prompt for the session's mode.
///
/// Selection is uniform random with immediate-repeat avoidance: when the
/// dataset has more than one record, the poem equal to `current_poem_id`
/// is excluded. The caller records the returned `poem_id` on the session.
pub fn next_question(
  state: &SessionState,
  poems: &[PoemRecord],
  choice_count: usize,
  rng: &mut impl Rng,
) -> Result<Question, QuizError> {
  if poems.is_empty() {
    return Err(QuizError::EmptyDataset);
  }

  let candidates: Vec<&PoemRecord> = if poems.len() > 1 {
    poems
      .iter()
      .filter(|p| Some(p.id) != state.current_poem_id)
      .collect()
  } else {
    poems.iter().collect()
  };
  let poem = *candidates.choose(rng).ok_or(QuizError::EmptyDataset)?;

  let q = match state.mode {
    QuizMode::SecondHalf => Question {
      poem_id: poem.id,
      mode: state.mode,
      prompt: poem.first_half.clone(),
      reading: poem.reading_first.clone(),
      choices: Vec::new(),
    },
    QuizMode::Author => Question {
      poem_id: poem.id,
      mode: state.mode,
      prompt: format!("{}\n{}", poem.first_half, poem.second_half),
      reading: format!("{}\n{}", poem.reading_first, poem.reading_second),
      choices: author_choices(poem, poems, choice_count, rng),
    },
  };
  Ok(q)
}

/// Build the author-mode option set: the correct author plus distractors
/// drawn from other records. Names are de-duplicated, so the correct
/// author appears exactly once; with too few distinct authors in the
/// dataset the set simply comes out shorter than `choice_count`.
fn author_choices(
  correct: &PoemRecord,
  poems: &[PoemRecord],
  choice_count: usize,
  rng: &mut impl Rng,
) -> Vec<String> {
  let mut choices = vec![correct.author.clone()];

  let mut others: Vec<&PoemRecord> = poems.iter().filter(|p| p.id != correct.id).collect();
  others.shuffle(rng);
  for p in others {
    if choices.len() >= choice_count.max(2) {
      break;
    }
    if !choices.iter().any(|c| c == &p.author) {
      choices.push(p.author.clone());
    }
  }

  choices.shuffle(rng);
  choices
}

/// Score a submitted answer against the active question.
///
/// Comparison is a trimmed exact match against the mode's answer field.
/// An empty submission is just an unequal string: scored incorrect, no
/// error. Mutates the session: `answered_count` always, `score` on
/// correct, `last_result` to the outcome.
pub fn evaluate(
  state: &mut SessionState,
  poems: &[PoemRecord],
  submitted: &str,
) -> Result<Evaluation, QuizError> {
  let id = state.current_poem_id.ok_or(QuizError::NoActiveQuestion)?;
  if state.last_result != AnswerOutcome::Unanswered {
    return Err(QuizError::AlreadyAnswered);
  }
  let poem = poems
    .iter()
    .find(|p| p.id == id)
    .ok_or(QuizError::UnknownPoem(id))?;

  let expected = match state.mode {
    QuizMode::SecondHalf => &poem.second_half,
    QuizMode::Author => &poem.author,
  };
  let outcome = if normalize_answer(submitted) == *expected {
    AnswerOutcome::Correct
  } else {
    AnswerOutcome::Incorrect
  };

  state.answered_count += 1;
  if outcome == AnswerOutcome::Correct {
    state.score += 1;
  }
  state.last_result = outcome;

  Ok(Evaluation {
    outcome,
    correct_answer: expected.clone(),
    poem: poem.clone(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn poem(id: u32, author: &str) -> PoemRecord {
    PoemRecord {
      id,
      author: author.to_string(),
      first_half: format!("upper-{}", id),
      second_half: format!("lower-{}", id),
      reading_first: format!("reading-upper-{}", id),
      reading_second: format!("reading-lower-{}", id),
      author_info: format!("info-{}", id),
      explanation: format!("explanation-{}", id),
    }
  }

  fn poems(n: u32) -> Vec<PoemRecord> {
    (1..=n).map(|i| poem(i, &format!("author-{}", i))).collect()
  }

  fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
  }

  /// Serve a question and record it on the session, as the store does.
  fn serve(state: &mut SessionState, ps: &[PoemRecord], rng: &mut StdRng) -> Question {
    let q = next_question(state, ps, 4, rng).unwrap();
    state.current_poem_id = Some(q.poem_id);
    state.last_result = AnswerOutcome::Unanswered;
    q
  }

  #[test]
  fn exact_answer_is_correct_and_scores_one() {
    let ps = poems(5);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    let q = serve(&mut s, &ps, &mut r);
    let expected = &ps.iter().find(|p| p.id == q.poem_id).unwrap().second_half;

    let ev = evaluate(&mut s, &ps, expected).unwrap();
    assert_eq!(ev.outcome, AnswerOutcome::Correct);
    assert_eq!(s.score, 1);
    assert_eq!(s.answered_count, 1);
    assert_eq!(s.last_result, AnswerOutcome::Correct);
    assert_eq!(&ev.correct_answer, expected);
  }

  #[test]
  fn wrong_answer_counts_but_does_not_score() {
    let ps = poems(5);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    serve(&mut s, &ps, &mut r);

    let ev = evaluate(&mut s, &ps, "completely wrong").unwrap();
    assert_eq!(ev.outcome, AnswerOutcome::Incorrect);
    assert_eq!(s.score, 0);
    assert_eq!(s.answered_count, 1);
    // The reveal is returned regardless of correctness.
    assert!(!ev.poem.author_info.is_empty());
    assert!(!ev.poem.explanation.is_empty());
  }

  #[test]
  fn empty_answer_is_incorrect_not_an_error() {
    let ps = poems(3);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    serve(&mut s, &ps, &mut r);

    let ev = evaluate(&mut s, &ps, "").unwrap();
    assert_eq!(ev.outcome, AnswerOutcome::Incorrect);
    assert_eq!(s.answered_count, 1);
  }

  #[test]
  fn answer_with_surrounding_whitespace_still_matches() {
    let ps = poems(3);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    let q = serve(&mut s, &ps, &mut r);
    let expected = &ps.iter().find(|p| p.id == q.poem_id).unwrap().second_half;

    let ev = evaluate(&mut s, &ps, &format!("  {}\n", expected)).unwrap();
    assert_eq!(ev.outcome, AnswerOutcome::Correct);
  }

  #[test]
  fn evaluate_without_active_question_is_contract_violation() {
    let ps = poems(3);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    assert_eq!(evaluate(&mut s, &ps, "anything").unwrap_err(), QuizError::NoActiveQuestion);
    assert_eq!(s.answered_count, 0);
  }

  #[test]
  fn double_submission_is_rejected() {
    let ps = poems(3);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    serve(&mut s, &ps, &mut r);

    evaluate(&mut s, &ps, "first try").unwrap();
    assert_eq!(evaluate(&mut s, &ps, "second try").unwrap_err(), QuizError::AlreadyAnswered);
    assert_eq!(s.answered_count, 1);
  }

  #[test]
  fn no_immediate_repeats_with_more_than_one_poem() {
    let ps = poems(2);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    let mut prev: Option<u32> = None;
    for _ in 0..50 {
      let q = serve(&mut s, &ps, &mut r);
      assert_ne!(Some(q.poem_id), prev, "same poem served twice in a row");
      prev = Some(q.poem_id);
    }
  }

  #[test]
  fn single_poem_dataset_still_serves() {
    let ps = poems(1);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    let q1 = serve(&mut s, &ps, &mut r);
    let q2 = serve(&mut s, &ps, &mut r);
    assert_eq!(q1.poem_id, q2.poem_id);
  }

  #[test]
  fn empty_dataset_is_an_error() {
    let s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    assert_eq!(
      next_question(&s, &[], 4, &mut r).err(),
      Some(QuizError::EmptyDataset)
    );
  }

  #[test]
  fn second_half_mode_has_no_choices() {
    let ps = poems(5);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    let q = serve(&mut s, &ps, &mut r);
    assert!(q.choices.is_empty());
    let p = ps.iter().find(|p| p.id == q.poem_id).unwrap();
    assert_eq!(q.prompt, p.first_half);
    assert_eq!(q.reading, p.reading_first);
  }

  #[test]
  fn author_choices_contain_correct_exactly_once_and_no_duplicates() {
    let ps = poems(10);
    let mut s = SessionState::new(QuizMode::Author);
    let mut r = rng();
    for _ in 0..30 {
      let q = serve(&mut s, &ps, &mut r);
      let correct = &ps.iter().find(|p| p.id == q.poem_id).unwrap().author;
      assert_eq!(q.choices.len(), 4);
      assert_eq!(q.choices.iter().filter(|c| *c == correct).count(), 1);
      let unique: std::collections::HashSet<&String> = q.choices.iter().collect();
      assert_eq!(unique.len(), q.choices.len());
    }
  }

  #[test]
  fn author_choices_shrink_when_authors_repeat() {
    // Three poems, two distinct authors: only two distinct names exist.
    let ps = vec![poem(1, "a"), poem(2, "a"), poem(3, "b")];
    let mut s = SessionState::new(QuizMode::Author);
    let mut r = rng();
    for _ in 0..10 {
      let q = serve(&mut s, &ps, &mut r);
      let unique: std::collections::HashSet<&String> = q.choices.iter().collect();
      assert_eq!(unique.len(), q.choices.len());
      assert!(q.choices.len() <= 2);
    }
  }

  #[test]
  fn author_mode_prompt_shows_the_full_poem() {
    let ps = poems(5);
    let mut s = SessionState::new(QuizMode::Author);
    let mut r = rng();
    let q = serve(&mut s, &ps, &mut r);
    let p = ps.iter().find(|p| p.id == q.poem_id).unwrap();
    assert_eq!(q.prompt, format!("{}\n{}", p.first_half, p.second_half));
    assert_eq!(q.reading, format!("{}\n{}", p.reading_first, p.reading_second));
  }

  #[test]
  fn author_mode_scores_selected_option() {
    let ps = poems(5);
    let mut s = SessionState::new(QuizMode::Author);
    let mut r = rng();
    let q = serve(&mut s, &ps, &mut r);
    let correct = ps.iter().find(|p| p.id == q.poem_id).unwrap().author.clone();
    assert!(q.choices.contains(&correct));

    let ev = evaluate(&mut s, &ps, &correct).unwrap();
    assert_eq!(ev.outcome, AnswerOutcome::Correct);
    assert_eq!(s.score, 1);
  }

  #[test]
  fn hundred_record_session_scenario() {
    let ps = poems(100);
    let mut s = SessionState::new(QuizMode::SecondHalf);
    let mut r = rng();
    assert_eq!((s.score, s.answered_count), (0, 0));

    let q = serve(&mut s, &ps, &mut r);
    let exact = ps.iter().find(|p| p.id == q.poem_id).unwrap().second_half.clone();
    let ev = evaluate(&mut s, &ps, &exact).unwrap();
    assert_eq!(ev.outcome, AnswerOutcome::Correct);
    assert_eq!((s.score, s.answered_count), (1, 1));

    serve(&mut s, &ps, &mut r);
    let ev = evaluate(&mut s, &ps, "arbitrary wrong text").unwrap();
    assert_eq!(ev.outcome, AnswerOutcome::Incorrect);
    assert_eq!((s.score, s.answered_count), (1, 2));
  }
}
