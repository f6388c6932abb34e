//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{AnswerOutcome, QuizMode, SessionState};
use crate::quiz::{Evaluation, Question};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartSession {
        mode: Option<QuizMode>,
    },
    GetSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    SetMode {
        #[serde(rename = "sessionId")]
        session_id: String,
        mode: QuizMode,
    },
    NextQuestion {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    SubmitAnswer {
        #[serde(rename = "sessionId")]
        session_id: String,
        answer: String,
    },
    ResetScore {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session {
        session: SessionOut,
    },
    Question {
        question: QuestionOut,
    },
    AnswerResult {
        result: AnswerOut,
    },
    Error {
        message: String,
    },
}

/// Session snapshot DTO used by both WS and HTTP.
#[derive(Debug, Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub mode: QuizMode,
    pub score: u32,
    #[serde(rename = "answeredCount")]
    pub answered_count: u32,
    pub percentage: f32,
    #[serde(rename = "lastResult")]
    pub last_result: AnswerOutcome,
}

/// Question DTO: prompt half, kana reading, and (author mode) the choice set.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    #[serde(rename = "poemId")]
    pub poem_id: u32,
    pub mode: QuizMode,
    pub prompt: String,
    pub reading: String,
    pub choices: Vec<String>,
}

/// Answer result DTO: outcome plus the full reveal, shown whether or not
/// the submission was correct.
#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    pub outcome: AnswerOutcome,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    pub author: String,
    pub upper: String,
    pub lower: String,
    #[serde(rename = "readingUpper")]
    pub reading_upper: String,
    #[serde(rename = "readingLower")]
    pub reading_lower: String,
    #[serde(rename = "authorInfo")]
    pub author_info: String,
    pub explanation: String,
    pub score: u32,
    #[serde(rename = "answeredCount")]
    pub answered_count: u32,
}

/// Convert a session snapshot to the public DTO.
pub fn session_out(id: &str, s: &SessionState) -> SessionOut {
    SessionOut {
        session_id: id.to_string(),
        mode: s.mode,
        score: s.score,
        answered_count: s.answered_count,
        percentage: s.percentage(),
        last_result: s.last_result,
    }
}

/// Convert an internal question view to the public DTO.
pub fn question_out(q: &Question) -> QuestionOut {
    QuestionOut {
        poem_id: q.poem_id,
        mode: q.mode,
        prompt: q.prompt.clone(),
        reading: q.reading.clone(),
        choices: q.choices.clone(),
    }
}

/// Convert an evaluation + updated session to the public answer DTO.
pub fn answer_out(ev: &Evaluation, s: &SessionState) -> AnswerOut {
    AnswerOut {
        correct: ev.outcome == AnswerOutcome::Correct,
        outcome: ev.outcome,
        correct_answer: ev.correct_answer.clone(),
        author: ev.poem.author.clone(),
        upper: ev.poem.first_half.clone(),
        lower: ev.poem.second_half.clone(),
        reading_upper: ev.poem.reading_first.clone(),
        reading_lower: ev.poem.reading_second.clone(),
        author_info: ev.poem.author_info.clone(),
        explanation: ev.poem.explanation.clone(),
        score: s.score,
        answered_count: s.answered_count,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct NewSessionIn {
    #[serde(default)]
    pub mode: Option<QuizMode>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ModeIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub mode: QuizMode,
}

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
