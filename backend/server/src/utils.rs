use axum::body::Bytes;
use serde::Deserialize;

use crate::{
    error::AppError::{self, MalformedPayload},
    survey::{Answers, QUESTION_COUNT},
};

#[derive(Deserialize)]
struct SubmitPayload {
    answers: Vec<Option<bool>>,
}

pub fn get_answers_from_body(body: &Bytes) -> Result<Answers, AppError> {
    let payload: SubmitPayload = serde_json::from_slice(body).map_err(|_| MalformedPayload)?;

    if payload.answers.len() != QUESTION_COUNT {
        return Err(MalformedPayload);
    }

    payload.answers.try_into().map_err(|_| MalformedPayload)
}
