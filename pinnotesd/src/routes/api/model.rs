use async_trait::async_trait;
use pinnotes::data::Note;
use pinnotes::json_object::{json_object, JsonObject};
use rocket::data::{FromData, Outcome, ToByteUnit};
use rocket::http::Status;
use rocket::{Data, Request};
use serde::{Deserialize, Serialize};
use crate::app_constants::{DEFAULT_NOTE_REQUEST_READ_LIMIT, NOTE_REQUEST_LIMIT_NAME};
use crate::routes::api::errors::RequestBodyError;

/// A note submission in either of the accepted body shapes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmitNoteRequest {
    pub text: String,
    pub author_address: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubmitNoteBody {
    Flat(FlatSubmitNoteBody),
    Nested(NestedSubmitNoteBody),
}

/// `{"text": ..., "authorAddress": ...}`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatSubmitNoteBody {
    text: String,
    author_address: String,
}

/// `{"noteData": {"text": ..., "metadata": {"userAddress": ...}}}`,
/// the shape older wallet clients send.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedSubmitNoteBody {
    #[serde(deserialize_with = "json_object")]
    note_data: NestedNoteData,
}

#[derive(Deserialize)]
struct NestedNoteData {
    text: String,
    #[serde(deserialize_with = "json_object")]
    metadata: NestedNoteMetadata,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedNoteMetadata {
    user_address: String,
}

impl From<SubmitNoteBody> for SubmitNoteRequest {
    fn from(value: SubmitNoteBody) -> Self {
        match value {
            SubmitNoteBody::Flat(body) => SubmitNoteRequest {
                text: body.text,
                author_address: body.author_address,
            },
            SubmitNoteBody::Nested(body) => SubmitNoteRequest {
                text: body.note_data.text,
                author_address: body.note_data.metadata.user_address,
            },
        }
    }
}

impl SubmitNoteRequest {
    pub fn from_json(bytes: &[u8]) -> Result<SubmitNoteRequest, RequestBodyError> {
        let JsonObject(body) = serde_json::from_slice::<JsonObject<SubmitNoteBody>>(bytes)?;
        Ok(body.into())
    }
}

#[async_trait]
impl<'r> FromData<'r> for SubmitNoteRequest {
    type Error = RequestBodyError;

    async fn from_data(
        req: &'r Request<'_>,
        data: Data<'r>,
    ) -> Outcome<'r, Self> {
        if !req.content_type().is_some_and(|ct| ct.is_json()) {
            return Outcome::Error((Status::BadRequest, RequestBodyError::NotJson))
        }
        let limit = req.limits()
            .get(NOTE_REQUEST_LIMIT_NAME)
            .unwrap_or(DEFAULT_NOTE_REQUEST_READ_LIMIT.bytes());
        match data.open(limit).into_bytes().await {
            Ok(bytes) if bytes.is_complete() => match SubmitNoteRequest::from_json(&bytes) {
                Ok(request) => Outcome::Success(request),
                Err(e) => Outcome::Error((Status::BadRequest, e)),
            },
            Ok(_) => Outcome::Error((Status::PayloadTooLarge, RequestBodyError::TooLarge)),
            Err(e) => Outcome::Error((Status::BadRequest, e.into())),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub cid: String,
    pub content: String,
    pub author_address: String,
}

impl From<Note> for NoteResponse {
    fn from(value: Note) -> Self {
        NoteResponse {
            cid: value.cid.into(),
            content: value.content,
            author_address: value.author_address.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}
