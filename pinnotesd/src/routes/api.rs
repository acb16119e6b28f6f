use log::debug;
use pinnotes::note_repository::NoteRepository;
use rocket::http::Status;
use rocket::response::content::RawText;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, post, routes, Build, Request, Rocket, State};
use crate::app_constants::API_PREFIX;
use crate::routes::api::errors::{ApiError, RequestBodyError};
use crate::routes::api::model::{ErrorBody, NoteResponse, SubmitNoteRequest};

pub mod errors;
pub mod model;

type Repository = Box<dyn NoteRepository>;

#[get("/version")]
fn version() -> RawText<&'static str> {
    RawText("1")
}

#[post("/notes", data = "<request>")]
async fn submit_note(
    repository: &State<Repository>,
    request: Result<SubmitNoteRequest, RequestBodyError>,
) -> Result<Json<NoteResponse>, ApiError> {
    let request = request?;
    let note = repository
        .submit(&request.text, &request.author_address)
        .await?;
    Ok(Json(note.into()))
}

#[get("/notes?<address>")]
async fn list_notes(
    repository: &State<Repository>,
    address: Option<&str>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let address = address.ok_or(ApiError::MissingParameter("address"))?;
    let notes = repository.list_by_author(address).await?;
    debug!("answering with {} notes", notes.len());
    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

#[catch(default)]
fn default_catcher(status: Status, _request: &Request) -> (Status, Json<ErrorBody>) {
    let code = match status.code {
        404 => "not_found",
        400..=499 => "invalid_input",
        _ => "internal",
    };
    (
        status,
        Json(ErrorBody {
            error: code,
            message: status.reason_lossy().to_lowercase(),
        }),
    )
}

pub trait ApiRocketBuildExt {
    fn install_pinnotes_api(self) -> Self;
}

impl ApiRocketBuildExt for Rocket<Build> {
    fn install_pinnotes_api(self) -> Self {
        self
            .mount(
                API_PREFIX,
                routes![
                    version,
                    submit_note,
                    list_notes,
                ],
            )
            .register(API_PREFIX, catchers![default_catcher])
    }
}
