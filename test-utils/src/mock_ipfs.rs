use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rocket::config::{LogLevel, Shutdown as ShutdownConfig};
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::AdHoc;
use rocket::form::Form;
use rocket::http::ContentType;
use rocket::serde::json::Json;
use rocket::{post, routes, FromForm, Responder, Shutdown, State};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::oneshot;

use crate::constants::{MOCK_NODE_BODY_LIMIT_MIB, MOCK_NODE_START_TIMEOUT};
use crate::ports::free_local_port;

/// Just enough of the IPFS node RPC api to run a note service against:
/// `add`, `pin/add`, `cat` and `pin/ls`, all kept in memory.
///
/// Shuts down when dropped.
pub struct MockIpfsNode {
    state: Arc<NodeState>,
    port: u16,
    shutdown: Shutdown,
}

#[derive(Default)]
struct NodeState {
    data: Mutex<NodeData>,
}

#[derive(Default)]
struct NodeData {
    blobs: Vec<(String, Vec<u8>)>,
    pinned: Vec<String>,
    fail_pins: bool,
    fail_listing: bool,
    garbled_listing: bool,
    cat_delay: Option<Duration>,
    cat_requests: usize,
    last_cid_version: Option<u8>,
}

impl NodeData {
    fn blob(&self, cid: &str) -> Option<&[u8]> {
        self.blobs.iter()
            .find(|(known, _)| known == cid)
            .map(|(_, bytes)| bytes.as_slice())
    }

    fn add(&mut self, bytes: Vec<u8>, cid_version: u8) -> String {
        let cid = mock_cid(&bytes, cid_version);
        if self.blob(&cid).is_none() {
            self.blobs.push((cid.clone(), bytes));
        }
        cid
    }

    fn pin(&mut self, cid: &str) {
        if !self.pinned.iter().any(|pinned| pinned == cid) {
            self.pinned.push(cid.to_owned());
        }
    }
}

impl NodeState {
    fn lock(&self) -> MutexGuard<'_, NodeData> {
        self.data.lock()
            .unwrap_or_else(|e| panic!("mock node state poisoned: {e}"))
    }
}

impl MockIpfsNode {
    pub async fn start() -> MockIpfsNode {
        let state = Arc::new(NodeState::default());
        let port = free_local_port();
        let (ready_tx, ready_rx) = oneshot::channel::<()>();
        let config = rocket::Config {
            address: Ipv4Addr::LOCALHOST.into(),
            port,
            log_level: LogLevel::Off,
            shutdown: ShutdownConfig {
                ctrlc: false,
                ..ShutdownConfig::default()
            },
            limits: Limits::default()
                .limit("string", MOCK_NODE_BODY_LIMIT_MIB.mebibytes())
                .limit("data-form", (MOCK_NODE_BODY_LIMIT_MIB + 1).mebibytes()),
            ..rocket::Config::debug_default()
        };
        let rocket = rocket::custom(config)
            .manage(state.clone())
            .mount("/api/v0", routes![add, pin_add, cat, pin_ls])
            .attach(AdHoc::on_liftoff("Mock node ready", move |_| Box::pin(async move {
                let _ = ready_tx.send(());
            })))
            .ignite()
            .await
            .unwrap_or_else(|e| panic!("failed to start mock ipfs node: {e}"));
        let shutdown = rocket.shutdown();
        tokio::spawn(rocket.launch());
        tokio::time::timeout(MOCK_NODE_START_TIMEOUT, ready_rx)
            .await
            .expect("mock ipfs node did not start in time")
            .expect("mock ipfs node stopped before starting");
        MockIpfsNode { state, port, shutdown }
    }

    pub fn api_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Adds and pins bytes, bypassing the api.
    pub fn pin_raw(&self, bytes: impl Into<Vec<u8>>) -> String {
        let mut data = self.state.lock();
        let cid = data.add(bytes.into(), 0);
        data.pin(&cid);
        cid
    }

    pub fn pin_note(&self, text: &str, user_address: &str) -> String {
        self.pin_raw(
            serde_json::json!({
                "text": text,
                "metadata": { "userAddress": user_address },
            }).to_string()
        )
    }

    pub fn unpin(&self, cid: &str) {
        self.state.lock().pinned.retain(|pinned| pinned != cid);
    }

    pub fn pinned(&self) -> Vec<String> {
        self.state.lock().pinned.clone()
    }

    pub fn blob(&self, cid: &str) -> Option<Vec<u8>> {
        self.state.lock().blob(cid).map(<[u8]>::to_vec)
    }

    pub fn set_fail_pins(&self, fail: bool) {
        self.state.lock().fail_pins = fail;
    }

    pub fn set_fail_listing(&self, fail: bool) {
        self.state.lock().fail_listing = fail;
    }

    /// Makes `pin/ls` end with a line that is not JSON.
    pub fn set_garbled_listing(&self, garbled: bool) {
        self.state.lock().garbled_listing = garbled;
    }

    pub fn set_cat_delay(&self, delay: Option<Duration>) {
        self.state.lock().cat_delay = delay;
    }

    pub fn cat_requests(&self) -> usize {
        self.state.lock().cat_requests
    }

    pub fn last_cid_version(&self) -> Option<u8> {
        self.state.lock().last_cid_version
    }
}

impl Drop for MockIpfsNode {
    fn drop(&mut self) {
        self.shutdown.clone().notify();
    }
}

fn mock_cid(bytes: &[u8], cid_version: u8) -> String {
    let prefix = if cid_version == 0 { "Qmmock" } else { "bafkmock" };
    format!("{prefix}{}", hex::encode(&Sha256::digest(bytes)[..16]))
}

#[derive(Debug, Responder)]
#[response(status = 500, content_type = "json")]
struct NodeError(String);

impl NodeError {
    fn new(message: impl Into<String>) -> NodeError {
        NodeError(
            serde_json::json!({
                "Message": message.into(),
                "Code": 0,
                "Type": "error",
            }).to_string()
        )
    }

    fn not_found(cid: &str) -> NodeError {
        NodeError::new(format!(
            "block was not found locally (offline): ipld: could not find {cid}"
        ))
    }
}

#[derive(FromForm)]
struct AddOptions {
    pin: Option<bool>,
    #[field(name = "cid-version")]
    cid_version: Option<u8>,
}

#[derive(FromForm)]
struct AddForm {
    file: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AddResponse {
    name: &'static str,
    hash: String,
    size: String,
}

#[post("/add?<options..>", data = "<form>")]
fn add(
    state: &State<Arc<NodeState>>,
    options: AddOptions,
    form: Form<AddForm>,
) -> Json<AddResponse> {
    let mut data = state.lock();
    let cid_version = options.cid_version.unwrap_or(0);
    data.last_cid_version = Some(cid_version);
    let bytes = form.into_inner().file.into_bytes();
    let size = bytes.len().to_string();
    let cid = data.add(bytes, cid_version);
    // the real node pins on add unless told otherwise
    if options.pin.unwrap_or(true) {
        data.pin(&cid);
    }
    Json(AddResponse { name: "note.json", hash: cid, size })
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PinAddResponse {
    pins: Vec<String>,
}

#[post("/pin/add?<arg>&<recursive>")]
fn pin_add(
    state: &State<Arc<NodeState>>,
    arg: &str,
    recursive: Option<bool>,
) -> Result<Json<PinAddResponse>, NodeError> {
    let mut data = state.lock();
    if data.fail_pins {
        return Err(NodeError::new("pin: pinning refused by mock node"))
    }
    if !recursive.unwrap_or(true) {
        return Err(NodeError::new("pin: only recursive pins are mocked"))
    }
    if data.blob(arg).is_none() {
        return Err(NodeError::not_found(arg))
    }
    data.pin(arg);
    Ok(Json(PinAddResponse { pins: vec![arg.to_owned()] }))
}

#[post("/cat?<arg>&<length>")]
async fn cat(
    state: &State<Arc<NodeState>>,
    arg: &str,
    length: Option<u64>,
) -> Result<Vec<u8>, NodeError> {
    let delay = {
        let mut data = state.lock();
        data.cat_requests += 1;
        data.cat_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let data = state.lock();
    let bytes = data.blob(arg).ok_or_else(|| NodeError::not_found(arg))?;
    let length = length
        .and_then(|length| usize::try_from(length).ok())
        .unwrap_or(bytes.len())
        .min(bytes.len());
    Ok(bytes[..length].to_vec())
}

#[derive(FromForm)]
struct PinLsOptions {
    #[field(name = "type")]
    kind: Option<String>,
    stream: Option<bool>,
}

#[post("/pin/ls?<options..>")]
fn pin_ls(
    state: &State<Arc<NodeState>>,
    options: PinLsOptions,
) -> Result<(ContentType, String), NodeError> {
    let data = state.lock();
    if data.fail_listing {
        return Err(NodeError::new("pin/ls: datastore closed"))
    }
    if options.kind.as_deref().is_some_and(|kind| kind != "recursive") {
        return Err(NodeError::new("pin/ls: only recursive pins are mocked"))
    }
    let mut body = if options.stream.unwrap_or(false) {
        data.pinned.iter()
            .map(|cid| format!(
                "{}\n",
                serde_json::json!({ "Cid": cid, "Type": "recursive" }),
            ))
            .collect::<String>()
    } else {
        let keys: serde_json::Map<String, serde_json::Value> = data.pinned.iter()
            .map(|cid| (cid.clone(), serde_json::json!({ "Type": "recursive" })))
            .collect();
        format!("{}\n", serde_json::json!({ "Keys": keys }))
    };
    if data.garbled_listing {
        body.push_str("Cid: not json\n");
    }
    Ok((ContentType::JSON, body))
}
