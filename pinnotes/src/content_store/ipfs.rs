use std::collections::VecDeque;
use std::str::FromStr;
use std::time::Duration;
use async_trait::async_trait;
use futures::{stream, StreamExt};
use log::{debug, trace, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use thiserror::Error;

use crate::config::app_config::AppConfig;
use crate::content_store::{ContentStore, ContentStoreError, PinnedCids};
use crate::data::Cid;
use crate::lib_constants::{ADDED_BLOB_FILE_NAME, IPFS_RPC_PATH};
use model::{AddResponse, NodeErrorBody, PinAddResponse, PinLsLine};

mod model;

/// [`ContentStore`] backed by the HTTP RPC api of an IPFS (Kubo) node.
///
/// Every request, body included, is bounded by the configured store
/// timeout on its own; a timeout or a connection failure is reported as
/// [`ContentStoreError::Unavailable`].
#[derive(Clone, Debug)]
pub struct IpfsContentStore {
    client: Client,
    rpc_root: String,
    timeout: Duration,
    cid_version: u8,
}

impl IpfsContentStore {
    pub fn new(app_config: &AppConfig) -> Result<IpfsContentStore, reqwest::Error> {
        debug!(
            "using ipfs rpc api at \"{}\" with {}ms timeout",
            app_config.ipfs_api_url,
            app_config.store_timeout.as_millis(),
        );
        // no client-wide timeout, it would also span a whole scan
        let client = Client::builder()
            .connect_timeout(app_config.store_timeout)
            .build()?;
        Ok(
            IpfsContentStore {
                client,
                rpc_root: format!("{}{IPFS_RPC_PATH}", app_config.ipfs_api_url),
                timeout: app_config.store_timeout,
                cid_version: app_config.cid_version,
            }
        )
    }

    fn rpc(&self, command: &str) -> RequestBuilder {
        // the rpc api accepts POST only
        self.client.post(format!("{}{command}", self.rpc_root))
            .timeout(self.timeout)
    }

    async fn call(&self, request: RequestBuilder) -> Result<Response, RpcError> {
        let response = request.send().await.map_err(RpcError::Transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response)
        }
        let body = response.bytes().await.map_err(RpcError::Transport)?;
        Err(
            RpcError::Node {
                status: status.as_u16(),
                message: NodeErrorBody::message_from(&body),
            }
        )
    }

    async fn cat(
        &self,
        cid: &Cid,
        max_len: Option<u64>,
    ) -> Result<Vec<u8>, ContentStoreError> {
        trace!("fetching {cid}, limit {max_len:?}");
        let mut request = self.rpc("cat").query(&[("arg", &**cid)]);
        if let Some(max_len) = max_len {
            // one extra byte tells a blob of exactly max_len bytes
            //  from a longer one
            request = request.query(&[("length", max_len.saturating_add(1))]);
        }
        let mut response = self.call(request)
            .await
            .map_err(|e| e.into_store_error(|message|
                if is_not_found_message(&message) {
                    ContentStoreError::NotFound(cid.clone())
                } else {
                    ContentStoreError::Unexpected(message)
                }
            ))?;
        let mut buf = Vec::new();
        while let Some(chunk) = response.chunk()
            .await
            .map_err(ContentStoreError::unavailable)?
        {
            buf.extend_from_slice(&chunk);
            if let Some(max_len) = max_len
                && buf.len() as u64 > max_len
            {
                return Err(ContentStoreError::TooLarge {
                    cid: cid.clone(),
                    limit: max_len,
                })
            }
        }
        trace!("fetched {} bytes of {cid}", buf.len());
        Ok(buf)
    }
}

#[async_trait]
impl ContentStore for IpfsContentStore {
    async fn put(&self, bytes: Vec<u8>) -> Result<Cid, ContentStoreError> {
        let size = bytes.len();
        debug!("adding {size} bytes");
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(ADDED_BLOB_FILE_NAME));
        let response = self
            .call(
                self.rpc("add")
                    .query(&[("pin", "false")])
                    .query(&[("cid-version", self.cid_version)])
                    .multipart(form)
            )
            .await
            .map_err(|e| e.into_store_error(ContentStoreError::WriteFailed))?;
        let body = response.bytes()
            .await
            .map_err(ContentStoreError::unavailable)?;
        let added: AddResponse = serde_json::from_slice(&body)
            .map_err(|e| ContentStoreError::WriteFailed(
                format!("malformed add response: {e}")
            ))?;
        let cid = Cid::from_str(&added.hash)
            .map_err(|e| ContentStoreError::WriteFailed(
                format!("add response carries an invalid cid: {e}")
            ))?;
        trace!("added {size} bytes as {cid}");
        Ok(cid)
    }

    async fn pin(&self, cid: &Cid) -> Result<(), ContentStoreError> {
        debug!("pinning {cid}");
        let response = self
            .call(
                self.rpc("pin/add")
                    .query(&[("arg", &**cid), ("recursive", "true")])
            )
            .await
            .map_err(|e| e.into_store_error(ContentStoreError::PinFailed))?;
        let body = response.bytes()
            .await
            .map_err(ContentStoreError::unavailable)?;
        let pinned: PinAddResponse = serde_json::from_slice(&body)
            .map_err(|e| ContentStoreError::PinFailed(
                format!("malformed pin response: {e}")
            ))?;
        if !pinned.pins.iter().any(|p| *p == **cid) {
            warn!("pin response for {cid} lists {:?} instead", pinned.pins);
        }
        Ok(())
    }

    async fn get(&self, cid: &Cid) -> Result<Vec<u8>, ContentStoreError> {
        self.cat(cid, None).await
    }

    async fn get_bounded(
        &self,
        cid: &Cid,
        max_len: u64,
    ) -> Result<Vec<u8>, ContentStoreError> {
        self.cat(cid, Some(max_len)).await
    }

    async fn list_pinned(&self) -> Result<PinnedCids, ContentStoreError> {
        debug!("listing pinned content");
        let response = self
            .call(
                self.rpc("pin/ls")
                    .query(&[("type", "recursive"), ("stream", "true")])
            )
            .await
            .map_err(|e| e.into_store_error(|message|
                ContentStoreError::unavailable(message)
            ))?;
        // read in full here: the timeout runs from the request's start, so
        // the listing must not wait on the fetches of a scan
        let mut reader = PinListingReader::new(response);
        let mut pinned = Vec::new();
        while let Some(cid) = reader.next_cid().await? {
            pinned.push(cid);
        }
        trace!("{} pinned entries listed", pinned.len());
        Ok(stream::iter(pinned.into_iter().map(Ok)).boxed())
    }
}

#[derive(Debug, Error)]
enum RpcError {
    #[error(transparent)]
    Transport(reqwest::Error),

    #[error("node responded with status {status}: {message}")]
    Node {
        status: u16,
        message: String,
    },
}

impl RpcError {
    fn into_store_error(
        self,
        on_node_error: impl FnOnce(String) -> ContentStoreError,
    ) -> ContentStoreError {
        match self {
            RpcError::Transport(e) => ContentStoreError::unavailable(e),
            e @ RpcError::Node { .. } => on_node_error(e.to_string()),
        }
    }
}

fn is_not_found_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("not found") || message.contains("could not find")
}

/// Incremental reader of the newline-delimited `pin/ls` output.
struct PinListingReader {
    response: Response,
    buf: Vec<u8>,
    parsed: VecDeque<Cid>,
    finished: bool,
}

impl PinListingReader {
    fn new(response: Response) -> Self {
        PinListingReader {
            response,
            buf: Vec::new(),
            parsed: VecDeque::new(),
            finished: false,
        }
    }

    async fn next_cid(&mut self) -> Result<Option<Cid>, ContentStoreError> {
        loop {
            if let Some(cid) = self.parsed.pop_front() {
                return Ok(Some(cid))
            }
            if self.finished {
                return Ok(None)
            }
            match self.response.chunk()
                .await
                .map_err(ContentStoreError::unavailable)?
            {
                Some(chunk) => {
                    self.buf.extend_from_slice(&chunk);
                    while let Some(newline) = self.buf.iter()
                        .position(|b| *b == b'\n')
                    {
                        let line: Vec<u8> = self.buf.drain(..=newline).collect();
                        parse_pin_listing_line(&line, &mut self.parsed)?;
                    }
                },
                None => {
                    self.finished = true;
                    let rest = std::mem::take(&mut self.buf);
                    parse_pin_listing_line(&rest, &mut self.parsed)?;
                },
            }
        }
    }
}

fn parse_pin_listing_line(
    line: &[u8],
    parsed: &mut VecDeque<Cid>,
) -> Result<(), ContentStoreError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(())
    }
    let line: PinLsLine = serde_json::from_slice(line)
        .map_err(|e| ContentStoreError::Unexpected(
            format!("malformed pin listing entry: {e}")
        ))?;
    let cids = match line {
        PinLsLine::Streamed { cid } => vec![cid],
        // nodes that ignore `stream=true` answer with a single object
        PinLsLine::Listed { keys } => keys.into_keys().collect(),
    };
    for cid in cids {
        parsed.push_back(
            Cid::from_str(&cid)
                .map_err(|e| ContentStoreError::Unexpected(
                    format!("pin listing carries an invalid cid: {e}")
                ))?
        );
    }
    Ok(())
}
