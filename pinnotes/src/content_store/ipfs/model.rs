use std::collections::BTreeMap;
use serde::Deserialize;
use serde::de::IgnoredAny;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddResponse {
    pub hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PinAddResponse {
    #[serde(default)]
    pub pins: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PinLsLine {
    Streamed {
        #[serde(rename = "Cid")]
        cid: String,
    },
    Listed {
        #[serde(rename = "Keys")]
        keys: BTreeMap<String, IgnoredAny>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeErrorBody {
    pub message: String,
}

impl NodeErrorBody {
    pub fn message_from(body: &[u8]) -> String {
        serde_json::from_slice::<NodeErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_owned())
    }
}
