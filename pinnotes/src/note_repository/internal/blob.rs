use serde::{Deserialize, Serialize};
use crate::author_address::AuthorAddress;
use crate::data::{Cid, Note};
use crate::json_object::{json_object, JsonObject};
use crate::note_repository::errors::ParseSkipped;

/// The document pinned for every note:
/// `{"text": ..., "metadata": {"userAddress": ...}}`.
///
/// Unknown fields are ignored when reading, so blobs written by other
/// clients with extra metadata still count as notes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NoteBlob {
    pub text: String,
    #[serde(deserialize_with = "json_object")]
    pub metadata: NoteBlobMetadata,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteBlobMetadata {
    pub user_address: AuthorAddress,
}

impl NoteBlob {
    pub fn new(text: impl Into<String>, user_address: AuthorAddress) -> Self {
        NoteBlob {
            text: text.into(),
            metadata: NoteBlobMetadata { user_address },
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<NoteBlob, ParseSkipped> {
        // an empty address is already rejected by AuthorAddress
        let JsonObject(blob) = serde_json::from_slice::<JsonObject<NoteBlob>>(bytes)?;
        if blob.text.is_empty() {
            return Err(ParseSkipped::EmptyField("text"))
        }
        Ok(blob)
    }

    pub fn is_authored_by(&self, author_address: &AuthorAddress) -> bool {
        self.metadata.user_address == *author_address
    }

    pub fn into_note(self, cid: Cid) -> Note {
        Note {
            cid,
            content: self.text,
            author_address: self.metadata.user_address,
        }
    }
}
