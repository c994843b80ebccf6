use crate::error::{InvalidAttachmentSnafu, KampusResult};
use snafu::OptionExt;

/// A profile image uploaded through a faculty form, forwarded to the API as a
/// multipart file part.
#[derive(Debug)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub const FIELD: &'static str = "foto";

    /// Returns `None` when the browser sent the file input back empty.
    pub fn from_upload(file_name: Option<&str>, bytes: Vec<u8>) -> KampusResult<Option<Self>> {
        if bytes.is_empty() {
            return Ok(None);
        }

        let kind = infer::get(&bytes)
            .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
            .context(InvalidAttachmentSnafu)?;

        let file_name = file_name
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| format!("foto.{}", kind.extension()), ToString::to_string);

        Ok(Some(Self {
            file_name,
            content_type: kind.mime_type(),
            bytes,
        }))
    }
}
