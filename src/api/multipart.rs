use crate::{
    data::photo::Attachment,
    error::{BuildMultipartSnafu, KampusResult},
};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use snafu::ResultExt;

/// Flattens a serialised payload into text parts. Multipart has no null, so
/// absent values are left out, or sent empty when `keep_cleared` is set (the
/// API reads an empty part as null, which an update needs to clear a field).
pub fn text_fields(payload: &Value, keep_cleared: bool) -> Vec<(String, String)> {
    let Value::Object(fields) = payload else {
        return Vec::new();
    };

    fields
        .iter()
        .filter_map(|(name, value)| {
            let text = match value {
                Value::Null if keep_cleared => String::new(),
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            };
            Some((name.clone(), text))
        })
        .collect()
}

pub fn form(
    payload: &Value,
    attachment: Attachment,
    method_override: Option<&'static str>,
) -> KampusResult<Form> {
    let mut form = text_fields(payload, method_override.is_some())
        .into_iter()
        .fold(Form::new(), |form, (name, text)| form.text(name, text));

    if let Some(method) = method_override {
        form = form.text("_method", method);
    }

    let Attachment {
        file_name,
        content_type,
        bytes,
    } = attachment;
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(content_type)
        .context(BuildMultipartSnafu)?;

    Ok(form.part(Attachment::FIELD, part))
}
