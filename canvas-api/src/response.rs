use anyhow::{Result, bail};
use itertools::Itertools;
use reqwest::Response;
use serde::Deserialize;
use tracing::debug;

/// Passes successful responses through, and turns anything else into an error naming the status,
/// the URL and whatever Canvas said went wrong.
pub async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    debug!(%status, %url, %body, "Canvas responded with an error");

    match error_messages(&body) {
        Some(messages) => bail!("Canvas responded with {status} for {url}: {messages}"),
        None => bail!("Canvas responded with {status} for {url}"),
    }
}

/// Canvas reports errors either as `{"errors": [{"message": ...}]}` or as `{"message": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    List { errors: Vec<ErrorMessage> },
    Single(ErrorMessage),
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

fn error_messages(body: &str) -> Option<String> {
    let messages = match serde_json::from_str(body).ok()? {
        ErrorBody::List { errors } => errors,
        ErrorBody::Single(error) => vec![error],
    };

    if messages.is_empty() {
        None
    } else {
        Some(messages.into_iter().map(|error| error.message).join("; "))
    }
}
