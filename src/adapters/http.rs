use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::time::Duration;

pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Fetches the page body; any non-success status is an error.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("Sending GET request to: {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    tracing::debug!("Source response status: {}", status);

    if !status.is_success() {
        return Err(EtlError::SourceStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}
