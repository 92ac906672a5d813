use log::debug;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::download::request::endpoint;
use crate::error::{DownloadError, Result};
use crate::file::FileDescriptor;

/// Fetches the files offered by the server from `GET /files/list`.
pub async fn fetch_file_list(client: &Client, server: &Url) -> Result<Vec<FileDescriptor>> {
    let body = fetch(client, endpoint(server, "files/list")?).await?;
    let files: Vec<FileDescriptor> = serde_json::from_slice(&body)?;
    debug!("server offers {} files", files.len());
    Ok(files)
}

/// Fetches the usage quota message from `GET /files/status`.
pub async fn fetch_usage_quota(client: &Client, server: &Url) -> Result<String> {
    let body = fetch(client, endpoint(server, "files/status")?).await?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

async fn fetch(client: &Client, url: Url) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    DownloadError::expect_status(response.status(), StatusCode::OK)?;
    Ok(response.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn server_with(route: &str, response: ResponseTemplate) -> (MockServer, Url) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(&server)
            .await;
        let url = Url::parse(&server.uri()).unwrap();
        (server, url)
    }

    #[tokio::test]
    async fn file_list() {
        let body = r#"[
            {"name": "photo.jpeg", "size": 1024, "date": "2023-03-12T10:30:00Z"},
            {"name": "notes.txt", "size": 12, "date": 1678617000}
        ]"#;
        let (_server, url) =
            server_with("/files/list", ResponseTemplate::new(200).set_body_string(body)).await;

        let files = fetch_file_list(&Client::new(), &url)
            .await
            .expect("valid file list");

        let names: Vec<_> = files.iter().map(|file| file.name.as_str()).collect();
        assert_eq!(names, vec!["photo.jpeg", "notes.txt"]);
        assert_eq!(files[0].size, 1024);
    }

    #[tokio::test]
    async fn malformed_file_list_is_decode_error() {
        let (_server, url) = server_with(
            "/files/list",
            ResponseTemplate::new(200).set_body_string("[{\"name\": 42}"),
        )
        .await;

        let result = fetch_file_list(&Client::new(), &url).await;

        assert!(matches!(result, Err(DownloadError::Decode(_))));
    }

    #[tokio::test]
    async fn file_list_server_error() {
        let (_server, url) = server_with("/files/list", ResponseTemplate::new(503)).await;

        let result = fetch_file_list(&Client::new(), &url).await;

        assert!(matches!(
            result,
            Err(DownloadError::Server {
                status: StatusCode::SERVICE_UNAVAILABLE,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn usage_quota() {
        let (_server, url) = server_with(
            "/files/status",
            ResponseTemplate::new(200).set_body_string("Usage: 12.5 MB of 100 MB"),
        )
        .await;

        let status = fetch_usage_quota(&Client::new(), &url)
            .await
            .expect("valid status");

        assert_eq!(status, "Usage: 12.5 MB of 100 MB");
    }
}
