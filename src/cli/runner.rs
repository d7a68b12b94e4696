//! CLI runner

use super::commands::Cli;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::fetcher::PaginatingFetcher;
use crate::http::{HttpClient, RequestSpec, Transport};
use crate::pagination::FetchResult;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Runs one fetch described by the command line
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load settings, apply command-line overrides
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.cli.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        if let Some(max_pages) = self.cli.max_pages {
            settings.fetch.max_pages = Some(max_pages);
        }
        if let Some(max_retries) = self.cli.max_retries {
            settings.fetch.max_rate_limit_retries = Some(max_retries);
        }
        if self.cli.secondary_rate_limits {
            settings.fetch.secondary_rate_limits = true;
        }
        Ok(settings)
    }

    /// Build the request from the command line
    pub fn request_spec(&self) -> Result<RequestSpec> {
        let mut spec = RequestSpec::new(&self.cli.uri).method(self.cli.method);
        for (name, value) in &self.cli.headers {
            spec = spec.header(name, value);
        }
        if let Some(data) = &self.cli.data {
            spec = spec.json(serde_json::from_str(data)?);
        }
        Ok(spec)
    }

    /// Run the fetch, cancelling on Ctrl-C, and print the result
    pub async fn run(&self) -> Result<()> {
        let settings = self.settings()?;
        let client = HttpClient::with_config(settings.http_config())?;
        let fetcher = PaginatingFetcher::with_config(client, settings.fetcher_config());

        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, cancelling fetch");
                on_signal.cancel();
            }
        });

        let result = self.execute(&fetcher, &cancel).await?;
        println!("{}", self.render(&result)?);
        Ok(())
    }

    /// Run the fetch against any transport
    pub async fn execute<T: Transport>(
        &self,
        fetcher: &PaginatingFetcher<T>,
        cancel: &CancellationToken,
    ) -> Result<FetchResult> {
        let spec = self.request_spec()?;
        debug!(
            "Fetching {} {} (paginate: {})",
            spec.method, spec.uri, self.cli.paginate
        );
        let result = fetcher
            .fetch_with_cancel(spec, self.cli.paginate, cancel)
            .await?;
        info!("Fetched {} body(ies)", result.len());
        Ok(result)
    }

    /// Serialize a result the way the command line asked for
    pub fn render(&self, result: &FetchResult) -> Result<String> {
        let rendered = if self.cli.pretty {
            serde_json::to_string_pretty(result)
        } else {
            serde_json::to_string(result)
        };
        rendered.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn runner(args: &[&str]) -> Runner {
        let mut argv = vec!["resilient-fetch"];
        argv.extend_from_slice(args);
        Runner::new(Cli::parse_from(argv))
    }

    #[test]
    fn test_request_spec_from_args() {
        let runner = runner(&[
            "https://api.example/items",
            "-X",
            "PATCH",
            "-H",
            "Accept: application/json",
            "--data",
            r#"{"state":"closed"}"#,
        ]);
        let spec = runner.request_spec().unwrap();

        assert_eq!(spec.uri, "https://api.example/items");
        assert_eq!(spec.method, crate::types::Method::PATCH);
        assert_eq!(
            spec.headers.get("Accept"),
            Some(&"application/json".to_string())
        );
        assert_eq!(spec.body, Some(json!({"state": "closed"})));
    }

    #[test]
    fn test_request_spec_bad_data() {
        let runner = runner(&["https://api.example/items", "--data", "{not json"]);
        assert!(matches!(runner.request_spec(), Err(Error::JsonParse(_))));
    }

    #[test]
    fn test_settings_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"fetch:\n  max_pages: 10\n  max_rate_limit_retries: 1\n")
            .unwrap();
        let config = file.path().to_str().unwrap().to_string();

        let runner = runner(&[
            "https://api.example/items",
            "-C",
            config.as_str(),
            "--max-pages",
            "2",
            "--secondary-rate-limits",
        ]);
        let settings = runner.settings().unwrap();

        assert_eq!(settings.fetch.max_pages, Some(2));
        assert_eq!(settings.fetch.max_rate_limit_retries, Some(1));
        assert!(settings.fetch.secondary_rate_limits);
    }

    #[test]
    fn test_render() {
        let compact = runner(&["https://api.example/items"]);
        let pretty = runner(&["https://api.example/items", "--pretty"]);
        let result = FetchResult::Pages(vec![json!([1]), json!([2])]);

        assert_eq!(compact.render(&result).unwrap(), "[[1],[2]]");
        assert!(pretty.render(&result).unwrap().contains('\n'));
    }

    #[tokio::test]
    async fn test_execute_paginates() {
        let mock_server = MockServer::start().await;
        let page2 = format!("{}/items?page=2", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", format!(r#"<{page2}>; rel="next""#).as_str())
                    .set_body_json(json!([1])),
            )
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([2])))
            .mount(&mock_server)
            .await;

        let uri = format!("{}/items", mock_server.uri());
        let runner = runner(&[uri.as_str(), "--paginate"]);
        let fetcher = PaginatingFetcher::with_transport(HttpClient::new().unwrap());

        let result = runner
            .execute(&fetcher, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result, FetchResult::Pages(vec![json!([1]), json!([2])]));
    }
}
