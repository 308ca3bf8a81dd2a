use crate::shared::config::RunConfig;
use crate::shared::error::CollectionError;
use crate::shared::traits::StatusSource;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// mod_bmx query URL for the vhost `hostname:port`.
pub fn status_url(hostname: &str, port: u16) -> Result<String, CollectionError> {
    let url = format!(
        "http://{hostname}:{port}/bmx?query=mod_bmx_vhost:Type=forever,Host={hostname},Port={port}"
    );
    Url::parse(&url)?;
    Ok(url)
}

/// Retrieves raw status text either from a live mod_bmx endpoint or from a
/// captured fixture file.
pub enum StatsFetcher {
    Live {
        url: String,
        agent: ureq::Agent,
        debug: bool,
    },
    Fixture {
        path: PathBuf,
    },
}

impl StatsFetcher {
    pub fn live(hostname: &str, port: u16, timeout: Duration, debug: bool) -> Result<Self, CollectionError> {
        let url = status_url(hostname, port)?;
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(StatsFetcher::Live { url, agent, debug })
    }

    pub fn fixture(path: impl Into<PathBuf>) -> Self {
        StatsFetcher::Fixture { path: path.into() }
    }

    /// Test runs read the fixture; everything else polls the live page.
    pub fn from_config(config: &RunConfig) -> Result<Self, CollectionError> {
        if config.testrun {
            let path = config.fixture.as_ref().ok_or(CollectionError::MissingFixture)?;
            Ok(Self::fixture(path))
        } else {
            Self::live(&config.hostname, config.hostport, config.request_timeout(), config.debug)
        }
    }

    fn fetch_live(url: &str, agent: &ureq::Agent) -> Result<Vec<String>, CollectionError> {
        let response = match agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(CollectionError::Status(code)),
            Err(e) => return Err(CollectionError::Transport(e.to_string())),
        };
        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(CollectionError::Status(status));
        }
        let body = response.into_string()?;
        Ok(body.split('\n').map(str::to_string).collect())
    }

    fn fetch_fixture(path: &Path) -> Result<Vec<String>, CollectionError> {
        let content = fs::read_to_string(path)?;
        Ok(content.lines().map(str::to_string).collect())
    }
}

impl StatusSource for StatsFetcher {
    fn fetch(&self) -> Result<Vec<String>, CollectionError> {
        let lines = match self {
            StatsFetcher::Live { url, agent, debug } => {
                if *debug {
                    println!("URL: {}", url);
                }
                Self::fetch_live(url, agent)?
            }
            StatsFetcher::Fixture { path } => Self::fetch_fixture(path)?,
        };
        debug!("Fetched {} status lines from {}", lines.len(), self.describe());
        Ok(lines)
    }

    fn describe(&self) -> String {
        match self {
            StatsFetcher::Live { url, .. } => url.clone(),
            StatsFetcher::Fixture { path } => path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::thread;
    use tempfile::NamedTempFile;

    fn serve_once(status: u16, body: &'static str) -> (u16, thread::JoinHandle<String>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let handle = thread::spawn(move || {
            let request = server.recv().unwrap();
            let url = request.url().to_string();
            let response = tiny_http::Response::from_string(body).with_status_code(status);
            request.respond(response).unwrap();
            url
        });
        (port, handle)
    }

    #[test]
    fn builds_mod_bmx_query_url() {
        assert_eq!(
            status_url("web01", 8080).unwrap(),
            "http://web01:8080/bmx?query=mod_bmx_vhost:Type=forever,Host=web01,Port=8080"
        );
        assert!(status_url("bad host", 80).is_err());
    }

    #[test]
    fn fixture_lines_are_returned_verbatim() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "BusyWorkers: 5\nnot a stat\nUptime: 300\n").unwrap();

        let fetcher = StatsFetcher::fixture(file.path());
        let lines = fetcher.fetch().unwrap();
        assert_eq!(lines, vec!["BusyWorkers: 5", "not a stat", "Uptime: 300"]);
    }

    #[test]
    fn missing_fixture_degrades_to_no_data() {
        let fetcher = StatsFetcher::fixture("/nonexistent/bmx-status.txt");
        assert!(matches!(fetcher.fetch(), Err(CollectionError::Io(_))));
        assert!(fetcher.fetch_lines().is_empty());
    }

    #[test]
    fn live_fetch_queries_status_page() {
        let (port, server) = serve_once(200, "ConnsTotal: 2\nCPULoad: 0.25");
        let fetcher = StatsFetcher::live("127.0.0.1", port, Duration::from_secs(5), false).unwrap();

        let lines = fetcher.fetch().unwrap();
        assert_eq!(lines, vec!["ConnsTotal: 2", "CPULoad: 0.25"]);

        let path = server.join().unwrap();
        assert_eq!(
            path,
            format!("/bmx?query=mod_bmx_vhost:Type=forever,Host=127.0.0.1,Port={port}")
        );
    }

    #[test]
    fn non_success_status_is_a_fetch_error() {
        let (port, server) = serve_once(503, "busy");
        let fetcher = StatsFetcher::live("127.0.0.1", port, Duration::from_secs(5), false).unwrap();

        assert!(matches!(fetcher.fetch(), Err(CollectionError::Status(503))));
        server.join().unwrap();
    }

    #[test]
    fn test_run_requires_fixture() {
        let mut config = RunConfig::new("localhost");
        config.testrun = true;
        assert!(matches!(StatsFetcher::from_config(&config), Err(CollectionError::MissingFixture)));

        config.fixture = Some(PathBuf::from("fixtures/bmx.txt"));
        assert!(matches!(StatsFetcher::from_config(&config), Ok(StatsFetcher::Fixture { .. })));
    }
}
