use httpd_bmx_agent::{
    ConsoleSink,
    CycleState,
    Metric,
    MetricSink,
    MetricValue,
    PollCycle,
    Reporter,
    RunConfig,
    StatsFetcher,
    StorageError,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::NamedTempFile;

#[derive(Default)]
struct RecordingSink {
    metrics: Mutex<Vec<Metric>>,
}

impl RecordingSink {
    fn value_of(&self, path: &str) -> Option<MetricValue> {
        self.metrics
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.path == path)
            .map(|m| m.value.clone())
    }
}

impl MetricSink for RecordingSink {
    fn report(&self, metric: &Metric) -> Result<(), StorageError> {
        self.metrics.lock().unwrap().push(metric.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn fixture(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn test_run_config(path: &std::path::Path, debug: bool) -> RunConfig {
    let mut config = RunConfig::new("localhost");
    config.testrun = true;
    config.debug = debug;
    config.fixture = Some(path.to_path_buf());
    config
}

#[test]
fn fixture_run_forwards_every_stat_then_stops() {
    let file = fixture("BusyWorkers: 5\nConnsTotal: 2\nCPULoad: 0.10\nUptime: 300");
    let config = test_run_config(file.path(), false);

    let source = StatsFetcher::from_config(&config).unwrap();
    let reporter: Reporter<RecordingSink> = Reporter::Forward(RecordingSink::default());
    let cycle = PollCycle::new(source, reporter, config.testrun);

    let outcome = cycle.run_cycle();
    assert_eq!(outcome.state, CycleState::Reported);
    assert_eq!(outcome.reported, 4);
    assert!(outcome.should_stop());

    let Reporter::Forward(sink) = cycle.sink() else {
        panic!("expected forwarding reporter");
    };
    assert_eq!(sink.metrics.lock().unwrap().len(), 4);
    assert_eq!(sink.value_of("HTTPD/Workers/BusyWorkers"), Some(MetricValue::from("5")));
    assert_eq!(sink.value_of("HTTPD/Connections/ConnsTotal"), Some(MetricValue::from("2")));
    assert_eq!(sink.value_of("HTTPD/Uptime"), Some(MetricValue::from("300")));
    let cpu = sink.value_of("HTTPD/CPULoad").and_then(|v| v.as_f64()).unwrap();
    assert!((cpu - 10.0).abs() < 1e-9);
}

#[test]
fn debug_run_prints_instead_of_forwarding() {
    let file = fixture("IdleWorkers: 47\nDurationPerReq: 12.4\n");
    let config = test_run_config(file.path(), true);

    let buffer = SharedBuffer::default();
    let reporter: Reporter<RecordingSink, SharedBuffer> = Reporter::Console(ConsoleSink::new(buffer.clone()));
    assert!(reporter.is_debug());

    let cycle = PollCycle::new(StatsFetcher::from_config(&config).unwrap(), reporter, config.testrun);
    let outcome = cycle.run_cycle();
    assert_eq!(outcome.reported, 2);

    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    assert_eq!(
        output,
        "HTTPD/DurationPerReq[ms] : 12.4\nHTTPD/Workers/IdleWorkers[workers] : 47\n"
    );
}

#[test]
fn missing_fixture_yields_idle_cycle() {
    let config = test_run_config(std::path::Path::new("/nonexistent/bmx.txt"), false);
    let reporter: Reporter<RecordingSink> = Reporter::Forward(RecordingSink::default());
    let cycle = PollCycle::new(StatsFetcher::from_config(&config).unwrap(), reporter, config.testrun);

    let outcome = cycle.run_cycle();
    assert_eq!(outcome.state, CycleState::Idle);
    assert_eq!(outcome.reported, 0);
    assert!(outcome.should_stop());
}

#[test]
fn live_status_page_is_polled_and_classified() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        let body = "ConnsAsyncKeepAlive: 3\r\nCPULoad: 0.25\r\nScoreboard:__W__\r\n";
        request.respond(tiny_http::Response::from_string(body)).unwrap();
    });

    let mut config = RunConfig::new("127.0.0.1");
    config.hostport = port;

    let source = StatsFetcher::from_config(&config).unwrap();
    let reporter: Reporter<RecordingSink> = Reporter::Forward(RecordingSink::default());
    let cycle = PollCycle::new(source, reporter, config.testrun);

    let outcome = cycle.run_cycle();
    handle.join().unwrap();

    assert_eq!(outcome.reported, 2);
    assert!(!outcome.should_stop());
    let Reporter::Forward(sink) = cycle.sink() else {
        panic!("expected forwarding reporter");
    };
    assert_eq!(
        sink.value_of("HTTPD/Connections/ConnsAsyncKeepAlive"),
        Some(MetricValue::from("3"))
    );
    assert_eq!(sink.value_of("HTTPD/CPULoad"), Some(MetricValue::Number(25.0)));
}

#[test]
fn bundled_fixture_covers_the_stat_table() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/bmx_vhost.txt");
    let config = test_run_config(&path, false);
    let reporter: Reporter<RecordingSink> = Reporter::Forward(RecordingSink::default());
    let cycle = PollCycle::new(StatsFetcher::from_config(&config).unwrap(), reporter, config.testrun);

    let outcome = cycle.run_cycle();
    assert_eq!(outcome.reported, 14);
    assert_eq!(outcome.skipped, 0);

    let Reporter::Forward(sink) = cycle.sink() else {
        panic!("expected forwarding reporter");
    };
    let metrics = sink.metrics.lock().unwrap();
    for (key, classification) in httpd_bmx_agent::features::bmx::STAT_TABLE {
        let metric = metrics
            .iter()
            .find(|m| m.path.ends_with(&format!("/{key}")))
            .unwrap_or_else(|| panic!("{key} was not reported"));
        assert_eq!(metric.unit, classification.unit);
    }
    let unknown = metrics.iter().find(|m| m.path == "HTTPD/DurationPerReq").unwrap();
    assert_eq!(unknown.unit, "ms");
}
