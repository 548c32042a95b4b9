use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, TryRecvError},
        Arc,
    },
    thread,
    time::Duration,
};

use geojson::FeatureCollection;

use super::{
    error::LoadError,
    record::{parse_records, records_to_feature_collection, NeighborhoodRecord},
};

pub fn neighborhoods_url(api_base_url: &str) -> String {
    format!(
        "{}/neighborhoods?include_geometry=true",
        api_base_url.trim_end_matches('/')
    )
}

pub fn fetch_neighborhood_records(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<Vec<NeighborhoodRecord>, LoadError> {
    let response = client
        .get(url)
        .send()
        .map_err(|err| LoadError::Network(url.to_owned(), err))?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(url.to_owned(), status));
    }
    let body = response
        .text()
        .map_err(|err| LoadError::Network(url.to_owned(), err))?;
    parse_records(&body)
}

/// Where and how to fetch the neighborhoods.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub url: String,
    pub user_agent: String,
}

impl LoadRequest {
    pub fn load(&self) -> Result<FeatureCollection, LoadError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&self.user_agent)
            .build()
            .map_err(LoadError::Client)?;
        log::info!("Fetching neighborhoods from {}", self.url);
        let records = fetch_neighborhood_records(&client, &self.url)?;
        log::info!("Received {} neighborhood records", records.len());
        records_to_feature_collection(records)
    }
}

#[derive(Debug)]
pub enum LoadEvent {
    Loaded(Arc<FeatureCollection>),
    Failed(LoadError),
}

/// A fetch running on a worker thread. Delivers at most one `LoadEvent`.
///
/// Cancelling (explicitly or by dropping the task) guarantees nothing is
/// delivered afterwards, even if the request itself still completes.
pub struct LoadTask {
    cancelled: Arc<AtomicBool>,
    receiver: Receiver<LoadEvent>,
}

impl LoadTask {
    pub fn spawn(request: LoadRequest) -> anyhow::Result<Self> {
        Self::spawn_with(move || request.load())
    }

    pub fn spawn_with<F>(job: F) -> anyhow::Result<Self>
    where
        F: FnOnce() -> Result<FeatureCollection, LoadError> + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = mpsc::sync_channel(1);
        let worker_cancelled = Arc::clone(&cancelled);
        thread::Builder::new()
            .name("neighborhood-loader".to_string())
            .spawn(move || {
                let event = match job() {
                    Ok(collection) => LoadEvent::Loaded(Arc::new(collection)),
                    Err(err) => LoadEvent::Failed(err),
                };
                if worker_cancelled.load(Ordering::Acquire) {
                    log::debug!("Load was cancelled, discarding result");
                    return;
                }
                // The receiver is gone if the view was torn down in the meantime.
                let _ = sender.send(event);
            })?;
        Ok(Self {
            cancelled,
            receiver,
        })
    }

    /// Wait up to `timeout` for the result. A zero timeout only checks.
    pub fn poll(&self, timeout: Duration) -> Option<LoadEvent> {
        if self.is_cancelled() {
            return None;
        }
        if timeout.is_zero() {
            match self.receiver.try_recv() {
                Ok(event) => Some(event),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(LoadEvent::Failed(LoadError::WorkerExited)),
            }
        } else {
            match self.receiver.recv_timeout(timeout) {
                Ok(event) => Some(event),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => {
                    Some(LoadEvent::Failed(LoadError::WorkerExited))
                }
            }
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        sync::{atomic::AtomicUsize, mpsc as std_mpsc},
    };

    use rstest::rstest;

    use super::*;

    /// Serve a single HTTP response on an ephemeral port and return the base URL.
    pub(crate) fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buffer = [0u8; 4096];
                let _ = stream.read(&mut buffer);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", address)
    }

    /// Serve the same response to every connection, counting the connections.
    pub(crate) fn serve_counting(body: String) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&connections);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buffer = [0u8; 4096];
                let _ = stream.read(&mut buffer);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (format!("http://{}", address), connections)
    }

    fn request_for(base_url: &str) -> LoadRequest {
        LoadRequest {
            url: neighborhoods_url(base_url),
            user_agent: "livability-map-test".to_string(),
        }
    }

    #[rstest]
    #[case("http://localhost:8000", "http://localhost:8000/neighborhoods?include_geometry=true")]
    #[case("http://localhost:8000/", "http://localhost:8000/neighborhoods?include_geometry=true")]
    #[case("https://api.example.org/v1", "https://api.example.org/v1/neighborhoods?include_geometry=true")]
    fn test_neighborhoods_url(#[case] base: &str, #[case] expected: &str) {
        assert_eq!(neighborhoods_url(base), expected);
    }

    #[rstest]
    fn test_load_fetches_and_reshapes() {
        let body = r#"[
            {"name": "Mission", "livability_score": 64, "geometry": {"type": "Point", "coordinates": [-122.41, 37.76]}},
            {"name": "Castro", "livability_score": 58, "geometry": {"type": "Point", "coordinates": [-122.43, 37.76]}}
        ]"#;
        let base_url = serve_once("200 OK", body.to_string());

        let collection = request_for(&base_url).load().unwrap();

        assert_eq!(collection.features.len(), 2);
        let names: Vec<&str> = collection
            .features
            .iter()
            .map(|feature| feature.property("name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Mission", "Castro"]);
    }

    #[rstest]
    fn test_load_reports_error_status() {
        let base_url = serve_once("500 Internal Server Error", "{}".to_string());
        match request_for(&base_url).load() {
            Err(LoadError::Status(_, status)) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[rstest]
    fn test_load_reports_malformed_body() {
        let base_url = serve_once("200 OK", "{\"oops\": true}".to_string());
        assert!(matches!(
            request_for(&base_url).load(),
            Err(LoadError::MalformedBody(_))
        ));
    }

    #[rstest]
    fn test_load_reports_unreachable_host() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        assert!(matches!(
            request_for(&base_url).load(),
            Err(LoadError::Network(_, _))
        ));
    }

    #[rstest]
    fn test_task_delivers_exactly_one_event() {
        let task = LoadTask::spawn_with(|| Ok(FeatureCollection::from_iter(Vec::new()))).unwrap();
        match task.poll(Duration::from_secs(5)) {
            Some(LoadEvent::Loaded(collection)) => assert!(collection.features.is_empty()),
            other => panic!("expected a loaded event, got {:?}", other),
        }
        assert!(matches!(
            task.poll(Duration::from_millis(50)),
            Some(LoadEvent::Failed(LoadError::WorkerExited))
        ));
    }

    #[rstest]
    fn test_cancelled_task_never_delivers() {
        let (release, gate) = std_mpsc::channel::<()>();
        let (finished, done) = std_mpsc::channel::<()>();
        let task = LoadTask::spawn_with(move || {
            gate.recv().unwrap();
            let _ = finished.send(());
            Ok(FeatureCollection::from_iter(Vec::new()))
        })
        .unwrap();

        task.cancel();
        release.send(()).unwrap();
        done.recv_timeout(Duration::from_secs(5)).unwrap();

        assert!(task.is_cancelled());
        assert!(task.poll(Duration::from_millis(100)).is_none());
    }

    #[rstest]
    fn test_failed_job_is_delivered_as_failure() {
        let task = LoadTask::spawn_with(|| Err(LoadError::WorkerExited)).unwrap();
        assert!(matches!(
            task.poll(Duration::from_secs(5)),
            Some(LoadEvent::Failed(_))
        ));
    }
}
