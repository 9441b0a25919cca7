use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::runtime::Runtime;

use super::error::SamplerError;
use super::reading::Reading;
use super::reading_log::ReadingLog;
use super::report::report;
use crate::source::PositionSource;

pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Run state for one tracking session: where readings come from and where they go.
pub struct Sampler<S> {
    source: S,
    log: ReadingLog,
    output_path: PathBuf,
}

impl<S: PositionSource> Sampler<S> {
    pub fn new(source: S, output_path: PathBuf) -> Self {
        Self {
            source,
            log: ReadingLog::new(),
            output_path,
        }
    }

    pub fn log(&self) -> &ReadingLog {
        &self.log
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Fetch, normalize, append and persist a single reading.
    ///
    /// Nothing is appended unless the response yields a complete reading, so a
    /// failed fetch leaves both the log and the file as the last cycle left them.
    pub async fn cycle(&mut self) -> Result<Reading, SamplerError> {
        let position = self.source.fetch().await?;
        let reading = Reading::from_position(&position)?;

        self.log.push(reading.clone());
        self.log
            .persist(&self.output_path)
            .map_err(|source| SamplerError::Persist {
                path: self.output_path.display().to_string(),
                source,
            })?;

        log::debug!(
            "Stored reading {} in {}",
            self.log.len(),
            self.output_path.display()
        );

        Ok(reading)
    }

    /// Keeps cycling every [`POLL_INTERVAL`] until `shutdown` resolves.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let should_stop = tokio::select! {
                _ = self.cycle_and_wait() => false,
                _ = &mut shutdown => true,
            };
            if should_stop {
                return;
            }
        }
    }

    /// Blocks on [`Sampler::run`], then tears `runtime` down without joining a
    /// request that is still in flight.
    pub fn run_on<F>(&mut self, runtime: Runtime, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        runtime.block_on(self.run(shutdown));
        runtime.shutdown_background();
    }

    async fn cycle_and_wait(&mut self) {
        if let Some(lines) = self.cycle_report().await {
            println!("{}", lines);
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }

    /// Runs one cycle and returns the console lines for it, if any.
    async fn cycle_report(&mut self) -> Option<String> {
        match self.cycle().await {
            Ok(reading) => Some(report(&reading)),
            Err(e @ SamplerError::Persist { .. }) => {
                // The reading was taken, only the file is stale.
                log::warn!("{}", e);
                self.log.last().map(report)
            }
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::report::summary;
    use crate::source::{ApiPosition, FetchError, HttpSource};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::net::TcpListener;
    use std::time::Instant;

    fn position(timestamp: i64) -> ApiPosition {
        ApiPosition {
            timestamp,
            latitude: 12.345,
            longitude: -98.765,
            altitude: 408.2,
            velocity: 27600.4,
        }
    }

    /// Replays queued responses in order.
    struct ScriptedSource {
        responses: RefCell<VecDeque<Result<ApiPosition, FetchError>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<ApiPosition, FetchError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
            }
        }
    }

    impl PositionSource for ScriptedSource {
        async fn fetch(&self) -> Result<ApiPosition, FetchError> {
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(FetchError::Connectivity))
        }
    }

    /// Always succeeds, one minute later each time.
    struct SteadySource {
        next: Cell<i64>,
    }

    impl PositionSource for SteadySource {
        async fn fetch(&self) -> Result<ApiPosition, FetchError> {
            let timestamp = self.next.get();
            self.next.set(timestamp + 60);
            Ok(position(timestamp))
        }
    }

    #[tokio::test]
    async fn first_cycle_stores_normalized_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS_track.csv");
        let source = ScriptedSource::new(vec![Ok(position(1_700_000_000))]);
        let mut sampler = Sampler::new(source, path.clone());

        let reading = sampler.cycle().await.unwrap();
        assert_eq!(reading.timestamp_string(), "2023-11-14 22:13:20");
        assert_eq!(reading.latitude(), 12.345);
        assert_eq!(reading.longitude(), -98.765);
        assert_eq!(reading.altitude_km(), 408.2);
        assert_eq!(reading.velocity_km_h(), 27600.4);
        assert!(report(&reading).contains("Position: 12.345°N, -98.765°E"));

        assert_eq!(sampler.log().len(), 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn failures_leave_log_and_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS_track.csv");
        let source = ScriptedSource::new(vec![
            Ok(position(1_700_000_000)),
            Err(FetchError::Status(503)),
            Err(FetchError::MissingField("velocity")),
            Err(FetchError::Connectivity),
            Err(FetchError::Request("timed out".into())),
        ]);
        let mut sampler = Sampler::new(source, path.clone());

        sampler.cycle().await.unwrap();
        let before = std::fs::read(&path).unwrap();

        let status = sampler.cycle().await.unwrap_err();
        assert!(matches!(status, SamplerError::Fetch(FetchError::Status(503))));

        let missing = sampler.cycle().await.unwrap_err();
        assert_eq!(
            missing.to_string(),
            "Data format error - missing field: velocity"
        );

        assert!(sampler.cycle().await.is_err());
        assert!(sampler.cycle().await.is_err());

        assert_eq!(sampler.log().len(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn file_tracks_every_successful_cycle_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS_track.csv");
        let source = ScriptedSource::new(vec![
            Ok(position(1_700_000_000)),
            Err(FetchError::Status(500)),
            Ok(position(1_700_000_120)),
            Ok(position(1_700_000_180)),
        ]);
        let mut sampler = Sampler::new(source, path.clone());

        for _ in 0..4 {
            let _ = sampler.cycle().await;
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let timestamps: Vec<_> = content
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap().to_string())
            .collect();
        assert_eq!(
            timestamps,
            vec![
                "2023-11-14 22:13:20",
                "2023-11-14 22:15:20",
                "2023-11-14 22:16:20",
            ]
        );
        assert_eq!(sampler.log().len(), 3);
    }

    #[tokio::test]
    async fn unwritable_output_keeps_reading_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("ISS_track.csv");
        let source = ScriptedSource::new(vec![Ok(position(1_700_000_000))]);
        let mut sampler = Sampler::new(source, path);

        let err = sampler.cycle().await.unwrap_err();
        assert!(matches!(err, SamplerError::Persist { .. }));
        assert_eq!(sampler.log().len(), 1);
    }

    #[tokio::test]
    async fn unwritable_output_still_reports_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("ISS_track.csv");
        let source = ScriptedSource::new(vec![Ok(position(1_700_000_000))]);
        let mut sampler = Sampler::new(source, path);

        let lines = sampler.cycle_report().await.unwrap();
        assert!(lines.contains("Time: 2023-11-14 22:13:20"));
        assert!(lines.contains("Position: 12.345°N, -98.765°E"));
    }

    #[tokio::test]
    async fn failed_fetch_prints_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS_track.csv");
        let source = ScriptedSource::new(vec![Err(FetchError::Status(404))]);
        let mut sampler = Sampler::new(source, path);

        assert!(sampler.cycle_report().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_after_three_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS_track.csv");
        let source = SteadySource {
            next: Cell::new(1_700_000_000),
        };
        let mut sampler = Sampler::new(source, path.clone());

        // Cycles start at 0s, 60s and 120s; the interrupt lands during the third wait.
        sampler
            .run(tokio::time::sleep(Duration::from_secs(150)))
            .await;

        assert_eq!(sampler.log().len(), 3);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);

        let lines: Vec<String> = summary(sampler.log().len(), sampler.output_path())
            .lines()
            .map(String::from)
            .collect();
        assert!(lines.contains(&"Stopping ISS tracker...".to_string()));
        assert!(lines.contains(&"Collected 3 location points".to_string()));
        assert!(lines.contains(&format!("Data saved to: {}", path.display())));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_cycle_retries_after_fixed_interval() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS_track.csv");
        let source = ScriptedSource::new(vec![
            Err(FetchError::Connectivity),
            Ok(position(1_700_000_000)),
        ]);
        let mut sampler = Sampler::new(source, path);

        // 0s fails, 60s succeeds, 120s would fail again but shutdown comes first.
        sampler
            .run(tokio::time::sleep(Duration::from_secs(90)))
            .await;
        assert_eq!(sampler.log().len(), 1);
    }

    #[test]
    fn interrupt_during_stalled_request_returns_promptly() {
        // Accepted by the kernel backlog but never answered.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());

        let dir = tempfile::tempdir().unwrap();
        let source = HttpSource::new(url, Duration::from_secs(20));
        let mut sampler = Sampler::new(source, dir.path().join("ISS_track.csv"));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let started = Instant::now();
        sampler.run_on(runtime, async {
            tokio::time::sleep(Duration::from_millis(200)).await;
        });

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(sampler.log().len(), 0);
        drop(listener);
    }
}
