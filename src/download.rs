use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use log::{debug, error, info, warn};

use crate::error::{DownloadError, Result};
use crate::models::DownloadRequest;
use crate::options::DownloadOptions;
use crate::progress::{classify_line, OutputLine, ProgressTracker, ProgressUpdate};

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Progress {
        percent: f32,
        speed: String,
        eta: String,
        status: String,
    },
    /// A file is fully fetched and post-processing runs next. Shown at 100%.
    Processing,
    OutputFile(PathBuf),
    /// Terminal: the run succeeded.
    Completed(String),
    /// Terminal: the run failed.
    Failed(String),
}

/// Sending half of the worker channel. Every send wakes the UI.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<WorkerEvent>,
    repaint: Arc<dyn Fn() + Send + Sync>,
}

impl EventSink {
    pub fn new(tx: Sender<WorkerEvent>, repaint: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            tx,
            repaint: Arc::new(repaint),
        }
    }

    pub fn send(&self, event: WorkerEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!("UI is gone, dropping {:?}", e.0);
        }
        (self.repaint)();
    }
}

struct LineHandler {
    sink: EventSink,
    tracker: ProgressTracker,
    last_message: Option<String>,
    output_file: Option<PathBuf>,
}

impl LineHandler {
    fn new(sink: EventSink) -> Self {
        Self {
            sink,
            tracker: ProgressTracker::default(),
            last_message: None,
            output_file: None,
        }
    }

    fn handle(&mut self, line: &str) {
        match classify_line(line) {
            OutputLine::Progress(ProgressUpdate::Downloading(progress)) => {
                let percent = self.tracker.observe(&progress);
                self.sink.send(WorkerEvent::Progress {
                    percent,
                    speed: progress.speed_label(),
                    eta: progress.eta_label(),
                    status: progress.describe(percent),
                });
            }
            OutputLine::Progress(ProgressUpdate::Finished) => {
                self.tracker.finish_file();
                self.sink.send(WorkerEvent::Processing);
            }
            OutputLine::OutputFile(path) => {
                info!("Saved {}", path.display());
                self.output_file = Some(path.clone());
                self.sink.send(WorkerEvent::OutputFile(path));
            }
            OutputLine::PostProcessing(message) => {
                debug!("{}", message);
                self.sink.send(WorkerEvent::Processing);
            }
            OutputLine::Other(message) => {
                let message = message.trim();
                if !message.is_empty() {
                    debug!("yt-dlp: {}", message);
                    self.last_message = Some(message.to_string());
                }
            }
        }
    }
}

fn read_lossy_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

fn pump<R: Read>(stream: R, handler: &mut LineHandler) -> io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    while let Some(line) = read_lossy_line(&mut reader, &mut buf)? {
        handler.handle(&line);
    }
    Ok(())
}

fn run_download(
    ytdlp: PathBuf,
    request: &DownloadRequest,
    options: &DownloadOptions,
    sink: &EventSink,
) -> Result<String> {
    let args = options.to_args(&request.url);
    info!("Starting download of {} to {}", request.url, request.destination.display());
    debug!("Command: {} {:?}", ytdlp.display(), args);

    let mut child = Command::new(&ytdlp)
        .args(&args)
        .env("PYTHONIOENCODING", "UTF-8")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(DownloadError::Spawn)?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| DownloadError::Failed("stdout was not captured".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| DownloadError::Failed("stderr was not captured".to_string()))?;

    // Some yt-dlp builds print progress to stderr, so both streams go through a handler.
    let stderr_sink = sink.clone();
    let stderr_thread = thread::spawn(move || {
        let mut handler = LineHandler::new(stderr_sink);
        if let Err(e) = pump(stderr, &mut handler) {
            warn!("Failed to read yt-dlp stderr: {}", e);
        }
        handler.last_message
    });

    let mut handler = LineHandler::new(sink.clone());
    let read_result = pump(stdout, &mut handler);
    let status = child.wait()?;
    let stderr_tail = stderr_thread.join().ok().flatten();
    read_result?;

    if !status.success() {
        let message = stderr_tail
            .or(handler.last_message)
            .unwrap_or_else(|| format!("yt-dlp exited with {}", status));
        return Err(DownloadError::Failed(message));
    }

    Ok(match handler.output_file {
        Some(path) => format!(
            "Downloaded: {}",
            path.file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string())
        ),
        None => "Download completed!".to_string(),
    })
}

/// Runs one download on a fresh thread. Exactly one terminal event is sent.
pub fn start_download(
    ytdlp: PathBuf,
    request: DownloadRequest,
    options: DownloadOptions,
    sink: EventSink,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let event = match run_download(ytdlp, &request, &options, &sink) {
            Ok(message) => {
                info!("{}", message);
                WorkerEvent::Completed(message)
            }
            Err(e) => {
                error!("Download of {} failed: {}", request.url, e);
                WorkerEvent::Failed(e.to_string())
            }
        };
        sink.send(event);
    })
}

pub fn update_ytdlp(ytdlp: PathBuf, sink: EventSink) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        info!("Updating {}", ytdlp.display());
        let output = Command::new(&ytdlp)
            .arg("-U")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let event = match output {
            Ok(output) => {
                if output.status.success() {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    let summary = stdout.lines().last().unwrap_or("").trim().to_string();
                    WorkerEvent::Completed(format!("yt-dlp updated successfully: {}", summary))
                } else {
                    let error_msg = String::from_utf8_lossy(&output.stderr);
                    WorkerEvent::Failed(format!("Failed to update yt-dlp: {}", error_msg.trim()))
                }
            }
            Err(e) => WorkerEvent::Failed(format!("Failed to run yt-dlp: {}", e)),
        };
        if let WorkerEvent::Failed(message) = &event {
            error!("{}", message);
        }
        sink.send(event);
    })
}
