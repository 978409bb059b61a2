use futures::future::BoxFuture;
use signbeat_ports::capture::{CaptureError, CapturePort};
use signbeat_ports::types::Frame;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

const FRAME_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Replays still images from a directory as if they came off a camera.
/// Files are served in name order and wrap around at the end.
pub struct DirectoryCapture {
    frames: Vec<PathBuf>,
    next: AtomicUsize,
    busy: AtomicBool,
}

impl DirectoryCapture {
    pub fn open(dir: &Path) -> Result<Self, CaptureError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| CaptureError::DeviceUnavailable(format!("{}: {}", dir.display(), e)))?;

        let mut frames: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && Self::is_frame_file(path))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(CaptureError::DeviceUnavailable(format!(
                "no frames in {}",
                dir.display()
            )));
        }
        tracing::debug!(dir = %dir.display(), frames = frames.len(), "frame directory opened");

        Ok(Self {
            frames,
            next: AtomicUsize::new(0),
            busy: AtomicBool::new(false),
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn is_frame_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| FRAME_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CapturePort for DirectoryCapture {
    fn capture_frame(&self) -> BoxFuture<'_, Result<Frame, CaptureError>> {
        Box::pin(async move {
            if self
                .busy
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_err()
            {
                return Err(CaptureError::Busy);
            }
            let _guard = BusyGuard(&self.busy);

            let index = self.next.fetch_add(1, Ordering::Relaxed) % self.frames.len();
            let path = &self.frames[index];
            let data = tokio::fs::read(path)
                .await
                .map_err(|e| CaptureError::Backend(format!("{}: {}", path.display(), e)))?;
            Ok(Frame(data))
        })
    }
}
