use crossbeam::channel::{self, Receiver};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

const CHUNK_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub enum ThumbnailMessage {
    Decoded {
        generation: u64,
        index: usize,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    Failed {
        generation: u64,
        index: usize,
        error: String,
    },
}

impl ThumbnailMessage {
    pub fn generation(&self) -> u64 {
        match self {
            ThumbnailMessage::Decoded { generation, .. } | ThumbnailMessage::Failed { generation, .. } => {
                *generation
            }
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ThumbnailMessage::Decoded { index, .. } | ThumbnailMessage::Failed { index, .. } => *index,
        }
    }
}

/// Decodes `path` and shrinks it to fit in a `size` x `size` box.
pub fn decode_thumbnail(path: &Path, size: u32) -> Result<image::RgbaImage, image::ImageError> {
    let img = image::open(path)?;
    Ok(img.thumbnail(size, size).to_rgba8())
}

/// Decodes thumbnails off the UI thread. Starting a new batch makes every
/// message of the previous batch stale.
#[derive(Default)]
pub struct ThumbnailLoader {
    generation: Arc<AtomicU64>,
    receiver: Option<Receiver<ThumbnailMessage>>,
    completed: Arc<Mutex<usize>>,
    total: usize,
}

impl ThumbnailLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, paths: Vec<PathBuf>, size: u32) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.completed = Arc::new(Mutex::new(0));
        self.total = paths.len();
        if paths.is_empty() {
            self.receiver = None;
            return;
        }

        let (tx, rx) = channel::unbounded();
        self.receiver = Some(rx);

        let current = self.generation.clone();
        let completed = self.completed.clone();
        info!("Starting thumbnail decoding for {} images...", paths.len());

        thread::spawn(move || {
            for chunk_start in (0..paths.len()).step_by(CHUNK_SIZE) {
                if current.load(Ordering::SeqCst) != generation {
                    debug!("Thumbnail batch {} superseded", generation);
                    return;
                }
                let chunk_end = (chunk_start + CHUNK_SIZE).min(paths.len());

                (chunk_start..chunk_end).into_par_iter().for_each_with(tx.clone(), |tx, index| {
                    let path = &paths[index];
                    let message = match decode_thumbnail(path, size) {
                        Ok(rgba) => ThumbnailMessage::Decoded {
                            generation,
                            index,
                            width: rgba.width(),
                            height: rgba.height(),
                            pixels: rgba.into_raw(),
                        },
                        Err(err) => {
                            warn!("Failed to decode {}: {}", path.display(), err);
                            ThumbnailMessage::Failed {
                                generation,
                                index,
                                error: err.to_string(),
                            }
                        }
                    };
                    *completed.lock() += 1;
                    let _ = tx.send(message);
                });
            }
        });
    }

    /// Messages of the current batch received so far.
    pub fn poll(&mut self) -> Vec<ThumbnailMessage> {
        let generation = self.generation.load(Ordering::SeqCst);
        match &self.receiver {
            Some(rx) => rx
                .try_iter()
                .filter(|message| message.generation() == generation)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.total > 0 && *self.completed.lock() < self.total
    }

    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        *self.completed.lock() as f32 / self.total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    #[test]
    fn thumbnail_keeps_aspect_ratio() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("wide.png");
        image::RgbImage::new(40, 20).save(&path).expect("save png");

        let thumb = decode_thumbnail(&path, 16).expect("decode");
        assert_eq!((thumb.width(), thumb.height()), (16, 8));
    }

    #[test]
    fn loader_reports_every_image() {
        let dir = tempdir().expect("tempdir");
        let good = dir.path().join("a.png");
        let bad = dir.path().join("b.png");
        image::RgbImage::new(8, 8).save(&good).expect("save png");
        fs::write(&bad, b"not an image").expect("write");

        let mut loader = ThumbnailLoader::new();
        loader.start(vec![good, bad], 4);

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut messages = Vec::new();
        while messages.len() < 2 && Instant::now() < deadline {
            messages.extend(loader.poll());
            thread::sleep(Duration::from_millis(10));
        }
        messages.sort_by_key(ThumbnailMessage::index);

        assert!(matches!(messages[0], ThumbnailMessage::Decoded { width: 4, height: 4, .. }));
        assert!(matches!(messages[1], ThumbnailMessage::Failed { index: 1, .. }));
        assert!(!loader.is_running());
        assert_eq!(loader.progress(), 1.0);
    }

    #[test]
    fn empty_batch_is_done() {
        let mut loader = ThumbnailLoader::new();
        loader.start(Vec::new(), 64);
        assert!(!loader.is_running());
        assert!(loader.poll().is_empty());
    }
}
