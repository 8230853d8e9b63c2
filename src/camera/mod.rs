//! Live capture through OpenCV.
//!
//! A dedicated thread keeps overwriting a single frame slot; readers copy the
//! latest frame out. Dropping the handle stops and joins the thread.

pub mod convert;

pub use convert::bgr_mat_to_rgbimage;

use crate::config::CameraConfig;
use crate::data::{ImageData, SourceType};
use crate::Result;
use image::RgbImage;
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

type FrameSlot = Arc<Mutex<Option<RgbImage>>>;

pub struct Camera {
    device: i32,
    frame: FrameSlot,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Camera {
    /// Open the device and block until the first frame arrived
    pub fn start(config: &CameraConfig) -> Result<Self> {
        let frame: FrameSlot = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(true));
        let (ready_tx, ready_rx) = mpsc::channel::<std::result::Result<(), String>>();

        let thread_frame = Arc::clone(&frame);
        let thread_running = Arc::clone(&running);
        let settings = config.clone();

        let handle = thread::Builder::new()
            .name(format!("camera-{}", config.device))
            .spawn(move || {
                let mut capture = match open_capture(&settings) {
                    Ok(capture) => capture,
                    Err(e) => {
                        let _ = ready_tx.send(Err(format!("{:#}", e)));
                        return;
                    }
                };

                let mut reported = false;
                while thread_running.load(Ordering::Acquire) {
                    match grab_frame(&mut capture) {
                        Ok(Some(image)) => {
                            if let Ok(mut slot) = thread_frame.lock() {
                                *slot = Some(image);
                            }
                            if !reported {
                                let _ = ready_tx.send(Ok(()));
                                reported = true;
                            }
                        }
                        Ok(None) => {
                            if !reported {
                                let _ = ready_tx.send(Err("device returned no frame".to_string()));
                                return;
                            }
                            debug!("Camera returned an empty frame");
                        }
                        Err(e) => {
                            warn!(error = %e, "Camera read failed, stopping capture");
                            if !reported {
                                let _ = ready_tx.send(Err(format!("{:#}", e)));
                            }
                            thread_running.store(false, Ordering::Release);
                        }
                    }
                }

                if let Err(e) = capture.release() {
                    warn!(error = %e, "Failed to release camera");
                }
            })?;

        let mut camera = Self {
            device: config.device,
            frame,
            running,
            handle: Some(handle),
        };

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!(device = config.device, width = config.width, height = config.height, "Camera started");
                Ok(camera)
            }
            Ok(Err(message)) => {
                camera.stop();
                Err(anyhow::anyhow!("Camera {} failed to start: {}", config.device, message))
            }
            Err(_) => {
                camera.stop();
                Err(anyhow::anyhow!("Camera {} thread exited before reporting", config.device))
            }
        }
    }

    pub fn device(&self) -> i32 {
        self.device
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Copy of the latest frame, tagged RAW
    pub fn read(&self) -> Result<ImageData> {
        let slot = self
            .frame
            .lock()
            .map_err(|_| anyhow::anyhow!("Camera frame lock poisoned"))?;
        let image = slot
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Camera {} has no frame yet", self.device))?;
        Ok(ImageData::new(image.clone(), SourceType::Raw))
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(device = self.device, "Camera thread panicked");
            }
            info!(device = self.device, "Camera stopped");
        }
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.stop();
    }
}

fn open_capture(config: &CameraConfig) -> Result<VideoCapture> {
    let mut capture = VideoCapture::new(config.device, videoio::CAP_ANY)?;
    if !capture.is_opened()? {
        return Err(anyhow::anyhow!("Device {} could not be opened", config.device));
    }
    capture.set(videoio::CAP_PROP_FRAME_WIDTH, config.width as f64)?;
    capture.set(videoio::CAP_PROP_FRAME_HEIGHT, config.height as f64)?;
    Ok(capture)
}

fn grab_frame(capture: &mut VideoCapture) -> Result<Option<RgbImage>> {
    let mut mat = Mat::default();
    if !capture.read(&mut mat)? || mat.rows() <= 0 {
        return Ok(None);
    }
    Ok(Some(bgr_mat_to_rgbimage(&mat)?))
}
