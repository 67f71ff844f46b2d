use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::{FfmpegAdapter, FsLocalAdapter};
use crate::app::{controller::BatchController, convert_interactor::BatchConverter};
use crate::ports::{EncodePort, FsPort};

pub trait AppContainer: Send + Sync {
    fn batch_converter(&self) -> Arc<BatchConverter>;
    fn batch_controller(&self) -> Arc<BatchController>;
}

pub struct DefaultAppContainer {
    batch_converter: Arc<BatchConverter>,
    batch_controller: Arc<BatchController>,
}

impl DefaultAppContainer {
    /// Wire the production adapters; `encoder` overrides encoder discovery
    pub fn new(encoder: Option<PathBuf>) -> Self {
        let encode_port: Arc<dyn EncodePort> = match encoder {
            Some(path) => Arc::new(FfmpegAdapter::with_path(path)),
            None => Arc::new(FfmpegAdapter::new()),
        };
        let fs_port: Arc<dyn FsPort> = Arc::new(FsLocalAdapter::new());

        Self::with_ports(encode_port, fs_port)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(encode_port: Arc<dyn EncodePort>, fs_port: Arc<dyn FsPort>) -> Self {
        let batch_converter = Arc::new(BatchConverter::new(encode_port, fs_port));
        let batch_controller = Arc::new(BatchController::new(Arc::clone(&batch_converter)));

        Self {
            batch_converter,
            batch_controller,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn batch_converter(&self) -> Arc<BatchConverter> {
        Arc::clone(&self.batch_converter)
    }

    fn batch_controller(&self) -> Arc<BatchController> {
        Arc::clone(&self.batch_controller)
    }
}
