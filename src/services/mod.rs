use crate::events::EventSender;
use std::sync::Arc;
use tokio::runtime::Handle;

pub mod api_client;
pub mod download_service;
pub mod process_service;
pub mod upload_service;

pub use api_client::{ConversionApi, HttpConversionApi};
pub use download_service::DownloadService;
pub use process_service::ProcessService;
pub use upload_service::UploadService;

#[derive(Clone)]
pub struct ServiceManager {
    pub upload: UploadService,
    pub process: ProcessService,
    pub download: DownloadService,
}

impl ServiceManager {
    pub fn new(api: HttpConversionApi, runtime: Handle, event_sender: EventSender) -> Self {
        let download = DownloadService::new(
            api.client().clone(),
            api.base_url(),
            runtime.clone(),
            event_sender.clone(),
        );
        let api: Arc<dyn ConversionApi> = Arc::new(api);

        Self {
            upload: UploadService::new(Arc::clone(&api), runtime.clone(), event_sender.clone()),
            process: ProcessService::new(api, runtime, event_sender),
            download,
        }
    }
}
