use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn, Instrument};
use uuid::Uuid;

use scanflow_core::{
    BlobStore, DocumentAnalyzer, DocumentRecord, EncodedImage, NavigationState, ScanError,
    StoreError,
};
use scanflow_logging::{DocumentEvent, EventLogger};
use scanflow_navigation::Navigator;
use scanflow_signature::SignatureSurface;
use scanflow_store::DocumentStore;

use crate::export::render_printable;

/// Owned aggregate of the record store, the navigator and the analyzer.
///
/// Locks are always taken store first, then navigator. Neither lock is held
/// across the analysis call, so the app stays usable while a scan is being
/// analyzed; the navigator's in-flight flag rejects a second capture.
pub struct ScannerApp {
    store: Arc<Mutex<DocumentStore>>,
    nav: Arc<Mutex<Navigator>>,
    analyzer: Arc<dyn DocumentAnalyzer>,
}

impl ScannerApp {
    pub fn new(blob: Arc<dyn BlobStore>, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        info!(analyzer = analyzer.name(), "Starting scanner");
        Self {
            store: Arc::new(Mutex::new(DocumentStore::open(blob))),
            nav: Arc::new(Mutex::new(Navigator::new())),
            analyzer,
        }
    }

    pub async fn navigation(&self) -> NavigationState {
        self.nav.lock().await.state()
    }

    pub async fn is_analyzing(&self) -> bool {
        self.nav.lock().await.is_analyzing()
    }

    /// Pending failure notice; returned once.
    pub async fn take_notice(&self) -> Option<String> {
        self.nav.lock().await.take_notice()
    }

    pub async fn start_capture(&self) -> Result<(), ScanError> {
        self.nav.lock().await.start_capture()?;
        Ok(())
    }

    pub async fn cancel_capture(&self) -> Result<(), ScanError> {
        self.nav.lock().await.cancel()?;
        Ok(())
    }

    /// Analyze a captured image and store the result.
    ///
    /// Must be called from the capturing view. On success the new record is
    /// at the front of the store and becomes active in review. On any
    /// failure nothing is stored and the navigator is back on the dashboard
    /// with a notice.
    ///
    /// Analysis runs on its own task: dropping the returned future does not
    /// abandon the scan, and the in-flight flag is always cleared.
    #[instrument(skip_all, fields(mime = %image.mime_type))]
    pub async fn submit_capture(&self, image: EncodedImage) -> Result<DocumentRecord, ScanError> {
        self.nav.lock().await.capture()?;

        let pipeline = CapturePipeline {
            store: self.store.clone(),
            nav: self.nav.clone(),
            analyzer: self.analyzer.clone(),
        };
        let task = tokio::spawn(pipeline.run(image).in_current_span());

        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Capture task aborted");
                self.nav.lock().await.analysis_failed("capture task aborted");
                Err(ScanError::Other(anyhow!("capture task aborted: {e}")))
            }
        }
    }

    /// Open an existing record for review.
    pub async fn open(&self, id: Uuid) -> Result<(), ScanError> {
        let store = self.store.lock().await;
        self.nav.lock().await.open(id, &*store)?;
        Ok(())
    }

    /// Attach or replace the signature of `id`.
    pub async fn sign(&self, id: Uuid, signature: String) -> Result<(), ScanError> {
        self.store.lock().await.update_signature(&id, signature)?;
        EventLogger::log_event(DocumentEvent::Signed { document_id: id });
        Ok(())
    }

    /// Flatten `surface` and attach it to the record under review.
    pub async fn sign_active(&self, surface: &SignatureSurface) -> Result<Uuid, ScanError> {
        let id = self.active_id().await?;
        let data_url = surface
            .to_data_url()
            .context("failed to flatten signature")?;
        self.sign(id, data_url).await?;
        Ok(id)
    }

    /// Remove `id`. Returns whether a record was removed. Deleting the
    /// record under review returns to the dashboard.
    pub async fn delete(&self, id: Uuid) -> Result<bool, ScanError> {
        let mut store = self.store.lock().await;
        let removed = store.delete(&id)?;
        if removed {
            self.nav.lock().await.record_deleted(&id);
            EventLogger::log_event(DocumentEvent::Deleted { document_id: id });
        } else {
            warn!(document_id = %id, "Delete requested for unknown document");
        }
        Ok(removed)
    }

    pub async fn delete_active(&self) -> Result<Uuid, ScanError> {
        let id = self.active_id().await?;
        self.delete(id).await?;
        Ok(id)
    }

    /// Printable plain-text view of `id`.
    pub async fn export(&self, id: Uuid) -> Result<String, ScanError> {
        let store = self.store.lock().await;
        let record = store.get(&id).ok_or(StoreError::NotFound(id))?;
        let page = render_printable(record);
        EventLogger::log_event(DocumentEvent::Exported { document_id: id });
        Ok(page)
    }

    pub async fn open_settings(&self) {
        self.nav.lock().await.open_settings();
    }

    pub async fn close_settings(&self) -> Result<(), ScanError> {
        self.nav.lock().await.close_settings()?;
        Ok(())
    }

    pub async fn go_home(&self) {
        self.nav.lock().await.home();
    }

    /// Snapshot of all records, newest first.
    pub async fn list(&self) -> Vec<DocumentRecord> {
        self.store.lock().await.list().to_vec()
    }

    pub async fn get(&self, id: Uuid) -> Option<DocumentRecord> {
        self.store.lock().await.get(&id).cloned()
    }

    /// Record currently under review.
    pub async fn active(&self) -> Option<DocumentRecord> {
        let store = self.store.lock().await;
        let id = self.nav.lock().await.active()?;
        store.get(&id).cloned()
    }

    async fn active_id(&self) -> Result<Uuid, ScanError> {
        self.nav
            .lock()
            .await
            .active()
            .ok_or(ScanError::NoActiveDocument)
    }
}

/// Post-capture work: analyze, insert, move the navigator to review.
struct CapturePipeline {
    store: Arc<Mutex<DocumentStore>>,
    nav: Arc<Mutex<Navigator>>,
    analyzer: Arc<dyn DocumentAnalyzer>,
}

impl CapturePipeline {
    async fn run(self, image: EncodedImage) -> Result<DocumentRecord, ScanError> {
        let analysis = match self.analyzer.analyze(&image).await {
            Ok(analysis) => analysis,
            Err(e) => {
                self.nav.lock().await.analysis_failed(&e.to_string());
                EventLogger::log_event(DocumentEvent::AnalysisFailed {
                    analyzer: self.analyzer.name().to_string(),
                    error_msg: e.to_string(),
                });
                return Err(e.into());
            }
        };

        let record = DocumentRecord::from_analysis(image.to_data_url(), analysis);
        let id = record.id;

        let mut store = self.store.lock().await;
        if let Err(e) = store.insert(record.clone()) {
            error!(error = %e, "Failed to store analyzed document");
            self.nav.lock().await.analysis_failed(&e.to_string());
            return Err(e.into());
        }
        self.nav.lock().await.analysis_succeeded(id, &*store)?;
        drop(store);

        EventLogger::log_event(DocumentEvent::Captured {
            document_id: id,
            category: record.category.to_string(),
            analyzer: self.analyzer.name().to_string(),
        });
        info!(document_id = %id, title = %record.title, "Document captured");
        Ok(record)
    }
}
