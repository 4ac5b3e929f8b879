//! Protection session: the external trigger around the pipeline.
//!
//! One request may be in flight per session. The control is disarmed for the
//! duration of a run and re-armed by a drop guard on every exit path.

use std::path::Path;

use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::pdf_document::DocumentPreview;
use crate::pipeline::Pipeline;
use crate::report::{ProtectControl, Report, Reporter, Status};
use crate::security::options::RawOptions;
use crate::types::{ProtectionOutcome, SourceDocument};

#[derive(Debug)]
pub struct Session {
    pipeline: Pipeline,
    reporter: Reporter,
    control: ProtectControl,
}

impl Session {
    pub fn new(pipeline: Pipeline, reporter: Reporter) -> Self {
        Self {
            pipeline,
            reporter,
            control: ProtectControl::new(),
        }
    }

    pub fn control(&self) -> &ProtectControl {
        &self.control
    }

    /// Protect the file at `path`. Invalid options are reported before the
    /// file is read. Fails only with [`Error::Busy`]; every other problem
    /// ends up in the returned report.
    #[instrument(skip(self, options))]
    pub async fn submit(&self, path: &Path, options: &RawOptions) -> Result<Report> {
        let _guard = self.control.try_disarm().ok_or(Error::Busy)?;
        let mut progress = Vec::new();
        let result = self.run_file(path, options, &mut progress).await;
        Ok(self.reporter.report(result).await.with_progress(progress))
    }

    /// Protect a document already held in memory.
    #[instrument(skip_all, fields(document = %document.name()))]
    pub async fn submit_document(
        &self,
        document: SourceDocument,
        options: &RawOptions,
    ) -> Result<Report> {
        let _guard = self.control.try_disarm().ok_or(Error::Busy)?;
        let outcome = self.pipeline.protect(document, options).await;
        Ok(self.reporter.report(Ok(outcome)).await)
    }

    async fn run_file(
        &self,
        path: &Path,
        options: &RawOptions,
        progress: &mut Vec<Status>,
    ) -> Result<ProtectionOutcome> {
        let request = match self.pipeline.prepare(options) {
            Ok(request) => request,
            Err(e) => return Ok(e.into()),
        };

        info!("Reading file...");
        progress.push(Status::info("Reading file..."));
        let document = SourceDocument::load(path).await?;

        let preview = DocumentPreview::of(&document);
        info!(
            "📄 {} ({} bytes, pages: {})",
            preview.name, preview.size, preview.page_count
        );

        Ok(self.pipeline.protect_request(document, &request).await)
    }
}
