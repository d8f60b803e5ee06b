//! Upload, preview, apply and download as one explicit state machine.
//!
//! ```text
//! Idle ──select──▶ Loading ──finish_load(Ok)──▶ Ready ──apply──▶ Watermarked
//!   ▲                 │                           ▲                │   │
//!   │           finish_load(Err)                  └──── apply ─────┘   │
//!   │                 ▼                                                │
//!   └──reset───── Failed ◀────────── apply(Err) / select(Err) ─────────┘
//! ```
//!
//! Selecting a new file from any state discards the previous document. Every selection hands
//! out a [`LoadTicket`]; completions carrying an older ticket are rejected, so an abandoned
//! decode can never overwrite a newer one.

use crate::{
    foundation::{
        bitmap::Bitmap,
        error::{IdmarkError, IdmarkResult},
    },
    intake::{
        decode::{PageRasterizer, load_document},
        upload::{DocumentKind, Upload, validate_upload},
    },
    output::{Download, download_file_name},
    render::cpu::{Compositor, OutputBitmap},
    watermark::spec::WatermarkSpec,
};

/// A decoded document and where it came from.
#[derive(Clone, Debug)]
pub struct Document {
    /// Original file name.
    pub name: String,
    /// Kind the document was accepted as.
    pub kind: DocumentKind,
    /// Decoded source raster; never modified.
    pub source: Bitmap,
}

/// Identifies one selection; see [`Session::select`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Where the session currently is.
#[derive(Clone, Debug)]
pub enum SessionState {
    /// Nothing selected.
    Idle,
    /// A selected file is being decoded.
    Loading {
        /// Decode progress in percent.
        progress: u8,
    },
    /// A document is decoded and can be previewed.
    Ready {
        /// The decoded document.
        document: Document,
    },
    /// A watermark has been applied.
    Watermarked {
        /// The decoded document.
        document: Document,
        /// Most recent watermarked output.
        output: OutputBitmap,
    },
    /// The last attempt failed.
    Failed {
        /// User-facing error message.
        reason: String,
        /// Document still available for another `apply`, if decoding had succeeded.
        document: Option<Document>,
    },
}

impl SessionState {
    /// Short lowercase name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Ready { .. } => "ready",
            Self::Watermarked { .. } => "watermarked",
            Self::Failed { .. } => "failed",
        }
    }

    /// The decoded document, if the state holds one.
    pub fn document(&self) -> Option<&Document> {
        match self {
            Self::Ready { document } | Self::Watermarked { document, .. } => Some(document),
            Self::Failed { document, .. } => document.as_ref(),
            Self::Idle | Self::Loading { .. } => None,
        }
    }
}

struct PendingLoad {
    ticket: LoadTicket,
    name: String,
    kind: DocumentKind,
}

/// One user's pass through select, decode, apply and download.
pub struct Session {
    state: SessionState,
    pending: Option<PendingLoad>,
    next_ticket: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session in [`SessionState::Idle`].
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            pending: None,
            next_ticket: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Start loading a file with the given name, declared type and size.
    ///
    /// Type and size are validated before anything is reset. On success the previous
    /// document is discarded and the session enters [`SessionState::Loading`].
    pub fn select(&mut self, name: &str, mime: &str, size: u64) -> IdmarkResult<LoadTicket> {
        self.pending = None;
        let kind = match validate_upload(mime, size) {
            Ok(kind) => kind,
            Err(e) => return Err(self.fail(e, None)),
        };

        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(PendingLoad {
            ticket,
            name: name.to_string(),
            kind,
        });
        self.state = SessionState::Loading { progress: 0 };
        tracing::debug!(name, mime, size, "file selected");
        Ok(ticket)
    }

    /// Record decode progress for `ticket`, clamped to 100 and never moving backwards.
    pub fn report_progress(&mut self, ticket: LoadTicket, progress: u8) -> IdmarkResult<()> {
        self.check_ticket(ticket)?;
        if let SessionState::Loading { progress: current } = &mut self.state {
            *current = (*current).max(progress.min(100));
        }
        Ok(())
    }

    /// Deliver the decode result for `ticket`.
    ///
    /// A stale ticket is rejected and leaves the state untouched.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: IdmarkResult<Bitmap>,
    ) -> IdmarkResult<()> {
        self.check_ticket(ticket)?;
        let pending = self
            .pending
            .take()
            .ok_or_else(|| IdmarkError::session("no load in progress"))?;

        match result {
            Ok(source) => {
                self.state = SessionState::Ready {
                    document: Document {
                        name: pending.name,
                        kind: pending.kind,
                        source,
                    },
                };
                Ok(())
            }
            Err(e) => Err(self.fail(e, None)),
        }
    }

    /// Select, decode and finish loading `upload` in one step.
    pub fn load(&mut self, upload: &Upload, rasterizer: &dyn PageRasterizer) -> IdmarkResult<()> {
        let ticket = self.select(&upload.name, &upload.mime, upload.size())?;
        let decoded = load_document(upload, rasterizer);
        self.report_progress(ticket, 100)?;
        self.finish_load(ticket, decoded)
    }

    /// Watermark the loaded document's original source with `spec`.
    ///
    /// Re-applying replaces the previous output; watermarks never accumulate.
    pub fn apply(
        &mut self,
        compositor: &mut Compositor,
        spec: &WatermarkSpec,
    ) -> IdmarkResult<&OutputBitmap> {
        let document = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Ready { document }
            | SessionState::Watermarked { document, .. }
            | SessionState::Failed {
                document: Some(document),
                ..
            } => document,
            other => {
                let msg = format!("cannot apply a watermark while {}", other.name());
                self.state = other;
                return Err(IdmarkError::session(msg));
            }
        };

        match compositor.composite(&document.source, spec) {
            Ok(output) => {
                self.state = SessionState::Watermarked { document, output };
                match &self.state {
                    SessionState::Watermarked { output, .. } => Ok(output),
                    _ => Err(IdmarkError::session("watermark output missing")),
                }
            }
            Err(e) => Err(self.fail(e, Some(document))),
        }
    }

    /// The watermarked file to offer for saving.
    pub fn download(&self) -> IdmarkResult<Download> {
        match &self.state {
            SessionState::Watermarked { document, output } => Ok(Download {
                file_name: download_file_name(&document.name, document.kind),
                bytes: output.png().to_vec(),
            }),
            other => Err(IdmarkError::session(format!(
                "nothing to download while {}",
                other.name()
            ))),
        }
    }

    /// Drop everything and return to [`SessionState::Idle`].
    pub fn reset(&mut self) {
        self.pending = None;
        self.state = SessionState::Idle;
    }

    fn check_ticket(&self, ticket: LoadTicket) -> IdmarkResult<()> {
        match &self.pending {
            Some(p) if p.ticket == ticket => Ok(()),
            _ => Err(IdmarkError::session("stale or unknown load ticket")),
        }
    }

    fn fail(&mut self, error: IdmarkError, document: Option<Document>) -> IdmarkError {
        tracing::warn!(error = %error, "session attempt failed");
        self.state = SessionState::Failed {
            reason: error.to_string(),
            document,
        };
        error
    }
}

#[cfg(test)]
#[path = "../tests/unit/session/state.rs"]
mod tests;
