//! Draft editing for inkpost.
//!
//! An [`EditingSession`] owns one writer's draft: the Markdown text, a
//! bounded linear undo history, the current selection, the draft's asset
//! namespace and at most one in-flight upload. When an upload completes the
//! draft's image references are reconciled against the returned URLs.
//!
//! ```
//! use inkpost_assets::UploadBatch;
//! use inkpost_editor::EditingSession;
//!
//! let mut session = EditingSession::with_text("Intro\n\n![cat](cat.png)");
//! let ticket = session.begin_upload().unwrap();
//!
//! let batch: UploadBatch = [("cat.png", "https://cdn.example.com/cat.png")]
//!   .into_iter()
//!   .collect();
//! let report = session.complete_upload(ticket, Ok(batch), None).unwrap();
//!
//! assert!(report.is_complete());
//! assert_eq!(
//!   session.text(),
//!   "Intro\n\n![cat](https://cdn.example.com/cat.png)"
//! );
//! assert!(session.undo());
//! ```
mod error;
mod history;
mod publish;
mod session;

pub use error::{PublishError, SessionError};
pub use history::{DEFAULT_HISTORY_LIMIT, EditHistory};
pub use publish::PublishRequest;
pub use session::{EditingSession, Selection, UploadTicket};
