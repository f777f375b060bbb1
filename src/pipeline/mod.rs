//! Per-format extraction flows.
//!
//! Each flow takes ownership of the uploaded bytes and runs its engines
//! through the shared [`WorkerPool`](crate::pool::WorkerPool):
//!
//! ```text
//! PDF   : stage .pdf ─► render (1 task) ─► mpsc ─► recognise (≤ N tasks) ─► sort ─► join
//! image : decode ─► recognise
//! DOCX  : parse ─► concatenate paragraphs and tables
//! ```
//!
//! Any stage failing fails the whole request. Partial PDF output is never
//! returned.

pub mod docx;
pub mod image;
pub mod pdf;
