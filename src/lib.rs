//! Core of the transcript-conversion system: turns a flat array of sub-word
//! speech-recognition tokens into the structured transcript artifacts used
//! by video editing and captioning pipelines.
//!
//! Three pure, deterministic subsystems, each usable standalone:
//!
//! - [`assembler`] — sub-word tokens → [`ir::Transcript`].
//! - [`caption`] — `Transcript` → time-bounded, line-broken captions.
//! - [`kinetic`] — `Transcript` (single speaker) → three interleaved word
//!   streams.
//!
//! [`emit`] holds the thin formatters that turn the above into the
//! downstream wire shapes (editor-JSON, SRT, plain text).

pub mod assembler;
pub mod caption;
pub mod emit;
pub mod error;
pub mod ir;
pub mod kinetic;
pub mod lang;

pub use assembler::{assemble, SourceToken, TranslationStatus};
pub use error::{ConversionError, ConversionWarning, Result};
pub use ir::{AssembledPunct, AssembledWord, IrItem, SpeakerInfo, Transcript, WordType};
