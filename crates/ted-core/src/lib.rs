//! # ted-core: editing core for ted
//!
//! The pieces a line-oriented editor needs below its UI:
//!
//! - **[`rune`]**: UTF-8 codec over raw bytes, `Rune` sentinel for bad input
//! - **[`position`]**: `Point`, `Delta` and `Range`, 0-indexed rune coordinates
//! - **[`buffer`]**: `Buffer`, a `Vec<String>` of lines with structural edits
//! - **[`geometry`]**: rune index to tab-expanded visible column and back
//! - **[`view`]**: a viewport onto a shared buffer that follows the cursor
//! - **[`options`]**: the `set` option layer (tabstop, scroll-offs)
//! - **[`command`]**: command-line tokenizer with typed arguments
//! - **[`macros`]**: macro registers holding recorded key runes
//!
//! Data flows one way: codec, then buffer, then geometry, then view. Nothing
//! in the buffer knows about views.

pub mod buffer;
pub mod command;
pub mod geometry;
pub mod macros;
pub mod options;
pub mod position;
pub mod rune;
pub mod view;
