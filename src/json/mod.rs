//! Purpose: Internal JSON parsing boundary for the encode direction.
//! Exports: `parse` module with decode helpers used by conversion pipelines.
//! Role: Single seam for parser implementation so callsites avoid ad hoc decode logic.
//! Invariants: JSON input is decoded only through this module.

pub(crate) mod parse;
