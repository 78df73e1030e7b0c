//! Tag empty `ref-mod` cells in EXMARaLDA `.exb` transcription files.
//!
//! Every `ref-formN` cell is expected to have at least one `ref-modN` cell
//! nested inside it. Where none exists, a synthetic cell spanning the form
//! cell and carrying the `simple` marker is inserted.

pub mod exb;
pub mod tag;
