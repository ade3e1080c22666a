//! Output writers for rendered pages and JSON snapshots.
//!
//! # Submodules
//!
//! - [`html`]: Writes rendered dashboard pages
//! - [`json`]: Writes the normalized articles of a section as a dated JSON snapshot
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── index.html             # First section, or the latest interactive selection
//! ├── politics.html          # One page per section with --all
//! └── economy.html
//!
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── politics.json
//!     └── economy.json
//! ```

pub mod html;
pub mod json;
