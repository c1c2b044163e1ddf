//! Run artifacts written to the output directory.
//!
//! # Submodules
//!
//! - [`caption`]: Composes the post caption and writes `caption.txt`
//! - [`json`]: Writes `slides.json`, the trend list handed to the image renderer
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── caption.txt
//! ├── slides.json
//! └── slide_*.png     # written later by the renderer
//! ```

pub mod caption;
pub mod json;
