//! DeaDBeeF binary playlist (.dbpl) codec
//!
//! All integers are little-endian. Layout of a 1.x file:
//!
//! ```text
//! "DBPL" | major u8 | minor u8 | track count u32
//! track × count:
//!     uri (u16 len) | decoder (u8 len, < 20) | track number i16
//!     start sample i32 | end sample i32 | duration f32
//!     file type (u8 len) | album gain, album peak, track gain, track peak f32
//!     flags u32 (1.2 only)
//!     property count i16 | (key (u16 len) | value (u16 len)) × count
//! playlist properties (optional): same block layout as track properties
//! trailing bytes (kept verbatim)
//! ```

pub mod cursor;
mod reader;
pub mod types;
mod writer;

pub use reader::decode;
pub use types::{FormatVersion, TrackFlags};
pub use writer::encode;
