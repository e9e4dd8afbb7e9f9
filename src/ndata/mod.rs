//! Nion Swift `.ndata` containers.
//!
//! A `.ndata` file is a ZIP archive whose two entries are stored without
//! compression. The records are walked by signature; no general archive
//! library is involved.
//!
//! ## File Structure
//!
//! ```text
//! +--------------------------+
//! | Local header "data.npy"  |  PK\x03\x04 + 26 bytes + name + extra
//! | .npy payload             |
//! +--------------------------+
//! | Local header             |
//! |   "metadata.json"        |
//! | JSON payload             |
//! +--------------------------+
//! | Central directory        |  PK\x01\x02 + 42 bytes + name + extra + comment
//! |   (one per entry)        |
//! +--------------------------+
//! | End of central directory |  PK\x05\x06 + 18 bytes
//! +--------------------------+
//! ```

mod format;
mod stream;
mod index;
mod archive;

pub use format::*;
pub use stream::*;
pub use index::*;
pub use archive::*;
