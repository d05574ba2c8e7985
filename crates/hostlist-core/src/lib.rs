//! Core codec for hostlist notation.
//!
//! Hostlist notation is the compact grammar cluster tooling uses to name many
//! hosts at once, e.g. `cn[001-003,005]` for `cn001, cn002, cn003, cn005`.
//! This crate provides:
//!
//! - **Expansion**: [`expand`] / [`Expander`] turn notation into host names
//! - **Compression**: [`compress`] turns host names back into notation
//! - **Scanners**: [`find_first_numeric_run`], [`canonicalize_brackets`] and
//!   [`is_bracketed`], the building blocks of both directions
//! - **Error types**: [`HostlistError`] and [`Result`]
//! - **Helpers**: [`read_file_into_string`] and [`readable_memory`]
//!
//! Every function is synchronous and keeps no state between calls.
//!
//! # Examples
//!
//! ## Expanding a host list
//!
//! ```rust
//! let hosts = hostlist_core::expand("cn[01-02].ib,login").unwrap();
//! assert_eq!(hosts, vec!["cn01.ib", "cn02.ib", "login"]);
//! ```
//!
//! ## Compressing host names
//!
//! ```rust
//! let hosts = vec!["cn3", "cn1", "cn2", "cn7"];
//! assert_eq!(hostlist_core::compress(&hosts), vec!["cn[1-3,7]"]);
//! ```
//!
//! ## Error handling
//!
//! ```rust
//! use hostlist_core::{expand, HostlistError};
//!
//! match expand("cn[01-") {
//!     Ok(hosts) => println!("expanded {} hosts", hosts.len()),
//!     Err(HostlistError::IsolatedBracket { input }) => println!("unbalanced: {}", input),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

pub mod compress;
pub mod error;
pub mod expand;
pub mod scan;
pub mod util;

// Re-export commonly used types for convenience
pub use compress::compress;
pub use error::{HostlistError, Result};
pub use expand::{expand, split_host_list, Expander, DEFAULT_MAX_HOSTS};
pub use scan::{canonicalize_brackets, find_first_numeric_run, is_bracketed};
pub use util::{read_file_into_string, readable_memory};

/// Prelude module for convenient imports.
///
/// ```rust
/// use hostlist_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compress::compress;
    pub use crate::error::{HostlistError, Result};
    pub use crate::expand::{expand, Expander};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let hosts = expand("cn[1-2]").unwrap();
        assert_eq!(compress(&hosts), vec!["cn[1-2]"]);
        let _expander = Expander::new(8);
        let _error = HostlistError::config("test");
    }

    #[test]
    fn test_public_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<Expander>();
        assert_send_sync::<HostlistError>();
    }
}
