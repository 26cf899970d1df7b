//! The Botlog-Protocol Crate

#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    non_ascii_idents,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results,
    variant_size_differences
)]

/// Device identities
pub mod identity;

/// MQTT topic and packet decoder
pub mod bot_codec;

/// Messages published by the device
pub mod messages;

/// Normalization of logs into tagged resources
pub mod resource;

pub use crate::bot_codec::*;
pub use crate::identity::*;
pub use crate::messages::*;
pub use crate::resource::*;
