//! DDS to container repacking.
//!
//! Two modes are supported:
//!
//! - [`repack_fixed_layout`] overwrites mips in place and requires the
//!   replacement to match the container exactly
//! - [`repack_free_layout`] rebuilds the GTEX record and mip table from the
//!   replacement and appends its pixels to the data block
//!
//! Both locate and validate every face or slice before the first write.

mod fixed;
mod free;
mod source;

pub use fixed::repack_fixed_layout;
pub use free::repack_free_layout;
