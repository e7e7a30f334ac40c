//! Image host adapters.
//!
//! [`CloudinaryImageHost`] posts staged uploads to a Cloudinary-compatible
//! upload API. [`DisabledImageHost`] stands in when no credentials are
//! configured and fails every upload.

mod cloudinary;
mod disabled;
mod dto;

pub use cloudinary::{CloudinaryConfigError, CloudinaryCredentials, CloudinaryImageHost};
pub use disabled::DisabledImageHost;
