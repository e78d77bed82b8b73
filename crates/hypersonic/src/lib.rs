// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub use hypersonic_core::*;
pub use hypersonic_derive_impl::{DataEnum, Record};

/// Core re-exports plus the derive macros.
///
/// ```rust,ignore
/// use hypersonic::prelude::*;
/// ```
pub mod prelude {
    pub use hypersonic_core::prelude::*;
    pub use hypersonic_derive_impl::{DataEnum, Record};
}
