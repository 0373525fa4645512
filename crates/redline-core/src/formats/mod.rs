// SPDX-License-Identifier: AGPL-3.0-or-later
//! Format handlers for each supported format

pub mod json;
pub mod plaintext;

pub use json::JsonHandler;
pub use plaintext::PlainTextHandler;
