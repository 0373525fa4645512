// SPDX-License-Identifier: AGPL-3.0-or-later
//! Built-in rules

pub mod attribute_sync;
pub mod substring_replace;
pub mod trigger_delete;

pub use attribute_sync::AttributeSyncRule;
pub use substring_replace::SubstringReplaceRule;
pub use trigger_delete::TriggerDeleteRule;
