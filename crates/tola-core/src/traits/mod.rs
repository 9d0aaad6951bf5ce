// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the external collaborators.
//!
//! The intake pipeline talks to the outside world through these traits so
//! the orchestration code can be exercised with mocks. All use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod live;
pub mod mail;

pub use live::LiveChannel;
pub use mail::MailTransport;
