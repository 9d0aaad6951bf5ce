// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock collaborators for deterministic testing.
//!
//! Provides in-memory implementations of the external collaborator traits:
//! [`MockMailer`] captures outbound digests, [`MockLive`] captures
//! live-channel joins and emits. Both are assertion-friendly: tests drive
//! the real pipeline and then inspect what crossed the boundary.

pub mod mock_live;
pub mod mock_mailer;

pub use mock_live::{EmittedEvent, MockLive};
pub use mock_mailer::{MockMailer, SentMail};
