//! Thread-safety marker shared by every bridge trait.
//!
//! Hosts (desktop, Android, iOS) share bridge implementations between the
//! session task and the engine's completion thread, so every bridge must be
//! `Send + Sync`.

/// Blanket `Send + Sync` bound for bridge implementations.
pub trait PlatformSendSync: Send + Sync {}

impl<T> PlatformSendSync for T where T: Send + Sync {}
