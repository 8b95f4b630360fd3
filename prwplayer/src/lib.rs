//! Front-end controllers for the Panta Rei site
//!
//! The audio player and the gallery lightbox are modeled as plain state
//! machines, independent of any rendering or audio backend. A UI layer owns
//! one session per page, feeds it user intents and media events, and redraws
//! from the resulting state. Keeping them free of I/O makes every transition
//! testable in isolation.

pub mod gallery;
pub mod session;

pub use gallery::{GalleryItem, GallerySession, SWIPE_MIN, ViewerKey};
pub use session::{PlaybackState, PlayerSession, SessionTrack};
