//! Integration tests for Reverie
//!
//! These tests run whole sessions over simulated media pipelines under a
//! paused tokio clock, and check playlist behavior across many generated
//! inputs. They verify the pieces work together, not the pieces themselves.

#[path = "integration/session_flow.rs"]
mod session_flow;

#[path = "integration/playlist_properties.rs"]
mod playlist_properties;

#[path = "integration/manifest_loading.rs"]
mod manifest_loading;
