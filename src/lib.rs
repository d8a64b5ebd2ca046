//! mlinput - provision AWS MediaLive RTMP push inputs
//!
//! Library surface behind the `mlinput` binary. The flow is strictly
//! layered: [`config`] resolves explicit fields and an optional JSON
//! document into a spec record, [`input::builder`] validates it and
//! dispatches one creation call through the [`medialive::CreateInput`]
//! capability, and [`medialive`] provides the real signed client.

pub mod config;
pub mod error;
pub mod input;
pub mod medialive;
