//! Hand-landmark gesture estimation and debounced action dispatch.
//!
//! A [`pipeline::PollLoop`] samples a landmark source on a fixed period,
//! scores every registered gesture against the hand's finger features,
//! picks a winner and turns it into host effects through
//! [`dispatch::ActionDispatcher`] and [`host::Host`].

pub mod config;
pub mod dispatch;
pub mod gesture;
pub mod host;
pub mod pipeline;
pub mod types;
