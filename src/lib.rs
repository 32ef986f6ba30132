#![deny(clippy::expect_used, clippy::unwrap_used)]

//! TCP Vegas-A: delay-based congestion control with adaptive thresholds,
//! packaged as strategies a host TCP state machine plugs in per connection.
//! TCP Vegas-A：带自适应阈值的基于延迟的拥塞控制。

pub mod config;
pub mod error;
pub mod sequence;
pub mod socket_state;

pub mod congestion;

pub use config::Config;
pub use congestion::{Algorithm, CongestionOps};
pub use error::{Error, Result};
pub use socket_state::{TcpCongState, TcpSocketState};
