//! Defines the pluggable congestion control interface.
//! 定义了可插拔的拥塞控制接口。
//!
//! A transport owns one boxed [`CongestionOps`] per connection and calls
//! into it at fixed points of its state machine:
//!
//! - [`on_ack`](CongestionOps::on_ack) for every acknowledgment batch,
//! - [`on_congestion_state_change`](CongestionOps::on_congestion_state_change)
//!   whenever loss detection moves the connection between states,
//! - [`adjust_window`](CongestionOps::adjust_window) whenever the window may grow,
//! - [`slow_start_threshold`](CongestionOps::slow_start_threshold) on loss.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::socket_state::{TcpCongState, TcpSocketState};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub mod adaptation;
pub mod new_reno;
pub mod vegas;

pub use adaptation::{AdaptationPolicy, AdaptiveThresholds, FixedThresholds};
pub use new_reno::NewReno;
pub use vegas::{ClassicVegas, Vegas, VegasA, VegasStats};

/// A trait for congestion control algorithms.
///
/// None of the hooks can fail. Inputs outside the documented range are
/// tolerated rather than reported.
///
/// 拥塞控制算法的 trait。
pub trait CongestionOps: fmt::Debug + Send + 'static {
    /// Returns the algorithm name. Constant for the lifetime of the process.
    ///
    /// 返回算法名称。
    fn name(&self) -> &'static str;

    /// Called once per acknowledgment batch with the number of newly acked
    /// segments and the RTT sample taken from it.
    ///
    /// 每批确认调用一次。
    fn on_ack(&mut self, _tcb: &mut TcpSocketState, _segments_acked: u32, _rtt: Duration) {}

    /// Called when the connection's congestion state changes.
    ///
    /// 当连接的拥塞状态改变时调用。
    fn on_congestion_state_change(&mut self, _tcb: &mut TcpSocketState, _new_state: TcpCongState) {
    }

    /// Called when the connection is allowed to grow its window.
    ///
    /// 当连接被允许增大窗口时调用。
    fn adjust_window(&mut self, tcb: &mut TcpSocketState, segments_acked: u32);

    /// Computes the slow start threshold to use after a congestion event.
    ///
    /// 计算拥塞事件后使用的慢启动阈值。
    fn slow_start_threshold(&self, tcb: &TcpSocketState, bytes_in_flight: u32) -> u32;

    /// Produces an independent copy of this controller, e.g. when a listening
    /// socket hands its configured controller to an accepted connection.
    ///
    /// 生成此控制器的独立副本。
    fn duplicate(&self) -> Box<dyn CongestionOps>;
}

impl<T: CongestionOps + ?Sized> CongestionOps for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_ack(&mut self, tcb: &mut TcpSocketState, segments_acked: u32, rtt: Duration) {
        (**self).on_ack(tcb, segments_acked, rtt)
    }

    fn on_congestion_state_change(&mut self, tcb: &mut TcpSocketState, new_state: TcpCongState) {
        (**self).on_congestion_state_change(tcb, new_state)
    }

    fn adjust_window(&mut self, tcb: &mut TcpSocketState, segments_acked: u32) {
        (**self).adjust_window(tcb, segments_acked)
    }

    fn slow_start_threshold(&self, tcb: &TcpSocketState, bytes_in_flight: u32) -> u32 {
        (**self).slow_start_threshold(tcb, bytes_in_flight)
    }

    fn duplicate(&self) -> Box<dyn CongestionOps> {
        (**self).duplicate()
    }
}

/// The congestion control algorithms available to a host.
///
/// 主机可用的拥塞控制算法。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    NewReno,
    Vegas,
    VegasA,
}

impl Algorithm {
    /// Validates `config` and builds a controller for this algorithm.
    ///
    /// 校验 `config` 并为该算法构建控制器。
    pub fn build(self, config: &Config) -> Result<Box<dyn CongestionOps>> {
        config.validate()?;
        let ops: Box<dyn CongestionOps> = match self {
            Algorithm::NewReno => Box::new(NewReno::new()),
            Algorithm::Vegas => Box::new(ClassicVegas::new(config.vegas.clone())),
            Algorithm::VegasA => Box::new(VegasA::new(config.vegas.clone())),
        };
        tracing::debug!(algorithm = ops.name(), "Congestion controller created");
        Ok(ops)
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::NewReno => NewReno::NAME,
            Algorithm::Vegas => FixedThresholds::NAME,
            Algorithm::VegasA => AdaptiveThresholds::NAME,
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tcpnewreno" | "newreno" => Ok(Algorithm::NewReno),
            "tcpvegas" | "vegas" => Ok(Algorithm::Vegas),
            "tcpvegasa" | "vegas-a" | "vegasa" => Ok(Algorithm::VegasA),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
