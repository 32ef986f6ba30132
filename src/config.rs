//! 定义了拥塞控制器的可配置参数。
//! Defines configurable parameters for the congestion controllers.

use crate::error::{Error, Result};

/// A structure containing all configurable parameters for a controller.
///
/// 包含所有控制器可配置参数的结构体。
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Window-related parameters shared by every algorithm.
    /// 所有算法共享的窗口相关参数。
    pub congestion_control: CongestionControlConfig,

    /// Vegas and Vegas-A specific parameters.
    /// Vegas 与 Vegas-A 专用参数。
    pub vegas: VegasConfig,
}

/// Window-related parameters.
///
/// 窗口相关参数。
#[derive(Debug, Clone, PartialEq)]
pub struct CongestionControlConfig {
    /// The maximum segment size in bytes. Windows are kept in bytes but grow
    /// and shrink in multiples of this value.
    /// 最大报文段大小（字节）。窗口以字节保存，但以该值的整数倍增减。
    pub segment_size: u32,
    /// The initial congestion window size in segments.
    /// 初始拥塞窗口大小（以报文段为单位）。
    pub initial_cwnd_segments: u32,
    /// The initial slow start threshold in bytes.
    /// 初始慢启动阈值（字节）。
    pub initial_ssthresh: u32,
}

/// Vegas-related parameters.
///
/// Vegas 相关参数。
#[derive(Debug, Clone, PartialEq)]
pub struct VegasConfig {
    /// The starting lower bound on the estimated number of segments queued in
    /// the network. Below it the window is increased.
    /// 网络中估计排队报文段数量的初始下限。低于此值时增大窗口。
    pub alpha: u32,
    /// The starting upper bound on the estimated number of queued segments.
    /// Above it the window is decreased.
    /// 估计排队报文段数量的初始上限。高于此值时减小窗口。
    pub beta: u32,
    /// Slow start is left as soon as the estimated queue exceeds this value.
    /// 一旦估计的队列超过此值即退出慢启动。
    pub gamma: u32,
    /// The floor that adaptive alpha never drops below.
    /// 自适应 alpha 不会低于的下限。
    pub min_alpha: u32,
    /// RTT samples a cycle needs before the Vegas estimate is trusted. Cycles
    /// with fewer samples fall back to Reno growth.
    /// 一个周期内信任 Vegas 估计所需的 RTT 样本数。样本更少时退回 Reno 增长。
    pub min_cycle_samples: u32,
    /// Relative throughput changes at or below this ratio count as steady.
    /// 相对吞吐量变化不超过该比例时视为稳定。
    pub throughput_tolerance: f64,
}

impl Config {
    /// Checks that the parameters describe a usable controller.
    ///
    /// 检查参数是否描述了一个可用的控制器。
    pub fn validate(&self) -> Result<()> {
        self.congestion_control.validate()?;
        self.vegas.validate()
    }
}

impl CongestionControlConfig {
    fn validate(&self) -> Result<()> {
        if self.segment_size == 0 {
            return Err(Error::ZeroSegmentSize);
        }
        if self.initial_cwnd_segments == 0 {
            return Err(Error::ZeroInitialWindow);
        }
        Ok(())
    }
}

impl VegasConfig {
    fn validate(&self) -> Result<()> {
        if self.alpha > self.beta {
            return Err(Error::InvalidThresholds {
                alpha: self.alpha,
                beta: self.beta,
            });
        }
        if self.min_alpha == 0 || self.min_alpha > self.alpha {
            return Err(Error::InvalidMinimumAlpha {
                min_alpha: self.min_alpha,
                alpha: self.alpha,
            });
        }
        if !self.throughput_tolerance.is_finite() || self.throughput_tolerance < 0.0 {
            return Err(Error::InvalidThroughputTolerance(self.throughput_tolerance));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            congestion_control: CongestionControlConfig::default(),
            vegas: VegasConfig::default(),
        }
    }
}

impl Default for CongestionControlConfig {
    fn default() -> Self {
        Self {
            segment_size: 536,
            initial_cwnd_segments: 10,
            initial_ssthresh: u32::MAX,
        }
    }
}

impl Default for VegasConfig {
    fn default() -> Self {
        Self {
            alpha: 2,
            beta: 4,
            gamma: 1,
            min_alpha: 1,
            min_cycle_samples: 3,
            throughput_tolerance: 0.01, // 1%
        }
    }
}
