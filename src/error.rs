//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.
//!
//! The congestion control hooks themselves never fail; errors only surface
//! while a controller is being configured or selected.

use thiserror::Error;

/// The primary error type for the congestion control library.
/// 拥塞控制库的主要错误类型。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The configured segment size was zero.
    /// 配置的报文段大小为零。
    #[error("segment size must be non-zero")]
    ZeroSegmentSize,

    /// The configured initial congestion window was zero segments.
    /// 配置的初始拥塞窗口为零个报文段。
    #[error("initial congestion window must be at least one segment")]
    ZeroInitialWindow,

    /// The lower Vegas threshold is above the upper one.
    /// Vegas 下限阈值高于上限阈值。
    #[error("vegas alpha ({alpha}) must not exceed beta ({beta})")]
    InvalidThresholds { alpha: u32, beta: u32 },

    /// The floor for adaptive alpha is zero or above the starting alpha.
    /// 自适应 alpha 的下限为零或高于初始 alpha。
    #[error("minimum alpha ({min_alpha}) must be in 1..={alpha}")]
    InvalidMinimumAlpha { min_alpha: u32, alpha: u32 },

    /// The throughput tolerance is negative or not a finite number.
    /// 吞吐量容差为负数或不是有限数。
    #[error("throughput tolerance must be a finite, non-negative ratio, got {0}")]
    InvalidThroughputTolerance(f64),

    /// No congestion control algorithm is registered under the given name.
    /// 没有以给定名称注册的拥塞控制算法。
    #[error("unknown congestion control algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;
