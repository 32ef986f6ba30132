//! 决定 Vegas 拥塞避免阶段每个周期如何调整窗口及阈值的策略。
//! Policies deciding, once per Vegas cycle in congestion avoidance, how the
//! window moves and whether the alpha/beta thresholds adapt.
//!
//! [`FixedThresholds`] is classic Vegas. [`AdaptiveThresholds`] is Vegas-A
//! (Srijith, Jacob and Ananda, "TCP Vegas-A: Improving the performance of
//! TCP Vegas", Computer Communications 28, 2005), which shifts both
//! thresholds together depending on whether throughput is improving.

use std::fmt;
use tracing::debug;

/// What the controller should do with the window at the end of a cycle.
///
/// 周期结束时控制器应如何处理窗口。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    /// Add one segment.
    Grow,
    /// Leave the window unchanged.
    Hold,
    /// Remove one segment.
    Shrink,
}

/// The measurements a policy decides on.
///
/// 策略据以决策的测量值。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptationInput {
    /// Estimated segments queued in the network: `cwnd - cwnd * base_rtt / min_rtt`.
    pub diff: u32,
    /// Throughput achieved this cycle, bytes per second.
    pub throughput: f64,
    /// Throughput achieved last cycle, zero when there is none.
    pub previous_throughput: f64,
    /// Relative change at or below which throughput counts as steady.
    pub tolerance: f64,
}

/// Direction of the throughput between two consecutive cycles.
///
/// 两个连续周期之间吞吐量的变化方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThroughputTrend {
    Rising,
    Steady,
    Falling,
}

impl AdaptationInput {
    pub fn trend(&self) -> ThroughputTrend {
        if self.previous_throughput <= 0.0 {
            return ThroughputTrend::Rising;
        }
        let change = (self.throughput - self.previous_throughput) / self.previous_throughput;
        if change > self.tolerance {
            ThroughputTrend::Rising
        } else if change < -self.tolerance {
            ThroughputTrend::Falling
        } else {
            ThroughputTrend::Steady
        }
    }
}

/// The alpha/beta pair a policy reads and may shift.
///
/// 策略读取并可能移动的 alpha/beta 阈值对。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub alpha: u32,
    pub beta: u32,
    /// Alpha is never moved below this value.
    pub min_alpha: u32,
}

impl Thresholds {
    fn raise(&mut self) {
        self.alpha = self.alpha.saturating_add(1);
        self.beta = self.beta.saturating_add(1);
    }

    fn lower(&mut self) {
        if self.alpha > self.min_alpha {
            self.alpha = self.alpha.saturating_sub(1);
            self.beta = self.beta.saturating_sub(1);
        }
    }
}

/// A strategy for the congestion avoidance step of Vegas.
///
/// Vegas 拥塞避免步骤的策略。
pub trait AdaptationPolicy: fmt::Debug + Clone + Send + 'static {
    /// The name of the controller built on this policy.
    const NAME: &'static str;

    /// Decides the window action for a finished cycle, possibly moving the
    /// thresholds.
    ///
    /// 为已结束的周期决定窗口动作，可能移动阈值。
    fn adapt(&mut self, input: &AdaptationInput, thresholds: &mut Thresholds) -> WindowAction;
}

/// Classic Vegas: the thresholds never move.
///
/// 经典 Vegas：阈值保持不变。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedThresholds;

impl AdaptationPolicy for FixedThresholds {
    const NAME: &'static str = "TcpVegas";

    fn adapt(&mut self, input: &AdaptationInput, thresholds: &mut Thresholds) -> WindowAction {
        if input.diff < thresholds.alpha {
            WindowAction::Grow
        } else if input.diff > thresholds.beta {
            WindowAction::Shrink
        } else {
            WindowAction::Hold
        }
    }
}

/// Vegas-A: alpha and beta shift together, driven by the throughput trend.
///
/// Vegas-A：alpha 与 beta 随吞吐量趋势一起移动。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdaptiveThresholds;

impl AdaptationPolicy for AdaptiveThresholds {
    const NAME: &'static str = "TcpVegasA";

    fn adapt(&mut self, input: &AdaptationInput, thresholds: &mut Thresholds) -> WindowAction {
        let trend = input.trend();
        let before = *thresholds;

        let action = if input.diff > thresholds.beta {
            // Queue above the upper bound: back off regardless of throughput.
            thresholds.lower();
            WindowAction::Shrink
        } else if input.diff < thresholds.alpha {
            if thresholds.alpha == thresholds.min_alpha {
                WindowAction::Grow
            } else {
                match trend {
                    ThroughputTrend::Rising => WindowAction::Grow,
                    ThroughputTrend::Falling => {
                        thresholds.lower();
                        WindowAction::Shrink
                    }
                    ThroughputTrend::Steady => WindowAction::Hold,
                }
            }
        } else if trend == ThroughputTrend::Rising {
            // In band and still gaining: probe for a deeper operating point.
            thresholds.raise();
            WindowAction::Grow
        } else {
            WindowAction::Hold
        };

        if before != *thresholds {
            debug!(
                diff = input.diff,
                ?trend,
                old_alpha = before.alpha,
                old_beta = before.beta,
                alpha = thresholds.alpha,
                beta = thresholds.beta,
                "Vegas-A thresholds adapted"
            );
        }
        action
    }
}
