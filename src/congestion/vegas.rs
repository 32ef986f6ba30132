//! An implementation of TCP Vegas with pluggable threshold adaptation.
//!
//! Once per round trip (a "cycle", delimited by the sequence number that was
//! next to be sent when the cycle began) the controller compares the
//! expected window `cwnd * base_rtt / min_rtt` with the actual one. The
//! difference estimates how many segments sit in bottleneck queues, and the
//! configured [`AdaptationPolicy`] turns it into a window action.
//!
//! 带可插拔阈值自适应的 TCP Vegas 实现。

use crate::config::VegasConfig;
use crate::congestion::CongestionOps;
use crate::congestion::adaptation::{
    AdaptationInput, AdaptationPolicy, AdaptiveThresholds, FixedThresholds, Thresholds,
    WindowAction,
};
use crate::congestion::new_reno::NewReno;
use crate::sequence::SequenceNumber32;
use crate::socket_state::{TcpCongState, TcpSocketState};
use std::time::Duration;
use tracing::{debug, trace};

/// Vegas never shrinks the window below this many segments.
const MIN_CWND_SEGMENTS: u32 = 2;

/// TCP Vegas-A, the adaptive variant.
pub type VegasA = Vegas<AdaptiveThresholds>;

/// TCP Vegas with static alpha/beta.
pub type ClassicVegas = Vegas<FixedThresholds>;

/// A Vegas congestion controller.
///
/// Vegas 拥塞控制器。
#[derive(Debug, Clone, PartialEq)]
pub struct Vegas<P: AdaptationPolicy = AdaptiveThresholds> {
    pub(super) thresholds: Thresholds,

    pub(super) gamma: u32,

    /// Minimum of all RTT samples seen on this connection.
    /// 此连接上所有 RTT 样本的最小值。
    pub(super) base_rtt: Option<Duration>,

    /// Minimum RTT within the current cycle. `None` until the first sample.
    /// 当前周期内的最小 RTT。
    pub(super) min_rtt: Option<Duration>,

    pub(super) sample_count: u32,

    /// Whether RTT samples are being taken this cycle.
    /// 本周期是否采集 RTT 样本。
    pub(super) sampling: bool,

    /// The right edge of the window when the current cycle began.
    /// 当前周期开始时窗口的右边界。
    pub(super) window_right_edge: SequenceNumber32,

    /// Throughput measured at the end of the previous cycle, bytes per second.
    pub(super) previous_throughput: f64,

    config: VegasConfig,
    reno: NewReno,
    policy: P,
}

impl<P: AdaptationPolicy + Default> Vegas<P> {
    pub fn new(config: VegasConfig) -> Self {
        Self::with_policy(config, P::default())
    }
}

impl<P: AdaptationPolicy> Vegas<P> {
    /// Creates a controller that adapts its thresholds with `policy`.
    ///
    /// 创建一个使用 `policy` 自适应阈值的控制器。
    ///
    /// A `beta` below `alpha` is raised to `alpha`.
    pub fn with_policy(config: VegasConfig, policy: P) -> Self {
        Self {
            thresholds: Thresholds {
                alpha: config.alpha,
                beta: config.beta.max(config.alpha),
                min_alpha: config.min_alpha,
            },
            gamma: config.gamma,
            base_rtt: None,
            min_rtt: None,
            sample_count: 0,
            sampling: true,
            window_right_edge: SequenceNumber32::default(),
            previous_throughput: 0.0,
            config,
            reno: NewReno::new(),
            policy,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn gamma(&self) -> u32 {
        self.gamma
    }

    pub fn base_rtt(&self) -> Option<Duration> {
        self.base_rtt
    }

    pub fn min_rtt(&self) -> Option<Duration> {
        self.min_rtt
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn is_sampling(&self) -> bool {
        self.sampling
    }

    pub fn window_right_edge(&self) -> SequenceNumber32 {
        self.window_right_edge
    }

    pub fn previous_throughput(&self) -> f64 {
        self.previous_throughput
    }

    /// Starts a fresh sampling cycle at the current send edge.
    fn enable_sampling(&mut self, tcb: &TcpSocketState) {
        self.sampling = true;
        self.window_right_edge = tcb.next_tx_sequence;
        self.sample_count = 0;
        self.min_rtt = None;
        debug!(
            right_edge = %self.window_right_edge,
            "Vegas sampling enabled"
        );
    }

    fn disable_sampling(&mut self) {
        if self.sampling {
            debug!("Vegas sampling disabled");
        }
        self.sampling = false;
    }

    /// Runs the once-per-cycle Vegas decision.
    fn end_cycle(
        &mut self,
        tcb: &mut TcpSocketState,
        segments_acked: u32,
        base_rtt: Duration,
        min_rtt: Duration,
    ) {
        let segment_cwnd = tcb.cwnd_in_segments();
        let ratio = base_rtt.as_secs_f64() / min_rtt.as_secs_f64();
        let target_cwnd = (segment_cwnd as f64 * ratio) as u32;
        let diff = segment_cwnd.saturating_sub(target_cwnd);
        let throughput = tcb.cwnd as f64 / min_rtt.as_secs_f64();

        if diff > self.gamma && tcb.in_slow_start() {
            // Queue is building while still doubling: drop to the expected
            // window and leave slow start.
            tcb.set_cwnd_in_segments(segment_cwnd.min(target_cwnd.saturating_add(1)));
            tcb.ssthresh = self.slow_start_threshold(tcb, 0);
            debug!(
                diff,
                gamma = self.gamma,
                cwnd = tcb.cwnd,
                ssthresh = tcb.ssthresh,
                "Vegas: leaving slow start"
            );
        } else if tcb.in_slow_start() {
            self.reno.slow_start(tcb, segments_acked);
        } else {
            let input = AdaptationInput {
                diff,
                throughput,
                previous_throughput: self.previous_throughput,
                tolerance: self.config.throughput_tolerance,
            };
            let action = self.policy.adapt(&input, &mut self.thresholds);
            match action {
                WindowAction::Grow => {
                    tcb.set_cwnd_in_segments(segment_cwnd.saturating_add(1));
                }
                WindowAction::Shrink => {
                    tcb.set_cwnd_in_segments(
                        segment_cwnd.saturating_sub(1).max(MIN_CWND_SEGMENTS),
                    );
                    tcb.ssthresh = self.slow_start_threshold(tcb, 0);
                }
                WindowAction::Hold => tcb.set_cwnd_in_segments(segment_cwnd),
            }
            trace!(
                ?action,
                diff,
                alpha = self.thresholds.alpha,
                beta = self.thresholds.beta,
                cwnd = tcb.cwnd,
                "Vegas: congestion avoidance decision"
            );
        }

        let floor = (u64::from(tcb.cwnd) * 3 / 4) as u32;
        tcb.ssthresh = tcb.ssthresh.max(floor);
        self.previous_throughput = throughput;
    }

    /// Returns a snapshot of the controller state.
    ///
    /// 返回控制器状态的快照。
    pub fn statistics(&self) -> VegasStats {
        VegasStats {
            alpha: self.thresholds.alpha,
            beta: self.thresholds.beta,
            gamma: self.gamma,
            base_rtt: self.base_rtt,
            min_rtt: self.min_rtt,
            sample_count: self.sample_count,
            sampling: self.sampling,
            window_right_edge: self.window_right_edge,
            previous_throughput: self.previous_throughput,
        }
    }
}

impl<P: AdaptationPolicy> CongestionOps for Vegas<P> {
    fn name(&self) -> &'static str {
        P::NAME
    }

    fn on_ack(&mut self, _tcb: &mut TcpSocketState, segments_acked: u32, rtt: Duration) {
        if rtt.is_zero() {
            trace!(segments_acked, "Ignoring zero RTT sample");
            return;
        }
        if !self.sampling {
            return;
        }

        self.min_rtt = Some(self.min_rtt.map_or(rtt, |min| min.min(rtt)));
        self.base_rtt = Some(self.base_rtt.map_or(rtt, |base| base.min(rtt)));
        self.sample_count = self.sample_count.saturating_add(1);

        trace!(
            rtt_us = rtt.as_micros(),
            min_rtt = ?self.min_rtt,
            base_rtt = ?self.base_rtt,
            samples = self.sample_count,
            "RTT sample recorded"
        );
    }

    fn on_congestion_state_change(&mut self, tcb: &mut TcpSocketState, new_state: TcpCongState) {
        if new_state == TcpCongState::Open {
            self.enable_sampling(tcb);
        } else {
            self.disable_sampling();
        }
    }

    fn adjust_window(&mut self, tcb: &mut TcpSocketState, segments_acked: u32) {
        if !self.sampling {
            self.reno.adjust_window(tcb, segments_acked);
            return;
        }

        if tcb.last_acked_seq >= self.window_right_edge {
            self.window_right_edge = tcb.next_tx_sequence;

            match (self.base_rtt, self.min_rtt) {
                (Some(base_rtt), Some(min_rtt))
                    if self.sample_count >= self.config.min_cycle_samples =>
                {
                    self.end_cycle(tcb, segments_acked, base_rtt, min_rtt);
                }
                _ => {
                    trace!(
                        samples = self.sample_count,
                        "Too few RTT samples this cycle, using Reno growth"
                    );
                    self.reno.adjust_window(tcb, segments_acked);
                }
            }

            self.sample_count = 0;
            self.min_rtt = None;
        } else if tcb.in_slow_start() {
            self.reno.slow_start(tcb, segments_acked);
        }
    }

    fn slow_start_threshold(&self, tcb: &TcpSocketState, _bytes_in_flight: u32) -> u32 {
        tcb.ssthresh
            .min(tcb.cwnd.saturating_sub(tcb.segment_size))
            .max(tcb.segment_size.saturating_mul(2))
    }

    fn duplicate(&self) -> Box<dyn CongestionOps> {
        Box::new(self.clone())
    }
}

impl Default for VegasA {
    fn default() -> Self {
        Self::new(VegasConfig::default())
    }
}

/// Vegas congestion control statistics.
/// Vegas 拥塞控制统计信息。
#[derive(Debug, Clone, PartialEq)]
pub struct VegasStats {
    pub alpha: u32,
    pub beta: u32,
    pub gamma: u32,
    pub base_rtt: Option<Duration>,
    pub min_rtt: Option<Duration>,
    pub sample_count: u32,
    pub sampling: bool,
    pub window_right_edge: SequenceNumber32,
    pub previous_throughput: f64,
}

impl std::fmt::Display for VegasStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ms = |rtt: Option<Duration>| rtt.map_or(f64::NAN, |d| d.as_secs_f64() * 1000.0);
        write!(
            f,
            "Vegas[alpha:{}, beta:{}, gamma:{}, base_rtt:{:.1}ms, min_rtt:{:.1}ms, samples:{}, sampling:{}, edge:{}, throughput:{:.0}B/s]",
            self.alpha,
            self.beta,
            self.gamma,
            ms(self.base_rtt),
            ms(self.min_rtt),
            self.sample_count,
            self.sampling,
            self.window_right_edge,
            self.previous_throughput
        )
    }
}
