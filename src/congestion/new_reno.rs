//! NewReno window growth, the baseline that delay-based controllers fall
//! back to when they have no usable RTT estimate.
//!
//! NewReno 窗口增长，基于延迟的控制器在没有可用 RTT 估计时退回到此基线。

use crate::congestion::CongestionOps;
use crate::socket_state::TcpSocketState;
use tracing::trace;

/// The NewReno congestion controller.
///
/// NewReno 拥塞控制器。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReno;

impl NewReno {
    pub const NAME: &'static str = "TcpNewReno";

    pub fn new() -> Self {
        Self
    }

    /// Grows the window by one segment if any segment was acked and returns
    /// how many acked segments are left over.
    ///
    /// 若有报文段被确认则窗口增加一个报文段，并返回剩余的已确认报文段数。
    pub fn slow_start(&self, tcb: &mut TcpSocketState, segments_acked: u32) -> u32 {
        if segments_acked == 0 {
            return 0;
        }
        tcb.cwnd = tcb.cwnd.saturating_add(tcb.segment_size);
        trace!(
            cwnd = tcb.cwnd,
            ssthresh = tcb.ssthresh,
            "Slow start: cwnd increased"
        );
        segments_acked - 1
    }

    /// Linear growth: about one segment per window's worth of acked segments.
    ///
    /// 线性增长：每确认约一个窗口的报文段，窗口增加一个报文段。
    pub fn congestion_avoidance(&self, tcb: &mut TcpSocketState, segments_acked: u32) {
        if segments_acked == 0 {
            return;
        }
        let w = tcb.cwnd_in_segments().max(1);
        tcb.cwnd_count = tcb.cwnd_count.saturating_add(segments_acked);
        if tcb.cwnd_count >= w {
            let delta = tcb.cwnd_count / w;
            tcb.cwnd_count -= delta * w;
            tcb.cwnd = tcb
                .cwnd
                .saturating_add(delta.saturating_mul(tcb.segment_size));
            trace!(
                cwnd = tcb.cwnd,
                delta_segments = delta,
                "Congestion avoidance: cwnd increased"
            );
        }
    }
}

impl CongestionOps for NewReno {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn adjust_window(&mut self, tcb: &mut TcpSocketState, segments_acked: u32) {
        let mut segments_acked = segments_acked;
        if tcb.in_slow_start() {
            segments_acked = self.slow_start(tcb, segments_acked);
        }
        if !tcb.in_slow_start() {
            self.congestion_avoidance(tcb, segments_acked);
        }
    }

    fn slow_start_threshold(&self, tcb: &TcpSocketState, bytes_in_flight: u32) -> u32 {
        (bytes_in_flight / 2).max(tcb.segment_size.saturating_mul(2))
    }

    fn duplicate(&self) -> Box<dyn CongestionOps> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CongestionControlConfig;

    fn tcb(cwnd_segments: u32, ssthresh: u32) -> TcpSocketState {
        let mut tcb = TcpSocketState::new(&CongestionControlConfig {
            segment_size: 1000,
            initial_cwnd_segments: cwnd_segments,
            initial_ssthresh: ssthresh,
        });
        tcb.cwnd_count = 0;
        tcb
    }

    #[test]
    fn test_slow_start_adds_one_segment_per_call() {
        let mut reno = NewReno::new();
        let mut tcb = tcb(2, 100_000);

        reno.adjust_window(&mut tcb, 1);
        assert_eq!(tcb.cwnd, 3000);

        // Slow start consumes only one acked segment per call.
        reno.adjust_window(&mut tcb, 3);
        assert_eq!(tcb.cwnd, 4000);
    }

    #[test]
    fn test_slow_start_hands_leftover_to_congestion_avoidance() {
        let mut reno = NewReno::new();
        let mut tcb = tcb(4, 5000);

        // Slow start lifts cwnd to ssthresh, the remaining 3 segments count
        // towards the next linear increment.
        reno.adjust_window(&mut tcb, 4);
        assert_eq!(tcb.cwnd, 5000);
        assert_eq!(tcb.cwnd_count, 3);
    }

    #[test]
    fn test_congestion_avoidance_linear_increase() {
        let mut reno = NewReno::new();
        let mut tcb = tcb(10, 1000);

        for _ in 0..9 {
            reno.adjust_window(&mut tcb, 1);
        }
        assert_eq!(tcb.cwnd, 10_000);

        reno.adjust_window(&mut tcb, 1);
        assert_eq!(tcb.cwnd, 11_000);
        assert_eq!(tcb.cwnd_count, 0);
    }

    #[test]
    fn test_zero_segments_acked_is_a_no_op() {
        let mut reno = NewReno::new();
        let mut slow = tcb(2, 100_000);
        let mut avoid = tcb(10, 1000);

        reno.adjust_window(&mut slow, 0);
        reno.adjust_window(&mut avoid, 0);

        assert_eq!(slow.cwnd, 2000);
        assert_eq!(avoid.cwnd, 10_000);
        assert_eq!(avoid.cwnd_count, 0);
    }

    #[test]
    fn test_ssthresh_halves_flight_with_floor() {
        let reno = NewReno::new();
        let tcb = tcb(10, u32::MAX);

        assert_eq!(reno.slow_start_threshold(&tcb, 20_000), 10_000);
        assert_eq!(reno.slow_start_threshold(&tcb, 1_000), 2_000);
    }

    #[test]
    fn test_ssthresh_floor_saturates_for_huge_segments() {
        let reno = NewReno::new();
        let mut tcb = tcb(10, u32::MAX);
        tcb.segment_size = u32::MAX / 2 + 1;

        assert_eq!(reno.slow_start_threshold(&tcb, 20_000), u32::MAX);
    }
}
