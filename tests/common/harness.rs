//! tests/common/harness.rs
use std::collections::VecDeque;
use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;
use vegas_a::{CongestionOps, Config, TcpCongState, TcpSocketState};

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "vegas_a=info".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::FULL)
            .with_test_writer()
            .init();
    });
}

/// A single bottleneck link. Every segment in flight beyond the
/// bandwidth-delay product waits in the bottleneck queue and adds
/// `per_segment_delay` to the round trip.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub base_rtt: Duration,
    pub per_segment_delay: Duration,
    pub bdp_segments: usize,
}

impl Default for Link {
    /// 100ms propagation delay, 200 segments/s: a 20-segment pipe.
    fn default() -> Self {
        Self {
            base_rtt: Duration::from_millis(100),
            per_segment_delay: Duration::from_millis(5),
            bdp_segments: 20,
        }
    }
}

/// Drives a congestion controller the way a TCP sender would: ack-clocked,
/// one segment per acknowledgment, refilling the window after every ack.
pub struct TestHarness<C: CongestionOps> {
    pub tcb: TcpSocketState,
    pub cc: C,
    link: Link,
    /// RTT each outstanding segment will see, oldest first.
    in_flight: VecDeque<Duration>,
}

impl<C: CongestionOps> TestHarness<C> {
    /// Opens a connection: the controller sees the establishment transition
    /// before any data is sent.
    pub fn new(cc: C, config: &Config, link: Link) -> Self {
        init_tracing();
        let mut harness = Self {
            tcb: TcpSocketState::new(&config.congestion_control),
            cc,
            link,
            in_flight: VecDeque::new(),
        };
        harness.set_state(TcpCongState::Open);
        harness
    }

    pub fn cwnd_segments(&self) -> u32 {
        self.tcb.cwnd_in_segments()
    }

    pub fn in_flight_segments(&self) -> usize {
        self.in_flight.len()
    }

    fn segment_size(&self) -> u32 {
        self.tcb.segment_size
    }

    fn fill_window(&mut self) {
        let seg = self.segment_size();
        while self.tcb.bytes_in_flight + seg <= self.tcb.cwnd {
            let queued = (self.in_flight.len() + 1).saturating_sub(self.link.bdp_segments);
            let rtt = self.link.base_rtt + self.link.per_segment_delay * queued as u32;
            self.tcb.on_segment_sent(seg);
            self.in_flight.push_back(rtt);
        }
    }

    fn ack_oldest(&mut self) -> bool {
        let Some(rtt) = self.in_flight.pop_front() else {
            return false;
        };
        let seg = self.segment_size();
        self.tcb.on_segment_acked(seg);
        self.cc.on_ack(&mut self.tcb, 1, rtt);
        if self.tcb.cong_state.allows_window_growth() {
            self.cc.adjust_window(&mut self.tcb, 1);
        }
        true
    }

    /// Processes one acknowledgment and sends whatever the window allows.
    pub fn step(&mut self) {
        self.fill_window();
        self.ack_oldest();
        self.fill_window();
    }

    pub fn run(&mut self, acks: usize) {
        for _ in 0..acks {
            self.step();
        }
    }

    /// Runs `acks` steps, handing the window size after each one to `check`.
    pub fn run_and_check(&mut self, acks: usize, mut check: impl FnMut(&Self)) {
        for _ in 0..acks {
            self.step();
            check(self);
        }
    }

    /// Moves the connection to `state`, telling the controller first.
    pub fn set_state(&mut self, state: TcpCongState) {
        self.cc.on_congestion_state_change(&mut self.tcb, state);
        self.tcb.cong_state = state;
    }

    /// A retransmission timeout: the window collapses to one segment.
    pub fn retransmission_timeout(&mut self) {
        self.set_state(TcpCongState::Loss);
        self.tcb.ssthresh = self
            .cc
            .slow_start_threshold(&self.tcb, self.tcb.bytes_in_flight);
        self.tcb.cwnd = self.segment_size();
        self.tcb.cwnd_count = 0;
    }

    /// Triple duplicate ack: the window drops to the new threshold.
    pub fn enter_fast_recovery(&mut self) {
        self.set_state(TcpCongState::Recovery);
        self.tcb.ssthresh = self
            .cc
            .slow_start_threshold(&self.tcb, self.tcb.bytes_in_flight);
        self.tcb.cwnd = self.tcb.ssthresh;
    }

    /// Leaves loss or recovery once outstanding data has been acked.
    pub fn recover(&mut self) {
        self.set_state(TcpCongState::Open);
    }

    /// Stops sending and lets every outstanding segment be acked.
    pub fn go_idle(&mut self) {
        while self.ack_oldest() {}
    }

    /// Hands a copy of this connection's controller and state to a new
    /// connection, as a listener does for an accepted one.
    pub fn fork(&self) -> TestHarness<Box<dyn CongestionOps>> {
        TestHarness {
            tcb: self.tcb.clone(),
            cc: self.cc.duplicate(),
            link: self.link,
            in_flight: self.in_flight.clone(),
        }
    }
}
