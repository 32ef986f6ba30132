//! 拥塞控制器读写的连接状态。
//! The per-connection state that congestion controllers read and modify.
//!
//! The owning transport state machine keeps this up to date; controllers
//! only touch the window fields.

use crate::config::CongestionControlConfig;
use crate::sequence::SequenceNumber32;

/// The congestion state of a connection, as driven by the transport's loss
/// detection.
///
/// 连接的拥塞状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcpCongState {
    /// Normal operation. A connection enters this state when it is
    /// established, after a retransmission timeout has been recovered, on
    /// exit from fast recovery and when an idle connection restarts.
    /// 正常状态。
    Open,
    /// Duplicate ACKs or SACKs have been seen.
    /// 收到了重复 ACK 或 SACK。
    Disorder,
    /// The window is being reduced in response to an ECN echo.
    /// 因 ECN 回显而缩减窗口。
    Cwr,
    /// Fast retransmit and fast recovery are in progress.
    /// 快速重传与快速恢复进行中。
    Recovery,
    /// A retransmission timeout fired.
    /// 发生了重传超时。
    Loss,
}

impl TcpCongState {
    /// Whether the connection may grow its window in this state.
    pub fn allows_window_growth(self) -> bool {
        matches!(self, Self::Open | Self::Disorder)
    }
}

/// Connection state shared between the transport and its congestion
/// controller.
///
/// 传输层与拥塞控制器之间共享的连接状态。
#[derive(Debug, Clone, PartialEq)]
pub struct TcpSocketState {
    /// Maximum segment size in bytes.
    pub segment_size: u32,
    /// Congestion window in bytes.
    pub cwnd: u32,
    /// Slow start threshold in bytes.
    pub ssthresh: u32,
    /// Segments acked towards the next congestion avoidance increment.
    pub cwnd_count: u32,
    pub cong_state: TcpCongState,
    /// The next sequence number to be sent.
    pub next_tx_sequence: SequenceNumber32,
    /// The highest sequence number ever sent.
    pub high_tx_mark: SequenceNumber32,
    /// The highest cumulatively acknowledged sequence number.
    pub last_acked_seq: SequenceNumber32,
    pub bytes_in_flight: u32,
}

impl TcpSocketState {
    /// Creates the state of a freshly opened connection.
    ///
    /// 创建新打开连接的状态。
    pub fn new(config: &CongestionControlConfig) -> Self {
        Self {
            segment_size: config.segment_size,
            cwnd: config
                .initial_cwnd_segments
                .saturating_mul(config.segment_size),
            ssthresh: config.initial_ssthresh,
            cwnd_count: 0,
            cong_state: TcpCongState::Open,
            next_tx_sequence: SequenceNumber32::default(),
            high_tx_mark: SequenceNumber32::default(),
            last_acked_seq: SequenceNumber32::default(),
            bytes_in_flight: 0,
        }
    }

    pub fn cwnd_in_segments(&self) -> u32 {
        self.cwnd / self.segment_size.max(1)
    }

    pub fn set_cwnd_in_segments(&mut self, segments: u32) {
        self.cwnd = segments.saturating_mul(self.segment_size);
    }

    pub fn in_slow_start(&self) -> bool {
        self.cwnd < self.ssthresh
    }

    /// Records `bytes` of new data leaving the sender.
    ///
    /// 记录发送方发出了 `bytes` 字节的新数据。
    pub fn on_segment_sent(&mut self, bytes: u32) {
        self.next_tx_sequence += bytes;
        if self.next_tx_sequence > self.high_tx_mark {
            self.high_tx_mark = self.next_tx_sequence;
        }
        self.bytes_in_flight = self.bytes_in_flight.saturating_add(bytes);
    }

    /// Records a cumulative acknowledgment of `bytes` more data.
    ///
    /// 记录对 `bytes` 字节新数据的累计确认。
    pub fn on_segment_acked(&mut self, bytes: u32) {
        self.last_acked_seq += bytes;
        self.bytes_in_flight = self.bytes_in_flight.saturating_sub(bytes);
    }
}
