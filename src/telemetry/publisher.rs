//! Snapshot publisher.
//!
//! On every publish tick the publisher captures the tracker's three values
//! and writes each one to its channel.  Unchanged values are sent again;
//! there is no delta compression and nothing is carried between ticks.

use log::debug;

use crate::app::ports::TelemetrySink;
use crate::config::{ChannelConfig, ChannelSet};
use crate::monitor::RunStateTracker;

use super::{ChannelId, PublishedSnapshot};

pub struct SnapshotPublisher {
    channels: ChannelSet,
    published: u64,
    rejected: u64,
}

impl SnapshotPublisher {
    pub fn new(channels: ChannelSet) -> Self {
        Self {
            channels,
            published: 0,
            rejected: 0,
        }
    }

    /// Send the full current snapshot.  Returns the snapshot and how many of
    /// the three writes the sink refused.
    pub fn publish(
        &mut self,
        tracker: &RunStateTracker,
        sink: &mut impl TelemetrySink,
    ) -> (PublishedSnapshot, u8) {
        let snapshot = PublishedSnapshot::capture(tracker);
        let mut rejected = 0u8;

        for id in ChannelId::ALL {
            let channel = self.channel(id);
            if let Err(e) = sink.publish(channel, snapshot.value(id)) {
                debug!("publish {} dropped: {}", channel.path, e);
                rejected += 1;
            }
        }

        self.published += 1;
        self.rejected += u64::from(rejected);
        (snapshot, rejected)
    }

    pub fn channel(&self, id: ChannelId) -> &ChannelConfig {
        match id {
            ChannelId::PumpState => &self.channels.pump_state,
            ChannelId::RunCount => &self.channels.run_count,
            ChannelId::LastRunDuration => &self.channels.last_run_duration,
        }
    }

    /// Publish ticks handled since boot.
    pub fn published_count(&self) -> u64 {
        self.published
    }

    /// Individual channel writes the sink refused since boot.
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }
}
