//! Latest-packet store shared between the receive and tick paths.
//!
//! Writers are serialised by a mutex and publish a complete new
//! [`StoreSnapshot`] by swapping an `Arc`; readers clone the `Arc` and never
//! observe a half-applied packet.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use livetiming_telemetry_f1::{
    CarStatusPacket, LapDataPacket, LapRecord, NUM_CARS, Packet, PacketHeader, PacketId,
    ParticipantsPacket, SessionHistoryPacket, SessionPacket,
};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Immutable view of everything the store holds at one instant.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    session_uid: Option<u64>,
    last_header: Option<PacketHeader>,
    latest: BTreeMap<PacketId, Arc<Packet>>,
    histories: BTreeMap<u8, Arc<SessionHistoryPacket>>,
    packets_applied: u64,
}

impl StoreSnapshot {
    fn for_session(session_uid: u64) -> Self {
        Self {
            session_uid: Some(session_uid),
            ..Self::default()
        }
    }

    pub fn session_uid(&self) -> Option<u64> {
        self.session_uid
    }

    /// Header of the most recently applied packet of any kind.
    pub fn last_header(&self) -> Option<&PacketHeader> {
        self.last_header.as_ref()
    }

    /// Packets applied since the current session started.
    pub fn packets_applied(&self) -> u64 {
        self.packets_applied
    }

    /// Latest packet of `kind`. Session History is kept per car, see
    /// [`StoreSnapshot::session_history`].
    pub fn latest(&self, kind: PacketId) -> Option<&Packet> {
        self.latest.get(&kind).map(Arc::as_ref)
    }

    pub fn session(&self) -> Option<&SessionPacket> {
        match self.latest(PacketId::Session)? {
            Packet::Session(p) => Some(p),
            _ => None,
        }
    }

    pub fn lap_data(&self) -> Option<&LapDataPacket> {
        match self.latest(PacketId::LapData)? {
            Packet::LapData(p) => Some(p),
            _ => None,
        }
    }

    pub fn participants(&self) -> Option<&ParticipantsPacket> {
        match self.latest(PacketId::Participants)? {
            Packet::Participants(p) => Some(p),
            _ => None,
        }
    }

    pub fn car_status(&self) -> Option<&CarStatusPacket> {
        match self.latest(PacketId::CarStatus)? {
            Packet::CarStatus(p) => Some(p),
            _ => None,
        }
    }

    /// Latest history for `car_index`.
    pub fn session_history(&self, car_index: u8) -> Option<&SessionHistoryPacket> {
        self.histories.get(&car_index).map(Arc::as_ref)
    }

    /// The player's car index as reported in the latest header.
    pub fn player_car_index(&self) -> Option<u8> {
        self.last_header.map(|h| h.player_car_index)
    }

    /// Car the pit line and history follow: the spectated car while
    /// spectating, otherwise the player's car.
    pub fn tracked_car_index(&self) -> Option<u8> {
        if let Some(session) = self.session()
            && session.session.is_spectating
            && usize::from(session.session.spectator_car_index) < NUM_CARS
        {
            return Some(session.session.spectator_car_index);
        }
        self.player_car_index()
            .filter(|&index| usize::from(index) < NUM_CARS)
    }

    /// Lap record of the tracked car.
    pub fn tracked_lap(&self) -> Option<&LapRecord> {
        let index = self.tracked_car_index()?;
        self.lap_data()?.car(usize::from(index))
    }

    fn apply(&mut self, packet: Packet) {
        let header = *packet.header();
        match packet {
            Packet::SessionHistory(history) => {
                self.histories.insert(history.car_idx, Arc::new(history));
            }
            other => {
                self.latest.insert(header.packet_id, Arc::new(other));
            }
        }
        self.last_header = Some(header);
        self.packets_applied = self.packets_applied.saturating_add(1);
    }
}

#[derive(Debug, Default)]
struct WriterState {
    retired: HashSet<u64>,
    frame_watermarks: BTreeMap<PacketId, u32>,
}

/// Thread-safe holder of the latest decoded packets.
#[derive(Debug, Default)]
pub struct TelemetryStore {
    current: RwLock<Arc<StoreSnapshot>>,
    writer: Mutex<WriterState>,
}

impl TelemetryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Apply one decoded packet.
    ///
    /// # Errors
    ///
    /// [`StoreError::SessionMismatch`] for a packet from a session the store
    /// already left, [`StoreError::StaleFrame`] for a frame older than the
    /// last one accepted for the same kind. The store is unchanged in both
    /// cases.
    pub fn update(&self, packet: Packet) -> StoreResult<()> {
        let header = *packet.header();
        let mut writer = self.writer.lock();
        let current = self.snapshot();

        let mut next = match current.session_uid {
            Some(uid) if uid == header.session_uid => StoreSnapshot::clone(&current),
            Some(uid) => {
                if writer.retired.contains(&header.session_uid) {
                    return Err(StoreError::session_mismatch(uid, header.session_uid));
                }
                info!(
                    old_session = format_args!("{uid:#018x}"),
                    new_session = format_args!("{:#018x}", header.session_uid),
                    "session changed, resetting store"
                );
                writer.retired.insert(uid);
                writer.frame_watermarks.clear();
                StoreSnapshot::for_session(header.session_uid)
            }
            None => {
                info!(
                    session = format_args!("{:#018x}", header.session_uid),
                    "first session observed"
                );
                StoreSnapshot::for_session(header.session_uid)
            }
        };

        let kind = header.packet_id;
        if let Some(&last_accepted) = writer.frame_watermarks.get(&kind)
            && header.frame_identifier < last_accepted
        {
            debug!(%kind, frame = header.frame_identifier, last_accepted, "stale frame rejected");
            return Err(StoreError::stale_frame(kind, header.frame_identifier, last_accepted));
        }
        writer.frame_watermarks.insert(kind, header.frame_identifier);

        next.apply(packet);
        *self.current.write() = Arc::new(next);
        Ok(())
    }
}
