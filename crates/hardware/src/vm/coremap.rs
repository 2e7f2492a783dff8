//! Physical Frame Table (Coremap).
//!
//! The coremap records, for every physical frame, which address space and
//! virtual page currently occupy it. It is the machine-wide frame allocator:
//! free frames are handed out first, and once memory is full a victim is
//! chosen with a two-pass clock (second-chance) policy.
//!
//! Owners are referred to by [`SpaceId`] only; the reference and dirty bits
//! live in the owners' translation entries and are reached through
//! [`ReferenceBits`].

use super::SpaceId;

/// Occupant of a physical frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameOwner {
    /// Address space the frame belongs to.
    pub space: SpaceId,
    /// Virtual page mapped to the frame.
    pub vpn: u32,
}

/// Access to the `used`/`dirty` bits of the mapping that occupies a frame.
pub trait ReferenceBits {
    /// Returns `(used, dirty)` for the mapping `owner` holds in `frame`.
    fn bits(&mut self, frame: u32, owner: FrameOwner) -> (bool, bool);

    /// Clears the `used` bit of the mapping `owner` holds in `frame`.
    fn clear_used(&mut self, frame: u32, owner: FrameOwner);
}

/// Frame table with clock victim selection.
#[derive(Clone, Debug)]
pub struct Coremap {
    frames: Vec<Option<FrameOwner>>,
    last_victim: usize,
}

impl Coremap {
    /// Creates a table of `num_frames` free frames.
    pub fn new(num_frames: u32) -> Self {
        let n = num_frames as usize;
        Self {
            frames: vec![None; n],
            last_victim: n.saturating_sub(1),
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` for a table without frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of unclaimed frames.
    pub fn free_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_none()).count()
    }

    /// Current occupant of `frame`.
    pub fn owner(&self, frame: u32) -> Option<FrameOwner> {
        self.frames.get(frame as usize).copied().flatten()
    }

    /// Claims the lowest free frame for `(space, vpn)`.
    pub fn allocate(&mut self, space: SpaceId, vpn: u32) -> Option<u32> {
        let idx = self.frames.iter().position(Option::is_none)?;
        self.frames[idx] = Some(FrameOwner { space, vpn });
        Some(idx as u32)
    }

    /// Hands `frame` to `(space, vpn)`, replacing any previous occupant.
    pub fn assign(&mut self, frame: u32, space: SpaceId, vpn: u32) {
        if let Some(slot) = self.frames.get_mut(frame as usize) {
            *slot = Some(FrameOwner { space, vpn });
        }
    }

    /// Marks `frame` free.
    pub fn release(&mut self, frame: u32) {
        if let Some(slot) = self.frames.get_mut(frame as usize) {
            *slot = None;
        }
    }

    /// Frames currently held by `space`.
    pub fn frames_of(&self, space: SpaceId) -> Vec<u32> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_some_and(|o| o.space == space))
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Chooses the frame to evict.
    ///
    /// Scans at most two full passes starting just after the previous victim:
    /// 1. Frames with `used` set get it cleared and are skipped; the first
    ///    frame that is neither used nor dirty is chosen.
    /// 2. The first frame that is not dirty is chosen.
    ///
    /// If every frame is dirty the first frame of the scan is chosen, and the
    /// caller writes it back before reuse. A free frame is returned as soon as
    /// it is seen. Returns `None` only for an empty table.
    pub fn select_victim(&mut self, bits: &mut dyn ReferenceBits) -> Option<u32> {
        let n = self.frames.len();
        if n == 0 {
            return None;
        }
        let start = (self.last_victim + 1) % n;
        let order = || (0..n).map(move |i| (start + i) % n);

        let mut pick = None;
        for i in order() {
            let Some(owner) = self.frames[i] else {
                pick = Some(i);
                break;
            };
            let frame = i as u32;
            let (used, dirty) = bits.bits(frame, owner);
            if used {
                bits.clear_used(frame, owner);
            } else if !dirty {
                pick = Some(i);
                break;
            }
        }
        if pick.is_none() {
            pick = order().find(|&i| {
                self.frames[i].is_none_or(|owner| !bits.bits(i as u32, owner).1)
            });
        }
        let victim = pick.unwrap_or(start);

        self.last_victim = victim;
        Some(victim as u32)
    }
}
