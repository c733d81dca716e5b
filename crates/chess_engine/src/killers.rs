use chess_core::MoveKey;

/// Two quiet moves per ply that recently caused a beta cutoff.
#[derive(Debug, Clone, Default)]
pub struct KillerTable {
    slots: Vec<[Option<MoveKey>; 2]>,
}

impl KillerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cutoff move, most recent first. Re-recording the current
    /// first slot leaves the table unchanged.
    pub fn record(&mut self, ply: usize, mv: MoveKey) {
        if self.slots.len() <= ply {
            self.slots.resize(ply + 1, [None, None]);
        }
        let killers = &mut self.slots[ply];
        if killers[0] != Some(mv) {
            killers[1] = killers[0];
            killers[0] = Some(mv);
        }
    }

    pub fn get(&self, ply: usize) -> [Option<MoveKey>; 2] {
        self.slots.get(ply).copied().unwrap_or([None, None])
    }

    /// 0 for the newest killer, 1 for the older one.
    pub fn rank(&self, ply: usize, mv: &MoveKey) -> Option<usize> {
        self.get(ply).iter().position(|slot| slot.as_ref() == Some(mv))
    }
}
