use gloam_map::Mode;
use std::collections::VecDeque;

/// Input-derived intents, queued by the input layer and drained once per
/// step. Drags bypass the queue; they mutate synchronously for immediate
/// feedback.
pub enum Event {
    ModeSet { mode: Mode },
    EditClicked { x: f32, y: f32 },
    WallFinishRequested { x: f32, y: f32 },
    PlayBurst { x: f32, y: f32, count: u32 },
    DeletePressed,
    WallsClearRequested,
    FogResetRequested,
}

impl Event {
    pub fn label(&self) -> &'static str {
        match self {
            Event::ModeSet { .. } => "ModeSet",
            Event::EditClicked { .. } => "EditClicked",
            Event::WallFinishRequested { .. } => "WallFinishRequested",
            Event::PlayBurst { .. } => "PlayBurst",
            Event::DeletePressed => "DeletePressed",
            Event::WallsClearRequested => "WallsClearRequested",
            Event::FogResetRequested => "FogResetRequested",
        }
    }
}

pub struct EventEnvelope {
    pub id: u64,
    pub kind: Event,
}

/// FIFO intent queue with wrapping non-zero ids.
pub struct EventQueue {
    q: VecDeque<EventEnvelope>,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            q: VecDeque::new(),
            next_id: 1,
        }
    }

    pub fn emit(&mut self, kind: Event) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.q.push_back(EventEnvelope { id, kind });
        id
    }

    pub fn pop(&mut self) -> Option<EventEnvelope> {
        self.q.pop_front()
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }
}
