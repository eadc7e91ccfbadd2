use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{RotationEvent, RotationEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, rotation_id: Uuid, kind: RotationEventKind) -> RotationEvent;
    /// Eventos de una rotación en orden ascendente de seq.
    fn list(&self, rotation_id: Uuid) -> Vec<RotationEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: HashMap<Uuid, Vec<RotationEvent>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, rotation_id: Uuid, kind: RotationEventKind) -> RotationEvent {
        let events = self.inner.entry(rotation_id).or_default();
        let ev = RotationEvent { seq: events.len() as u64,
                                 rotation_id,
                                 kind,
                                 ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, rotation_id: Uuid) -> Vec<RotationEvent> {
        self.inner.get(&rotation_id).cloned().unwrap_or_default()
    }
}

impl<S: EventStore + ?Sized> EventStore for &mut S {
    fn append_kind(&mut self, rotation_id: Uuid, kind: RotationEventKind) -> RotationEvent {
        (**self).append_kind(rotation_id, kind)
    }

    fn list(&self, rotation_id: Uuid) -> Vec<RotationEvent> {
        (**self).list(rotation_id)
    }
}
