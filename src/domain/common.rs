/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

impl Identifiable for super::record::WeighRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for super::record::WeighRecord {
    fn display_label(&self) -> String {
        format!("{} · {} กก.", self.ticket_number, self.net_weight_kg)
    }
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;
