//! The workload submitter.
//!
//! Supplies the pending queue: every materialized unit arrives at the
//! first tick, followed by an end-of-stream marker so the simulator can
//! distinguish a clean drain from starvation.

use fleet_core::PodUnit;

#[derive(Debug, Clone)]
pub enum SubmitEvent {
    Submit(PodUnit),
    EndOfStream,
}

#[derive(Debug)]
pub struct Submitter {
    units: Vec<PodUnit>,
    drained: bool,
}

impl Submitter {
    pub fn new(units: &[PodUnit]) -> Submitter {
        Submitter {
            units: units.to_vec(),
            drained: false,
        }
    }

    /// Events for the current tick. The first poll hands over the whole
    /// workload and closes the stream; later polls are empty.
    pub fn poll(&mut self) -> Vec<SubmitEvent> {
        if self.drained {
            return Vec::new();
        }
        self.drained = true;
        self.units
            .drain(..)
            .map(SubmitEvent::Submit)
            .chain(std::iter::once(SubmitEvent::EndOfStream))
            .collect()
    }
}
