// Adapters layer: sinks talking to external systems.

pub mod grafana;
