//! Gauge tables and the per-pass sample buffer
//!
//! Each collector declares its metrics once as a table of [`GaugeDef`]s. A
//! collection pass pushes [`Sample`]s into its own [`SampleSink`]; the table
//! then turns those samples into metric families for the registry. Nothing
//! here is shared between passes except the immutable table.

use prometheus::core::Desc;
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, Opts};
use std::collections::HashMap;
use tracing::warn;

/// Name, help text and ordered label keys of one gauge family
#[derive(Debug, Clone, Copy)]
pub struct GaugeDef {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

impl GaugeDef {
    pub const fn new(name: &'static str, help: &'static str, labels: &'static [&'static str]) -> Self {
        Self { name, help, labels }
    }
}

/// One labelled gauge value produced during a collection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: &'static str,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl Sample {
    /// Value of a label by key
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }
}

/// Pass-local buffer that collectors write samples into
#[derive(Debug, Default)]
pub struct SampleSink {
    samples: Vec<Sample>,
}

impl SampleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a gauge value; `label_values` follow the order of `def.labels`
    pub fn gauge(&mut self, def: &GaugeDef, label_values: &[&str], value: f64) {
        debug_assert_eq!(
            def.labels.len(),
            label_values.len(),
            "label count mismatch for {}",
            def.name
        );

        let labels = def
            .labels
            .iter()
            .zip(label_values)
            .map(|(key, value)| (*key, (*value).to_string()))
            .collect();

        self.samples.push(Sample {
            name: def.name,
            labels,
            value,
        });
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

/// Immutable descriptor table built when a collector is constructed
#[derive(Debug)]
pub struct GaugeTable {
    defs: Vec<GaugeDef>,
    descs: Vec<Desc>,
}

impl GaugeTable {
    /// Validate every definition and build its descriptor
    pub fn new(defs: &[&GaugeDef]) -> prometheus::Result<Self> {
        let defs: Vec<GaugeDef> = defs.iter().map(|def| **def).collect();

        let descs = defs
            .iter()
            .map(|def| {
                Desc::new(
                    def.name.to_string(),
                    def.help.to_string(),
                    def.labels.iter().map(|l| l.to_string()).collect(),
                    HashMap::new(),
                )
            })
            .collect::<prometheus::Result<Vec<_>>>()?;

        Ok(Self { defs, descs })
    }

    pub fn descs(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    /// Convert one pass worth of samples into metric families.
    ///
    /// Families without samples are left out. Samples whose name is not in the
    /// table are dropped.
    pub fn families(&self, samples: &[Sample]) -> Vec<MetricFamily> {
        let mut families = Vec::new();

        for def in &self.defs {
            let mut matching = samples.iter().filter(|s| s.name == def.name).peekable();
            if matching.peek().is_none() {
                continue;
            }

            let gauges = match GaugeVec::new(Opts::new(def.name, def.help), def.labels) {
                Ok(gauges) => gauges,
                Err(e) => {
                    warn!(metric = def.name, error = %e, "Skipping gauge family");
                    continue;
                }
            };

            for sample in matching {
                let values: Vec<&str> = sample.labels.iter().map(|(_, v)| v.as_str()).collect();
                match gauges.get_metric_with_label_values(&values) {
                    Ok(gauge) => gauge.set(sample.value),
                    Err(e) => warn!(metric = def.name, error = %e, "Dropping sample"),
                }
            }

            families.extend(prometheus::core::Collector::collect(&gauges));
        }

        families
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISK: GaugeDef = GaugeDef::new("test_disk_bytes", "Disk usage", &["node_id", "type"]);
    const INFO: GaugeDef = GaugeDef::new("test_info", "Info", &["node_id"]);

    #[test]
    fn test_sink_pairs_labels_with_keys() {
        let mut sink = SampleSink::new();
        sink.gauge(&DISK, &["n1", "used"], 10.0);

        let samples = sink.into_samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].label("node_id"), Some("n1"));
        assert_eq!(samples[0].label("type"), Some("used"));
        assert_eq!(samples[0].label("missing"), None);
    }

    #[test]
    fn test_families_group_by_name() {
        let table = GaugeTable::new(&[&DISK, &INFO]).unwrap();
        assert_eq!(table.descs().len(), 2);

        let mut sink = SampleSink::new();
        sink.gauge(&DISK, &["n1", "used"], 10.0);
        sink.gauge(&DISK, &["n1", "trash"], 2.0);
        sink.gauge(&INFO, &["n1"], 1.0);

        let families = table.families(&sink.into_samples());
        assert_eq!(families.len(), 2);
        assert_eq!(families[0].get_name(), "test_disk_bytes");
        assert_eq!(families[0].get_metric().len(), 2);
        assert_eq!(families[1].get_metric()[0].get_gauge().get_value(), 1.0);
    }

    #[test]
    fn test_families_skip_empty() {
        let table = GaugeTable::new(&[&DISK, &INFO]).unwrap();
        let mut sink = SampleSink::new();
        sink.gauge(&INFO, &["n1"], 1.0);

        let families = table.families(&sink.into_samples());
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].get_name(), "test_info");
    }

    #[test]
    fn test_invalid_name_rejected() {
        const BAD: GaugeDef = GaugeDef::new("bad-name", "Bad", &[]);
        assert!(GaugeTable::new(&[&BAD]).is_err());
    }
}
