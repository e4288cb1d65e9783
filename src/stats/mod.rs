//! @acp:module "Dataset Statistics"
//! @acp:summary "Summary statistics over a bridge_summary.json dataset"
//! @acp:domain dataset
//! @acp:layer service

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::model::BridgeRecord;

/// @acp:summary "Per bridge type aggregates"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStats {
    pub count: usize,
    pub mean_span_m: f64,
    pub min_span_m: f64,
    pub max_span_m: f64,
    pub mean_depth_of_girder: f64,
    pub mean_total_length_m: f64,
}

/// @acp:summary "Aggregates over a whole dataset"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub count: usize,
    pub by_bridge_type: BTreeMap<String, usize>,
    pub by_pier_type: BTreeMap<String, usize>,
    pub by_cross_section: BTreeMap<String, usize>,
    pub by_num_spans: BTreeMap<u32, usize>,
    pub by_lanes: BTreeMap<u32, usize>,
    pub mean_total_length_m: f64,
    pub mean_width_m: f64,
    pub mean_total_piers: f64,
    pub mean_piers_by_pier_type: BTreeMap<String, f64>,
    pub per_bridge_type: BTreeMap<String, TypeStats>,
    /// bridge type -> pier type -> count
    pub type_pier_crosstab: BTreeMap<String, BTreeMap<String, usize>>,
    /// Pearson correlation of span and girder depth
    pub span_depth_correlation: Option<f64>,
}

fn total_piers(record: &BridgeRecord) -> u64 {
    record.total_piers.map(u64::from).unwrap_or_else(|| {
        let along = record
            .number_of_piers_along_length
            .unwrap_or_else(|| record.num_spans.saturating_sub(1));
        u64::from(along) * u64::from(record.number_of_piers_across_width.unwrap_or(0))
    })
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }
    let mx = mean(xs.iter().copied());
    let my = mean(ys.iter().copied());
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

impl DatasetStats {
    /// @acp:summary "Compute statistics from persisted records"
    pub fn from_records(records: &[BridgeRecord]) -> Self {
        let mut by_bridge_type = BTreeMap::new();
        let mut by_pier_type = BTreeMap::new();
        let mut by_cross_section = BTreeMap::new();
        let mut by_num_spans = BTreeMap::new();
        let mut by_lanes = BTreeMap::new();
        let mut crosstab: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let mut grouped: BTreeMap<&str, Vec<&BridgeRecord>> = BTreeMap::new();
        let mut piers_by_type: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

        for r in records {
            *by_bridge_type.entry(r.bridge_type.clone()).or_insert(0) += 1;
            *by_pier_type.entry(r.pier_type.clone()).or_insert(0) += 1;
            *by_cross_section.entry(r.pier_cross_section.clone()).or_insert(0) += 1;
            *by_num_spans.entry(r.num_spans).or_insert(0) += 1;
            *by_lanes.entry(r.lanes).or_insert(0) += 1;
            *crosstab
                .entry(r.bridge_type.clone())
                .or_default()
                .entry(r.pier_type.clone())
                .or_insert(0) += 1;
            grouped.entry(r.bridge_type.as_str()).or_default().push(r);
            piers_by_type
                .entry(r.pier_type.as_str())
                .or_default()
                .push(total_piers(r) as f64);
        }

        let per_bridge_type = grouped
            .into_iter()
            .map(|(name, group)| {
                let spans: Vec<f64> = group.iter().map(|r| r.span_m).collect();
                let stats = TypeStats {
                    count: group.len(),
                    mean_span_m: mean(spans.iter().copied()),
                    min_span_m: spans.iter().copied().fold(f64::INFINITY, f64::min),
                    max_span_m: spans.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    mean_depth_of_girder: mean(group.iter().map(|r| r.depth_of_girder)),
                    mean_total_length_m: mean(group.iter().map(|r| r.total_length_m)),
                };
                (name.to_string(), stats)
            })
            .collect();

        let spans: Vec<f64> = records.iter().map(|r| r.span_m).collect();
        let depths: Vec<f64> = records.iter().map(|r| r.depth_of_girder).collect();

        Self {
            count: records.len(),
            by_bridge_type,
            by_pier_type,
            by_cross_section,
            by_num_spans,
            by_lanes,
            mean_total_length_m: mean(records.iter().map(|r| r.total_length_m)),
            mean_width_m: mean(records.iter().map(|r| r.width_m)),
            mean_total_piers: mean(records.iter().map(|r| total_piers(r) as f64)),
            mean_piers_by_pier_type: piers_by_type
                .into_iter()
                .map(|(k, v)| (k.to_string(), mean(v.into_iter())))
                .collect(),
            per_bridge_type,
            type_pier_crosstab: crosstab,
            span_depth_correlation: pearson(&spans, &depths),
        }
    }

    /// @acp:summary "Plain-text report"
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Bridges: {}", self.count);
        if self.count == 0 {
            return out;
        }

        let _ = writeln!(out, "\nBy bridge type:");
        for (name, n) in &self.by_bridge_type {
            let _ = writeln!(out, "  {:<14} {:>5}", name, n);
        }
        let _ = writeln!(out, "\nBy pier type:");
        for (name, n) in &self.by_pier_type {
            let avg = self.mean_piers_by_pier_type.get(name).copied().unwrap_or(0.0);
            let _ = writeln!(out, "  {:<14} {:>5}  (avg {:.1} piers)", name, n, avg);
        }
        let _ = writeln!(out, "\nBy pier cross-section:");
        for (name, n) in &self.by_cross_section {
            let _ = writeln!(out, "  {:<14} {:>5}", name, n);
        }
        let _ = writeln!(out, "\nBy number of spans:");
        for (spans, n) in &self.by_num_spans {
            let _ = writeln!(out, "  {:<14} {:>5}", spans, n);
        }

        let _ = writeln!(out, "\nMean total length: {:.1} m", self.mean_total_length_m);
        let _ = writeln!(out, "Mean width:        {:.2} m", self.mean_width_m);
        let _ = writeln!(out, "Mean total piers:  {:.1}", self.mean_total_piers);
        if let Some(r) = self.span_depth_correlation {
            let _ = writeln!(out, "Span/depth correlation: {:.2}", r);
        }

        let _ = writeln!(out, "\nPer bridge type:");
        for (name, s) in &self.per_bridge_type {
            let _ = writeln!(
                out,
                "  {:<14} span {:.1} m [{:.1}, {:.1}], depth {:.2} m, length {:.1} m",
                name, s.mean_span_m, s.min_span_m, s.max_span_m, s.mean_depth_of_girder, s.mean_total_length_m
            );
        }

        let _ = writeln!(out, "\nBridge type x pier type:");
        for (bridge, row) in &self.type_pier_crosstab {
            let cells: Vec<String> = row.iter().map(|(p, n)| format!("{}={}", p, n)).collect();
            let _ = writeln!(out, "  {:<14} {}", bridge, cells.join(", "));
        }
        out
    }
}
