//! Hand-off of finished chart descriptions to whatever draws them.
//!
//! The binder never draws. A [`ChartSink`] receives each [`ChartSpec`] as
//! it is produced; [`JsonFileSink`] writes one `<id>.json` per chart for a
//! front-end to pick up.

use crate::chart::ChartSpec;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub trait ChartSink {
    fn render(&mut self, chart: &ChartSpec) -> io::Result<()>;

    fn render_all<'c>(&mut self, charts: impl IntoIterator<Item = &'c ChartSpec>) -> io::Result<usize>
    where
        Self: Sized,
    {
        let mut count = 0;
        for chart in charts {
            self.render(chart)?;
            count += 1;
        }
        Ok(count)
    }
}

/// Writes each chart as pretty-printed JSON under `dir`, replacing any
/// earlier file for the same id.
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl ChartSink for JsonFileSink {
    fn render(&mut self, chart: &ChartSpec) -> io::Result<()> {
        let path = self.path_for(&chart.id);
        let json = serde_json::to_string_pretty(chart)?;
        fs::write(&path, json)?;
        log::debug!("[CVD] render: wrote {}", path.display());
        Ok(())
    }
}

/// Keeps every chart it receives, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub charts: Vec<ChartSpec>,
}

impl ChartSink for MemorySink {
    fn render(&mut self, chart: &ChartSpec) -> io::Result<()> {
        self.charts.push(chart.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use cvd_data::Table;

    fn chart(id: &str) -> ChartSpec {
        ChartSpec::new(id, ChartKind::Bar, Table::new(["WHO Region", "Deaths"]))
    }

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::default();
        let charts = [chart("fig2_1"), chart("fig2_3")];
        assert_eq!(sink.render_all(&charts).unwrap(), 2);
        let ids: Vec<&str> = sink.charts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["fig2_1", "fig2_3"]);
    }

    #[test]
    fn json_sink_writes_one_file_per_chart() {
        let dir = std::env::temp_dir().join(format!("cvd-render-{}", std::process::id()));
        let mut sink = JsonFileSink::new(&dir).unwrap();
        sink.render(&chart("fig2_1")).unwrap();
        let written = fs::read_to_string(sink.path_for("fig2_1")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["id"], "fig2_1");
        assert_eq!(json["kind"], "bar");
        fs::remove_dir_all(&dir).unwrap();
    }
}
