//! Declarative chart descriptions.
//!
//! A [`ChartSpec`] carries everything the rendering collaborator needs: the
//! chart kind, the data table, which columns map to which visual channels,
//! and the colors. It says nothing about how the chart is drawn.

use crate::palette::ColorMap;
use cvd_core::metric::AxisScale;
use cvd_data::Table;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Area,
    Choropleth,
    Scatter,
    ScatterGeo,
    #[serde(rename = "scatter_3d")]
    Scatter3d,
    Treemap,
    Pie,
    Sunburst,
    Histogram,
}

/// Column → visual channel mapping. Unset channels are omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub y: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Value column of treemaps, pies and sunbursts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    /// Hierarchy of treemaps and sunbursts, outermost first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    /// Country-name column of map charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_frame: Option<String>,
    /// One sub-chart per distinct value of this column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    pub scale: AxisScale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marginal {
    Box,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marginal: Option<Marginal>,
}

/// A dated vertical annotation line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VLine {
    pub date: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub data: Table,
    pub encoding: Encoding,
    #[serde(skip_serializing_if = "ColorMap::is_empty")]
    pub color_map: ColorMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub color_sequence: Vec<String>,
    /// Name of a continuous color scale, for value-colored charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<String>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vlines: Vec<VLine>,
    /// Whether the chart offers its own linear/log switch for the y axis.
    pub scale_toggle: bool,
}

impl ChartSpec {
    pub fn new(id: &str, kind: ChartKind, data: Table) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: None,
            data,
            encoding: Encoding::default(),
            color_map: ColorMap::new(),
            color_sequence: Vec::new(),
            color_scale: None,
            x_axis: Axis::default(),
            y_axis: Axis::default(),
            histogram: None,
            vlines: Vec::new(),
            scale_toggle: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn x(mut self, column: &str) -> Self {
        self.encoding.x = Some(column.to_string());
        self
    }

    pub fn y<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.encoding.y = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn z(mut self, column: &str) -> Self {
        self.encoding.z = Some(column.to_string());
        self
    }

    pub fn color(mut self, column: &str) -> Self {
        self.encoding.color = Some(column.to_string());
        self
    }

    pub fn size(mut self, column: &str) -> Self {
        self.encoding.size = Some(column.to_string());
        self
    }

    pub fn text(mut self, column: &str) -> Self {
        self.encoding.text = Some(column.to_string());
        self
    }

    pub fn values(mut self, column: &str) -> Self {
        self.encoding.values = Some(column.to_string());
        self
    }

    pub fn path(mut self, columns: &[&str]) -> Self {
        self.encoding.path = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn locations(mut self, column: &str) -> Self {
        self.encoding.locations = Some(column.to_string());
        self
    }

    pub fn hover_name(mut self, column: &str) -> Self {
        self.encoding.hover_name = Some(column.to_string());
        self
    }

    pub fn animation_frame(mut self, column: &str) -> Self {
        self.encoding.animation_frame = Some(column.to_string());
        self
    }

    pub fn facet(mut self, column: &str) -> Self {
        self.encoding.facet = Some(column.to_string());
        self
    }

    pub fn color_map(mut self, map: ColorMap) -> Self {
        self.color_map = map;
        self
    }

    pub fn color_sequence(mut self, colors: Vec<String>) -> Self {
        self.color_sequence = colors;
        self
    }

    pub fn color_scale(mut self, name: &str) -> Self {
        self.color_scale = Some(name.to_string());
        self
    }

    pub fn x_scale(mut self, scale: AxisScale) -> Self {
        self.x_axis.scale = scale;
        self
    }

    pub fn y_scale(mut self, scale: AxisScale) -> Self {
        self.y_axis.scale = scale;
        self
    }

    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.y_axis.range = Some((min, max));
        self
    }

    pub fn histogram(mut self, bins: u32, marginal: Option<Marginal>) -> Self {
        self.histogram = Some(Histogram { bins, marginal });
        self
    }

    pub fn vline(mut self, date: &str, label: &str) -> Self {
        self.vlines.push(VLine {
            date: date.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn scale_toggle(mut self) -> Self {
        self.scale_toggle = true;
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
