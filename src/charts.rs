//! Backend-neutral chart descriptions.
//!
//! Charts are plain data: a renderer (or the JSON report consumer) decides
//! how to draw them.

use serde::Serialize;

/// A named sequence of `(x, y)` points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// One bar of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub x: f64,
    pub height: f64,
}

/// A single chart panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Line {
        title: String,
        x_label: String,
        y_label: String,
        series: Vec<Series>,
    },
    Bar {
        title: String,
        x_label: String,
        y_label: String,
        bars: Vec<Bar>,
    },
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Line { title, .. } | Chart::Bar { title, .. } => title,
        }
    }
}

/// Panel arrangement inside a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Panels stacked top to bottom.
    Vertical,
    /// Panels side by side, left to right.
    Horizontal,
}

impl Layout {
    fn reading_order(&self) -> &'static str {
        match self {
            Layout::Vertical => "top to bottom",
            Layout::Horizontal => "left to right",
        }
    }
}

/// Several panels sharing one title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGrid {
    pub title: String,
    pub layout: Layout,
    pub panels: Vec<Chart>,
}

impl ChartGrid {
    /// Build a grid whose title lists `labels` in panel reading order.
    pub fn labeled(heading: &str, layout: Layout, labels: &[String], panels: Vec<Chart>) -> Self {
        Self {
            title: format!(
                "{} ({}: {})",
                heading,
                layout.reading_order(),
                labels.join(", ")
            ),
            layout,
            panels,
        }
    }
}

/// Anything that can be displayed as one figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Figure {
    Chart(Chart),
    Grid(ChartGrid),
}

impl Figure {
    pub fn title(&self) -> &str {
        match self {
            Figure::Chart(chart) => chart.title(),
            Figure::Grid(grid) => &grid.title,
        }
    }

    /// Number of panels drawn.
    pub fn panel_count(&self) -> usize {
        match self {
            Figure::Chart(_) => 1,
            Figure::Grid(grid) => grid.panels.len(),
        }
    }
}

/// Bar chart of per-item exposure rates (items 1-indexed).
pub fn exposure_chart(title: impl Into<String>, rates: &[f64]) -> Chart {
    Chart::Bar {
        title: title.into(),
        x_label: "Item".to_string(),
        y_label: "Exposure rate".to_string(),
        bars: rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| Bar {
                x: (i + 1) as f64,
                height: rate,
            })
            .collect(),
    }
}

/// Bar chart of a length → frequency table.
pub fn length_chart<'a>(
    title: impl Into<String>,
    frequencies: impl IntoIterator<Item = (&'a usize, &'a usize)>,
) -> Chart {
    Chart::Bar {
        title: title.into(),
        x_label: "Test length".to_string(),
        y_label: "Frequency".to_string(),
        bars: frequencies
            .into_iter()
            .map(|(&length, &freq)| Bar {
                x: length as f64,
                height: freq as f64,
            })
            .collect(),
    }
}

/// Line chart of a recovery rate against item position.
pub fn recovery_chart(title: impl Into<String>, y_label: &str, series: Vec<Series>) -> Chart {
    Chart::Line {
        title: title.into(),
        x_label: "Item position".to_string(),
        y_label: y_label.to_string(),
        series,
    }
}
