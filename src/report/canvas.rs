//! Abstract 2D plotting surface and a recording implementation
//!
//! [`Axes`] records drawing primitives instead of rasterizing them. A
//! [`Figure`] is a grid of axes and serializes to JSON, so a front end can
//! render it with whatever plotting library it likes.

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// Figure size in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
}

/// Stroke options for lines
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub dash: Dash,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dash = Dash::Dashed;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// One labelled distribution of a violin plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinGroup {
    pub label: String,
    pub values: Vec<f64>,
}

/// A recorded drawing primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        x: Vec<f64>,
        y: Vec<f64>,
        style: LineStyle,
    },
    /// `edges` has one more element than `heights`
    Histogram {
        edges: Vec<f64>,
        heights: Vec<f64>,
        density: bool,
    },
    Violin {
        groups: Vec<ViolinGroup>,
        orientation: Orientation,
    },
    /// Cell values row-major; NaN cells are empty
    Heatmap {
        values: Vec<Vec<f64>>,
        row_labels: Vec<String>,
        col_labels: Vec<String>,
    },
    VLine {
        x: f64,
        style: LineStyle,
    },
}

/// Drawing surface used by the report builders
pub trait Canvas {
    fn line(&mut self, x: &[f64], y: &[f64], style: LineStyle);

    /// Bin `values` into `bins` equal-width bins; non-finite values are skipped
    fn histogram(&mut self, values: &[f64], bins: usize, density: bool);

    fn violin(&mut self, groups: Vec<ViolinGroup>, orientation: Orientation);

    fn heatmap(&mut self, values: Vec<Vec<f64>>, row_labels: Vec<String>, col_labels: Vec<String>);

    fn vline(&mut self, x: f64, style: LineStyle);

    fn title(&mut self, title: &str);

    fn labels(&mut self, xlabel: Option<&str>, ylabel: Option<&str>);

    fn limits(&mut self, xlim: Option<(f64, f64)>, ylim: Option<(f64, f64)>);

    fn legend(&mut self);
}

/// Recording canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axes {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub legend: bool,
    pub primitives: Vec<Primitive>,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = (&[f64], &[f64], &LineStyle)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line { x, y, style } => Some((x.as_slice(), y.as_slice(), style)),
            _ => None,
        })
    }
}

/// Equal-width bin edges and heights over the finite values
pub fn histogram_bins(values: &[f64], bins: usize, density: bool) -> (Vec<f64>, Vec<f64>) {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + i as f64 * width).collect();

    let mut counts = vec![0.0; bins];
    for v in &finite {
        let bin = (((v - min) / width) as usize).min(bins - 1);
        counts[bin] += 1.0;
    }

    if density {
        let scale = finite.len() as f64 * width;
        counts.iter_mut().for_each(|c| *c /= scale);
    }
    (edges, counts)
}

impl Canvas for Axes {
    fn line(&mut self, x: &[f64], y: &[f64], style: LineStyle) {
        self.primitives.push(Primitive::Line {
            x: x.to_vec(),
            y: y.to_vec(),
            style,
        });
    }

    fn histogram(&mut self, values: &[f64], bins: usize, density: bool) {
        let (edges, heights) = histogram_bins(values, bins, density);
        self.primitives.push(Primitive::Histogram {
            edges,
            heights,
            density,
        });
    }

    fn violin(&mut self, groups: Vec<ViolinGroup>, orientation: Orientation) {
        self.primitives.push(Primitive::Violin { groups, orientation });
    }

    fn heatmap(&mut self, values: Vec<Vec<f64>>, row_labels: Vec<String>, col_labels: Vec<String>) {
        self.primitives.push(Primitive::Heatmap {
            values,
            row_labels,
            col_labels,
        });
    }

    fn vline(&mut self, x: f64, style: LineStyle) {
        self.primitives.push(Primitive::VLine { x, style });
    }

    fn title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn labels(&mut self, xlabel: Option<&str>, ylabel: Option<&str>) {
        if let Some(x) = xlabel {
            self.xlabel = Some(x.to_string());
        }
        if let Some(y) = ylabel {
            self.ylabel = Some(y.to_string());
        }
    }

    fn limits(&mut self, xlim: Option<(f64, f64)>, ylim: Option<(f64, f64)>) {
        if xlim.is_some() {
            self.xlim = xlim;
        }
        if ylim.is_some() {
            self.ylim = ylim;
        }
    }

    fn legend(&mut self) {
        self.legend = true;
    }
}

/// Position of an axes in its figure grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AxesId {
    pub row: usize,
    pub col: usize,
}

impl AxesId {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Grid of axes; the handle returned by every plotting entry point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub size: FigureSize,
    pub rows: usize,
    pub cols: usize,
    axes: Vec<Axes>,
}

impl Figure {
    /// Single-axes figure
    pub fn new(size: FigureSize) -> Self {
        Self::grid(1, 1, size)
    }

    /// `rows x cols` grid of empty axes, at least 1x1
    pub fn grid(rows: usize, cols: usize, size: FigureSize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            size,
            rows,
            cols,
            axes: vec![Axes::new(); rows * cols],
        }
    }

    fn index(&self, id: AxesId) -> Result<usize> {
        if id.row >= self.rows || id.col >= self.cols {
            return Err(Error::InvalidInput(format!(
                "axes ({}, {}) outside a {}x{} figure",
                id.row, id.col, self.rows, self.cols
            )));
        }
        Ok(id.row * self.cols + id.col)
    }

    pub fn axes(&self, id: AxesId) -> Result<&Axes> {
        let i = self.index(id)?;
        Ok(&self.axes[i])
    }

    pub fn axes_mut(&mut self, id: AxesId) -> Result<&mut Axes> {
        let i = self.index(id)?;
        Ok(&mut self.axes[i])
    }

    /// All axes, row-major
    pub fn all_axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
