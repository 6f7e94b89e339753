//! Likes-vs-sentiment scatter plot rendered as one self-contained HTML page.

use progress_store::write_atomic;
use reelscope_core::{AnalysisMap, CoreError, StoreError};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
pub const PLOT_DIV_ID: &str = "plot";

const TICK_VALUES: [u64; 4] = [1_000, 10_000, 100_000, 1_000_000];
const TICK_LABELS: [&str; 4] = ["1k", "10k", "100k", "1m"];

/// One plotted item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub id: String,
    pub url: String,
    pub likes: u64,
    pub compound: f64,
    pub comments_count: usize,
}

/// Items without an average sentiment or with likes that do not read as a
/// number are left out.
pub fn plot_points(analysis: &AnalysisMap) -> Vec<PlotPoint> {
    analysis
        .iter()
        .filter_map(|(id, item)| {
            let Some(avg) = item.avg_sentiment else {
                debug!("skipping {}: no sentiment", id);
                return None;
            };
            let Some(likes) = item.likes.as_count() else {
                debug!("skipping {}: unreadable likes {:?}", id, item.likes);
                return None;
            };
            Some(PlotPoint {
                id: id.clone(),
                url: item.url.clone(),
                likes,
                compound: avg.compound,
                comments_count: item.comments_count,
            })
        })
        .collect()
}

/// Plotly figure (data + layout) for `points`.
pub fn figure(points: &[PlotPoint]) -> serde_json::Value {
    let trace = json!({
        "type": "scatter",
        "mode": "markers",
        "x": points.iter().map(|p| p.compound).collect::<Vec<_>>(),
        "y": points.iter().map(|p| p.likes).collect::<Vec<_>>(),
        "customdata": points.iter().map(|p| vec![p.url.clone()]).collect::<Vec<_>>(),
        "text": points.iter().map(|p| p.id.clone()).collect::<Vec<_>>(),
        "marker": {
            "size": 12,
            "line": { "width": 2, "color": "DarkSlateGrey" }
        },
        "hovertemplate": "sentiment: %{x}<br>likes: %{y}<br>url: %{customdata[0]}<extra></extra>"
    });

    let layout = json!({
        "title": { "text": "likes vs sentiment" },
        "hovermode": "closest",
        "xaxis": { "title": { "text": "sentiment (higher = more positive)" } },
        "yaxis": {
            "type": "log",
            "title": { "text": "likes (log scale)" },
            "tickvals": TICK_VALUES,
            "ticktext": TICK_LABELS
        },
        "plot_bgcolor": "rgba(240,240,240,0.9)",
        "height": 800,
        "width": 1400
    });

    json!({ "data": [trace], "layout": layout })
}

/// Full page: the plot div, the figure and a click handler that opens the
/// clicked point's URL in a new tab.
pub fn render_html(points: &[PlotPoint]) -> Result<String, CoreError> {
    // "</" inside the inline script would end it early
    let figure = serde_json::to_string(&figure(points))?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>likes vs sentiment</title>
    <script src="{cdn}"></script>
</head>
<body>
    <div id="{div}"></div>
    <script>
        const figure = {figure};
        Plotly.newPlot('{div}', figure.data, figure.layout);
        document.addEventListener('DOMContentLoaded', function() {{
            const plot = document.getElementById('{div}');
            plot.on('plotly_click', function(data) {{
                const url = data.points[0].customdata[0];
                window.open(url, '_blank');
            }});
        }});
    </script>
</body>
</html>
"#,
        cdn = PLOTLY_CDN,
        div = PLOT_DIV_ID,
        figure = figure,
    ))
}

/// Reads an analysis file and writes the plot page.
pub struct Visualizer {
    input: PathBuf,
    output: PathBuf,
}

impl Visualizer {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Returns how many items were plotted.
    pub fn run(&self) -> Result<usize, CoreError> {
        let analysis = load_analysis(&self.input)?;
        let points = plot_points(&analysis);
        info!(
            "plotting {} of {} reels",
            points.len(),
            analysis.len()
        );

        write_atomic(&self.output, &render_html(&points)?)?;
        info!("saved plot to {}", self.output.display());
        Ok(points.len())
    }
}

fn load_analysis(path: &Path) -> Result<AnalysisMap, CoreError> {
    if !path.exists() {
        return Err(StoreError::MissingInput {
            path: path.display().to_string(),
        }
        .into());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests;
