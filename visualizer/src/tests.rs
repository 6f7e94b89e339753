#[cfg(test)]
mod tests {
    use crate::{figure, plot_points, render_html, Visualizer, PLOTLY_CDN};
    use reelscope_core::{
        AnalysisMap, CoreError, ItemAnalysis, Likes, PolarityScores, StoreError,
    };
    use scraper::{Html, Selector};
    use std::env;
    use std::path::PathBuf;

    fn item(id: &str, likes: Likes, compound: Option<f64>) -> ItemAnalysis {
        ItemAnalysis {
            url: format!("https://www.instagram.com/reel/{}/", id),
            likes,
            comments_count: if compound.is_some() { 5 } else { 0 },
            avg_sentiment: compound.map(|compound| PolarityScores {
                compound,
                ..Default::default()
            }),
            comments: Vec::new(),
        }
    }

    fn sample() -> AnalysisMap {
        let mut analysis = AnalysisMap::new();
        analysis.insert("a".to_string(), item("a", Likes::Count(52_000), Some(0.42)));
        analysis.insert("b".to_string(), item("b", Likes::Text("1.2M".to_string()), Some(-0.1)));
        analysis.insert("c".to_string(), item("c", Likes::Count(900), None));
        analysis.insert("d".to_string(), item("d", Likes::Text("lots".to_string()), Some(0.3)));
        analysis
    }

    fn temp_dir() -> PathBuf {
        env::temp_dir().join(format!("test_visualizer_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_points_skip_null_sentiment_and_bad_likes() {
        let points = plot_points(&sample());

        let ids: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(points[0].likes, 52_000);
        assert_eq!(points[1].likes, 1_200_000);
        assert_eq!(points[1].compound, -0.1);
    }

    #[test]
    fn test_figure_uses_log_axis() {
        let fig = figure(&plot_points(&sample()));

        let yaxis = &fig["layout"]["yaxis"];
        assert_eq!(yaxis["type"], "log");
        assert_eq!(yaxis["ticktext"], serde_json::json!(["1k", "10k", "100k", "1m"]));
        assert_eq!(fig["data"][0]["customdata"][0][0], "https://www.instagram.com/reel/a/");
        assert_eq!(fig["data"][0]["x"][1], -0.1);
    }

    #[test]
    fn test_html_wires_click_to_url() {
        let html = render_html(&plot_points(&sample())).unwrap();
        let document = Html::parse_document(&html);

        let div = Selector::parse("div#plot").unwrap();
        assert_eq!(document.select(&div).count(), 1);

        let cdn = Selector::parse("script[src]").unwrap();
        let src: Vec<&str> = document
            .select(&cdn)
            .filter_map(|s| s.value().attr("src"))
            .collect();
        assert_eq!(src, vec![PLOTLY_CDN]);

        assert!(html.contains("plotly_click"));
        assert!(html.contains("window.open(url, '_blank')"));
    }

    #[test]
    fn test_script_close_tag_in_data_is_escaped() {
        let mut analysis = AnalysisMap::new();
        analysis.insert(
            "</script>".to_string(),
            item("x", Likes::Count(10), Some(0.0)),
        );
        let html = render_html(&plot_points(&analysis)).unwrap();

        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_run_writes_page() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("analysis.json");
        let output = dir.join("plot").join("interactive-plot.html");
        std::fs::write(&input, serde_json::to_string_pretty(&sample()).unwrap()).unwrap();

        let plotted = Visualizer::new(&input, &output).run().unwrap();

        assert_eq!(plotted, 2);
        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_run_without_input_fails() {
        let dir = temp_dir();
        let err = Visualizer::new(dir.join("missing.json"), dir.join("out.html"))
            .run()
            .unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::MissingInput { .. })));
    }
}
