#![cfg(feature = "cairo-backend")]

use chart3d_rs::api::{BarChart3D, ChartConfig};
use chart3d_rs::core::{ChartType, DataSeries, Viewport};
use chart3d_rs::render::{
    CairoTextRasterizer, HeadlessSurface, NullRenderer, TextCache, TextRasterizer,
};

#[test]
fn cairo_rasterizer_produces_rgba_label_bitmap() {
    let bitmap = CairoTextRasterizer::default()
        .rasterize("Q1 2026")
        .expect("rasterize");
    assert!(bitmap.width() > 0);
    assert!(bitmap.height() > 0);
    assert_eq!(
        bitmap.pixels().len(),
        bitmap.width() as usize * bitmap.height() as usize * 4
    );
    assert!(bitmap.pixels().chunks_exact(4).any(|px| px[3] > 0));
}

#[test]
fn empty_label_yields_empty_bitmap() {
    let bitmap = CairoTextRasterizer::new("Sans 12")
        .rasterize("")
        .expect("rasterize");
    assert_eq!(bitmap.width(), 0);
}

#[test]
fn chart_uses_cairo_labels_through_text_cache() {
    let mut chart = BarChart3D::new_with_text_cache(
        NullRenderer::default(),
        HeadlessSurface::new(Viewport::new(640, 480)),
        ChartConfig::default(),
        TextCache::new(Box::new(CairoTextRasterizer::default())),
    )
    .expect("chart init");
    chart
        .build_scene(&[DataSeries::new(vec![1.0, 2.0])], &["a", "b"], &ChartType::default())
        .expect("build");
    chart.with_text_cache(|cache| {
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a"));
    });
}
